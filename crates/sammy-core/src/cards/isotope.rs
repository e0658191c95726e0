//! Card set 10: isotopic abundances and masses with their spin groups.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::common::GroupListMode;
use crate::domain::{CardSet, DiagnosticContext, Param, ParseResult, RenderResult, VaryDomain};
use crate::field::{CardField, Columns, FieldSpec, IntegerListLayout, LineWriter};

pub const ISOTOPE_HEADER: &str = "ISOTOpic abundances and masses";
pub const NUCLIDE_HEADER: &str = "NUCLIde abundances and masses";
/// SAMNDF spelling; its lists are always five columns wide.
pub const ISOTOPIC_MASSES_HEADER: &str = "ISOTOPIC MASSES and abundances follow";

const STANDARD_LIST: IntegerListLayout = IntegerListLayout {
    name: "spin group",
    item_width: 2,
    first_start: 33,
    continuation_start: 1,
    end: 78,
    marker: Columns::new(79, 80),
};

const EXTENDED_LIST: IntegerListLayout = IntegerListLayout {
    name: "spin group",
    item_width: 5,
    first_start: 36,
    continuation_start: 1,
    end: 75,
    marker: Columns::new(76, 80),
};

/// Which of the accepted header spellings the card carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsotopeHeader {
    #[default]
    Isotopic,
    Nuclide,
    Masses,
}

impl IsotopeHeader {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Isotopic => ISOTOPE_HEADER,
            Self::Nuclide => NUCLIDE_HEADER,
            Self::Masses => ISOTOPIC_MASSES_HEADER,
        }
    }

    /// Group-list width the header imposes regardless of the codec options.
    pub const fn forced_list_mode(self) -> Option<GroupListMode> {
        match self {
            Self::Masses => Some(GroupListMode::Extended),
            Self::Isotopic | Self::Nuclide => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsotopeField {
    Mass,
    Abundance,
    Uncertainty,
    Vary,
    WideVary,
}

impl CardField for IsotopeField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Mass => FieldSpec::real("AMUISO", 1, 10),
            Self::Abundance => FieldSpec::real("PARISO", 11, 20),
            Self::Uncertainty => FieldSpec::real("DELISO", 21, 30),
            Self::Vary => FieldSpec::flag("IFLISO", 31, 32, VaryDomain::Extended),
            Self::WideVary => FieldSpec::flag("IFLISO", 31, 35, VaryDomain::Extended),
        }
    }
}

const fn list_layout(extended: bool) -> (IntegerListLayout, IsotopeField) {
    if extended {
        (EXTENDED_LIST, IsotopeField::WideVary)
    } else {
        (STANDARD_LIST, IsotopeField::Vary)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IsotopeEntry {
    pub mass: f64,
    pub abundance: Param,
    pub uncertainty: Option<f64>,
    pub groups: Vec<u32>,
}

impl IsotopeEntry {
    pub fn new(mass: f64, abundance: Param, groups: Vec<u32>) -> Self {
        Self {
            mass,
            abundance,
            uncertainty: None,
            groups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsotopeCard {
    pub header: IsotopeHeader,
    /// `None` defers to the codec options when rendering.
    pub list_mode: Option<GroupListMode>,
    pub entries: Vec<IsotopeEntry>,
}

impl IsotopeCard {
    pub fn new(entries: Vec<IsotopeEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn max_group(&self) -> u32 {
        self.entries
            .iter()
            .flat_map(|entry| entry.groups.iter().copied())
            .max()
            .unwrap_or(0)
    }

    /// Whether rendering uses five-column group numbers.
    pub fn uses_extended_list(&self) -> bool {
        let mode = self.header.forced_list_mode().or(self.list_mode);
        match mode.unwrap_or_default() {
            GroupListMode::Standard => false,
            GroupListMode::Extended => true,
            GroupListMode::Auto => self.max_group() > STANDARD_LIST.max_item(),
        }
    }

    pub fn parse_mode(
        mode: GroupListMode,
        header: IsotopeHeader,
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }
        let extended = matches!(mode, GroupListMode::Extended);
        let (list, vary) = list_layout(extended);

        let mut entries = Vec::new();
        let mut index = cursor;
        while index < lines.len() {
            let reader = line_reader(lines, index, context)?;
            let first_line = index;
            let (groups, continuation_lines) =
                list.read(&reader, &lines[index + 1..], |offset, raw| {
                    context.at_line(first_line + offset + 2, raw)
                })?;
            entries.push(IsotopeEntry {
                mass: reader.real(IsotopeField::Mass)?,
                abundance: reader.param(IsotopeField::Abundance, vary)?,
                uncertainty: reader.optional_real(IsotopeField::Uncertainty)?,
                groups,
            });
            index += 1 + continuation_lines;
        }

        let list_mode = if extended {
            GroupListMode::Extended
        } else {
            GroupListMode::Standard
        };
        Ok((
            Self {
                header,
                list_mode: Some(list_mode),
                entries,
            },
            index - cursor,
        ))
    }
}

impl CardModel for IsotopeCard {
    const CARD_SET: CardSet = CardSet::Isotopes;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        let mode = match lines.get(cursor) {
            Some(first) => crate::dispatch::sniff::isotope_list_mode(first),
            None => GroupListMode::Standard,
        };
        Self::parse_mode(mode, IsotopeHeader::Isotopic, lines, cursor, context)
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        let (list, vary) = list_layout(self.uses_extended_list());
        let mut lines = Vec::new();
        for entry in &self.entries {
            let first_line = lines.len() + 1;
            let mut writer = LineWriter::new(context.at_output_line(first_line));
            writer.real(IsotopeField::Mass, entry.mass)?;
            writer.param(IsotopeField::Abundance, vary, entry.abundance)?;
            writer.optional_real(IsotopeField::Uncertainty, entry.uncertainty)?;
            let rendered = list.write(writer, &entry.groups, |offset| {
                context.at_output_line(first_line + offset + 1)
            })?;
            lines.extend(rendered);
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(self.header.text())
    }

    impl_instance_access!(Isotopes);
}

#[cfg(test)]
mod tests {
    use super::{IsotopeCard, IsotopeEntry, IsotopeHeader};
    use crate::cards::CardModel;
    use crate::common::GroupListMode;
    use crate::domain::{CardSet, DiagnosticContext, Param, SammyErrorKind, VaryFlag};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::Isotopes)
    }

    fn reparse(card: &IsotopeCard) -> (Vec<String>, IsotopeCard) {
        let lines = card.render(&context()).expect("card should render");
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (parsed, consumed) = IsotopeCard::parse(&borrowed, 0, &context()).unwrap();
        assert_eq!(consumed, lines.len());
        (lines, parsed)
    }

    #[test]
    fn standard_list_starts_at_column_33() {
        let mut card = IsotopeCard::new(vec![
            IsotopeEntry::new(180.948, Param::varied(0.99988), vec![1, 2, 3]),
            IsotopeEntry::new(179.947, Param::new(0.00012, VaryFlag::UseFromOthers), vec![4]),
        ]);
        card.entries[0].uncertainty = Some(0.0001);

        let (lines, parsed) = reparse(&card);
        assert_eq!(&lines[0][30..], " 1 1 2 3");
        assert_eq!(&lines[1][30..], "-2 4");
        assert_eq!(parsed.list_mode, Some(GroupListMode::Standard));
        assert_eq!(parsed.entries, card.entries);
    }

    #[test]
    fn auto_mode_widens_lists_for_large_group_numbers() {
        let card = IsotopeCard::new(vec![IsotopeEntry::new(
            55.845,
            Param::fixed(1.0),
            vec![100, 101],
        )]);
        assert!(card.uses_extended_list());

        let (lines, parsed) = reparse(&card);
        assert_eq!(&lines[0][30..], "    0  100  101");
        assert_eq!(parsed.list_mode, Some(GroupListMode::Extended));
        assert_eq!(parsed.entries, card.entries);
    }

    #[test]
    fn long_lists_continue_from_column_one() {
        let groups: Vec<u32> = (1..=30).collect();
        let card = IsotopeCard {
            header: IsotopeHeader::Nuclide,
            list_mode: Some(GroupListMode::Standard),
            entries: vec![IsotopeEntry::new(10.0, Param::fixed(1.0), groups.clone())],
        };

        let (lines, parsed) = reparse(&card);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("-1"));
        assert_eq!(lines[1], "24252627282930");
        assert_eq!(parsed.entries[0].groups, groups);
        assert_eq!(card.header(), Some("NUCLIde abundances and masses"));
    }

    #[test]
    fn negative_flags_keep_the_extended_list() {
        let card = IsotopeCard {
            list_mode: Some(GroupListMode::Extended),
            ..IsotopeCard::new(vec![
                IsotopeEntry::new(
                    180.948,
                    Param::new(0.99988, VaryFlag::UseFromParameterFile),
                    vec![101, 102],
                ),
                IsotopeEntry::new(179.947, Param::new(0.00012, VaryFlag::UseFromOthers), vec![4]),
            ])
        };

        let (lines, parsed) = reparse(&card);
        assert_eq!(&lines[0][30..], "   -1  101  102");
        assert_eq!(&lines[1][30..], "   -2    4");
        assert_eq!(parsed.list_mode, Some(GroupListMode::Extended));
        assert_eq!(parsed.entries, card.entries);
    }

    #[test]
    fn masses_header_always_writes_five_column_lists() {
        let card = IsotopeCard {
            header: IsotopeHeader::Masses,
            list_mode: Some(GroupListMode::Standard),
            entries: vec![IsotopeEntry::new(180.948, Param::fixed(1.0), vec![1, 2])],
        };
        assert!(card.uses_extended_list());

        let lines = card.render(&context()).unwrap();
        assert_eq!(&lines[0][30..], "    0    1    2");
        assert_eq!(card.header(), Some("ISOTOPIC MASSES and abundances follow"));
    }

    #[test]
    fn forced_standard_mode_rejects_wide_groups() {
        let card = IsotopeCard {
            list_mode: Some(GroupListMode::Standard),
            ..IsotopeCard::new(vec![IsotopeEntry::new(1.0, Param::fixed(1.0), vec![150])])
        };
        assert_eq!(
            card.render(&context()).expect_err("150 needs three columns").kind(),
            SammyErrorKind::OutOfRange
        );
    }
}
