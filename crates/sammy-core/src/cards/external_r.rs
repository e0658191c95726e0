//! Card set 3: external R-function parameters, in the standard or the
//! compact (`R-EXTernal`) layout.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyResult,
    VaryDomain,
};
use crate::field::{CardField, FieldSpec, LineWriter};

pub const EXTERNAL_R_HEADER: &str = "EXTERnal R-function parameters follow";
pub const EXTERNAL_R_ALTERNATE_HEADER: &str = "R-EXTernal parameters follow";

const STANDARD_NAMES: [&str; 5] = ["EDOWN", "EUP", "RCON", "RLIN", "SALPHA"];
const ALTERNATE_NAMES: [&str; 7] = ["EDOWN", "EUP", "RCON", "RLIN", "SCON", "SLIN", "RQ"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExternalRLayout {
    /// Eleven-column reals with flags after them.
    #[default]
    Standard,
    /// Flags first, then seven ten-column reals.
    Alternate,
}

impl ExternalRLayout {
    pub const fn value_count(self) -> usize {
        match self {
            Self::Standard => STANDARD_NAMES.len(),
            Self::Alternate => ALTERNATE_NAMES.len(),
        }
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::Standard => EXTERNAL_R_HEADER,
            Self::Alternate => EXTERNAL_R_ALTERNATE_HEADER,
        }
    }

    const fn group_field(self) -> ExternalRField {
        match self {
            Self::Standard => ExternalRField::Group,
            Self::Alternate => ExternalRField::CompactGroup,
        }
    }

    const fn channel_field(self) -> ExternalRField {
        match self {
            Self::Standard => ExternalRField::Channel,
            Self::Alternate => ExternalRField::CompactChannel,
        }
    }

    const fn value_field(self, index: usize) -> ExternalRField {
        match self {
            Self::Standard => ExternalRField::Value(index),
            Self::Alternate => ExternalRField::CompactValue(index),
        }
    }

    const fn vary_field(self, index: usize) -> ExternalRField {
        match self {
            Self::Standard => ExternalRField::Vary(index),
            Self::Alternate => ExternalRField::CompactVary(index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalRField {
    Group,
    Channel,
    Value(usize),
    Vary(usize),
    CompactGroup,
    CompactChannel,
    CompactVary(usize),
    CompactValue(usize),
}

impl CardField for ExternalRField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Group => FieldSpec::integer("IGROUP", 1, 3),
            Self::Channel => FieldSpec::integer("ICHAN", 4, 5),
            Self::Value(index) => {
                FieldSpec::real(STANDARD_NAMES[index], 6 + 11 * index, 16 + 11 * index)
            }
            Self::Vary(index) => FieldSpec::flag(
                STANDARD_NAMES[index],
                62 + 2 * index,
                62 + 2 * index,
                VaryDomain::Basic,
            ),
            Self::CompactGroup => FieldSpec::integer("IGROUP", 1, 2),
            Self::CompactChannel => FieldSpec::integer("ICHAN", 3, 3),
            Self::CompactVary(index) => FieldSpec::flag(
                ALTERNATE_NAMES[index],
                4 + index,
                4 + index,
                VaryDomain::Basic,
            ),
            Self::CompactValue(index) => {
                FieldSpec::real(ALTERNATE_NAMES[index], 11 + 10 * index, 20 + 10 * index)
            }
        }
    }
}

/// External R-function terms for one channel of one spin group.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalREntry {
    pub group: u32,
    pub channel: u32,
    /// EDOWN, EUP, RCON, RLIN then SALPHA (standard) or SCON, SLIN, RQ (alternate).
    pub values: Vec<Param>,
}

impl ExternalREntry {
    pub fn new(group: u32, channel: u32, values: Vec<Param>) -> Self {
        Self {
            group,
            channel,
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalRCard {
    pub layout: ExternalRLayout,
    pub entries: Vec<ExternalREntry>,
}

impl ExternalRCard {
    pub fn new(layout: ExternalRLayout, entries: Vec<ExternalREntry>) -> Self {
        Self { layout, entries }
    }

    pub fn max_group(&self) -> u32 {
        self.entries.iter().map(|entry| entry.group).max().unwrap_or(0)
    }

    pub fn parse_layout(
        layout: ExternalRLayout,
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut entries = Vec::with_capacity(lines.len() - cursor);
        for index in cursor..lines.len() {
            let reader = line_reader(lines, index, context)?;
            let values = (0..layout.value_count())
                .map(|slot| reader.param(layout.value_field(slot), layout.vary_field(slot)))
                .collect::<SammyResult<Vec<_>>>()?;
            entries.push(ExternalREntry {
                group: reader.unsigned(layout.group_field(), 0)?,
                channel: reader.unsigned(layout.channel_field(), 0)?,
                values,
            });
        }

        Ok((Self { layout, entries }, lines.len() - cursor))
    }
}

impl CardModel for ExternalRCard {
    const CARD_SET: CardSet = CardSet::ExternalR;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        Self::parse_layout(ExternalRLayout::Standard, lines, cursor, context)
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let layout = self.layout;
        let mut lines = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            writer.integer(layout.group_field(), i64::from(entry.group))?;
            writer.integer(layout.channel_field(), i64::from(entry.channel))?;
            for (slot, value) in entry.values.iter().enumerate() {
                writer.param(layout.value_field(slot), layout.vary_field(slot), *value)?;
            }
            lines.push(writer.finish());
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(self.layout.header())
    }

    fn validate(&self) -> SammyResult<()> {
        let expected = self.layout.value_count();
        for entry in &self.entries {
            if entry.values.len() != expected {
                return Err(SammyError::validation(format!(
                    "external R entry for group {} channel {} has {} values, the {:?} layout needs {expected}",
                    entry.group,
                    entry.channel,
                    entry.values.len(),
                    self.layout
                )));
            }
        }
        Ok(())
    }

    impl_instance_access!(ExternalR);
}

#[cfg(test)]
mod tests {
    use super::{ExternalRCard, ExternalREntry, ExternalRLayout};
    use crate::cards::CardModel;
    use crate::domain::{CardSet, DiagnosticContext, Param, SammyErrorKind};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::ExternalR)
    }

    fn entry(values: usize) -> ExternalREntry {
        let values = (0..values).map(|slot| Param::varied(slot as f64 + 0.5)).collect();
        ExternalREntry::new(2, 1, values)
    }

    #[test]
    fn standard_layout_puts_flags_after_values() {
        let card = ExternalRCard::new(ExternalRLayout::Standard, vec![entry(5)]);
        let lines = card.render(&context()).unwrap();

        assert_eq!(&lines[0][..5], "  2 1");
        assert_eq!(&lines[0][5..16], "        0.5");
        assert_eq!(&lines[0][60..], " 1 1 1 1 1");
        assert_eq!(card.header(), Some("EXTERnal R-function parameters follow"));

        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (parsed, _) = ExternalRCard::parse(&borrowed, 0, &context()).unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn alternate_layout_packs_flags_first() {
        let card = ExternalRCard::new(ExternalRLayout::Alternate, vec![entry(7)]);
        let lines = card.render(&context()).unwrap();

        assert_eq!(&lines[0][..10], " 211111111");
        assert_eq!(lines[0].len(), 80);

        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (parsed, _) =
            ExternalRCard::parse_layout(ExternalRLayout::Alternate, &borrowed, 0, &context())
                .unwrap();
        assert_eq!(parsed, card);
        assert_eq!(parsed.max_group(), 2);
    }

    #[test]
    fn value_count_must_match_layout() {
        let card = ExternalRCard::new(ExternalRLayout::Alternate, vec![entry(5)]);
        let error = card.render(&context()).expect_err("alternate layout needs seven values");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
    }
}
