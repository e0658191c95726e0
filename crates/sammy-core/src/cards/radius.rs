//! Card set 7: nuclear radii per spin group, in two positional layouts or the
//! keyword layout.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult, VaryDomain, VaryFlag,
};
use crate::field::{
    CardField, Columns, FieldError, FieldSpec, IntegerListLayout, LineReader, LineWriter,
    check_flag, format_free_real,
};

pub const RADIUS_HEADER: &str = "RADIUs parameters follow";
pub const RADIUS_KEYWORD_HEADER: &str = "RADII are in KEY-WORD format";
pub const CHANNEL_RADII_HEADER: &str = "CHANNEL RADII IN KEY-word format";

const DEFAULT_LIST: IntegerListLayout = IntegerListLayout {
    name: "spin group",
    item_width: 2,
    first_start: 25,
    continuation_start: 25,
    end: 78,
    marker: Columns::new(79, 80),
};

const ALTERNATE_LIST: IntegerListLayout = IntegerListLayout {
    name: "spin group",
    item_width: 5,
    first_start: 36,
    continuation_start: 36,
    end: 75,
    marker: Columns::new(76, 80),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RadiusLayout {
    /// Two-column spin-group numbers.
    #[default]
    Default,
    /// Five-column spin-group numbers for files with more than 99 groups.
    Alternate,
    /// `Radii=`, `Flags=`, `Group=` key/value lines.
    Keyword,
}

impl RadiusLayout {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Alternate => "alternate",
            Self::Keyword => "keyword",
        }
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::Default | Self::Alternate => RADIUS_HEADER,
            Self::Keyword => RADIUS_KEYWORD_HEADER,
        }
    }

    const fn list(self) -> IntegerListLayout {
        match self {
            Self::Alternate => ALTERNATE_LIST,
            Self::Default | Self::Keyword => DEFAULT_LIST,
        }
    }

    const fn fields(self) -> (RadiusField, RadiusField, RadiusField) {
        match self {
            Self::Alternate => (
                RadiusField::WideChannelMode,
                RadiusField::WideEffectiveVary,
                RadiusField::WideTrueVary,
            ),
            Self::Default | Self::Keyword => (
                RadiusField::ChannelMode,
                RadiusField::EffectiveVary,
                RadiusField::TrueVary,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusField {
    Effective,
    True,
    ChannelMode,
    EffectiveVary,
    TrueVary,
    WideChannelMode,
    WideEffectiveVary,
    WideTrueVary,
}

impl CardField for RadiusField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Effective => FieldSpec::real("PAREFF", 1, 10),
            Self::True => FieldSpec::real("PARTRU", 11, 20),
            Self::ChannelMode => FieldSpec::integer("ICHAN", 21, 21),
            Self::EffectiveVary => FieldSpec::flag("IFLEFF", 22, 22, VaryDomain::Basic),
            Self::TrueVary => FieldSpec::flag("IFLTRU", 23, 24, VaryDomain::Extended),
            Self::WideChannelMode => FieldSpec::integer("ICHAN", 21, 25),
            Self::WideEffectiveVary => FieldSpec::flag("IFLEFF", 26, 30, VaryDomain::Basic),
            Self::WideTrueVary => FieldSpec::flag("IFLTRU", 31, 35, VaryDomain::Extended),
        }
    }
}

/// A spin group and the channels of it the radii apply to; no channels
/// means every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChannels {
    pub group: u32,
    pub channels: Vec<u32>,
}

impl GroupChannels {
    pub fn all_channels(group: u32) -> Self {
        Self {
            group,
            channels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadiusEntry {
    pub effective: Param,
    /// A `-1` flag ties the true radius to the effective one.
    pub true_radius: Param,
    /// Empty means every spin group (`Group= all`, keyword layout only).
    pub groups: Vec<GroupChannels>,
    pub relative_uncertainty: Option<f64>,
    pub absolute_uncertainty: Option<f64>,
    pub particle_pair: Option<String>,
    pub orbital_momentum: Vec<String>,
}

impl RadiusEntry {
    pub fn new(effective: Param, true_radius: Param, groups: Vec<GroupChannels>) -> Self {
        Self {
            effective,
            true_radius,
            groups,
            ..Self::default()
        }
    }

    fn has_keyword_extras(&self) -> bool {
        self.relative_uncertainty.is_some()
            || self.absolute_uncertainty.is_some()
            || self.particle_pair.is_some()
            || !self.orbital_momentum.is_empty()
    }

    /// Channel list shared by every group, as the positional layouts need it.
    fn shared_channels(&self) -> SammyResult<&[u32]> {
        let Some(first) = self.groups.first() else {
            return Err(SammyError::validation(
                "positional radius entries need at least one spin group",
            ));
        };
        if self.groups.iter().any(|group| group.channels != first.channels) {
            return Err(SammyError::validation(
                "positional radius entries need one channel list shared by all groups",
            ));
        }
        Ok(&first.channels)
    }

    fn parse_positional(
        layout: RadiusLayout,
        lines: &[&str],
        index: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        let (mode_field, effective_vary, true_vary) = layout.fields();
        let reader = line_reader(lines, index, context)?;
        let effective = reader.param(RadiusField::Effective, effective_vary)?;
        let true_radius = reader.param(RadiusField::True, true_vary)?;
        let mode = reader.integer(mode_field, 0)?;

        let (items, continuation_lines) =
            layout
                .list()
                .read(&reader, &lines[index + 1..], |offset, raw| {
                    context.at_line(index + offset + 2, raw)
                })?;

        let separator = items.iter().position(|item| *item == 0);
        let (groups, channels) = match (mode, separator) {
            (0, None) => (items.as_slice(), &[][..]),
            (1, Some(at)) => (&items[..at], &items[at + 1..]),
            (1, None) => {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    "ICHAN is 1 but the list has no 0 ahead of the channel numbers",
                ));
            }
            (0, Some(_)) => {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    "spin group 0 is only allowed as the channel separator when ICHAN is 1",
                ));
            }
            (other, _) => {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    format!("ICHAN must be 0 or 1, found {other}"),
                ));
            }
        };
        if groups.is_empty() {
            return Err(reader.error(SammyErrorKind::MalformedField, "no spin groups listed"));
        }

        let groups = groups
            .iter()
            .map(|group| GroupChannels {
                group: *group,
                channels: channels.to_vec(),
            })
            .collect();
        Ok((
            Self::new(effective, true_radius, groups),
            1 + continuation_lines,
        ))
    }

    fn render_positional(
        &self,
        layout: RadiusLayout,
        context: &DiagnosticContext,
        first_line: usize,
    ) -> RenderResult<Vec<String>> {
        let (mode_field, effective_vary, true_vary) = layout.fields();
        let channels = self.shared_channels()?;
        let mut items: Vec<u32> = self.groups.iter().map(|group| group.group).collect();
        if !channels.is_empty() {
            items.push(0);
            items.extend_from_slice(channels);
        }

        let mut writer = LineWriter::new(context.at_output_line(first_line));
        writer.param(RadiusField::Effective, effective_vary, self.effective)?;
        writer.param(RadiusField::True, true_vary, self.true_radius)?;
        writer.integer(mode_field, i64::from(!channels.is_empty()))?;
        layout
            .list()
            .write(writer, &items, |offset| context.at_output_line(first_line + offset + 1))
    }

    fn render_keyword(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Radii= {}, {}    Flags= {}, {}",
            format_free_real(self.effective.value),
            format_free_real(self.true_radius.value),
            self.effective.vary.code(),
            self.true_radius.vary.code()
        )];
        if let Some(relative) = self.relative_uncertainty {
            lines.push(format!("   Relative= {}", format_free_real(relative)));
        }
        if let Some(absolute) = self.absolute_uncertainty {
            lines.push(format!("   Absolute= {}", format_free_real(absolute)));
        }
        if let Some(pair) = &self.particle_pair {
            lines.push(format!("   PP= {pair}"));
        }
        if !self.orbital_momentum.is_empty() {
            lines.push(format!("   L= {}", self.orbital_momentum.join(", ")));
        }
        if self.groups.is_empty() {
            lines.push("   Group= all".to_string());
        }
        for group in &self.groups {
            let mut line = format!("   Group= {}", group.group);
            if !group.channels.is_empty() {
                let channels: Vec<String> =
                    group.channels.iter().map(ToString::to_string).collect();
                line.push_str(&format!("   Chan= {},", channels.join(", ")));
            }
            lines.push(line);
        }
        lines
    }
}

/// `(key, values)` pairs found on one keyword line.
fn keyword_pairs(text: &str) -> Vec<(String, Vec<String>)> {
    let mut pairs: Vec<(String, Vec<String>)> = Vec::new();
    for token in text.replace(',', " ").split_whitespace() {
        match token.split_once('=') {
            Some((key, value)) => {
                let values = (!value.is_empty())
                    .then(|| value.to_string())
                    .into_iter()
                    .collect();
                pairs.push((key.to_ascii_lowercase(), values));
            }
            None => match pairs.last_mut() {
                Some((_, values)) => values.push(token.to_string()),
                None => pairs.push((String::new(), vec![token.to_string()])),
            },
        }
    }
    pairs
}

pub(super) fn keyword_real(reader: &LineReader<'_>, key: &str, text: &str) -> SammyResult<f64> {
    text.parse::<f64>().map_err(|_| {
        reader.error(
            SammyErrorKind::MalformedField,
            format!("{key}= expects a number, found '{text}'"),
        )
    })
}

pub(super) fn keyword_integer(reader: &LineReader<'_>, key: &str, text: &str) -> SammyResult<i64> {
    text.parse::<i64>().map_err(|_| {
        reader.error(
            SammyErrorKind::MalformedField,
            format!("{key}= expects an integer, found '{text}'"),
        )
    })
}

fn keyword_flag(reader: &LineReader<'_>, field: RadiusField, text: &str) -> SammyResult<VaryFlag> {
    let code = keyword_integer(reader, "Flags", text)?;
    let flag = VaryFlag::from_code(code).ok_or_else(|| {
        reader.error(
            SammyErrorKind::ValidationError,
            format!("{code} is not a vary flag"),
        )
    })?;
    check_flag(field, flag).map_err(|error| reader.error(error.kind(), error.to_string()))
}

fn parse_keyword(
    lines: &[&str],
    cursor: usize,
    context: &DiagnosticContext,
) -> ParseResult<Vec<RadiusEntry>> {
    let mut entries: Vec<RadiusEntry> = Vec::new();

    for index in cursor..lines.len() {
        let reader = line_reader(lines, index, context)?;
        let mut line_groups: Vec<u32> = Vec::new();
        let mut line_channels: Vec<u32> = Vec::new();
        let mut saw_group = false;

        for (key, values) in keyword_pairs(reader.raw()) {
            if matches!(key.as_str(), "radii" | "radius") {
                let effective = match values.first() {
                    Some(text) => keyword_real(&reader, "Radii", text)?,
                    None => {
                        return Err(
                            reader.error(SammyErrorKind::MalformedField, "Radii= has no value")
                        );
                    }
                };
                let true_value = match values.get(1) {
                    Some(text) => keyword_real(&reader, "Radii", text)?,
                    None => effective,
                };
                entries.push(RadiusEntry::new(
                    Param::fixed(effective),
                    Param::fixed(true_value),
                    Vec::new(),
                ));
                continue;
            }

            let Some(entry) = entries.last_mut() else {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    "keyword radius data must start with Radii=",
                ));
            };
            match key.as_str() {
                "flags" => {
                    if let Some(text) = values.first() {
                        entry.effective.vary =
                            keyword_flag(&reader, RadiusField::EffectiveVary, text)?;
                        entry.true_radius.vary = match values.get(1) {
                            Some(text) => keyword_flag(&reader, RadiusField::TrueVary, text)?,
                            None => entry.effective.vary,
                        };
                    }
                }
                "relative" | "absolute" => {
                    let text = values.first().map(String::as_str).unwrap_or_default();
                    let value = keyword_real(&reader, &key, text)?;
                    if key == "relative" {
                        entry.relative_uncertainty = Some(value);
                    } else {
                        entry.absolute_uncertainty = Some(value);
                    }
                }
                "pp" | "particle-pair" => entry.particle_pair = Some(values.join(" ")),
                "l" | "orbital" => entry.orbital_momentum = values,
                "group" => {
                    saw_group = true;
                    if values.len() == 1 && values[0].eq_ignore_ascii_case("all") {
                        continue;
                    }
                    for text in &values {
                        let group = keyword_integer(&reader, "Group", text)?;
                        line_groups.push(u32::try_from(group).map_err(|_| {
                            reader.error(
                                SammyErrorKind::OutOfRange,
                                format!("spin group {group} is negative"),
                            )
                        })?);
                    }
                }
                "chan" | "channel" | "channels" => {
                    for text in &values {
                        let channel = keyword_integer(&reader, "Chan", text)?;
                        line_channels.push(u32::try_from(channel).map_err(|_| {
                            reader.error(
                                SammyErrorKind::OutOfRange,
                                format!("channel {channel} is negative"),
                            )
                        })?);
                    }
                }
                other => {
                    return Err(reader.error(
                        SammyErrorKind::MalformedField,
                        format!("unknown radius keyword '{other}'"),
                    ));
                }
            }
        }

        if !line_channels.is_empty() && !saw_group {
            return Err(reader.error(
                SammyErrorKind::MalformedField,
                "Chan= without Group= on the same line",
            ));
        }
        if let Some(entry) = entries.last_mut() {
            entry.groups.extend(line_groups.into_iter().map(|group| GroupChannels {
                group,
                channels: line_channels.clone(),
            }));
        }
    }

    Ok(entries)
}

/// Spelling of the keyword-layout header; SAMNDF writes `Channel radii`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeywordRadiusHeader {
    #[default]
    Radii,
    ChannelRadii,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RadiusCard {
    pub layout: RadiusLayout,
    /// Only read when `layout` is `Keyword`.
    pub keyword_header: KeywordRadiusHeader,
    pub entries: Vec<RadiusEntry>,
}

impl RadiusCard {
    pub fn new(layout: RadiusLayout, entries: Vec<RadiusEntry>) -> Self {
        Self {
            layout,
            keyword_header: KeywordRadiusHeader::default(),
            entries,
        }
    }

    pub fn max_group(&self) -> u32 {
        self.entries
            .iter()
            .flat_map(|entry| entry.groups.iter().map(|group| group.group))
            .max()
            .unwrap_or(0)
    }

    pub fn parse_layout(
        layout: RadiusLayout,
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let entries = match layout {
            RadiusLayout::Keyword => parse_keyword(lines, cursor, context)?,
            RadiusLayout::Default | RadiusLayout::Alternate => {
                let mut entries = Vec::new();
                let mut index = cursor;
                while index < lines.len() {
                    let (entry, consumed) =
                        RadiusEntry::parse_positional(layout, lines, index, context)?;
                    entries.push(entry);
                    index += consumed;
                }
                entries
            }
        };

        Ok((Self::new(layout, entries), lines.len() - cursor))
    }
}

impl CardModel for RadiusCard {
    const CARD_SET: CardSet = CardSet::Radius;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        let body = &lines[cursor.min(lines.len())..];
        let layout = crate::dispatch::sniff::radius_layout(body, context)?;
        Self::parse_layout(layout, lines, cursor, context)
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut lines = Vec::new();
        for entry in &self.entries {
            match self.layout {
                RadiusLayout::Keyword => lines.extend(entry.render_keyword()),
                layout => {
                    let rendered = entry.render_positional(layout, context, lines.len() + 1)?;
                    lines.extend(rendered);
                }
            }
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        match (self.layout, self.keyword_header) {
            (RadiusLayout::Keyword, KeywordRadiusHeader::ChannelRadii) => {
                Some(CHANNEL_RADII_HEADER)
            }
            (layout, _) => Some(layout.header()),
        }
    }

    fn validate(&self) -> SammyResult<()> {
        for entry in &self.entries {
            let field_error = |error: FieldError| SammyError::new(error.kind(), error.to_string());
            check_flag(RadiusField::EffectiveVary, entry.effective.vary).map_err(field_error)?;
            check_flag(RadiusField::TrueVary, entry.true_radius.vary).map_err(field_error)?;

            if self.layout != RadiusLayout::Keyword {
                entry.shared_channels()?;
                if entry.has_keyword_extras() {
                    return Err(SammyError::validation(format!(
                        "uncertainties, particle pair and L values need the keyword radius layout, not {}",
                        self.layout.as_str()
                    )));
                }
            }
        }
        Ok(())
    }

    impl_instance_access!(Radius);
}
