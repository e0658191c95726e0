//! Input-file card 10: spin groups and their channels. Parameter files written
//! by SAMNDF carry the same card as `SPIN GROUP INFOrmation`, with the channel
//! radii shifted one column right.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult,
};
use crate::field::{CardField, Columns, FieldSpec, LineReader, LineWriter};

pub const SPIN_GROUP_HEADER: &str = "SPIN GROUPS";
pub const SPIN_GROUP_INFORMATION_HEADER: &str = "SPIN GROUP INFOrmation";

const GROUP_NUMBER: Columns = Columns::new(1, 3);
const GROUP_GAP: Columns = Columns::single(4);

/// Header spelling, which also fixes where channel radii sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpinGroupHeader {
    #[default]
    Groups,
    Information,
}

impl SpinGroupHeader {
    pub const fn text(self) -> &'static str {
        match self {
            Self::Groups => SPIN_GROUP_HEADER,
            Self::Information => SPIN_GROUP_INFORMATION_HEADER,
        }
    }

    const fn radius_fields(self) -> (SpinGroupField, SpinGroupField) {
        match self {
            Self::Groups => (SpinGroupField::EffectiveRadius, SpinGroupField::TrueRadius),
            Self::Information => (
                SpinGroupField::ShiftedEffectiveRadius,
                SpinGroupField::ShiftedTrueRadius,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinGroupField {
    Group,
    GroupExcluded,
    EntryChannels,
    ExitChannels,
    Spin,
    Abundance,
    Channel,
    ParticlePair,
    ChannelExcluded,
    OrbitalMomentum,
    ChannelSpin,
    Boundary,
    EffectiveRadius,
    TrueRadius,
    ShiftedEffectiveRadius,
    ShiftedTrueRadius,
}

impl CardField for SpinGroupField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Group => FieldSpec::integer("JJ", 1, 3),
            Self::GroupExcluded => FieldSpec::alpha("EXCL", 5, 5),
            Self::EntryChannels => FieldSpec::integer("NENT", 8, 10),
            Self::ExitChannels => FieldSpec::integer("NEXT", 13, 15),
            Self::Spin => FieldSpec::real("SPINJ", 16, 20),
            Self::Abundance => FieldSpec::real("ABNDNC", 21, 30),
            Self::Channel => FieldSpec::integer("ICH", 3, 5),
            Self::ParticlePair => FieldSpec::alpha("PPNAME", 8, 15),
            Self::ChannelExcluded => FieldSpec::alpha("EXCL", 18, 18),
            Self::OrbitalMomentum => FieldSpec::integer("L", 19, 20),
            Self::ChannelSpin => FieldSpec::real("SCH", 21, 30),
            Self::Boundary => FieldSpec::real("BND", 31, 40),
            Self::EffectiveRadius => FieldSpec::real("REFF", 41, 50),
            Self::TrueRadius => FieldSpec::real("RTRU", 51, 60),
            Self::ShiftedEffectiveRadius => FieldSpec::real("REFF", 42, 52),
            Self::ShiftedTrueRadius => FieldSpec::real("RTRU", 53, 63),
        }
    }
}

fn read_exclusion(reader: &LineReader<'_>, field: SpinGroupField) -> SammyResult<bool> {
    match reader.keyword(field).as_str() {
        "" => Ok(false),
        "X" | "x" => Ok(true),
        other => Err(reader.error(
            SammyErrorKind::MalformedField,
            format!("exclusion column holds '{other}', expected X or blank"),
        )),
    }
}

fn write_exclusion(writer: &mut LineWriter, field: SpinGroupField, excluded: bool) {
    if excluded {
        writer.alpha(field, "X");
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpinChannel {
    pub number: u32,
    pub particle_pair: String,
    pub excluded: bool,
    pub orbital_momentum: u32,
    pub channel_spin: Option<f64>,
    pub boundary: Option<f64>,
    pub effective_radius: Option<f64>,
    pub true_radius: Option<f64>,
}

impl SpinChannel {
    pub fn new(number: u32, particle_pair: impl Into<String>, orbital_momentum: u32) -> Self {
        Self {
            number,
            particle_pair: particle_pair.into(),
            orbital_momentum,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpinGroup {
    pub number: u32,
    pub excluded: bool,
    pub entry_channels: u32,
    pub exit_channels: u32,
    /// Total angular momentum J; the sign carries parity.
    pub spin: f64,
    pub abundance: f64,
    pub channels: Vec<SpinChannel>,
}

impl SpinGroup {
    pub fn new(number: u32, spin: f64, abundance: f64) -> Self {
        Self {
            number,
            spin,
            abundance,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpinGroupCard {
    pub header: SpinGroupHeader,
    pub groups: Vec<SpinGroup>,
}

impl SpinGroupCard {
    pub fn new(groups: Vec<SpinGroup>) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    pub fn max_group(&self) -> u32 {
        self.groups.iter().map(|group| group.number).max().unwrap_or(0)
    }

    /// Whether any channel refers to the particle pair `name`.
    pub fn uses_pair(&self, name: &str) -> bool {
        self.channels().any(|channel| channel.particle_pair == name)
    }

    pub fn channels(&self) -> impl Iterator<Item = &SpinChannel> {
        self.groups.iter().flat_map(|group| group.channels.iter())
    }

    pub fn parse_header(
        header: SpinGroupHeader,
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let (effective, true_radius) = header.radius_fields();
        let mut groups: Vec<SpinGroup> = Vec::new();
        for index in cursor..lines.len() {
            let reader = line_reader(lines, index, context)?;
            // Group lines number in 1-3 with 4 blank; channel numbers sit in 3-5.
            if !reader.is_blank(GROUP_NUMBER) && reader.is_blank(GROUP_GAP) {
                groups.push(SpinGroup {
                    number: reader.unsigned(SpinGroupField::Group, 0)?,
                    excluded: read_exclusion(&reader, SpinGroupField::GroupExcluded)?,
                    entry_channels: reader.unsigned(SpinGroupField::EntryChannels, 0)?,
                    exit_channels: reader.unsigned(SpinGroupField::ExitChannels, 0)?,
                    spin: reader.real(SpinGroupField::Spin)?,
                    abundance: reader.real(SpinGroupField::Abundance)?,
                    channels: Vec::new(),
                });
                continue;
            }

            let Some(group) = groups.last_mut() else {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    "channel line appears before any spin group line",
                ));
            };
            group.channels.push(SpinChannel {
                number: reader.unsigned(SpinGroupField::Channel, 0)?,
                particle_pair: reader.keyword(SpinGroupField::ParticlePair),
                excluded: read_exclusion(&reader, SpinGroupField::ChannelExcluded)?,
                orbital_momentum: reader.unsigned(SpinGroupField::OrbitalMomentum, 0)?,
                channel_spin: reader.optional_real(SpinGroupField::ChannelSpin)?,
                boundary: reader.optional_real(SpinGroupField::Boundary)?,
                effective_radius: reader.optional_real(effective)?,
                true_radius: reader.optional_real(true_radius)?,
            });
        }

        Ok((Self { header, groups }, lines.len() - cursor))
    }
}

impl CardModel for SpinGroupCard {
    const CARD_SET: CardSet = CardSet::SpinGroups;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        Self::parse_header(SpinGroupHeader::Groups, lines, cursor, context)
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let (effective, true_radius) = self.header.radius_fields();
        let mut lines = Vec::new();
        for group in &self.groups {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            writer.integer(SpinGroupField::Group, i64::from(group.number))?;
            write_exclusion(&mut writer, SpinGroupField::GroupExcluded, group.excluded);
            writer.integer(SpinGroupField::EntryChannels, i64::from(group.entry_channels))?;
            writer.integer(SpinGroupField::ExitChannels, i64::from(group.exit_channels))?;
            writer.real(SpinGroupField::Spin, group.spin)?;
            writer.real(SpinGroupField::Abundance, group.abundance)?;
            lines.push(writer.finish());

            for channel in &group.channels {
                let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
                writer.integer(SpinGroupField::Channel, i64::from(channel.number))?;
                writer.alpha(SpinGroupField::ParticlePair, &channel.particle_pair);
                write_exclusion(&mut writer, SpinGroupField::ChannelExcluded, channel.excluded);
                writer.integer(
                    SpinGroupField::OrbitalMomentum,
                    i64::from(channel.orbital_momentum),
                )?;
                writer.optional_real(SpinGroupField::ChannelSpin, channel.channel_spin)?;
                writer.optional_real(SpinGroupField::Boundary, channel.boundary)?;
                writer.optional_real(effective, channel.effective_radius)?;
                writer.optional_real(true_radius, channel.true_radius)?;
                lines.push(writer.finish());
            }
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(self.header.text())
    }

    fn validate(&self) -> SammyResult<()> {
        let mut previous = 0;
        for group in &self.groups {
            if group.number <= previous {
                return Err(SammyError::validation(format!(
                    "spin group {} follows group {previous}; numbers must increase",
                    group.number
                )));
            }
            previous = group.number;

            if group.channels.iter().any(|channel| channel.number == 0) {
                return Err(SammyError::validation(format!(
                    "spin group {} has a channel numbered 0",
                    group.number
                )));
            }
        }
        Ok(())
    }

    impl_instance_access!(SpinGroups);
}
