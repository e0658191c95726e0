//! Input-file card 5: sample temperature, flight path, density and reaction type.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult,
};
use crate::field::{CardField, FieldSpec, LineWriter};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionsField {
    Temperature,
    FlightPath,
    DeltaL,
    DeltaG,
    DeltaE,
    Density,
    NumberDensity,
    Reaction,
}

impl CardField for ConditionsField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Temperature => FieldSpec::real("TEMP", 1, 10),
            Self::FlightPath => FieldSpec::real("DIST", 11, 20),
            Self::DeltaL => FieldSpec::real("DELTAL", 21, 30),
            Self::DeltaG => FieldSpec::real("DELTAG", 31, 40),
            Self::DeltaE => FieldSpec::real("DELTAE", 41, 50),
            Self::Density => FieldSpec::real("DENSITY", 1, 10),
            Self::NumberDensity => FieldSpec::real("THICK", 11, 20),
            Self::Reaction => FieldSpec::alpha("TYPE", 1, 80),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhysicalConstants {
    /// Kelvin.
    pub temperature: f64,
    /// Metres.
    pub flight_path: f64,
    pub delta_l: f64,
    pub delta_g: f64,
    pub delta_e: f64,
}

impl PhysicalConstants {
    pub const fn new(temperature: f64, flight_path: f64) -> Self {
        Self {
            temperature,
            flight_path,
            delta_l: 0.0,
            delta_g: 0.0,
            delta_e: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDensity {
    /// g/cm^3.
    pub density: f64,
    /// atoms/barn.
    pub number_density: f64,
}

/// Measured quantity named on the last line of the card.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReactionType {
    #[default]
    Transmission,
    Capture,
    Fission,
    Total,
    Elastic,
    /// Any other wording, kept as written.
    Other(String),
}

impl ReactionType {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let first_word = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match first_word.as_str() {
            "transmission" => Self::Transmission,
            "capture" => Self::Capture,
            "fission" => Self::Fission,
            "total" => Self::Total,
            "elastic" => Self::Elastic,
            _ => Self::Other(text.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Transmission => "transmission",
            Self::Capture => "capture",
            Self::Fission => "fission",
            Self::Total => "total cross section",
            Self::Elastic => "elastic",
            Self::Other(text) => text,
        }
    }
}

impl Display for ReactionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reaction line as written: the recognized kind plus the exact wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    kind: ReactionType,
    wording: String,
}

impl Reaction {
    pub fn new(kind: ReactionType) -> Self {
        let wording = kind.as_str().to_string();
        Self { kind, wording }
    }

    pub fn parse(text: &str) -> Self {
        Self {
            kind: ReactionType::parse(text),
            wording: text.trim().to_string(),
        }
    }

    pub fn kind(&self) -> &ReactionType {
        &self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.wording
    }
}

impl Default for Reaction {
    fn default() -> Self {
        Self::new(ReactionType::default())
    }
}

impl From<ReactionType> for Reaction {
    fn from(kind: ReactionType) -> Self {
        Self::new(kind)
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.wording)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleConditionsCard {
    pub constants: PhysicalConstants,
    pub density: Option<SampleDensity>,
    pub reaction: Reaction,
}

impl SampleConditionsCard {
    pub fn new(constants: PhysicalConstants, reaction: impl Into<Reaction>) -> Self {
        Self {
            constants,
            density: None,
            reaction: reaction.into(),
        }
    }
}

/// Reaction lines start with a letter; constant and density lines with a number.
fn is_reaction_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(char::is_alphabetic)
}

impl CardModel for SampleConditionsCard {
    const CARD_SET: CardSet = CardSet::SampleConditions;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let reader = line_reader(lines, cursor, context)?;
        let constants = PhysicalConstants {
            temperature: reader.real(ConditionsField::Temperature)?,
            flight_path: reader.real(ConditionsField::FlightPath)?,
            delta_l: reader.optional_real(ConditionsField::DeltaL)?.unwrap_or_default(),
            delta_g: reader.optional_real(ConditionsField::DeltaG)?.unwrap_or_default(),
            delta_e: reader.optional_real(ConditionsField::DeltaE)?.unwrap_or_default(),
        };

        let mut index = cursor + 1;
        let mut density = None;
        if index < lines.len() && !is_reaction_line(lines[index]) {
            let reader = line_reader(lines, index, context)?;
            density = Some(SampleDensity {
                density: reader.real(ConditionsField::Density)?,
                number_density: reader.real(ConditionsField::NumberDensity)?,
            });
            index += 1;
        }

        if index >= lines.len() {
            return Err(reader.error(
                SammyErrorKind::MalformedField,
                "sample conditions end before the reaction type line",
            ));
        }
        let reaction_reader = line_reader(lines, index, context)?;
        let reaction = Reaction::parse(&reaction_reader.alpha(ConditionsField::Reaction));
        index += 1;

        if index < lines.len() {
            let extra = line_reader(lines, index, context)?;
            return Err(extra.error(
                SammyErrorKind::MalformedField,
                "unexpected line after the reaction type",
            ));
        }

        Ok((
            Self {
                constants,
                density,
                reaction,
            },
            index - cursor,
        ))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let constants = &self.constants;
        let mut writer = LineWriter::new(context.at_output_line(1));
        writer.real(ConditionsField::Temperature, constants.temperature)?;
        writer.real(ConditionsField::FlightPath, constants.flight_path)?;
        writer.real(ConditionsField::DeltaL, constants.delta_l)?;
        writer.real(ConditionsField::DeltaG, constants.delta_g)?;
        writer.real(ConditionsField::DeltaE, constants.delta_e)?;
        let mut lines = vec![writer.finish()];

        if let Some(density) = self.density {
            let mut writer = LineWriter::new(context.at_output_line(2));
            writer.real(ConditionsField::Density, density.density)?;
            writer.real(ConditionsField::NumberDensity, density.number_density)?;
            lines.push(writer.finish());
        }

        let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
        writer.alpha(ConditionsField::Reaction, self.reaction.as_str());
        lines.push(writer.finish());
        Ok(lines)
    }

    fn validate(&self) -> SammyResult<()> {
        let text = self.reaction.as_str();
        if !is_reaction_line(text) {
            return Err(SammyError::validation(format!(
                "reaction type '{text}' must start with a letter"
            )));
        }
        Ok(())
    }

    impl_instance_access!(SampleConditions);
}
