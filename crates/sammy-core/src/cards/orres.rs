//! Card set 9: ORRES resolution function, a sequence of tagged lines.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult, VaryDomain,
};
use crate::field::{CardField, Columns, FieldSpec, LineReader, LineWriter};

pub const ORRES_HEADER: &str = "ORRES";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrresField {
    Tag,
    /// Flags packed one per column from column 7.
    Vary(usize),
    DegreesOfFreedom,
    /// Ten-column values from column 11.
    Value(usize),
}

impl CardField for OrresField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Tag => FieldSpec::alpha("WHAT", 1, 5),
            Self::Vary(slot) => FieldSpec::flag("IFLAG", 7 + slot, 7 + slot, VaryDomain::Basic),
            Self::DegreesOfFreedom => FieldSpec::integer("IWATR", 10, 10),
            Self::Value(slot) => FieldSpec::real("VALUE", 11 + 10 * slot, 20 + 10 * slot),
        }
    }
}

const TAG_COLUMNS: Columns = Columns::new(1, 5);

#[derive(Debug, Clone, PartialEq)]
pub enum OrresLine {
    /// Square burst width.
    Burst {
        width: Param,
        uncertainty: Option<f64>,
    },
    /// Water moderator mean-free-path coefficients.
    Water {
        terms: [Param; 3],
        degrees_of_freedom: u32,
        uncertainties: Option<[f64; 3]>,
    },
    /// Lithium-glass detector parameters d, f, g.
    Lithium {
        terms: [Param; 3],
        uncertainties: Option<[f64; 3]>,
    },
    /// Channel width up to `max_energy`.
    Channel {
        max_energy: f64,
        width: Param,
        uncertainty: Option<f64>,
    },
}

impl OrresLine {
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Burst { .. } => "BURST",
            Self::Water { .. } => "WATER",
            Self::Lithium { .. } => "LITHI",
            Self::Channel { .. } => "CHANN",
        }
    }

    fn render(&self, context: &DiagnosticContext, first_line: usize) -> RenderResult<Vec<String>> {
        let mut writer = LineWriter::new(context.at_output_line(first_line));
        writer.alpha(OrresField::Tag, self.tag());
        let mut uncertainty_line = None;

        match self {
            Self::Burst { width, uncertainty } => {
                writer.param(OrresField::Value(0), OrresField::Vary(0), *width)?;
                writer.optional_real(OrresField::Value(1), *uncertainty)?;
            }
            Self::Water {
                terms,
                degrees_of_freedom,
                uncertainties,
            } => {
                write_terms(&mut writer, terms)?;
                writer.integer(OrresField::DegreesOfFreedom, i64::from(*degrees_of_freedom))?;
                uncertainty_line = *uncertainties;
            }
            Self::Lithium {
                terms,
                uncertainties,
            } => {
                write_terms(&mut writer, terms)?;
                uncertainty_line = *uncertainties;
            }
            Self::Channel {
                max_energy,
                width,
                uncertainty,
            } => {
                writer.flag(OrresField::Vary(0), width.vary)?;
                writer.real(OrresField::Value(0), *max_energy)?;
                writer.real(OrresField::Value(1), width.value)?;
                writer.optional_real(OrresField::Value(2), *uncertainty)?;
            }
        }

        let mut lines = vec![writer.finish()];
        if let Some(uncertainties) = uncertainty_line {
            let mut writer = LineWriter::new(context.at_output_line(first_line + 1));
            for (slot, value) in uncertainties.iter().enumerate() {
                writer.real(OrresField::Value(slot), *value)?;
            }
            lines.push(writer.finish());
        }
        Ok(lines)
    }
}

fn write_terms(writer: &mut LineWriter, terms: &[Param; 3]) -> SammyResult<()> {
    for (slot, term) in terms.iter().enumerate() {
        writer.param(OrresField::Value(slot), OrresField::Vary(slot), *term)?;
    }
    Ok(())
}

fn read_terms(reader: &LineReader<'_>) -> SammyResult<[Param; 3]> {
    let mut terms = [Param::default(); 3];
    for (slot, term) in terms.iter_mut().enumerate() {
        *term = reader.param(OrresField::Value(slot), OrresField::Vary(slot))?;
    }
    Ok(terms)
}

/// Uncertainty line for a three-term section, if the next line is untagged.
fn read_uncertainties(
    lines: &[&str],
    index: usize,
    context: &DiagnosticContext,
) -> SammyResult<Option<[f64; 3]>> {
    if index >= lines.len() {
        return Ok(None);
    }
    let reader = line_reader(lines, index, context)?;
    if !reader.is_blank(TAG_COLUMNS) {
        return Ok(None);
    }
    let mut values = [0.0; 3];
    for (slot, value) in values.iter_mut().enumerate() {
        *value = reader.optional_real(OrresField::Value(slot))?.unwrap_or_default();
    }
    Ok(Some(values))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrresCard {
    pub lines: Vec<OrresLine>,
}

impl CardModel for OrresCard {
    const CARD_SET: CardSet = CardSet::Orres;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut parsed = Vec::new();
        let mut index = cursor;
        while index < lines.len() {
            let reader = line_reader(lines, index, context)?;
            let tag = reader.keyword(OrresField::Tag).to_ascii_uppercase();
            index += 1;
            let line = match tag.as_str() {
                "BURST" => OrresLine::Burst {
                    width: reader.param(OrresField::Value(0), OrresField::Vary(0))?,
                    uncertainty: reader.optional_real(OrresField::Value(1))?,
                },
                "WATER" => {
                    let uncertainties = read_uncertainties(lines, index, context)?;
                    index += usize::from(uncertainties.is_some());
                    OrresLine::Water {
                        terms: read_terms(&reader)?,
                        degrees_of_freedom: reader.unsigned(OrresField::DegreesOfFreedom, 4)?,
                        uncertainties,
                    }
                }
                "LITHI" => {
                    let uncertainties = read_uncertainties(lines, index, context)?;
                    index += usize::from(uncertainties.is_some());
                    OrresLine::Lithium {
                        terms: read_terms(&reader)?,
                        uncertainties,
                    }
                }
                "CHANN" => OrresLine::Channel {
                    max_energy: reader.real(OrresField::Value(0))?,
                    width: Param::new(
                        reader.real(OrresField::Value(1))?,
                        reader.flag(OrresField::Vary(0))?,
                    ),
                    uncertainty: reader.optional_real(OrresField::Value(2))?,
                },
                "TANTA" | "NE110" => {
                    return Err(reader.error(
                        SammyErrorKind::UnrecognizedFormat,
                        format!("ORRES {tag} sections are not supported"),
                    ));
                }
                other => {
                    return Err(reader.error(
                        SammyErrorKind::UnrecognizedFormat,
                        format!("'{other}' is not an ORRES line tag"),
                    ));
                }
            };
            parsed.push(line);
        }

        Ok((Self { lines: parsed }, index - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut lines = Vec::new();
        for line in &self.lines {
            let rendered = line.render(context, lines.len() + 1)?;
            lines.extend(rendered);
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(ORRES_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        for tag in ["BURST", "WATER", "LITHI"] {
            if self.lines.iter().filter(|line| line.tag() == tag).count() > 1 {
                return Err(SammyError::validation(format!(
                    "ORRES card holds more than one {tag} line"
                )));
            }
        }

        let mut previous = f64::NEG_INFINITY;
        for line in &self.lines {
            if let OrresLine::Channel { max_energy, .. } = line {
                if *max_energy <= previous {
                    return Err(SammyError::validation(
                        "ORRES channel energies must increase",
                    ));
                }
                previous = *max_energy;
            }
        }
        Ok(())
    }

    impl_instance_access!(Orres);
}
