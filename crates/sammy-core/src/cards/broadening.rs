//! Card set 4: resolution and Doppler broadening parameters.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyErrorKind, SammyResult,
    VaryDomain,
};
use crate::field::{CardField, Columns, FieldSpec, LineReader, LineWriter};

pub const BROADENING_HEADER: &str = "BROADening parameters may be varied";

const NAMES: [&str; 6] = ["CRFN", "TEMP", "THICK", "DELTAL", "DELTAG", "DELTAE"];
const VARY_NAMES: [&str; 6] = ["ICRFN", "ITEMP", "ITHICK", "IDELTL", "IDELTG", "IDELTE"];
const GAUSSIAN_NAMES: [&str; 2] = ["DELTC1", "DELTC2"];
const GAUSSIAN_VARY_NAMES: [&str; 2] = ["IDELC1", "IDELC2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadeningField {
    Value(usize),
    Vary(usize),
    Uncertainty(usize),
    GaussianValue(usize),
    GaussianVary(usize),
    GaussianUncertainty(usize),
}

impl CardField for BroadeningField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Value(index) => FieldSpec::real(NAMES[index], 1 + 10 * index, 10 + 10 * index),
            Self::Uncertainty(index) => {
                FieldSpec::real(NAMES[index], 1 + 10 * index, 10 + 10 * index)
            }
            Self::Vary(index) => FieldSpec::flag(
                VARY_NAMES[index],
                61 + 2 * index,
                62 + 2 * index,
                VaryDomain::Extended,
            ),
            Self::GaussianValue(index) | Self::GaussianUncertainty(index) => {
                FieldSpec::real(GAUSSIAN_NAMES[index], 1 + 10 * index, 10 + 10 * index)
            }
            Self::GaussianVary(index) => FieldSpec::flag(
                GAUSSIAN_VARY_NAMES[index],
                61 + 2 * index,
                62 + 2 * index,
                VaryDomain::Extended,
            ),
        }
    }
}

/// Columns that are always blank on uncertainty lines.
const FLAG_AREA: Columns = Columns::new(61, 80);
/// Columns holding the Gaussian flags; never blank on a rendered Gaussian line.
const GAUSSIAN_FLAGS: Columns = Columns::new(61, 64);

/// Optional energy-dependent Gaussian resolution terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBroadening {
    pub deltc1: Param,
    pub deltc2: Param,
    pub uncertainties: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BroadeningCard {
    /// CRFN, TEMP, THICK, DELTAL, DELTAG, DELTAE.
    pub values: [Param; 6],
    /// Absent means the fudge factor applies.
    pub uncertainties: Option<[f64; 6]>,
    pub gaussian: Option<GaussianBroadening>,
}

impl BroadeningCard {
    pub fn new(values: [Param; 6]) -> Self {
        Self {
            values,
            uncertainties: None,
            gaussian: None,
        }
    }

    pub const fn radius(&self) -> Param {
        self.values[0]
    }

    pub const fn temperature(&self) -> Param {
        self.values[1]
    }

    pub const fn thickness(&self) -> Param {
        self.values[2]
    }
}

fn read_uncertainties<const N: usize>(
    reader: &LineReader<'_>,
    field: impl Fn(usize) -> BroadeningField,
) -> SammyResult<[f64; N]> {
    let mut values = [0.0; N];
    for (index, value) in values.iter_mut().enumerate() {
        *value = reader.optional_real(field(index))?.unwrap_or_default();
    }
    Ok(values)
}

impl CardModel for BroadeningCard {
    const CARD_SET: CardSet = CardSet::Broadening;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let main = line_reader(lines, cursor, context)?;
        let mut values = [Param::default(); 6];
        for (index, value) in values.iter_mut().enumerate() {
            *value = main.param(BroadeningField::Value(index), BroadeningField::Vary(index))?;
        }
        let mut card = Self::new(values);
        let mut index = cursor + 1;

        if index < lines.len() {
            let reader = line_reader(lines, index, context)?;
            if reader.is_blank(FLAG_AREA) {
                card.uncertainties =
                    Some(read_uncertainties(&reader, BroadeningField::Uncertainty)?);
                index += 1;
            }
        }

        if index < lines.len() {
            let reader = line_reader(lines, index, context)?;
            if reader.is_blank(GAUSSIAN_FLAGS) {
                return Err(reader.error(
                    SammyErrorKind::MalformedField,
                    "expected the Gaussian line with flags in columns 61-64",
                ));
            }
            let mut gaussian = GaussianBroadening {
                deltc1: reader.param(
                    BroadeningField::GaussianValue(0),
                    BroadeningField::GaussianVary(0),
                )?,
                deltc2: reader.param(
                    BroadeningField::GaussianValue(1),
                    BroadeningField::GaussianVary(1),
                )?,
                uncertainties: None,
            };
            index += 1;

            if index < lines.len() {
                let reader = line_reader(lines, index, context)?;
                gaussian.uncertainties = Some(read_uncertainties(
                    &reader,
                    BroadeningField::GaussianUncertainty,
                )?);
                index += 1;
            }
            card.gaussian = Some(gaussian);
        }

        if index < lines.len() {
            let reader = line_reader(lines, index, context)?;
            return Err(reader.error(
                SammyErrorKind::MalformedField,
                "unexpected line after the broadening parameters",
            ));
        }

        Ok((card, index - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        let mut lines = Vec::with_capacity(4);

        let mut writer = LineWriter::new(context.at_output_line(1));
        for (index, value) in self.values.iter().enumerate() {
            writer.param(BroadeningField::Value(index), BroadeningField::Vary(index), *value)?;
        }
        lines.push(writer.finish());

        if let Some(uncertainties) = self.uncertainties {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            for (index, value) in uncertainties.iter().enumerate() {
                writer.real(BroadeningField::Uncertainty(index), *value)?;
            }
            lines.push(writer.finish());
        }

        if let Some(gaussian) = &self.gaussian {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            writer.param(
                BroadeningField::GaussianValue(0),
                BroadeningField::GaussianVary(0),
                gaussian.deltc1,
            )?;
            writer.param(
                BroadeningField::GaussianValue(1),
                BroadeningField::GaussianVary(1),
                gaussian.deltc2,
            )?;
            lines.push(writer.finish());

            if let Some(uncertainties) = gaussian.uncertainties {
                let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
                for (index, value) in uncertainties.iter().enumerate() {
                    writer.real(BroadeningField::GaussianUncertainty(index), *value)?;
                }
                lines.push(writer.finish());
            }
        }

        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(BROADENING_HEADER)
    }

    impl_instance_access!(Broadening);
}

#[cfg(test)]
mod tests {
    use super::{BroadeningCard, GaussianBroadening};
    use crate::cards::CardModel;
    use crate::domain::{CardSet, DiagnosticContext, Param, SammyErrorKind, VaryFlag};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::Broadening)
    }

    fn sample() -> BroadeningCard {
        BroadeningCard::new([
            Param::fixed(6.5),
            Param::varied(300.0),
            Param::fixed(0.0123),
            Param::fixed(0.025),
            Param::new(0.4, VaryFlag::UseFromParameterFile),
            Param::fixed(0.05),
        ])
    }

    fn reparse(card: &BroadeningCard) -> (BroadeningCard, usize) {
        let lines = card.render(&context()).expect("card should render");
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        BroadeningCard::parse(&borrowed, 0, &context()).expect("rendered card should parse")
    }

    #[test]
    fn main_line_places_values_and_flags() {
        let lines = sample().render(&context()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(&lines[0][..20], "       6.5      300.");
        assert_eq!(&lines[0][60..72], " 0 1 0 0-1 0");
    }

    #[test]
    fn optional_lines_are_recognized_by_flag_columns() {
        let mut card = sample();
        card.uncertainties = Some([0.1, 5.0, 0.0001, 0.001, 0.01, 0.001]);
        card.gaussian = Some(GaussianBroadening {
            deltc1: Param::varied(0.02),
            deltc2: Param::fixed(0.0),
            uncertainties: Some([0.005, 0.0]),
        });

        let (parsed, consumed) = reparse(&card);
        assert_eq!(consumed, 4);
        assert_eq!(parsed, card);

        card.uncertainties = None;
        let (parsed, consumed) = reparse(&card);
        assert_eq!(consumed, 3);
        assert_eq!(parsed.uncertainties, None);
        assert!(parsed.gaussian.is_some());
    }

    #[test]
    fn extra_lines_are_rejected() {
        let mut lines = sample().render(&context()).unwrap();
        lines.push("       0.1".to_string());
        lines.push("       0.2       0.3".to_string());
        lines.push("       0.4".to_string());
        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();

        let error = BroadeningCard::parse(&borrowed, 0, &context()).expect_err("too many lines");
        assert_eq!(error.kind(), SammyErrorKind::MalformedField);
        assert_eq!(error.context().card_line(), Some(3));
    }
}
