use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyResult,
    VaryDomain,
};
use crate::field::{CardField, Columns, FieldSpec, LineWriter};

pub const NORMALIZATION_HEADER: &str = "NORMAlization and background are next";

const NAMES: [&str; 6] = ["ANORM", "BACKA", "BACKB", "BACKC", "BACKD", "BACKF"];
const VARY_NAMES: [&str; 6] = ["IANORM", "IBACKA", "IBACKB", "IBACKC", "IBACKD", "IBACKF"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationField {
    Value(usize),
    Vary(usize),
    Uncertainty(usize),
}

impl CardField for NormalizationField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Value(index) | Self::Uncertainty(index) => {
                FieldSpec::real(NAMES[index], 1 + 10 * index, 10 + 10 * index)
            }
            Self::Vary(index) => FieldSpec::flag(
                VARY_NAMES[index],
                61 + 2 * index,
                62 + 2 * index,
                VaryDomain::Extended,
            ),
        }
    }
}

const FLAG_AREA: Columns = Columns::new(61, 80);

/// Normalization and background terms for one scattering angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationSet {
    /// ANORM, BACKA, BACKB, BACKC, BACKD, BACKF.
    pub values: [Param; 6],
    pub uncertainties: Option<[f64; 6]>,
}

impl NormalizationSet {
    pub fn new(values: [Param; 6]) -> Self {
        Self {
            values,
            uncertainties: None,
        }
    }

    pub const fn normalization(&self) -> Param {
        self.values[0]
    }
}

/// Card set 6: one set per angle; uncertainty lines follow their set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizationCard {
    pub sets: Vec<NormalizationSet>,
}

impl NormalizationCard {
    pub fn new(sets: Vec<NormalizationSet>) -> Self {
        Self { sets }
    }
}

impl CardModel for NormalizationCard {
    const CARD_SET: CardSet = CardSet::Normalization;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut sets = Vec::new();
        let mut index = cursor;
        while index < lines.len() {
            let main = line_reader(lines, index, context)?;
            let mut values = [Param::default(); 6];
            for (slot, value) in values.iter_mut().enumerate() {
                *value =
                    main.param(NormalizationField::Value(slot), NormalizationField::Vary(slot))?;
            }
            let mut set = NormalizationSet::new(values);
            index += 1;

            if index < lines.len() {
                let reader = line_reader(lines, index, context)?;
                if reader.is_blank(FLAG_AREA) {
                    let mut uncertainties = [0.0; 6];
                    for (slot, value) in uncertainties.iter_mut().enumerate() {
                        *value = reader
                            .optional_real(NormalizationField::Uncertainty(slot))?
                            .unwrap_or_default();
                    }
                    set.uncertainties = Some(uncertainties);
                    index += 1;
                }
            }
            sets.push(set);
        }

        Ok((Self { sets }, index - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        let mut lines = Vec::new();
        for set in &self.sets {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            for (slot, value) in set.values.iter().enumerate() {
                writer.param(
                    NormalizationField::Value(slot),
                    NormalizationField::Vary(slot),
                    *value,
                )?;
            }
            lines.push(writer.finish());

            if let Some(uncertainties) = set.uncertainties {
                let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
                for (slot, value) in uncertainties.iter().enumerate() {
                    writer.real(NormalizationField::Uncertainty(slot), *value)?;
                }
                lines.push(writer.finish());
            }
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(NORMALIZATION_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        if self.sets.is_empty() {
            return Err(SammyError::validation(
                "normalization card needs at least one angle set",
            ));
        }
        Ok(())
    }

    impl_instance_access!(Normalization);
}

#[cfg(test)]
mod tests {
    use super::{NormalizationCard, NormalizationSet};
    use crate::cards::CardModel;
    use crate::domain::{CardSet, DiagnosticContext, Param, SammyErrorKind};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::Normalization)
    }

    fn set(anorm: f64) -> NormalizationSet {
        NormalizationSet::new([
            Param::varied(anorm),
            Param::varied(0.01),
            Param::fixed(0.0),
            Param::fixed(0.0),
            Param::fixed(0.0),
            Param::fixed(0.0),
        ])
    }

    #[test]
    fn angle_sets_keep_their_uncertainty_lines() {
        let mut first = set(1.0);
        first.uncertainties = Some([0.02, 0.001, 0.0, 0.0, 0.0, 0.0]);
        let card = NormalizationCard::new(vec![first, set(0.98)]);

        let lines = card.render(&context()).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(&lines[0][60..], " 1 1 0 0 0 0");
        assert_eq!(lines[1].len(), 60);

        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (parsed, consumed) = NormalizationCard::parse(&borrowed, 0, &context()).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(parsed, card);
        assert_eq!(parsed.sets[1].normalization(), Param::varied(0.98));
    }

    #[test]
    fn empty_card_fails_validation() {
        let error = NormalizationCard::default().validate().expect_err("no sets");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
    }
}
