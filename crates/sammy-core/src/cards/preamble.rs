//! Input-file cards 1 and 2: the title and element lines at the top of the file.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::common::constants::LINE_WIDTH;
use crate::domain::{
    CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyResult,
};
use crate::field::{CardField, FieldSpec, LineWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleField {
    Title,
    Element,
    AtomicWeight,
    MinEnergy,
    MaxEnergy,
}

impl CardField for PreambleField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Title => FieldSpec::alpha("TITLE", 1, 80),
            Self::Element => FieldSpec::alpha("ELMNT", 1, 10),
            Self::AtomicWeight => FieldSpec::real("AW", 11, 20),
            Self::MinEnergy => FieldSpec::real("EMIN", 21, 30),
            Self::MaxEnergy => FieldSpec::real("EMAX", 31, 40),
        }
    }
}

/// Free-text title describing the run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitleCard {
    pub text: String,
}

impl TitleCard {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl CardModel for TitleCard {
    const CARD_SET: CardSet = CardSet::Title;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }
        let reader = line_reader(lines, cursor, context)?;
        Ok((Self::new(reader.alpha(PreambleField::Title)), 1))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut writer = LineWriter::new(context.at_output_line(1));
        writer.alpha(PreambleField::Title, &self.text);
        Ok(vec![writer.finish()])
    }

    fn validate(&self) -> SammyResult<()> {
        if self.text.chars().count() > LINE_WIDTH {
            return Err(SammyError::out_of_range(format!(
                "title exceeds {LINE_WIDTH} characters"
            )));
        }
        Ok(())
    }

    impl_instance_access!(Title);
}

/// Target element and the energy window of the fit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementCard {
    pub name: String,
    pub atomic_weight: f64,
    pub min_energy: f64,
    pub max_energy: f64,
}

impl ElementCard {
    pub fn new(
        name: impl Into<String>,
        atomic_weight: f64,
        min_energy: f64,
        max_energy: f64,
    ) -> Self {
        Self {
            name: name.into(),
            atomic_weight,
            min_energy,
            max_energy,
        }
    }
}

impl CardModel for ElementCard {
    const CARD_SET: CardSet = CardSet::Element;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }
        let reader = line_reader(lines, cursor, context)?;
        let card = Self {
            name: reader.alpha(PreambleField::Element),
            atomic_weight: reader.real(PreambleField::AtomicWeight)?,
            min_energy: reader.real(PreambleField::MinEnergy)?,
            max_energy: reader.real(PreambleField::MaxEnergy)?,
        };
        Ok((card, 1))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut writer = LineWriter::new(context.at_output_line(1));
        writer.alpha(PreambleField::Element, &self.name);
        writer.real(PreambleField::AtomicWeight, self.atomic_weight)?;
        writer.real(PreambleField::MinEnergy, self.min_energy)?;
        writer.real(PreambleField::MaxEnergy, self.max_energy)?;
        Ok(vec![writer.finish()])
    }

    fn validate(&self) -> SammyResult<()> {
        let width = PreambleField::Element.spec().width();
        if self.name.trim().is_empty() || self.name.chars().count() > width {
            return Err(SammyError::validation(format!(
                "element name must be 1 to {width} characters"
            )));
        }
        if self.min_energy > self.max_energy {
            return Err(SammyError::validation(format!(
                "energy window {} to {} is reversed",
                self.min_energy, self.max_energy
            )));
        }
        Ok(())
    }

    impl_instance_access!(Element);
}

#[cfg(test)]
mod tests {
    use super::{ElementCard, TitleCard};
    use crate::cards::CardModel;
    use crate::domain::{CardSet, DiagnosticContext, SammyErrorKind};

    #[test]
    fn title_keeps_internal_spacing() {
        let context = DiagnosticContext::for_card(CardSet::Title);
        let card = TitleCard::new("Ta-181   transmission  ");
        let lines = card.render(&context).unwrap();
        assert_eq!(lines, vec!["Ta-181   transmission".to_string()]);

        let (parsed, consumed) = TitleCard::parse(&["Ta-181   transmission"], 0, &context).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(parsed.text, "Ta-181   transmission");
    }

    #[test]
    fn element_line_round_trips() {
        let context = DiagnosticContext::for_card(CardSet::Element);
        let card = ElementCard::new("Ta181", 180.948, 1.0, 200.0);
        let lines = card.render(&context).unwrap();
        assert_eq!(lines[0], format!("Ta181     {:>10}{:>10}{:>10}", "180.948", "1.", "200."));

        let (parsed, consumed) = ElementCard::parse(&[lines[0].as_str()], 0, &context).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(parsed, card);
    }

    #[test]
    fn reversed_energy_window_is_rejected() {
        let card = ElementCard::new("Fe56", 55.9, 10.0, 1.0);
        assert_eq!(
            card.validate().expect_err("window reversed").kind(),
            SammyErrorKind::ValidationError
        );
    }
}
