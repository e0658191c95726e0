use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult,
};
use crate::field::{CardField, FieldSpec, LineWriter};

pub const UNUSED_HEADER: &str = "UNUSEd but correlated variables come next";

const PER_LINE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedField {
    Name(usize),
    Value(usize),
}

impl CardField for UnusedField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Name(slot) => FieldSpec::alpha("NAME", 1 + 10 * slot, 5 + 10 * slot),
            Self::Value(slot) => FieldSpec::real("VALUE", 1 + 10 * slot, 10 + 10 * slot),
        }
    }
}

/// A variable kept only for its correlation with fitted parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct UnusedVariable {
    pub name: String,
    pub value: f64,
}

impl UnusedVariable {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Card set 5: pairs of name and value lines, eight variables per pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UnusedCard {
    pub variables: Vec<UnusedVariable>,
}

impl CardModel for UnusedCard {
    const CARD_SET: CardSet = CardSet::UnusedCorrelated;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut variables = Vec::new();
        let mut index = cursor;
        while index < lines.len() {
            let names = line_reader(lines, index, context)?;
            if index + 1 >= lines.len() {
                return Err(names.error(
                    SammyErrorKind::MalformedField,
                    "name line has no value line after it",
                ));
            }
            let values = line_reader(lines, index + 1, context)?;
            for slot in 0..PER_LINE {
                let name = names.keyword(UnusedField::Name(slot));
                if name.is_empty() {
                    continue;
                }
                variables.push(UnusedVariable::new(name, values.real(UnusedField::Value(slot))?));
            }
            index += 2;
        }

        Ok((Self { variables }, index - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut lines = Vec::new();
        for chunk in self.variables.chunks(PER_LINE) {
            let mut names = LineWriter::new(context.at_output_line(lines.len() + 1));
            let mut values = LineWriter::new(context.at_output_line(lines.len() + 2));
            for (slot, variable) in chunk.iter().enumerate() {
                names.alpha(UnusedField::Name(slot), &variable.name);
                values.real(UnusedField::Value(slot), variable.value)?;
            }
            lines.push(names.finish());
            lines.push(values.finish());
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(UNUSED_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        match self.variables.iter().find(|variable| variable.name.trim().is_empty()) {
            Some(_) => Err(SammyError::validation("unused variable names must not be blank")),
            None => Ok(()),
        }
    }

    impl_instance_access!(UnusedCorrelated);
}

#[cfg(test)]
mod tests {
    use super::{UnusedCard, UnusedVariable};
    use crate::cards::CardModel;
    use crate::domain::{CardSet, DiagnosticContext, SammyErrorKind};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::UnusedCorrelated)
    }

    #[test]
    fn nine_variables_take_two_line_pairs() {
        let card = UnusedCard {
            variables: (1..=9)
                .map(|index| UnusedVariable::new(format!("NVAR{index}"), index as f64 * 0.5))
                .collect(),
        };
        let lines = card.render(&context()).unwrap();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("NVAR1     NVAR2"));
        assert_eq!(lines[2], "NVAR9");
        assert_eq!(lines[3], "       4.5");

        let borrowed: Vec<&str> = lines.iter().map(String::as_str).collect();
        let (parsed, consumed) = UnusedCard::parse(&borrowed, 0, &context()).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(parsed, card);
    }

    #[test]
    fn dangling_name_line_is_malformed() {
        let error = UnusedCard::parse(&["NVAR1"], 0, &context()).expect_err("values missing");
        assert_eq!(error.kind(), SammyErrorKind::MalformedField);
    }

    #[test]
    fn blank_names_fail_validation() {
        let card = UnusedCard {
            variables: vec![UnusedVariable::new("   ", 1.0)],
        };
        assert_eq!(
            card.validate().expect_err("blank name").kind(),
            SammyErrorKind::ValidationError
        );
    }
}
