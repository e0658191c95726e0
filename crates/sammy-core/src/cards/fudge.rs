use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{CardSet, DiagnosticContext, ParseResult, RenderResult};
use crate::field::{CardField, FieldSpec, LineWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FudgeField {
    Fudge,
}

impl CardField for FudgeField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Fudge => FieldSpec::real("FUDGE", 1, 10),
        }
    }
}

/// Card set 2: default relative uncertainty for parameters without one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FudgeCard {
    pub value: f64,
}

impl FudgeCard {
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl CardModel for FudgeCard {
    const CARD_SET: CardSet = CardSet::Fudge;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }
        let reader = line_reader(lines, cursor, context)?;
        Ok((Self::new(reader.real(FudgeField::Fudge)?), 1))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        let mut writer = LineWriter::new(context.at_output_line(1));
        writer.real(FudgeField::Fudge, self.value)?;
        Ok(vec![writer.finish()])
    }

    impl_instance_access!(Fudge);
}
