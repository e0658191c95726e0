use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyResult,
    VaryDomain,
};
use crate::field::{CardField, FieldSpec, LineWriter};

pub const DATA_REDUCTION_HEADER: &str = "DATA reduction parameters are next";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataReductionField {
    Name,
    Vary,
    Value,
    Uncertainty,
    Derivative,
}

impl CardField for DataReductionField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Name => FieldSpec::alpha("PNAME", 1, 5),
            Self::Vary => FieldSpec::flag("IFLAG", 7, 7, VaryDomain::Basic),
            Self::Value => FieldSpec::real("PVALUE", 11, 20),
            Self::Uncertainty => FieldSpec::real("PUNCER", 21, 30),
            Self::Derivative => FieldSpec::real("PDERIV", 31, 40),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataReductionParameter {
    pub name: String,
    pub value: Param,
    pub uncertainty: Option<f64>,
    /// Value used for partial derivatives when it differs from `value`.
    pub derivative: Option<f64>,
}

impl DataReductionParameter {
    pub fn new(name: impl Into<String>, value: Param) -> Self {
        Self {
            name: name.into(),
            value,
            uncertainty: None,
            derivative: None,
        }
    }
}

/// Card set 8: named data-reduction parameters, one per line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataReductionCard {
    pub parameters: Vec<DataReductionParameter>,
}

impl CardModel for DataReductionCard {
    const CARD_SET: CardSet = CardSet::DataReduction;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut parameters = Vec::with_capacity(lines.len() - cursor);
        for index in cursor..lines.len() {
            let reader = line_reader(lines, index, context)?;
            parameters.push(DataReductionParameter {
                name: reader.keyword(DataReductionField::Name),
                value: reader.param(DataReductionField::Value, DataReductionField::Vary)?,
                uncertainty: reader.optional_real(DataReductionField::Uncertainty)?,
                derivative: reader.optional_real(DataReductionField::Derivative)?,
            });
        }
        Ok((Self { parameters }, lines.len() - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut lines = Vec::with_capacity(self.parameters.len());
        for parameter in &self.parameters {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            writer.alpha(DataReductionField::Name, &parameter.name);
            writer.param(DataReductionField::Value, DataReductionField::Vary, parameter.value)?;
            writer.optional_real(DataReductionField::Uncertainty, parameter.uncertainty)?;
            writer.optional_real(DataReductionField::Derivative, parameter.derivative)?;
            lines.push(writer.finish());
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(DATA_REDUCTION_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        for parameter in &self.parameters {
            if parameter.name.trim().is_empty() {
                return Err(SammyError::validation("data reduction parameters need a name"));
            }
            if parameter.derivative.is_some() && parameter.uncertainty.is_none() {
                return Err(SammyError::validation(format!(
                    "{}: a derivative value needs the uncertainty column filled",
                    parameter.name
                )));
            }
        }
        Ok(())
    }

    impl_instance_access!(DataReduction);
}
