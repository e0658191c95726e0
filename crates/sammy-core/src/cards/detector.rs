use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{CardSet, DiagnosticContext, Param, ParseResult, RenderResult, VaryDomain};
use crate::field::{CardField, Columns, FieldSpec, IntegerListLayout, LineWriter};

pub const DETECTOR_HEADER: &str = "DETECtor efficiencies";

const GROUP_LIST: IntegerListLayout = IntegerListLayout {
    name: "detector spin group",
    item_width: 2,
    first_start: 23,
    continuation_start: 1,
    end: 78,
    marker: Columns::new(79, 80),
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorField {
    Efficiency,
    Uncertainty,
    Vary,
}

impl CardField for DetectorField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Efficiency => FieldSpec::real("PARDET", 1, 10),
            Self::Uncertainty => FieldSpec::real("DELDET", 11, 20),
            Self::Vary => FieldSpec::flag("IFLDET", 21, 22, VaryDomain::Extended),
        }
    }
}

/// An efficiency shared by the listed spin groups.
///
/// Groups left out of every entry take the efficiency of the last entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorEfficiency {
    pub efficiency: Param,
    pub uncertainty: Option<f64>,
    pub groups: Vec<u32>,
}

impl DetectorEfficiency {
    pub fn new(efficiency: Param, groups: Vec<u32>) -> Self {
        Self {
            efficiency,
            uncertainty: None,
            groups,
        }
    }
}

/// Card set 15: detector efficiencies keyed by spin group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectorEfficiencyCard {
    pub entries: Vec<DetectorEfficiency>,
}

impl DetectorEfficiencyCard {
    pub fn groups(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().flat_map(|entry| entry.groups.iter().copied())
    }
}

impl CardModel for DetectorEfficiencyCard {
    const CARD_SET: CardSet = CardSet::DetectorEfficiency;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut entries = Vec::new();
        let mut index = cursor;
        while index < lines.len() {
            let reader = line_reader(lines, index, context)?;
            let first_line = index;
            let (groups, continuation_lines) =
                GROUP_LIST.read(&reader, &lines[index + 1..], |offset, raw| {
                    context.at_line(first_line + offset + 2, raw)
                })?;
            entries.push(DetectorEfficiency {
                efficiency: reader.param(DetectorField::Efficiency, DetectorField::Vary)?,
                uncertainty: reader.optional_real(DetectorField::Uncertainty)?,
                groups,
            });
            index += 1 + continuation_lines;
        }

        Ok((Self { entries }, index - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        let mut lines = Vec::new();
        for entry in &self.entries {
            let first_line = lines.len() + 1;
            let mut writer = LineWriter::new(context.at_output_line(first_line));
            writer.param(DetectorField::Efficiency, DetectorField::Vary, entry.efficiency)?;
            writer.optional_real(DetectorField::Uncertainty, entry.uncertainty)?;
            let rendered = GROUP_LIST.write(writer, &entry.groups, |offset| {
                context.at_output_line(first_line + offset + 1)
            })?;
            lines.extend(rendered);
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(DETECTOR_HEADER)
    }

    impl_instance_access!(DetectorEfficiency);
}
