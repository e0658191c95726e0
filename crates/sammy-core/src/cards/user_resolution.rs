use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult, VaryDomain,
};
use crate::field::{CardField, FieldSpec, LineWriter};

pub const USER_RESOLUTION_HEADER: &str = "USER-Defined resolution function";

const FILE_TAG: &str = "FILE=";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserResolutionField {
    Tag,
    Vary,
    /// Ten-column values from column 11.
    Value(usize),
    FileName,
}

impl CardField for UserResolutionField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Tag => FieldSpec::alpha("WHAT", 1, 5),
            Self::Vary => FieldSpec::flag("IFLAG", 7, 7, VaryDomain::Basic),
            Self::Value(slot) => FieldSpec::real("VALUE", 11 + 10 * slot, 20 + 10 * slot),
            Self::FileName => FieldSpec::alpha("FILNAM", 6, 75),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserResolutionLine {
    Burst {
        width: Param,
        uncertainty: Option<f64>,
    },
    Channel {
        energy: f64,
        width: Param,
        uncertainty: Option<f64>,
    },
    /// Tabulated resolution function read by the fitting program.
    File(String),
}

/// Card set 16: user-defined resolution function.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserResolutionCard {
    pub lines: Vec<UserResolutionLine>,
}

impl CardModel for UserResolutionCard {
    const CARD_SET: CardSet = CardSet::UserResolution;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut parsed = Vec::with_capacity(lines.len() - cursor);
        for index in cursor..lines.len() {
            let reader = line_reader(lines, index, context)?;
            let tag = reader.alpha(UserResolutionField::Tag).to_ascii_uppercase();
            let line = match tag.as_str() {
                "BURST" => UserResolutionLine::Burst {
                    width: reader.param(UserResolutionField::Value(0), UserResolutionField::Vary)?,
                    uncertainty: reader.optional_real(UserResolutionField::Value(1))?,
                },
                "CHANN" => UserResolutionLine::Channel {
                    energy: reader.real(UserResolutionField::Value(0))?,
                    width: reader.param(UserResolutionField::Value(1), UserResolutionField::Vary)?,
                    uncertainty: reader.optional_real(UserResolutionField::Value(2))?,
                },
                FILE_TAG => {
                    if !reader.is_blank_from(76) {
                        return Err(reader.error(
                            SammyErrorKind::OutOfRange,
                            "file name runs past column 75",
                        ));
                    }
                    let name = reader.keyword(UserResolutionField::FileName);
                    if name.is_empty() {
                        return Err(reader.error(
                            SammyErrorKind::MalformedField,
                            "FILE= line names no file",
                        ));
                    }
                    UserResolutionLine::File(name)
                }
                other => {
                    return Err(reader.error(
                        SammyErrorKind::UnrecognizedFormat,
                        format!("'{}' is not a user resolution line tag", other.trim()),
                    ));
                }
            };
            parsed.push(line);
        }

        Ok((Self { lines: parsed }, lines.len() - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut rendered = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let mut writer = LineWriter::new(context.at_output_line(rendered.len() + 1));
            match line {
                UserResolutionLine::Burst { width, uncertainty } => {
                    writer.alpha(UserResolutionField::Tag, "BURST");
                    writer.param(UserResolutionField::Value(0), UserResolutionField::Vary, *width)?;
                    writer.optional_real(UserResolutionField::Value(1), *uncertainty)?;
                }
                UserResolutionLine::Channel {
                    energy,
                    width,
                    uncertainty,
                } => {
                    writer.alpha(UserResolutionField::Tag, "CHANN");
                    writer.real(UserResolutionField::Value(0), *energy)?;
                    writer.param(UserResolutionField::Value(1), UserResolutionField::Vary, *width)?;
                    writer.optional_real(UserResolutionField::Value(2), *uncertainty)?;
                }
                UserResolutionLine::File(name) => {
                    writer.alpha(UserResolutionField::Tag, FILE_TAG);
                    writer.alpha(UserResolutionField::FileName, name);
                }
            }
            rendered.push(writer.finish());
        }
        Ok(rendered)
    }

    fn header(&self) -> Option<&'static str> {
        Some(USER_RESOLUTION_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        let width = UserResolutionField::FileName.spec().width();
        for line in &self.lines {
            if let UserResolutionLine::File(name) = line {
                if name.trim().is_empty() {
                    return Err(SammyError::validation("FILE= line needs a file name"));
                }
                if name.chars().count() > width {
                    return Err(SammyError::out_of_range(format!(
                        "file name '{name}' exceeds {width} characters"
                    )));
                }
            }
        }
        Ok(())
    }

    impl_instance_access!(UserResolution);
}
