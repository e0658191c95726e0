//! Card set 11: miscellaneous parameters, one tagged line per quantity.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult, VaryDomain, VaryFlag,
};
use crate::field::{CardField, FieldSpec, LineWriter};

pub const MISC_HEADER: &str = "MISCEllaneous parameters follow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscField {
    Tag,
    /// Single-column flag at the given column.
    Flag(usize),
    GammaGroup,
    GammaFlag,
    /// Nuclide index on DRCAP lines.
    Nuclide,
    /// Ten-column real starting at the given column.
    Value(usize),
}

impl CardField for MiscField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Tag => FieldSpec::alpha("WHAT", 1, 5),
            Self::Flag(column) => FieldSpec::flag("IFLAG", column, column, VaryDomain::Basic),
            Self::GammaGroup => FieldSpec::integer("IGRGAM", 6, 7),
            Self::GammaFlag => FieldSpec::flag("IFLGAM", 8, 9, VaryDomain::Extended),
            Self::Nuclide => FieldSpec::integer("NUC", 9, 9),
            Self::Value(first) => FieldSpec::real("VALUE", first, first + 9),
        }
    }
}

const VALUES_FROM_11: [usize; 6] = [11, 21, 31, 41, 51, 61];
const VALUES_FROM_21: [usize; 3] = [21, 31, 41];

/// Tag of a miscellaneous line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MiscKind {
    /// Flight-path length dependence (DELL1, DELL0).
    Delta,
    /// Neutrons per fission at one energy.
    Eta,
    /// Finite-size attenuation, incident and outgoing.
    Finit,
    /// Radiation width for one spin group.
    Gamma,
    /// Time offset and flight-path length.
    Tzero,
    /// Abundances of up to three self-indication isotopes.
    Siabn,
    /// Self-indication temperature and thickness.
    Selfi,
    /// Capture and fission detection efficiencies.
    Effic,
    /// Energy-dependent energy shift terms.
    Delte,
    /// Direct-capture coefficient for one nuclide.
    Drcap,
    /// Non-uniform sample radius and thickness.
    Nonun,
}

impl MiscKind {
    pub const ALL: [Self; 11] = [
        Self::Delta,
        Self::Eta,
        Self::Finit,
        Self::Gamma,
        Self::Tzero,
        Self::Siabn,
        Self::Selfi,
        Self::Effic,
        Self::Delte,
        Self::Drcap,
        Self::Nonun,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Delta => "DELTA",
            Self::Eta => "ETA",
            Self::Finit => "FINIT",
            Self::Gamma => "GAMMA",
            Self::Tzero => "TZERO",
            Self::Siabn => "SIABN",
            Self::Selfi => "SELFI",
            Self::Effic => "EFFIC",
            Self::Delte => "DELTE",
            Self::Drcap => "DRCAP",
            Self::Nonun => "NONUN",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }

    /// Flag fields in column order.
    pub const fn flag_fields(self) -> &'static [MiscField] {
        match self {
            Self::Eta | Self::Drcap => &[MiscField::Flag(7)],
            Self::Gamma => &[MiscField::GammaFlag],
            Self::Siabn | Self::Delte => {
                &[MiscField::Flag(7), MiscField::Flag(9), MiscField::Flag(10)]
            }
            Self::Nonun => &[],
            Self::Delta | Self::Finit | Self::Tzero | Self::Selfi | Self::Effic => {
                &[MiscField::Flag(7), MiscField::Flag(9)]
            }
        }
    }

    pub const fn index_field(self) -> Option<MiscField> {
        match self {
            Self::Gamma => Some(MiscField::GammaGroup),
            Self::Drcap => Some(MiscField::Nuclide),
            _ => None,
        }
    }

    /// Start columns of the ten-column value slots.
    pub fn value_columns(self) -> &'static [usize] {
        match self {
            Self::Gamma | Self::Drcap => &VALUES_FROM_11[..2],
            Self::Eta => &VALUES_FROM_11[..3],
            Self::Delta | Self::Finit | Self::Selfi | Self::Effic => &VALUES_FROM_11[..4],
            Self::Tzero => &VALUES_FROM_11[..5],
            Self::Siabn | Self::Delte => &VALUES_FROM_11,
            Self::Nonun => &VALUES_FROM_21,
        }
    }
}

/// One tagged miscellaneous line.
///
/// `values` holds the ten-column slots in column order; `None` leaves a
/// slot blank. Trailing blank slots are dropped on parse.
#[derive(Debug, Clone, PartialEq)]
pub struct MiscLine {
    pub kind: MiscKind,
    /// Spin group for GAMMA, nuclide index for DRCAP.
    pub index: Option<u32>,
    pub flags: Vec<VaryFlag>,
    pub values: Vec<Option<f64>>,
}

impl MiscLine {
    /// A line of `kind` with every flag fixed and no values.
    pub fn new(kind: MiscKind) -> Self {
        Self {
            kind,
            index: None,
            flags: vec![VaryFlag::Fixed; kind.flag_fields().len()],
            values: Vec::new(),
        }
    }

    pub fn gamma(group: u32, width: Param, uncertainty: Option<f64>) -> Self {
        let mut values = vec![Some(width.value)];
        if uncertainty.is_some() {
            values.push(uncertainty);
        }
        Self {
            kind: MiscKind::Gamma,
            index: Some(group),
            flags: vec![width.vary],
            values,
        }
    }

    pub fn with_values(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.values = values.into_iter().map(Some).collect();
        self
    }

    fn validate(&self) -> SammyResult<()> {
        let tag = self.kind.tag();
        if self.flags.len() != self.kind.flag_fields().len() {
            return Err(SammyError::validation(format!(
                "{tag} line takes {} flags, found {}",
                self.kind.flag_fields().len(),
                self.flags.len()
            )));
        }
        if self.values.len() > self.kind.value_columns().len() {
            return Err(SammyError::validation(format!(
                "{tag} line holds at most {} values, found {}",
                self.kind.value_columns().len(),
                self.values.len()
            )));
        }
        match (self.kind.index_field(), self.index) {
            (Some(_), None) => Err(SammyError::validation(format!(
                "{tag} line needs its group or nuclide index"
            ))),
            (None, Some(_)) => Err(SammyError::validation(format!(
                "{tag} line carries no index column"
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiscCard {
    pub lines: Vec<MiscLine>,
}

impl MiscCard {
    /// Spin groups named by GAMMA lines.
    pub fn gamma_groups(&self) -> impl Iterator<Item = u32> + '_ {
        self.lines
            .iter()
            .filter(|line| line.kind == MiscKind::Gamma)
            .filter_map(|line| line.index)
    }
}

impl CardModel for MiscCard {
    const CARD_SET: CardSet = CardSet::Miscellaneous;

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
            let tag = reader.keyword(MiscField::Tag);
            let Some(kind) = MiscKind::from_tag(&tag) else {
                return Err(reader.error(
                    SammyErrorKind::UnrecognizedFormat,
                    format!("'{tag}' is not a miscellaneous parameter tag"),
                ));
            };

            let flags = kind
                .flag_fields()
                .iter()
                .map(|field| reader.flag(*field))
                .collect::<SammyResult<Vec<_>>>()?;
            let index = match kind.index_field() {
                Some(field) => Some(reader.unsigned(field, 0)?),
                None => None,
            };
            let mut values = kind
                .value_columns()
                .iter()
                .map(|first| reader.optional_real(MiscField::Value(*first)))
                .collect::<SammyResult<Vec<_>>>()?;
            while values.last() == Some(&None) {
                values.pop();
            }

            parsed.push(MiscLine {
                kind,
                index,
                flags,
                values,
            });
        }

        Ok((Self { lines: parsed }, lines.len() - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut rendered = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            let mut writer = LineWriter::new(context.at_output_line(rendered.len() + 1));
            writer.alpha(MiscField::Tag, line.kind.tag());
            for (field, flag) in line.kind.flag_fields().iter().zip(&line.flags) {
                writer.flag(*field, *flag)?;
            }
            if let (Some(field), Some(index)) = (line.kind.index_field(), line.index) {
                writer.integer(field, i64::from(index))?;
            }
            for (first, value) in line.kind.value_columns().iter().zip(&line.values) {
                writer.optional_real(MiscField::Value(*first), *value)?;
            }
            rendered.push(writer.finish());
        }
        Ok(rendered)
    }

    fn header(&self) -> Option<&'static str> {
        Some(MISC_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        self.lines.iter().try_for_each(MiscLine::validate)
    }

    impl_instance_access!(Miscellaneous);
}
