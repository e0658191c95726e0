//! Fixed-column field primitives shared by every card.

pub mod codec;
pub mod line;
pub mod list;

pub use codec::{
    format_free_real, parse_alphanumeric, parse_flag, parse_integer, parse_real,
    render_alphanumeric, render_flag, render_integer, render_real,
};
pub use line::{LineReader, LineWriter};
pub use list::IntegerListLayout;

use crate::domain::{SammyErrorKind, VaryDomain, VaryFlag};
use std::fmt::{Display, Formatter};

/// A 1-based inclusive column range on an 80-column card image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Columns {
    first: usize,
    last: usize,
}

impl Columns {
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub const fn single(column: usize) -> Self {
        Self::new(column, column)
    }

    pub const fn first(self) -> usize {
        self.first
    }

    pub const fn last(self) -> usize {
        self.last
    }

    pub const fn width(self) -> usize {
        self.last + 1 - self.first
    }

    /// The range of the same width starting right after this one.
    pub const fn next(self) -> Self {
        Self::new(self.last + 1, self.last + self.width())
    }
}

impl Display for Columns {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Alphanumeric,
    Real,
    Integer,
    Flag(VaryDomain),
}

/// Declared name, columns and kind of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub name: &'static str,
    pub columns: Columns,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, columns: Columns, kind: FieldKind) -> Self {
        Self {
            name,
            columns,
            kind,
        }
    }

    pub const fn alpha(name: &'static str, first: usize, last: usize) -> Self {
        Self::new(name, Columns::new(first, last), FieldKind::Alphanumeric)
    }

    pub const fn real(name: &'static str, first: usize, last: usize) -> Self {
        Self::new(name, Columns::new(first, last), FieldKind::Real)
    }

    pub const fn integer(name: &'static str, first: usize, last: usize) -> Self {
        Self::new(name, Columns::new(first, last), FieldKind::Integer)
    }

    pub const fn flag(name: &'static str, first: usize, last: usize, domain: VaryDomain) -> Self {
        Self::new(name, Columns::new(first, last), FieldKind::Flag(domain))
    }

    pub const fn width(&self) -> usize {
        self.columns.width()
    }

    pub const fn domain(&self) -> Option<VaryDomain> {
        match self.kind {
            FieldKind::Flag(domain) => Some(domain),
            _ => None,
        }
    }
}

/// Identifier of a field in a card's layout table.
///
/// Each card declares an enum of its fields and maps every variant to a
/// [`FieldSpec`]; parse and render code addresses columns only through these
/// identifiers.
pub trait CardField: Copy + std::fmt::Debug {
    fn spec(self) -> FieldSpec;
}

impl CardField for FieldSpec {
    fn spec(self) -> FieldSpec {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("{field} (columns {columns}): '{text}' is not a real number with a decimal point")]
    MalformedReal {
        field: &'static str,
        columns: Columns,
        text: String,
    },
    #[error("{field} (columns {columns}): '{text}' is not an integer")]
    MalformedInteger {
        field: &'static str,
        columns: Columns,
        text: String,
    },
    #[error("{field} (columns {columns}): {value} does not fit in {width} columns")]
    OutOfRange {
        field: &'static str,
        columns: Columns,
        value: String,
        width: usize,
    },
    #[error("{field}: vary flag {code} is outside the allowed set {domain}")]
    FlagOutsideDomain {
        field: &'static str,
        code: i64,
        domain: VaryDomain,
    },
    #[error("line is {length} columns long, cards hold at most {limit}")]
    LineTooLong { length: usize, limit: usize },
}

impl FieldError {
    pub const fn kind(&self) -> SammyErrorKind {
        match self {
            Self::MalformedReal { .. }
            | Self::MalformedInteger { .. }
            | Self::LineTooLong { .. } => {
                SammyErrorKind::MalformedField
            }
            Self::OutOfRange { .. } => SammyErrorKind::OutOfRange,
            Self::FlagOutsideDomain { .. } => SammyErrorKind::ValidationError,
        }
    }
}

/// Check a programmatically assigned flag against the domain its field declares.
pub fn check_flag(field: impl CardField, flag: VaryFlag) -> Result<VaryFlag, FieldError> {
    let spec = field.spec();
    match spec.domain() {
        Some(domain) if !domain.allows(flag) => Err(FieldError::FlagOutsideDomain {
            field: spec.name,
            code: flag.code(),
            domain,
        }),
        _ => Ok(flag),
    }
}

#[cfg(test)]
mod tests {
    use super::{CardField, Columns, FieldError, FieldSpec, check_flag};
    use crate::domain::{SammyErrorKind, VaryDomain, VaryFlag};

    #[test]
    fn columns_report_width_and_successor() {
        let columns = Columns::new(12, 22);
        assert_eq!(columns.width(), 11);
        assert_eq!(columns.next(), Columns::new(23, 33));
        assert_eq!(Columns::single(7).width(), 1);
        assert_eq!(columns.to_string(), "12-22");
    }

    #[test]
    fn check_flag_uses_declared_domain() {
        let basic = FieldSpec::flag("IFLEFF", 22, 22, VaryDomain::Basic);
        let extended = FieldSpec::flag("IFLTRU", 23, 24, VaryDomain::Extended);

        assert_eq!(check_flag(basic, VaryFlag::Varied), Ok(VaryFlag::Varied));
        let error = check_flag(basic, VaryFlag::UseFromParameterFile)
            .expect_err("negative flag should be rejected in the basic domain");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
        assert!(check_flag(extended, VaryFlag::UseFromParameterFile).is_ok());
        assert!(check_flag(FieldSpec::real("E", 1, 11), VaryFlag::UseFromOthers).is_ok());
    }

    #[test]
    fn field_errors_map_onto_document_kinds() {
        let malformed = FieldError::MalformedReal {
            field: "E",
            columns: Columns::new(1, 11),
            text: "12".to_string(),
        };
        assert_eq!(malformed.kind(), SammyErrorKind::MalformedField);
        assert_eq!(
            malformed.to_string(),
            "E (columns 1-11): '12' is not a real number with a decimal point"
        );
        assert_eq!(FieldSpec::alpha("NAME", 1, 5).spec().width(), 5);
    }
}
