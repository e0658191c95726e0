//! Card set 12: paramagnetic cross-section parameters.

use super::{CardModel, empty_body, impl_instance_access, line_reader};
use crate::domain::{
    CardSet, DiagnosticContext, Param, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult, VaryDomain,
};
use crate::field::{CardField, Columns, FieldSpec, LineWriter};

pub const PARAMAGNETIC_HEADER: &str = "PARAMagnetic cross section parameters follow";

const NAME_COLUMNS: Columns = Columns::new(1, 5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamagneticField {
    Nuclide,
    /// Flags for A, B and P at columns 7, 9 and 10.
    Vary(usize),
    /// A, B and P values.
    Value(usize),
    /// Uncertainties on A, B and P.
    Uncertainty(usize),
    Isotope,
    IsotopeVary,
    IsotopeValue,
    IsotopeUncertainty,
}

impl CardField for ParamagneticField {
    fn spec(self) -> FieldSpec {
        match self {
            Self::Nuclide => FieldSpec::alpha("NUCLIDE", 1, 5),
            Self::Vary(term) => {
                let column = [7, 9, 10][term];
                FieldSpec::flag("IFABP", column, column, VaryDomain::Basic)
            }
            Self::Value(term) => FieldSpec::real("ABP", 11 + 20 * term, 20 + 20 * term),
            Self::Uncertainty(term) => FieldSpec::real("DABP", 21 + 20 * term, 30 + 20 * term),
            Self::Isotope => FieldSpec::integer("ISO", 7, 7),
            Self::IsotopeVary => FieldSpec::flag("IFC", 9, 9, VaryDomain::Basic),
            Self::IsotopeValue => FieldSpec::real("C", 11, 20),
            Self::IsotopeUncertainty => FieldSpec::real("DC", 21, 30),
        }
    }
}

/// C term for one isotope of the paramagnetic nuclide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamagneticIsotope {
    pub isotope: u32,
    pub c: Param,
    pub uncertainty: Option<f64>,
}

impl ParamagneticIsotope {
    pub const fn new(isotope: u32, c: Param) -> Self {
        Self {
            isotope,
            c,
            uncertainty: None,
        }
    }
}

/// A, B and P terms for one nuclide (TM, ER or HO) and its isotope lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamagneticNuclide {
    pub name: String,
    pub terms: [Param; 3],
    pub uncertainties: [Option<f64>; 3],
    pub isotopes: Vec<ParamagneticIsotope>,
}

impl ParamagneticNuclide {
    pub fn new(name: impl Into<String>, a: Param, b: Param, p: Param) -> Self {
        Self {
            name: name.into(),
            terms: [a, b, p],
            uncertainties: [None; 3],
            isotopes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamagneticCard {
    pub nuclides: Vec<ParamagneticNuclide>,
}

impl CardModel for ParamagneticCard {
    const CARD_SET: CardSet = CardSet::Paramagnetic;

    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)> {
        if cursor >= lines.len() {
            return Err(empty_body(context));
        }

        let mut nuclides: Vec<ParamagneticNuclide> = Vec::new();
        for index in cursor..lines.len() {
            let reader = line_reader(lines, index, context)?;
            if reader.is_blank(NAME_COLUMNS) {
                let Some(nuclide) = nuclides.last_mut() else {
                    return Err(reader.error(
                        SammyErrorKind::MalformedField,
                        "isotope line appears before any nuclide line",
                    ));
                };
                nuclide.isotopes.push(ParamagneticIsotope {
                    isotope: reader.unsigned(ParamagneticField::Isotope, 0)?,
                    c: reader.param(
                        ParamagneticField::IsotopeValue,
                        ParamagneticField::IsotopeVary,
                    )?,
                    uncertainty: reader.optional_real(ParamagneticField::IsotopeUncertainty)?,
                });
                continue;
            }

            let mut terms = [Param::default(); 3];
            let mut uncertainties = [None; 3];
            for term in 0..3 {
                terms[term] = reader.param(
                    ParamagneticField::Value(term),
                    ParamagneticField::Vary(term),
                )?;
                uncertainties[term] =
                    reader.optional_real(ParamagneticField::Uncertainty(term))?;
            }
            nuclides.push(ParamagneticNuclide {
                name: reader.keyword(ParamagneticField::Nuclide),
                terms,
                uncertainties,
                isotopes: Vec::new(),
            });
        }

        Ok((Self { nuclides }, lines.len() - cursor))
    }

    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
        self.validate()?;
        let mut lines = Vec::new();
        for nuclide in &self.nuclides {
            let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
            writer.alpha(ParamagneticField::Nuclide, &nuclide.name);
            for term in 0..3 {
                writer.param(
                    ParamagneticField::Value(term),
                    ParamagneticField::Vary(term),
                    nuclide.terms[term],
                )?;
                writer.optional_real(
                    ParamagneticField::Uncertainty(term),
                    nuclide.uncertainties[term],
                )?;
            }
            lines.push(writer.finish());

            for isotope in &nuclide.isotopes {
                let mut writer = LineWriter::new(context.at_output_line(lines.len() + 1));
                writer.integer(ParamagneticField::Isotope, i64::from(isotope.isotope))?;
                writer.param(
                    ParamagneticField::IsotopeValue,
                    ParamagneticField::IsotopeVary,
                    isotope.c,
                )?;
                writer.optional_real(ParamagneticField::IsotopeUncertainty, isotope.uncertainty)?;
                lines.push(writer.finish());
            }
        }
        Ok(lines)
    }

    fn header(&self) -> Option<&'static str> {
        Some(PARAMAGNETIC_HEADER)
    }

    fn validate(&self) -> SammyResult<()> {
        if self.nuclides.iter().any(|nuclide| nuclide.name.trim().is_empty()) {
            return Err(SammyError::validation(
                "paramagnetic nuclide lines need a nuclide name",
            ));
        }
        Ok(())
    }

    impl_instance_access!(Paramagnetic);
}
