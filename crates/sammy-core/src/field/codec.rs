//! Render and parse the three primitive field kinds plus vary flags.

use super::{FieldError, FieldSpec};
use crate::domain::VaryFlag;

/// Left-justify `text` in the field, truncating anything past its width.
pub fn render_alphanumeric(spec: FieldSpec, text: &str) -> String {
    let width = spec.width();
    let truncated: String = text.chars().take(width).collect();
    format!("{truncated:<width$}")
}

/// Trailing pad is dropped; leading and internal spacing is significant.
pub fn parse_alphanumeric(slice: &str) -> String {
    slice.trim_end().to_string()
}

/// Right-justify a real with a literal decimal point.
///
/// The shortest round-trip decimal form is tried first; precision then drops
/// one digit at a time. Exponential notation is never produced.
pub fn render_real(spec: FieldSpec, value: f64) -> Result<String, FieldError> {
    let width = spec.width();
    if !value.is_finite() {
        return Err(out_of_range(spec, value.to_string()));
    }

    let natural = with_decimal_point(format!("{value}"));
    if natural.len() <= width {
        return Ok(format!("{natural:>width$}"));
    }

    let decimals = natural
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len());
    for precision in (0..decimals).rev() {
        let candidate = with_decimal_point(format!("{value:.precision$}"));
        if candidate.len() <= width {
            return Ok(format!("{candidate:>width$}"));
        }
    }

    Err(out_of_range(spec, natural))
}

/// Parse a real; the slice must contain a decimal point.
///
/// Accepts `E`/`D` exponents and the Fortran form without an exponent letter
/// (`1.234-05`).
pub fn parse_real(spec: FieldSpec, slice: &str) -> Result<f64, FieldError> {
    let text = slice.trim();
    let malformed = || FieldError::MalformedReal {
        field: spec.name,
        columns: spec.columns,
        text: text.to_string(),
    };

    if !text.contains('.') {
        return Err(malformed());
    }

    let normalized = text.replace(['D', 'd'], "E");
    if let Ok(value) = normalized.parse::<f64>() {
        return Ok(value);
    }

    implicit_exponent(&normalized)
        .and_then(|expanded| expanded.parse::<f64>().ok())
        .ok_or_else(malformed)
}

pub fn render_integer(spec: FieldSpec, value: i64) -> Result<String, FieldError> {
    let width = spec.width();
    let text = value.to_string();
    if text.len() > width {
        return Err(out_of_range(spec, text));
    }
    Ok(format!("{text:>width$}"))
}

/// Parse a signed integer; an all-blank slice yields `default`.
pub fn parse_integer(spec: FieldSpec, slice: &str, default: i64) -> Result<i64, FieldError> {
    let text = slice.trim();
    if text.is_empty() {
        return Ok(default);
    }
    text.parse::<i64>()
        .map_err(|_| FieldError::MalformedInteger {
            field: spec.name,
            columns: spec.columns,
            text: text.to_string(),
        })
}

pub fn render_flag(spec: FieldSpec, flag: VaryFlag) -> Result<String, FieldError> {
    let flag = super::check_flag(spec, flag)?;
    render_integer(spec, flag.code())
}

/// Parse a vary flag; blank means fixed.
pub fn parse_flag(spec: FieldSpec, slice: &str) -> Result<VaryFlag, FieldError> {
    let code = parse_integer(spec, slice, 0)?;
    let flag = VaryFlag::from_code(code).ok_or(FieldError::FlagOutsideDomain {
        field: spec.name,
        code,
        domain: spec.domain().unwrap_or(crate::domain::VaryDomain::Extended),
    })?;
    super::check_flag(spec, flag)
}

/// Free-form real for keyword cards: shortest form, always with a point.
pub fn format_free_real(value: f64) -> String {
    with_decimal_point(format!("{value}"))
}

fn with_decimal_point(mut text: String) -> String {
    if !text.contains('.') {
        text.push('.');
    }
    text
}

fn implicit_exponent(text: &str) -> Option<String> {
    let split = text
        .char_indices()
        .skip(1)
        .filter(|(_, character)| matches!(character, '+' | '-'))
        .map(|(index, _)| index)
        .last()?;
    let (mantissa, exponent) = text.split_at(split);
    if mantissa.ends_with('E') || mantissa.ends_with('e') {
        return None;
    }
    Some(format!("{mantissa}E{exponent}"))
}

fn out_of_range(spec: FieldSpec, value: String) -> FieldError {
    FieldError::OutOfRange {
        field: spec.name,
        columns: spec.columns,
        value,
        width: spec.width(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        format_free_real, parse_alphanumeric, parse_flag, parse_integer, parse_real,
        render_alphanumeric, render_flag, render_integer, render_real,
    };
    use crate::domain::{SammyErrorKind, VaryDomain, VaryFlag};
    use crate::field::{FieldError, FieldSpec};

    const ENERGY: FieldSpec = FieldSpec::real("E", 1, 11);
    const NARROW: FieldSpec = FieldSpec::real("CRFN", 1, 5);

    #[test]
    fn real_renders_natural_form_right_justified() {
        assert_eq!(render_real(ENERGY, 6.673).unwrap(), "      6.673");
        assert_eq!(render_real(ENERGY, 3.0).unwrap(), "         3.");
        assert_eq!(render_real(ENERGY, -0.25).unwrap(), "      -0.25");
    }

    #[test]
    fn real_reduces_precision_until_it_fits() {
        assert_eq!(render_real(NARROW, 0.123456).unwrap(), "0.123");
        assert_eq!(render_real(NARROW, -1.98765).unwrap(), "-1.99");
        assert_eq!(render_real(NARROW, 9999.4).unwrap(), "9999.");
        assert_eq!(render_real(NARROW, 1.0e-7).unwrap(), "0.000");
    }

    #[test]
    fn real_beyond_maximum_magnitude_is_out_of_range() {
        let error = render_real(NARROW, 12345.0).expect_err("five digits cannot fit with a point");
        assert_eq!(error.kind(), SammyErrorKind::OutOfRange);
        assert!(render_real(NARROW, -9999.0).is_err());
        assert!(render_real(NARROW, f64::NAN).is_err());
        assert!(render_real(NARROW, f64::INFINITY).is_err());
    }

    #[test]
    fn free_real_always_carries_a_point() {
        assert_eq!(format_free_real(3.0), "3.");
        assert_eq!(format_free_real(2.908), "2.908");
    }

    #[test]
    fn real_parse_requires_decimal_point() {
        assert_eq!(parse_real(ENERGY, "     6.673 ").unwrap(), 6.673);
        assert_eq!(parse_real(ENERGY, "3.").unwrap(), 3.0);
        assert_eq!(parse_real(ENERGY, "1.5E+03").unwrap(), 1500.0);
        assert_eq!(parse_real(ENERGY, "2.5D-1").unwrap(), 0.25);

        let error = parse_real(ENERGY, "       12  ").expect_err("integers are not reals");
        assert!(matches!(error, FieldError::MalformedReal { .. }));
        assert!(parse_real(ENERGY, "           ").is_err());
        assert!(parse_real(ENERGY, "1.2.3").is_err());
    }

    #[test]
    fn real_parse_accepts_fortran_implicit_exponent() {
        assert!((parse_real(ENERGY, "1.234-05").unwrap() - 1.234e-5).abs() < 1.0e-18);
        assert_eq!(parse_real(ENERGY, "-6.02+2").unwrap(), -602.0);
    }

    #[test]
    fn integer_renders_right_justified_and_rejects_overflow() {
        let group = FieldSpec::integer("IGROUP", 66, 67);
        assert_eq!(render_integer(group, 7).unwrap(), " 7");
        assert_eq!(render_integer(group, -1).unwrap(), "-1");
        let error = render_integer(group, 100).expect_err("three digits cannot fit in two columns");
        assert_eq!(error.kind(), SammyErrorKind::OutOfRange);
    }

    #[test]
    fn integer_parse_uses_default_for_blank_slices() {
        let group = FieldSpec::integer("IGROUP", 66, 67);
        assert_eq!(parse_integer(group, "  ", 0).unwrap(), 0);
        assert_eq!(parse_integer(group, "  ", 4).unwrap(), 4);
        assert_eq!(parse_integer(group, "-1", 0).unwrap(), -1);
        assert!(parse_integer(group, "1.", 0).is_err());
    }

    #[test]
    fn alphanumeric_pads_truncates_and_keeps_inner_spacing() {
        let name = FieldSpec::alpha("NAME", 1, 5);
        assert_eq!(render_alphanumeric(name, "TM"), "TM   ");
        assert_eq!(render_alphanumeric(name, "THULIUM"), "THULI");
        assert_eq!(parse_alphanumeric("A B  "), "A B");
        assert_eq!(parse_alphanumeric(" AB"), " AB");
    }

    #[test]
    fn flags_respect_field_domains() {
        let basic = FieldSpec::flag("IFLAG", 56, 57, VaryDomain::Basic);
        let extended = FieldSpec::flag("IFLAG", 31, 32, VaryDomain::Extended);

        assert_eq!(render_flag(basic, VaryFlag::PropagatedUncertainty).unwrap(), " 3");
        assert!(render_flag(basic, VaryFlag::UseFromOthers).is_err());
        assert_eq!(render_flag(extended, VaryFlag::UseFromOthers).unwrap(), "-2");

        assert_eq!(parse_flag(basic, "  ").unwrap(), VaryFlag::Fixed);
        assert_eq!(parse_flag(extended, "-1").unwrap(), VaryFlag::UseFromParameterFile);
        let error = parse_flag(basic, " 2").expect_err("2 is not a vary flag");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
        assert!(parse_flag(basic, "-1").is_err());
    }
}
