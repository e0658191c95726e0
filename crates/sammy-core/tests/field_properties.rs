use proptest::prelude::*;
use sammy_core::field::{
    FieldSpec, LineReader, parse_alphanumeric, parse_flag, parse_integer, parse_real,
    render_alphanumeric, render_integer, render_real,
};
use sammy_core::{DiagnosticContext, SammyErrorKind, VaryDomain, VaryFlag};

const REAL: FieldSpec = FieldSpec::real("VALUE", 11, 20);
const INTEGER: FieldSpec = FieldSpec::integer("COUNT", 1, 5);
const NAME: FieldSpec = FieldSpec::alpha("NAME", 1, 8);

proptest! {
    #[test]
    fn rendered_reals_fill_the_field_and_parse_back(value in -999_999.0f64..999_999.0) {
        let rendered = render_real(REAL, value).expect("six integer digits fit ten columns");
        prop_assert_eq!(rendered.len(), REAL.width());
        prop_assert!(rendered.contains('.'));

        let parsed = parse_real(REAL, &rendered).expect("rendered reals parse");
        prop_assert!((parsed - value).abs() <= 0.0051, "{} -> {} -> {}", value, rendered, parsed);
    }

    #[test]
    fn short_reals_are_kept_exactly(mantissa in -99_999i32..99_999, scale in 0u32..4) {
        let value = f64::from(mantissa) / 10f64.powi(scale as i32);
        let rendered = render_real(REAL, value).unwrap();
        prop_assert_eq!(parse_real(REAL, &rendered).unwrap(), value);
    }

    #[test]
    fn integers_within_width_round_trip(value in -9_999i64..=99_999) {
        let rendered = render_integer(INTEGER, value).unwrap();
        prop_assert_eq!(rendered.len(), INTEGER.width());
        prop_assert_eq!(parse_integer(INTEGER, &rendered, 0).unwrap(), value);
    }

    #[test]
    fn alphanumeric_fields_pad_or_truncate(text in "[A-Za-z0-9+]{0,12}") {
        let rendered = render_alphanumeric(NAME, &text);
        prop_assert_eq!(rendered.chars().count(), NAME.width());
        let expected: String = text.chars().take(NAME.width()).collect();
        prop_assert_eq!(parse_alphanumeric(&rendered), expected);
    }
}

#[test]
fn wide_integers_are_out_of_range() {
    let error = render_integer(INTEGER, 123_456).expect_err("six digits in five columns");
    assert_eq!(error.kind(), SammyErrorKind::OutOfRange);
}

#[test]
fn precision_drops_until_the_value_fits() {
    assert_eq!(render_real(REAL, 0.1234567890123).unwrap(), "0.12345679");
    assert_eq!(render_real(REAL, 42.0).unwrap(), "       42.");
    assert_eq!(
        render_real(REAL, f64::NAN).expect_err("not finite").kind(),
        SammyErrorKind::OutOfRange
    );
    assert_eq!(
        render_real(REAL, 12_345_678_901.0).expect_err("eleven digits").kind(),
        SammyErrorKind::OutOfRange
    );
}

#[test]
fn fortran_exponent_forms_are_accepted() {
    assert_eq!(parse_real(REAL, "  1.234-05").unwrap(), 1.234e-5);
    assert_eq!(parse_real(REAL, "   6.02+23").unwrap(), 6.02e23);
    assert_eq!(parse_real(REAL, "   1.5D+02").unwrap(), 150.0);
    assert_eq!(parse_real(REAL, "    -1.5-3").unwrap(), -1.5e-3);
    assert_eq!(
        parse_real(REAL, "        12").expect_err("no decimal point").kind(),
        SammyErrorKind::MalformedField
    );
}

#[test]
fn flags_outside_the_declared_domain_are_rejected() {
    let basic = FieldSpec::flag("IFLAG", 1, 2, VaryDomain::Basic);
    let extended = FieldSpec::flag("IFLAG", 1, 2, VaryDomain::Extended);

    assert_eq!(parse_flag(basic, "  ").unwrap(), VaryFlag::Fixed);
    assert_eq!(parse_flag(extended, "-2").unwrap(), VaryFlag::UseFromOthers);
    assert_eq!(
        parse_flag(basic, "-2").expect_err("basic flags are 0, 1, 3").kind(),
        SammyErrorKind::ValidationError
    );
    assert_eq!(
        parse_flag(extended, " 2").expect_err("2 is no flag").kind(),
        SammyErrorKind::ValidationError
    );
}

#[test]
fn lines_past_column_80_are_malformed() {
    let line = "x".repeat(81);
    let error = LineReader::new(&line, DiagnosticContext::new()).expect_err("81 columns");
    assert_eq!(error.kind(), SammyErrorKind::MalformedField);
    assert!(LineReader::new(&"x".repeat(80), DiagnosticContext::new()).is_ok());
}
