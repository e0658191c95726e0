//! Layout detection for card sets with more than one body format.

use crate::cards::empty_body;
use crate::cards::fudge::FudgeField;
use crate::cards::particle_pairs::ParticlePairLayout;
use crate::cards::radius::RadiusLayout;
use crate::common::GroupListMode;
use crate::domain::{DiagnosticContext, ParseResult, SammyErrorKind};
use crate::field::{CardField, Columns, parse_real};
use tracing::debug;

/// Whether every column in `columns` is blank; lines shorter than the range
/// count as blank past their end.
pub fn is_blank(line: &str, columns: Columns) -> bool {
    line.chars()
        .skip(columns.first() - 1)
        .take(columns.width())
        .all(char::is_whitespace)
}

fn column(line: &str, position: usize) -> Option<char> {
    line.chars()
        .nth(position - 1)
        .filter(|cell| !cell.is_whitespace())
}

/// Whether `columns` hold a right-justified integer: blanks, an optional
/// sign, then digits through the last column.
fn is_right_justified_integer(line: &str, columns: Columns) -> bool {
    let slice: String = line
        .chars()
        .chain(std::iter::repeat(' '))
        .skip(columns.first() - 1)
        .take(columns.width())
        .collect();
    let digits = slice.trim_start().trim_start_matches(['-', '+']);
    !digits.is_empty() && digits.chars().all(|cell| cell.is_ascii_digit())
}

/// Pick the radius layout from the card body.
///
/// `=` anywhere means key/value lines. Otherwise the first line decides. The
/// alternate layout holds IFLEFF and IFLTRU as two right-justified five-wide
/// integers in 26-35, so column 26 is blank; in the default layout column 26
/// closes the first two-wide group. A blank ICHAN reads as 0 in both.
pub fn radius_layout(body: &[&str], context: &DiagnosticContext) -> ParseResult<RadiusLayout> {
    let Some(first) = body.first() else {
        return Err(empty_body(context));
    };

    let ichan = Columns::new(21, 25);
    let layout = if body.iter().any(|line| line.contains('=')) {
        RadiusLayout::Keyword
    } else if column(first, 26).is_none()
        && (is_blank(first, ichan) || is_right_justified_integer(first, ichan))
        && is_right_justified_integer(first, Columns::new(26, 30))
        && is_right_justified_integer(first, Columns::new(31, 35))
    {
        RadiusLayout::Alternate
    } else if is_positional(first) {
        RadiusLayout::Default
    } else {
        return Err(context.at_line(1, first).error(
            SammyErrorKind::UnrecognizedFormat,
            "radius body matches neither the keyword, default nor alternate layout",
        ));
    };

    debug!(layout = layout.as_str(), "radius layout selected");
    Ok(layout)
}

/// Particle pairs are keyword lines whenever the body carries an `=`; the
/// fixed layout never does.
pub fn particle_pair_layout(body: &[&str]) -> ParticlePairLayout {
    if body.iter().any(|line| line.contains('=')) {
        ParticlePairLayout::Keyword
    } else {
        ParticlePairLayout::Fixed
    }
}

/// Columns 21 onward hold nothing but flags and group numbers.
fn is_positional(line: &str) -> bool {
    let rest: String = line.chars().skip(20).collect();
    !rest.trim().is_empty()
        && rest
            .chars()
            .all(|cell| cell.is_ascii_digit() || cell == '-' || cell.is_whitespace())
}

/// Group-list width of an isotope card, judged from its first line.
///
/// Standard lines put the flag in 31-32 and the first group in 33-34, so a
/// listed group always ends in column 34 with a digit. Extended lines hold the
/// flag as an integer in 31-35, which leaves column 34 blank or carrying the
/// sign of a negative flag, and the first group in 36-40.
pub fn isotope_list_mode(first_line: &str) -> GroupListMode {
    if column(first_line, 34).is_some_and(|cell| cell.is_ascii_digit()) {
        GroupListMode::Standard
    } else if !is_blank(first_line, Columns::new(34, 40)) {
        GroupListMode::Extended
    } else {
        GroupListMode::Standard
    }
}

/// Data lines of header-less cards open with a number.
pub fn starts_numeric(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|cell| cell.is_ascii_digit() || matches!(cell, '.' | '-' | '+'))
}

/// A header-less chunk holding nothing but a real in columns 1-10.
pub fn is_fudge_chunk(lines: &[&str]) -> bool {
    let [line] = lines else {
        return false;
    };
    let spec = FudgeField::Fudge.spec();
    if !line.chars().skip(spec.columns.last()).all(char::is_whitespace) {
        return false;
    }
    let slice: String = line.chars().take(spec.width()).collect();
    parse_real(spec, &slice).is_ok()
}

#[cfg(test)]
mod tests {
    use super::{
        is_fudge_chunk, isotope_list_mode, particle_pair_layout, radius_layout, starts_numeric,
    };
    use crate::cards::particle_pairs::ParticlePairLayout;
    use crate::cards::radius::RadiusLayout;
    use crate::common::GroupListMode;
    use crate::domain::{CardSet, DiagnosticContext, SammyErrorKind};

    fn context() -> DiagnosticContext {
        DiagnosticContext::for_card(CardSet::Radius)
    }

    #[test]
    fn keyword_radius_is_detected_by_equals_sign() {
        let body = ["Radii= 8.4, 8.4    Flags= 1, -1", "   Group= 1   Chan= 1,"];
        assert_eq!(radius_layout(&body, &context()), Ok(RadiusLayout::Keyword));
    }

    #[test]
    fn positional_radius_layouts_differ_in_column_21() {
        let default = format!("{:>10}{:>10}011 1 2", "8.4", "8.4");
        assert_eq!(
            radius_layout(&[default.as_str()], &context()),
            Ok(RadiusLayout::Default)
        );

        let alternate = format!("{:>10}{:>10}{:>5}{:>5}{:>5}{:>5}", "8.4", "8.4", 0, 1, 1, 101);
        assert_eq!(
            radius_layout(&[alternate.as_str()], &context()),
            Ok(RadiusLayout::Alternate)
        );
    }

    #[test]
    fn blank_default_channel_mode_reads_as_zero() {
        let body = format!("{:>10}{:>10} 1-1 1 2", "8.4", "8.4");
        assert_eq!(radius_layout(&[body.as_str()], &context()), Ok(RadiusLayout::Default));

        let two_digit_groups = format!("{:>10}{:>10}    1011", "8.4", "8.4");
        assert_eq!(
            radius_layout(&[two_digit_groups.as_str()], &context()),
            Ok(RadiusLayout::Default)
        );

        let packed_groups = format!("{:>10}{:>10}    101112131415", "8.4", "8.4");
        assert_eq!(
            radius_layout(&[packed_groups.as_str()], &context()),
            Ok(RadiusLayout::Default)
        );
    }

    #[test]
    fn alternate_radius_accepts_blank_channel_mode_and_negative_flags() {
        let body = format!("{:>10}{:>10}{:>5}{:>5}{:>5}{:>5}", "8.4", "8.4", "", -1, 3, 7);
        assert_eq!(radius_layout(&[body.as_str()], &context()), Ok(RadiusLayout::Alternate));
    }

    #[test]
    fn unrecognized_radius_body_is_rejected() {
        let error = radius_layout(&["just some words here"], &context())
            .expect_err("no layout matches");
        assert_eq!(error.kind(), SammyErrorKind::UnrecognizedFormat);
        assert_eq!(error.context().raw_line(), Some("just some words here"));
    }

    #[test]
    fn isotope_mode_follows_flag_and_list_columns() {
        let standard = format!("{:>10}{:>10}{:>10} 1 1 2", "180.948", "1.", "");
        let extended = format!("{:>10}{:>10}{:>10}{:>5}{:>5}", "180.948", "1.", "", 1, 101);
        assert_eq!(isotope_list_mode(&standard), GroupListMode::Standard);
        assert_eq!(isotope_list_mode(&extended), GroupListMode::Extended);
        assert_eq!(isotope_list_mode("   180.948"), GroupListMode::Standard);
    }

    #[test]
    fn negative_wide_isotope_flags_select_the_extended_list() {
        for flag in [-1, -2] {
            let line =
                format!("{:>10}{:>10}{:>10}{:>5}{:>5}{:>5}", "180.948", "1.", "", flag, 101, 102);
            assert_eq!(isotope_list_mode(&line), GroupListMode::Extended);
        }
        let standard = format!("{:>10}{:>10}{:>10}-2 4", "180.948", "1.", "");
        assert_eq!(isotope_list_mode(&standard), GroupListMode::Standard);
    }

    #[test]
    fn particle_pair_layout_follows_equals_signs() {
        let keyword = ["Name=PPair1   Particle a=neutron   Particle b=Other"];
        let fixed = ["n+Ta181 n Ta  0 7310  0.5  3.5  1.008665   180.948"];
        assert_eq!(particle_pair_layout(&keyword), ParticlePairLayout::Keyword);
        assert_eq!(particle_pair_layout(&fixed), ParticlePairLayout::Fixed);
    }

    #[test]
    fn fudge_chunk_is_a_single_real() {
        assert!(is_fudge_chunk(&["       0.1"]));
        assert!(is_fudge_chunk(&["0.1"]));
        assert!(!is_fudge_chunk(&["       0.1", "       0.2"]));
        assert!(!is_fudge_chunk(&["         1"]));
        assert!(!is_fudge_chunk(&["      6.673        0.5"]));
    }

    #[test]
    fn numeric_lines_open_with_a_digit_sign_or_point() {
        assert!(starts_numeric("   -1.5"));
        assert!(starts_numeric(".25"));
        assert!(!starts_numeric("  transmission"));
    }
}
