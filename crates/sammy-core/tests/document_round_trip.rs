use sammy_core::cards::{FudgeCard, ResonanceCard, ResonanceEntry};
use sammy_core::{CardSet, Document, DocumentKind, Param, SammyErrorKind, VaryFlag};

fn resonance_line(energy: &str, capture: &str, width: &str, flags: [i64; 3], group: u32) -> String {
    format!(
        "{energy:>11}{capture:>11}{width:>11}{:22}{:>2}{:>2}{:>2}{:4}{group:>2}",
        "", flags[0], flags[1], flags[2], ""
    )
}

fn three_resonances_and_fudge() -> String {
    let lines = [
        resonance_line("-2.07", "0.0566", "0.00123", [1, 0, 1], 1),
        resonance_line("4.28", "0.0566", "0.0045", [1, 0, 0], 1),
        resonance_line("10.36", "0.0571", "0.00035", [0, 0, 1], 2),
        String::new(),
        format!("{:>10}", "0.1"),
        String::new(),
    ];
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

#[test]
fn resonances_and_fudge_are_reproduced_exactly() {
    let text = three_resonances_and_fudge();
    let document = Document::deserialize(DocumentKind::Parameter, &text).expect("file parses");

    assert_eq!(document.len(), 2);
    assert_eq!(document.card_sets(), vec![CardSet::Resonances, CardSet::Fudge]);
    assert_eq!(document.serialize().expect("document renders"), text);
}

#[test]
fn parsed_values_keep_their_vary_flags() {
    let document =
        Document::deserialize(DocumentKind::Parameter, &three_resonances_and_fudge()).unwrap();
    let resonances = document.get::<ResonanceCard>().expect("resonance card");

    assert_eq!(resonances.entries.len(), 3);
    let first = &resonances.entries[0];
    assert_eq!(first.energy(), Param::varied(-2.07));
    assert_eq!(first.widths()[0].vary, VaryFlag::Fixed);
    assert_eq!(first.widths()[1], Param::varied(0.00123));
    assert_eq!(resonances.entries[2].group(), 2);
    assert_eq!(document.get::<FudgeCard>().map(|card| card.value), Some(0.1));
}

#[test]
fn edits_through_the_model_reach_the_text() {
    let mut document =
        Document::deserialize(DocumentKind::Parameter, &three_resonances_and_fudge()).unwrap();
    document.get_mut::<FudgeCard>().expect("fudge card").value = 0.25;
    document
        .get_mut::<ResonanceCard>()
        .expect("resonance card")
        .entries
        .push(ResonanceEntry::new(Param::fixed(21.5), vec![Param::fixed(0.06)], 3).unwrap());

    let text = document.serialize().unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    assert!(lines[3].starts_with("       21.5"));
    assert_eq!(lines[5], "      0.25");
}

#[test]
fn second_resonance_chunk_is_unknown() {
    let mut text = three_resonances_and_fudge();
    text.push_str(&resonance_line("30.1", "0.06", "0.1", [0, 0, 0], 1));
    text.push('\n');

    let error = Document::deserialize(DocumentKind::Parameter, &text)
        .expect_err("both header-less slots are taken");
    assert_eq!(error.kind(), SammyErrorKind::UnknownCardSet);
    assert_eq!(error.context().document_line(), Some(7));
}

#[test]
fn overlong_lines_are_malformed() {
    let mut line = resonance_line("-2.07", "0.0566", "0.00123", [1, 0, 1], 1);
    line.push_str(&" ".repeat(13));
    line.push('9');
    let error = Document::deserialize(DocumentKind::Parameter, &format!("{line}\n"))
        .expect_err("line runs past column 80");
    assert_eq!(error.kind(), SammyErrorKind::MalformedField);
}
