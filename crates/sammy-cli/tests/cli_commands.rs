use sammy_core::cards::{
    CommandCard, ElementCard, FudgeCard, IsotopeCard, IsotopeEntry, ResonanceCard,
    ResonanceEntry, TitleCard,
};
use sammy_core::{CardSet, Document, DocumentKind, Param, SammyErrorKind};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> Output {
    let binary_path = env!("CARGO_BIN_EXE_sammy-cards");
    Command::new(binary_path)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("sammy-cards should run")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths should be UTF-8")
}

fn resonances(groups: u32) -> ResonanceCard {
    ResonanceCard::new(
        (1..=groups)
            .map(|group| {
                ResonanceEntry::new(
                    Param::varied(2.5 * f64::from(group)),
                    vec![Param::fixed(0.0566), Param::varied(0.0012)],
                    group,
                )
                .expect("resonance entry should be valid")
            })
            .collect(),
    )
}

fn single_isotope(mass: f64, groups: u32) -> Document {
    let mut document = Document::parameter();
    document.insert(resonances(groups)).expect("resonances insert");
    document.insert(FudgeCard::new(0.1)).expect("fudge insert");
    document
        .insert(IsotopeCard::new(vec![IsotopeEntry::new(
            mass,
            Param::fixed(1.0),
            (1..=groups).collect(),
        )]))
        .expect("isotopes insert");
    document
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn check_reports_populated_card_sets_as_json() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("ta181.par");
    let text = single_isotope(180.948, 3).serialize().expect("serialize");
    write_file(&file, &text);

    let output = run_cli(&["check", path_arg(&file), "--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report = stdout_json(&output);
    assert_eq!(report["kind"], "parameter");
    assert_eq!(report["canonical"], true);
    let cards = report["cards"].as_array().expect("cards array");
    let names: Vec<&str> = cards.iter().filter_map(|card| card["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            CardSet::Resonances.as_str(),
            CardSet::Fudge.as_str(),
            CardSet::Isotopes.as_str()
        ]
    );
    assert_eq!(cards[0]["lines"], 3);
    assert_eq!(cards[1]["lines"], 1);
}

#[test]
fn check_lists_unrecognized_commands_of_input_files() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("run.inp");
    let mut document = Document::input();
    document.insert(TitleCard::new("Ta-181 transmission")).expect("title");
    document
        .insert(ElementCard::new("Ta181", 180.948, 1.0, 100.0))
        .expect("element");
    document
        .insert(CommandCard::new(["XCT", "FLY ME TO THE MOON"]))
        .expect("commands");
    write_file(&file, &document.serialize().expect("serialize"));

    let output = run_cli(&["check", path_arg(&file)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("input file, 3 card set(s)"), "stdout: {stdout}");
    assert!(stdout.contains("unrecognized command: FLY ME TO THE MOON"));

    let output = run_cli(&["check", path_arg(&file), "--json"]);
    let report = stdout_json(&output);
    assert_eq!(report["unrecognizedCommands"][0], "FLY ME TO THE MOON");
}

#[test]
fn format_reorders_cards_when_canonical_is_requested() {
    let temp = TempDir::new().expect("tempdir should be created");
    let mut fudge_only = Document::parameter();
    fudge_only.insert(FudgeCard::new(0.1)).expect("fudge insert");
    let mut resonance_only = Document::parameter();
    resonance_only.insert(resonances(2)).expect("resonances insert");

    let out_of_order = format!(
        "{}{}",
        fudge_only.serialize().expect("serialize"),
        resonance_only.serialize().expect("serialize")
    );
    let input = temp.path().join("swapped.par");
    write_file(&input, &out_of_order);

    let kept = temp.path().join("kept.par");
    let output = run_cli(&["format", path_arg(&input), "--output", path_arg(&kept)]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fs::read_to_string(&kept).expect("kept output"), out_of_order);

    let canonical = temp.path().join("out/canonical.par");
    let output = run_cli(&[
        "format",
        path_arg(&input),
        "--canonical",
        "--output",
        path_arg(&canonical),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let mut expected = Document::parameter();
    expected.insert(FudgeCard::new(0.1)).expect("fudge insert");
    expected.insert(resonances(2)).expect("resonances insert");
    assert_eq!(
        fs::read_to_string(&canonical).expect("canonical output"),
        expected.serialize().expect("serialize")
    );
}

#[test]
fn format_without_output_writes_to_stdout() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("ta181.par");
    let text = single_isotope(180.948, 2).serialize().expect("serialize");
    write_file(&file, &text);

    let output = run_cli(&["format", path_arg(&file)]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), text);
}

#[test]
fn merge_renumbers_groups_of_later_files() {
    let temp = TempDir::new().expect("tempdir should be created");
    let first = temp.path().join("ta181.par");
    let second = temp.path().join("ta182.par");
    write_file(&first, &single_isotope(180.948, 3).serialize().expect("serialize"));
    write_file(&second, &single_isotope(181.950, 3).serialize().expect("serialize"));
    let merged_path = temp.path().join("merged.par");

    let output = run_cli(&[
        "merge",
        path_arg(&first),
        path_arg(&second),
        "--primary",
        "1",
        "--output",
        path_arg(&merged_path),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(&merged_path).expect("merged output");
    let merged = Document::deserialize(DocumentKind::Parameter, &text).expect("merged parses");
    let groups: Vec<u32> = merged
        .get::<ResonanceCard>()
        .expect("resonances")
        .entries
        .iter()
        .map(ResonanceEntry::group)
        .collect();
    assert_eq!(groups, vec![1, 2, 3, 4, 5, 6]);

    let isotopes = merged.get::<IsotopeCard>().expect("isotopes");
    assert_eq!(isotopes.entries.len(), 2);
    assert_eq!(isotopes.entries[1].groups, vec![4, 5, 6]);
}

#[test]
fn merge_rejects_primary_past_the_file_list() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("ta181.par");
    write_file(&file, &single_isotope(180.948, 1).serialize().expect("serialize"));

    let output = run_cli(&["merge", path_arg(&file), "--primary", "4"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ERROR: [Usage]"));
}

#[test]
fn malformed_file_exits_with_codec_diagnostic() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("broken.par");
    write_file(&file, "WHATEVER this is\n");

    let output = run_cli(&["check", path_arg(&file)]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.starts_with(&format!("ERROR: [{}]", SammyErrorKind::UnknownCardSet.as_str())),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("WHATEVER this is"));
}

#[test]
fn line_ceiling_comes_from_options_file() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("ta181.par");
    write_file(&file, &single_isotope(180.948, 3).serialize().expect("serialize"));
    let options = temp.path().join("options.json");
    write_file(&options, r#"{ "maxLines": 2 }"#);

    let output = run_cli(&["check", path_arg(&file), "--options", path_arg(&options)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ERROR: [TooLarge]"));
}

#[test]
fn missing_file_is_an_io_failure() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("absent.par");

    let output = run_cli(&["check", path_arg(&file)]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("ERROR: [Io]"));
}

#[test]
fn unknown_extension_needs_an_explicit_kind() {
    let temp = TempDir::new().expect("tempdir should be created");
    let file = temp.path().join("ta181.txt");
    write_file(&file, &single_isotope(180.948, 1).serialize().expect("serialize"));

    let output = run_cli(&["check", path_arg(&file)]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_cli(&["check", path_arg(&file), "--kind", "parameter"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn lookup_resolves_phrases_and_aliases() {
    let output = run_cli(&["lookup", "xct"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("REICH-MOORE FORMALISm is wanted"), "stdout: {stdout}");

    let output = run_cli(&["lookup", "--json", "multilevel", "breitwigner", "is", "wanted"]);
    assert!(output.status.success());
    let command = stdout_json(&output);
    assert_eq!(command["phrase"], "MULTILEVEL BREITWIGner is wanted");
    assert_eq!(command["category"], "r-matrix");
    assert_eq!(command["exclusive"], "formalism");

    let output = run_cli(&["lookup", "FLY", "ME", "TO", "THE", "MOON"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_exits_cleanly() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("merge"));
}
