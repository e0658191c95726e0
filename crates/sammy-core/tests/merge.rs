use sammy_core::cards::{
    BroadeningCard, FudgeCard, GroupChannels, IsotopeCard, IsotopeEntry, RadiusCard, RadiusEntry,
    RadiusLayout, ResonanceCard, ResonanceEntry,
};
use sammy_core::{Document, DocumentKind, MergeOptions, Param, SammyErrorKind};

fn single_isotope(mass: f64, groups: u32, fudge: f64) -> Document {
    let entries = (1..=groups)
        .map(|group| {
            ResonanceEntry::new(
                Param::varied(f64::from(group) * 1.5),
                vec![Param::fixed(0.05), Param::varied(0.002)],
                group,
            )
            .expect("entry should be valid")
        })
        .collect();
    let mut document = Document::parameter();
    document.insert(ResonanceCard::new(entries)).unwrap();
    document.insert(FudgeCard::new(fudge)).unwrap();
    document
        .insert(IsotopeCard::new(vec![IsotopeEntry::new(
            mass,
            Param::fixed(0.5),
            (1..=groups).collect(),
        )]))
        .unwrap();
    document
}

fn resonance_groups(document: &Document) -> Vec<u32> {
    document
        .get::<ResonanceCard>()
        .expect("resonance card")
        .entries
        .iter()
        .map(ResonanceEntry::group)
        .collect()
}

#[test]
fn two_three_group_files_become_groups_one_to_six() {
    let sources = [single_isotope(180.948, 3, 0.1), single_isotope(181.950, 3, 0.2)];
    let merged = Document::merge(&sources, &MergeOptions::default()).expect("merge succeeds");

    assert_eq!(resonance_groups(&merged), vec![1, 2, 3, 4, 5, 6]);
    let isotopes = merged.get::<IsotopeCard>().expect("isotope card");
    let lists: Vec<Vec<u32>> = isotopes.entries.iter().map(|entry| entry.groups.clone()).collect();
    assert_eq!(lists, vec![vec![1, 2, 3], vec![4, 5, 6]]);
    assert_eq!(merged.get::<FudgeCard>().map(|card| card.value), Some(0.1));
}

#[test]
fn merged_document_survives_a_text_round_trip() {
    let sources = [single_isotope(180.948, 3, 0.1), single_isotope(181.950, 2, 0.1)];
    let merged = Document::merge(&sources, &MergeOptions::default()).unwrap();
    let text = merged.serialize().expect("merged document renders");

    let reparsed = Document::deserialize(DocumentKind::Parameter, &text).expect("text parses");
    assert_eq!(resonance_groups(&reparsed), vec![1, 2, 3, 4, 5]);
    assert_eq!(reparsed.serialize().unwrap(), text);
}

#[test]
fn primary_only_cards_come_from_the_primary() {
    let mut first = single_isotope(180.948, 2, 0.1);
    first
        .insert(BroadeningCard::new([Param::fixed(9.5); 6]))
        .unwrap();
    let second = single_isotope(181.950, 2, 0.3);

    let merged = Document::merge(&[first.clone(), second.clone()], &MergeOptions::with_primary(1))
        .unwrap();
    assert!(merged.get::<BroadeningCard>().is_none());
    assert_eq!(merged.get::<FudgeCard>().map(|card| card.value), Some(0.3));

    let merged = Document::merge(&[first, second], &MergeOptions::with_primary(0)).unwrap();
    assert!(merged.get::<BroadeningCard>().is_some());
}

#[test]
fn radius_groups_are_shifted_with_the_rest() {
    let mut first = single_isotope(180.948, 2, 0.1);
    first
        .insert(RadiusCard::new(
            RadiusLayout::Default,
            vec![RadiusEntry::new(
                Param::fixed(8.4),
                Param::fixed(8.4),
                vec![GroupChannels::all_channels(1), GroupChannels::all_channels(2)],
            )],
        ))
        .unwrap();
    let mut second = single_isotope(181.950, 1, 0.1);
    second
        .insert(RadiusCard::new(
            RadiusLayout::Default,
            vec![RadiusEntry::new(
                Param::fixed(7.9),
                Param::fixed(7.9),
                vec![GroupChannels::all_channels(1)],
            )],
        ))
        .unwrap();

    let merged = Document::merge(&[first, second], &MergeOptions::default()).unwrap();
    let radius = merged.get::<RadiusCard>().expect("radius card");
    assert_eq!(radius.entries.len(), 2);
    assert_eq!(radius.entries[1].groups[0].group, 3);
    assert_eq!(radius.max_group(), 3);
}

#[test]
fn input_files_cannot_be_merged() {
    let sources = [single_isotope(180.948, 1, 0.1), Document::input()];
    let error = Document::merge(&sources, &MergeOptions::default()).expect_err("input source");
    assert_eq!(error.kind(), SammyErrorKind::ValidationError);
}
