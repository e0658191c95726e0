//! Combine single-isotope parameter files into one compound file.

use super::Document;
use crate::cards::external_r::ExternalRField;
use crate::cards::particle_pairs::NAME_WIDTH;
use crate::cards::spin_groups::SpinGroupField;
use crate::cards::{
    DetectorEfficiencyCard, ExternalRCard, ExternalRLayout, IsotopeCard, IsotopeHeader,
    MiscCard, ParticlePair, ParticlePairCard, RadiusCard, RadiusLayout, ResonanceCard,
    SpinGroupCard,
};
use crate::common::MergeOptions;
use crate::common::constants::{NARROW_GROUP_LIMIT, WIDE_GROUP_LIMIT};
use crate::domain::{CardSet, DocumentKind, SammyError, SammyResult};
use crate::field::CardField;
use tracing::{debug, info};

/// Card sets combined from every source; the rest come from the primary.
const RENUMBERED: [CardSet; 6] = [
    CardSet::ParticlePairs,
    CardSet::SpinGroups,
    CardSet::Resonances,
    CardSet::ExternalR,
    CardSet::Radius,
    CardSet::Isotopes,
];

/// Largest group a source uses in any renumbered card.
fn max_group(document: &Document) -> u32 {
    [
        document.get::<SpinGroupCard>().map(SpinGroupCard::max_group),
        document.get::<ResonanceCard>().map(ResonanceCard::max_group),
        document.get::<ExternalRCard>().map(ExternalRCard::max_group),
        document.get::<RadiusCard>().map(RadiusCard::max_group),
        document.get::<IsotopeCard>().map(IsotopeCard::max_group),
    ]
    .into_iter()
    .flatten()
    .max()
    .unwrap_or(0)
}

fn shift(group: u32, offset: u32, limit: u32, card: CardSet) -> SammyResult<u32> {
    group
        .checked_add(offset)
        .filter(|shifted| *shifted <= limit)
        .ok_or_else(|| {
            SammyError::out_of_range(format!(
                "{card} group {group} shifted by {offset} exceeds the column limit {limit}"
            ))
        })
}

/// `PPair1` from source 2 becomes `PPair1_2`, cut to fit the name column.
fn renamed(name: &str, source: usize) -> String {
    let suffix = format!("_{}", source + 1);
    let stem: String = name
        .chars()
        .take(NAME_WIDTH.saturating_sub(suffix.len()))
        .collect();
    format!("{stem}{suffix}")
}

fn apply_renames(name: &mut String, renames: &[(String, String)]) {
    if let Some((_, new)) = renames.iter().find(|(old, _)| old == name) {
        name.clone_from(new);
    }
}

/// Add the pairs of source `index` to `target`, returning the names that had
/// to change because another source defines a different pair under them.
fn merge_particle_pairs(
    target: &mut ParticlePairCard,
    card: &ParticlePairCard,
    index: usize,
) -> SammyResult<Vec<(String, String)>> {
    if target.layout != card.layout {
        return Err(SammyError::validation(format!(
            "source {index} writes particle pairs in the {} layout, earlier sources use {}",
            card.layout.as_str(),
            target.layout.as_str()
        )));
    }

    let mut renames = Vec::new();
    for pair in &card.pairs {
        match target.find(&pair.name) {
            Some(existing) if existing == pair => {}
            Some(_) => {
                let name = renamed(&pair.name, index);
                if target.find(&name).is_some() {
                    return Err(SammyError::validation(format!(
                        "particle pair {} of source {index} clashes with an earlier pair \
                         and {name} is taken as well",
                        pair.name
                    )));
                }
                debug!(source = index, from = %pair.name, to = %name, "particle pair renamed");
                renames.push((pair.name.clone(), name.clone()));
                target.pairs.push(ParticlePair {
                    name,
                    ..pair.clone()
                });
            }
            None => target.pairs.push(pair.clone()),
        }
    }
    Ok(renames)
}

fn width_limit(width: usize) -> u32 {
    u32::try_from(width)
        .ok()
        .and_then(|width| 10_u32.checked_pow(width))
        .map_or(u32::MAX, |power| power - 1)
}

impl Document {
    /// Merge parameter documents, keeping spin-group numbers unique.
    ///
    /// Groups of source `k` are shifted by the sum of the largest group
    /// numbers of the sources before it. Particle pairs, spin groups and the
    /// resonance, external R, radius and isotope entries are concatenated;
    /// every other card comes from the primary source only. A particle pair
    /// whose name another source already uses for a different pair is
    /// renamed, along with the channels that refer to it.
    pub fn merge(sources: &[Document], options: &MergeOptions) -> SammyResult<Document> {
        let Some(primary) = sources.get(options.primary) else {
            return Err(SammyError::validation(format!(
                "primary source {} does not exist among {} sources",
                options.primary,
                sources.len()
            )));
        };
        if let Some(index) = sources
            .iter()
            .position(|source| source.kind() != DocumentKind::Parameter)
        {
            return Err(SammyError::validation(format!(
                "source {index} is an input file; only parameter files can be merged"
            )));
        }

        let offsets: Vec<u32> = sources
            .iter()
            .scan(0_u32, |total, source| {
                let offset = *total;
                *total = total.saturating_add(max_group(source));
                Some(offset)
            })
            .collect();
        let primary_offset = offsets[options.primary];
        check_fixed_references(primary, primary_offset)?;

        let mut merged = Document::parameter();
        let mut pairs: Option<ParticlePairCard> = None;
        let mut spin_groups: Option<SpinGroupCard> = None;
        let mut resonances: Option<ResonanceCard> = None;
        let mut external: Option<ExternalRCard> = None;
        let mut radius: Option<RadiusCard> = None;
        let mut isotopes: Option<IsotopeCard> = None;

        for (index, (source, offset)) in sources.iter().zip(offsets.iter().copied()).enumerate() {
            debug!(source = index, offset, "renumbering source");

            let renames = match source.get::<ParticlePairCard>() {
                Some(card) => {
                    let target = pairs
                        .get_or_insert_with(|| ParticlePairCard::new(card.layout, Vec::new()));
                    merge_particle_pairs(target, card, index)?
                }
                None => Vec::new(),
            };

            if let Some(card) = source.get::<SpinGroupCard>() {
                let target = spin_groups.get_or_insert_with(SpinGroupCard::default);
                let limit = width_limit(SpinGroupField::Group.spec().width());
                for group in &card.groups {
                    let mut group = group.clone();
                    group.number = shift(group.number, offset, limit, CardSet::SpinGroups)?;
                    for channel in &mut group.channels {
                        apply_renames(&mut channel.particle_pair, &renames);
                    }
                    target.groups.push(group);
                }
            }

            if let Some(card) = source.get::<ResonanceCard>() {
                let target = resonances.get_or_insert_with(ResonanceCard::default);
                for entry in &card.entries {
                    let mut entry = entry.clone();
                    entry.set_group(shift(
                        entry.group(),
                        offset,
                        NARROW_GROUP_LIMIT,
                        CardSet::Resonances,
                    )?)?;
                    target.entries.push(entry);
                }
            }

            if let Some(card) = source.get::<ExternalRCard>() {
                let target = external
                    .get_or_insert_with(|| ExternalRCard::new(card.layout, Vec::new()));
                if target.layout != card.layout {
                    return Err(SammyError::validation(format!(
                        "source {index} uses a different external R layout than the sources before it"
                    )));
                }
                let field = match card.layout {
                    ExternalRLayout::Standard => ExternalRField::Group,
                    ExternalRLayout::Alternate => ExternalRField::CompactGroup,
                };
                let limit = width_limit(field.spec().width());
                for entry in &card.entries {
                    let mut entry = entry.clone();
                    entry.group = shift(entry.group, offset, limit, CardSet::ExternalR)?;
                    target.entries.push(entry);
                }
            }

            if let Some(card) = source.get::<RadiusCard>() {
                let target = radius.get_or_insert_with(RadiusCard::default);
                target.layout = wider_radius_layout(target.layout, card.layout);
                for entry in &card.entries {
                    let mut entry = entry.clone();
                    for group in &mut entry.groups {
                        group.group = shift(group.group, offset, u32::MAX, CardSet::Radius)?;
                    }
                    if let Some(name) = &mut entry.particle_pair {
                        apply_renames(name, &renames);
                    }
                    target.entries.push(entry);
                }
            }

            if let Some(card) = source.get::<IsotopeCard>() {
                let target = isotopes.get_or_insert_with(IsotopeCard::default);
                for entry in &card.entries {
                    let mut entry = entry.clone();
                    for group in &mut entry.groups {
                        *group = shift(*group, offset, WIDE_GROUP_LIMIT, CardSet::Isotopes)?;
                    }
                    target.entries.push(entry);
                }
            }
        }

        if let Some(card) = &radius {
            let limit = match card.layout {
                RadiusLayout::Default => NARROW_GROUP_LIMIT,
                RadiusLayout::Alternate => WIDE_GROUP_LIMIT,
                RadiusLayout::Keyword => u32::MAX,
            };
            if card.max_group() > limit {
                return Err(SammyError::out_of_range(format!(
                    "merged radius group {} does not fit the {} radius layout",
                    card.max_group(),
                    card.layout.as_str()
                )));
            }
        }
        if let Some(card) = &mut isotopes {
            card.header = primary
                .get::<IsotopeCard>()
                .map_or(IsotopeHeader::default(), |primary| primary.header);
            card.list_mode = card.header.forced_list_mode();
        }
        if let Some(card) = &mut spin_groups {
            card.header = primary
                .get::<SpinGroupCard>()
                .map_or(card.header, |primary| primary.header);
        }
        if let Some(card) = &mut resonances {
            card.headed = primary.get::<ResonanceCard>().is_some_and(|primary| primary.headed);
        }
        if let Some(card) = &mut radius {
            card.keyword_header = primary
                .get::<RadiusCard>()
                .map_or(card.keyword_header, |primary| primary.keyword_header);
        }

        let isotope_count = isotopes.as_ref().map_or(0, |card| card.entries.len());
        let resonance_count = resonances.as_ref().map_or(0, |card| card.entries.len());
        if let Some(card) = pairs {
            merged.insert(card)?;
        }
        if let Some(card) = spin_groups {
            merged.insert(card)?;
        }
        if let Some(card) = resonances {
            merged.insert(card)?;
        }
        if let Some(card) = external {
            merged.insert(card)?;
        }
        if let Some(card) = radius {
            merged.insert(card)?;
        }
        if let Some(card) = isotopes {
            merged.insert(card)?;
        }
        for card in primary.cards() {
            if !RENUMBERED.contains(&card.card_set()) {
                merged.insert(card.clone())?;
            }
        }
        merged.check_particle_pair_names()?;

        info!(
            sources = sources.len(),
            primary = options.primary,
            resonances = resonance_count,
            isotopes = isotope_count,
            max_group = max_group(&merged),
            "parameter files merged"
        );
        Ok(merged)
    }
}

/// Keyword radii can hold anything; five-column lists beat two-column ones.
fn wider_radius_layout(current: RadiusLayout, next: RadiusLayout) -> RadiusLayout {
    match (current, next) {
        (RadiusLayout::Keyword, _) | (_, RadiusLayout::Keyword) => RadiusLayout::Keyword,
        (RadiusLayout::Alternate, _) | (_, RadiusLayout::Alternate) => RadiusLayout::Alternate,
        _ => RadiusLayout::Default,
    }
}

/// Group numbers the primary pins outside the renumbered cards.
fn check_fixed_references(primary: &Document, offset: u32) -> SammyResult<()> {
    if offset == 0 {
        return Ok(());
    }
    let gamma = primary
        .get::<MiscCard>()
        .and_then(|card| card.gamma_groups().next());
    let detector = primary
        .get::<DetectorEfficiencyCard>()
        .and_then(|card| card.groups().next());

    if let Some(group) = gamma.or(detector) {
        let card = if gamma.is_some() {
            CardSet::Miscellaneous
        } else {
            CardSet::DetectorEfficiency
        };
        return Err(SammyError::validation(format!(
            "the primary's {card} card refers to spin group {group}, which the merge would shift by {offset}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{width_limit, wider_radius_layout};
    use crate::cards::{
        FudgeCard, IsotopeCard, IsotopeEntry, MiscCard, MiscLine, ResonanceCard, ResonanceEntry,
    };
    use crate::common::MergeOptions;
    use crate::cards::RadiusLayout;
    use crate::document::Document;
    use crate::domain::{CardSet, Param, SammyErrorKind};

    fn single_isotope(mass: f64, groups: u32, fudge: f64) -> Document {
        let entries = (1..=groups)
            .map(|group| {
                let energy = Param::varied(f64::from(group));
                ResonanceEntry::new(energy, vec![Param::fixed(0.05)], group).unwrap()
            })
            .collect();
        let mut document = Document::parameter();
        document.insert(ResonanceCard::new(entries)).unwrap();
        document.insert(FudgeCard::new(fudge)).unwrap();
        document
            .insert(IsotopeCard::new(vec![IsotopeEntry::new(
                mass,
                Param::fixed(1.0),
                (1..=groups).collect(),
            )]))
            .unwrap();
        document
    }

    #[test]
    fn later_sources_are_shifted_past_earlier_groups() {
        let sources = [single_isotope(180.948, 3, 0.1), single_isotope(181.95, 2, 0.2)];
        let merged = Document::merge(&sources, &MergeOptions::with_primary(1)).unwrap();

        let groups: Vec<u32> = merged
            .get::<ResonanceCard>()
            .unwrap()
            .entries
            .iter()
            .map(ResonanceEntry::group)
            .collect();
        assert_eq!(groups, vec![1, 2, 3, 4, 5]);
        let isotopes = merged.get::<IsotopeCard>().unwrap();
        assert_eq!(isotopes.entries[1].groups, vec![4, 5]);
        assert_eq!(merged.get::<FudgeCard>().map(|card| card.value), Some(0.2));
        assert!(merged.is_canonical());
    }

    #[test]
    fn shifted_primary_with_gamma_reference_is_rejected() {
        let mut primary = single_isotope(181.95, 2, 0.2);
        primary
            .insert(MiscCard {
                lines: vec![MiscLine::gamma(1, Param::fixed(0.06), None)],
            })
            .unwrap();
        let sources = [single_isotope(180.948, 3, 0.1), primary];

        let error = Document::merge(&sources, &MergeOptions::with_primary(1))
            .expect_err("gamma group would move");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);

        let merged = Document::merge(&[sources[1].clone()], &MergeOptions::default()).unwrap();
        assert!(merged.contains(CardSet::Miscellaneous));
    }

    #[test]
    fn groups_past_two_columns_fail_for_resonances() {
        let sources = [single_isotope(180.948, 60, 0.1), single_isotope(181.95, 60, 0.1)];
        let error = Document::merge(&sources, &MergeOptions::default())
            .expect_err("group 120 does not fit columns 66-67");
        assert_eq!(error.kind(), SammyErrorKind::OutOfRange);
    }

    #[test]
    fn missing_primary_is_a_validation_error() {
        let error = Document::merge(&[], &MergeOptions::default()).expect_err("no sources");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
    }

    #[test]
    fn helpers_pick_limits_and_layouts() {
        assert_eq!(width_limit(2), 99);
        assert_eq!(width_limit(3), 999);
        assert_eq!(
            wider_radius_layout(RadiusLayout::Default, RadiusLayout::Alternate),
            RadiusLayout::Alternate
        );
        assert_eq!(
            wider_radius_layout(RadiusLayout::Keyword, RadiusLayout::Default),
            RadiusLayout::Keyword
        );
    }
}
