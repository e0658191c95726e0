//! Whole parameter and input files as ordered collections of card slots.

mod merge;

use crate::cards::{CardInstance, CardModel, IsotopeCard, ParticlePairCard, SpinGroupCard};
use crate::common::CodecOptions;
use crate::dispatch::FormatDispatcher;
use crate::domain::{
    CardSet, DiagnosticContext, DocumentKind, ParseResult, RenderResult, SammyError,
    SammyErrorKind, SammyResult,
};
use serde::Serialize;
use tracing::debug;

/// Cards sharing the leading chunk of an input file.
const PREAMBLE: [CardSet; 3] = [CardSet::Title, CardSet::Element, CardSet::Commands];

/// One SAMMY file: at most one card per card set.
///
/// Cards are kept in the order they were inserted or read. [`Document::insert`]
/// places new cards at their canonical position, while
/// [`Document::deserialize`] keeps the file order so that a round trip never
/// reorders a file behind the caller's back.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    kind: DocumentKind,
    cards: Vec<CardInstance>,
}

impl Document {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            cards: Vec::new(),
        }
    }

    pub fn parameter() -> Self {
        Self::new(DocumentKind::Parameter)
    }

    pub fn input() -> Self {
        Self::new(DocumentKind::Input)
    }

    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    pub fn card_sets(&self) -> Vec<CardSet> {
        self.cards.iter().map(CardInstance::card_set).collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card_set: CardSet) -> bool {
        self.position(card_set).is_some()
    }

    fn position(&self, card_set: CardSet) -> Option<usize> {
        self.cards
            .iter()
            .position(|card| card.card_set() == card_set)
    }

    pub fn get<T: CardModel>(&self) -> Option<&T> {
        self.cards.iter().find_map(T::from_instance)
    }

    /// Mutable access to a card; rules are checked again on serialize.
    pub fn get_mut<T: CardModel>(&mut self) -> Option<&mut T> {
        self.cards.iter_mut().find_map(T::from_instance_mut)
    }

    pub fn instance(&self, card_set: CardSet) -> Option<&CardInstance> {
        self.cards.iter().find(|card| card.card_set() == card_set)
    }

    /// Validate `card` and store it, replacing any card of the same set.
    ///
    /// A new card goes to its canonical position relative to the cards
    /// already present; a replacement keeps the old card's position.
    pub fn insert(&mut self, card: impl Into<CardInstance>) -> SammyResult<Option<CardInstance>> {
        let card = card.into();
        let card_set = card.card_set();
        if !self.kind.allows(card_set) {
            return Err(SammyError::validation(format!(
                "card set {} ({card_set}) does not belong in a {} file",
                card_set.number(),
                self.kind
            )));
        }
        card.validate()
            .map_err(|error| error.with_context(DiagnosticContext::for_card(card_set)))?;

        if let Some(index) = self.position(card_set) {
            return Ok(Some(std::mem::replace(&mut self.cards[index], card)));
        }
        let rank = self.kind.canonical_position(card_set);
        let index = self
            .cards
            .iter()
            .position(|existing| self.kind.canonical_position(existing.card_set()) > rank)
            .unwrap_or(self.cards.len());
        self.cards.insert(index, card);
        Ok(None)
    }

    pub fn remove(&mut self, card_set: CardSet) -> Option<CardInstance> {
        self.position(card_set).map(|index| self.cards.remove(index))
    }

    pub fn is_canonical(&self) -> bool {
        self.cards.windows(2).all(|pair| {
            self.kind.canonical_position(pair[0].card_set())
                < self.kind.canonical_position(pair[1].card_set())
        })
    }

    /// Reorder the cards into canonical card-set order.
    pub fn canonicalize(&mut self) {
        let kind = self.kind;
        self.cards
            .sort_by_key(|card| kind.canonical_position(card.card_set()));
    }

    pub fn deserialize(kind: DocumentKind, text: &str) -> ParseResult<Self> {
        Self::deserialize_with(kind, text, &CodecOptions::default())
    }

    /// Parse a whole file; any failure discards everything read so far.
    pub fn deserialize_with(
        kind: DocumentKind,
        text: &str,
        options: &CodecOptions,
    ) -> ParseResult<Self> {
        let mut document = Self::new(kind);
        for parsed in FormatDispatcher::new(kind, options).dispatch(text)? {
            let card_set = parsed.card.card_set();
            match document.position(card_set) {
                Some(index) if card_set.is_repeatable() => {
                    document.cards[index].extend(parsed.card)?;
                }
                Some(_) => {
                    return Err(parsed.context.error(
                        SammyErrorKind::DuplicateCardSet,
                        format!(
                            "card set {} ({card_set}) appears more than once",
                            card_set.number()
                        ),
                    ));
                }
                None => document.cards.push(parsed.card),
            }
        }

        debug!(
            kind = %kind,
            cards = document.cards.len(),
            canonical = document.is_canonical(),
            "document parsed"
        );
        Ok(document)
    }

    pub fn serialize(&self) -> RenderResult<String> {
        self.serialize_with(&CodecOptions::default())
    }

    /// Render every card with its header and terminator.
    pub fn serialize_with(&self, options: &CodecOptions) -> RenderResult<String> {
        self.validate()?;
        let mut output: Vec<String> = Vec::new();

        for (index, card) in self.cards.iter().enumerate() {
            let card_set = card.card_set();
            if let Some(header) = card.header() {
                output.push(header.to_string());
            }
            let context = DiagnosticContext::for_card_at(card_set, output.len() + 1);
            let body = render_with(card, options, &context)
                .map_err(|error| attach_card(error, &context))?;
            output.extend(body);

            let next = self.cards.get(index + 1).map(CardInstance::card_set);
            if terminates(self.kind, card_set, next) {
                output.push(String::new());
            }
        }

        let mut text = output.join("\n");
        if !output.is_empty() {
            text.push('\n');
        }
        Ok(text)
    }

    /// Check every card plus the rules tying cards of one file together.
    pub fn validate(&self) -> SammyResult<()> {
        for card in &self.cards {
            let context = DiagnosticContext::for_card(card.card_set());
            card.validate().map_err(|error| attach_card(error, &context))?;
        }
        self.check_particle_pair_names()?;

        if self.kind == DocumentKind::Input && !self.cards.is_empty() {
            // The leading chunk is read positionally, so no member may be skipped.
            for (position, member) in PREAMBLE.iter().enumerate().skip(1) {
                if self.contains(*member) && !self.contains(PREAMBLE[position - 1]) {
                    return Err(SammyError::validation(format!(
                        "input files need the {} card before the {member} card",
                        PREAMBLE[position - 1]
                    )));
                }
            }
            if !self.contains(CardSet::Title) {
                return Err(SammyError::validation("input files start with a title card"));
            }
            let leading: Vec<CardSet> = self
                .card_sets()
                .into_iter()
                .take_while(|card_set| PREAMBLE.contains(card_set))
                .collect();
            if self.cards.iter().any(|card| {
                PREAMBLE.contains(&card.card_set()) && !leading.contains(&card.card_set())
            }) {
                return Err(SammyError::validation(
                    "title, element and command cards must lead the input file",
                ));
            }
        }
        Ok(())
    }

    /// Channels must name a defined pair once the file defines any.
    fn check_particle_pair_names(&self) -> SammyResult<()> {
        let pairs = self.get::<ParticlePairCard>();
        let (Some(pairs), Some(groups)) = (pairs, self.get::<SpinGroupCard>()) else {
            return Ok(());
        };
        for group in &groups.groups {
            if let Some(channel) = group
                .channels
                .iter()
                .find(|channel| pairs.find(&channel.particle_pair).is_none())
            {
                return Err(SammyError::validation(format!(
                    "channel {} of spin group {} uses particle pair '{}', which is not defined",
                    channel.number, group.number, channel.particle_pair
                ))
                .with_context(DiagnosticContext::for_card(CardSet::SpinGroups)));
            }
        }
        Ok(())
    }

    /// Populated card sets and the number of body lines each renders to.
    pub fn summary(&self) -> RenderResult<DocumentSummary> {
        let cards = self
            .cards
            .iter()
            .map(|card| {
                let card_set = card.card_set();
                let context = DiagnosticContext::for_card(card_set);
                let lines = card.render(&context).map_err(|error| attach_card(error, &context))?;
                Ok(CardSummary {
                    number: card_set.number(),
                    name: card_set.as_str(),
                    header: card.header(),
                    lines: lines.len(),
                })
            })
            .collect::<RenderResult<Vec<_>>>()?;

        Ok(DocumentSummary {
            kind: self.kind.as_str(),
            canonical: self.is_canonical(),
            cards,
        })
    }
}

/// Cards without their own terminator share one with the next preamble member.
fn terminates(kind: DocumentKind, card_set: CardSet, next: Option<CardSet>) -> bool {
    if card_set.has_terminator() {
        return true;
    }
    !(kind == DocumentKind::Input && next.is_some_and(|next| PREAMBLE.contains(&next)))
}

/// Render `card`, applying the codec-wide isotope list width where the card
/// leaves it open.
fn render_with(
    card: &CardInstance,
    options: &CodecOptions,
    context: &DiagnosticContext,
) -> RenderResult<Vec<String>> {
    match IsotopeCard::from_instance(card) {
        Some(isotopes) if isotopes.list_mode.is_none() => {
            let mut resolved = isotopes.clone();
            resolved.list_mode = Some(options.isotope_list_mode);
            resolved.render(context)
        }
        _ => card.render(context),
    }
}

/// Give card-level context to errors raised before a line was known.
fn attach_card(error: SammyError, context: &DiagnosticContext) -> SammyError {
    if error.context().card_set().is_some() {
        error
    } else {
        let context = context.clone();
        error.with_context(context)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    pub number: u8,
    pub name: &'static str,
    pub header: Option<&'static str>,
    pub lines: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub kind: &'static str,
    pub canonical: bool,
    pub cards: Vec<CardSummary>,
}

#[cfg(test)]
mod tests {
    use super::Document;
    use crate::cards::{
        BroadeningCard, CommandCard, ElementCard, FudgeCard, IsotopeCard, IsotopeEntry,
        ResonanceCard, ResonanceEntry, TitleCard,
    };
    use crate::common::{CodecOptions, GroupListMode};
    use crate::domain::{CardSet, DocumentKind, Param, SammyErrorKind};

    fn resonances() -> ResonanceCard {
        ResonanceCard::new(vec![
            ResonanceEntry::new(Param::varied(-10.0), vec![Param::fixed(0.06)], 1).unwrap(),
        ])
    }

    #[test]
    fn insert_places_cards_in_canonical_order() {
        let mut document = Document::parameter();
        document.insert(FudgeCard::new(0.1)).unwrap();
        document.insert(resonances()).unwrap();
        assert_eq!(
            document.card_sets(),
            vec![CardSet::Resonances, CardSet::Fudge]
        );
        assert!(document.is_canonical());

        let replaced = document.insert(FudgeCard::new(0.2)).unwrap();
        assert!(replaced.is_some());
        assert_eq!(document.get::<FudgeCard>().map(|card| card.value), Some(0.2));
    }

    #[test]
    fn insert_rejects_cards_of_the_other_file_kind() {
        let mut document = Document::input();
        let error = document
            .insert(FudgeCard::new(0.1))
            .expect_err("fudge is a parameter-file card");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
    }

    #[test]
    fn serialize_terminates_each_card_with_one_blank_line() {
        let mut document = Document::parameter();
        document.insert(resonances()).unwrap();
        document.insert(FudgeCard::new(0.1)).unwrap();
        let text = document.serialize().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "       0.1");
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn duplicate_card_sets_are_rejected() {
        let mut document = Document::parameter();
        document
            .insert(BroadeningCard::new([Param::fixed(300.0); 6]))
            .unwrap();
        let broadening = document.serialize().unwrap();
        let text = format!("{broadening}{broadening}");
        let error = Document::deserialize(DocumentKind::Parameter, &text)
            .expect_err("second broadening card");
        assert_eq!(error.kind(), SammyErrorKind::DuplicateCardSet);
    }

    #[test]
    fn out_of_order_cards_are_kept_in_file_order() {
        let mut document = Document::parameter();
        document
            .insert(BroadeningCard::new([Param::fixed(0.0); 6]))
            .unwrap();
        let broadening = document.serialize().unwrap();
        let text = format!("{broadening}       0.1\n\n");

        let mut parsed = Document::deserialize(DocumentKind::Parameter, &text).unwrap();
        assert_eq!(parsed.card_sets(), vec![CardSet::Broadening, CardSet::Fudge]);
        assert!(!parsed.is_canonical());
        assert_eq!(parsed.serialize().unwrap(), text);

        parsed.canonicalize();
        assert_eq!(parsed.card_sets(), vec![CardSet::Fudge, CardSet::Broadening]);
    }

    #[test]
    fn input_preamble_shares_one_terminator() {
        let mut document = Document::input();
        document.insert(TitleCard::new("Ta-181 transmission")).unwrap();
        document
            .insert(ElementCard::new("Ta181", 180.948, 1.0, 100.0))
            .unwrap();
        document
            .insert(CommandCard::new(["REICH-MOORE FORMALISM IS WANTED"]))
            .unwrap();

        let text = document.serialize().unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Ta-181 transmission");
        assert_eq!(lines[3], "");

        let parsed = Document::deserialize(DocumentKind::Input, &text).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn input_documents_need_a_title_first() {
        let mut document = Document::input();
        document
            .insert(ElementCard::new("Ta181", 180.948, 1.0, 100.0))
            .unwrap();
        let error = document.serialize().expect_err("element without title");
        assert_eq!(error.kind(), SammyErrorKind::ValidationError);
    }

    #[test]
    fn isotope_cards_without_a_mode_follow_the_codec_options() {
        let mut document = Document::parameter();
        document
            .insert(IsotopeCard::new(vec![IsotopeEntry::new(
                180.948,
                Param::fixed(1.0),
                vec![1, 2],
            )]))
            .unwrap();

        let standard = document.serialize().unwrap();
        assert!(standard.lines().nth(1).unwrap().ends_with(" 1 2"));

        let options = CodecOptions {
            isotope_list_mode: GroupListMode::Extended,
            ..CodecOptions::default()
        };
        let extended = document.serialize_with(&options).unwrap();
        assert!(extended.lines().nth(1).unwrap().ends_with("    1    2"));
    }

    #[test]
    fn summary_lists_populated_cards() {
        let mut document = Document::parameter();
        document.insert(resonances()).unwrap();
        document.insert(FudgeCard::new(0.1)).unwrap();
        let summary = document.summary().unwrap();
        assert_eq!(summary.kind, "parameter");
        assert_eq!(summary.cards.len(), 2);
        assert_eq!(summary.cards[1].number, 2);
        assert_eq!(summary.cards[1].lines, 1);
    }
}
