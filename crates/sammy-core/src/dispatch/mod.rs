//! Segment raw text into blank-line separated chunks and hand each chunk to
//! the card model its header (or its position) selects.

pub mod sniff;

use crate::cards::broadening::BROADENING_HEADER;
use crate::cards::data_reduction::DATA_REDUCTION_HEADER;
use crate::cards::detector::DETECTOR_HEADER;
use crate::cards::external_r::{EXTERNAL_R_ALTERNATE_HEADER, EXTERNAL_R_HEADER};
use crate::cards::isotope::{ISOTOPE_HEADER, ISOTOPIC_MASSES_HEADER, NUCLIDE_HEADER};
use crate::cards::misc::MISC_HEADER;
use crate::cards::normalization::NORMALIZATION_HEADER;
use crate::cards::orres::ORRES_HEADER;
use crate::cards::paramagnetic::PARAMAGNETIC_HEADER;
use crate::cards::particle_pairs::PARTICLE_PAIR_HEADER;
use crate::cards::radius::{CHANNEL_RADII_HEADER, RADIUS_HEADER, RADIUS_KEYWORD_HEADER};
use crate::cards::resonance::RESONANCE_HEADER;
use crate::cards::spin_groups::{SPIN_GROUP_HEADER, SPIN_GROUP_INFORMATION_HEADER};
use crate::cards::unused::UNUSED_HEADER;
use crate::cards::user_resolution::USER_RESOLUTION_HEADER;
use crate::cards::{
    BroadeningCard, CardInstance, CardModel, CommandCard, DataReductionCard,
    DetectorEfficiencyCard, ElementCard, ExternalRCard, ExternalRLayout, FudgeCard, IsotopeCard,
    IsotopeHeader, KeywordRadiusHeader, MiscCard, NormalizationCard, OrresCard,
    ParamagneticCard, ParticlePairCard, RadiusCard, RadiusLayout, ResonanceCard,
    SampleConditionsCard, SpinGroupCard, SpinGroupHeader, TitleCard, UnusedCard,
    UserResolutionCard,
};
use crate::common::GroupListMode;
use crate::common::CodecOptions;
use crate::common::constants::HEADER_PREFIX_LENGTH;
use crate::domain::{CardSet, DiagnosticContext, DocumentKind, ParseResult, SammyErrorKind};
use tracing::debug;

/// How a header selects the parse routine for its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTarget {
    ParticlePairs,
    SpinGroups(SpinGroupHeader),
    /// Card set 1 under its SAMNDF header.
    Resonances,
    ExternalR(ExternalRLayout),
    Broadening,
    UnusedCorrelated,
    Normalization,
    /// Default or alternate, sniffed from the body.
    Radius,
    RadiusKeyword(KeywordRadiusHeader),
    DataReduction,
    Orres,
    Isotopes(IsotopeHeader),
    Miscellaneous,
    Paramagnetic,
    DetectorEfficiency,
    UserResolution,
}

impl HeaderTarget {
    pub const fn card_set(self) -> CardSet {
        match self {
            Self::ParticlePairs => CardSet::ParticlePairs,
            Self::SpinGroups(_) => CardSet::SpinGroups,
            Self::Resonances => CardSet::Resonances,
            Self::ExternalR(_) => CardSet::ExternalR,
            Self::Broadening => CardSet::Broadening,
            Self::UnusedCorrelated => CardSet::UnusedCorrelated,
            Self::Normalization => CardSet::Normalization,
            Self::Radius | Self::RadiusKeyword(_) => CardSet::Radius,
            Self::DataReduction => CardSet::DataReduction,
            Self::Orres => CardSet::Orres,
            Self::Isotopes(_) => CardSet::Isotopes,
            Self::Miscellaneous => CardSet::Miscellaneous,
            Self::Paramagnetic => CardSet::Paramagnetic,
            Self::DetectorEfficiency => CardSet::DetectorEfficiency,
            Self::UserResolution => CardSet::UserResolution,
        }
    }
}

/// One recognizable header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPattern {
    pub text: &'static str,
    pub target: HeaderTarget,
}

impl HeaderPattern {
    const fn new(text: &'static str, target: HeaderTarget) -> Self {
        Self { text, target }
    }

    /// Leading characters that must match: the upper-case part of the
    /// declared text, never fewer than five.
    pub fn significant(&self) -> &'static str {
        let upper = self
            .text
            .find(|cell: char| cell.is_ascii_lowercase())
            .unwrap_or(self.text.len());
        let length = upper.max(HEADER_PREFIX_LENGTH).min(self.text.len());
        &self.text[..length]
    }

    pub fn matches(&self, line: &str) -> bool {
        let significant = self.significant();
        line.trim_start()
            .get(..significant.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(significant))
    }
}

static HEADERS: [HeaderPattern; 21] = [
    HeaderPattern::new(PARTICLE_PAIR_HEADER, HeaderTarget::ParticlePairs),
    HeaderPattern::new(SPIN_GROUP_HEADER, HeaderTarget::SpinGroups(SpinGroupHeader::Groups)),
    HeaderPattern::new(
        SPIN_GROUP_INFORMATION_HEADER,
        HeaderTarget::SpinGroups(SpinGroupHeader::Information),
    ),
    HeaderPattern::new(RESONANCE_HEADER, HeaderTarget::Resonances),
    HeaderPattern::new(EXTERNAL_R_HEADER, HeaderTarget::ExternalR(ExternalRLayout::Standard)),
    HeaderPattern::new(
        EXTERNAL_R_ALTERNATE_HEADER,
        HeaderTarget::ExternalR(ExternalRLayout::Alternate),
    ),
    HeaderPattern::new(BROADENING_HEADER, HeaderTarget::Broadening),
    HeaderPattern::new(UNUSED_HEADER, HeaderTarget::UnusedCorrelated),
    HeaderPattern::new(NORMALIZATION_HEADER, HeaderTarget::Normalization),
    HeaderPattern::new(
        RADIUS_KEYWORD_HEADER,
        HeaderTarget::RadiusKeyword(KeywordRadiusHeader::Radii),
    ),
    HeaderPattern::new(
        CHANNEL_RADII_HEADER,
        HeaderTarget::RadiusKeyword(KeywordRadiusHeader::ChannelRadii),
    ),
    HeaderPattern::new(RADIUS_HEADER, HeaderTarget::Radius),
    HeaderPattern::new(DATA_REDUCTION_HEADER, HeaderTarget::DataReduction),
    HeaderPattern::new(ORRES_HEADER, HeaderTarget::Orres),
    HeaderPattern::new(ISOTOPE_HEADER, HeaderTarget::Isotopes(IsotopeHeader::Isotopic)),
    HeaderPattern::new(NUCLIDE_HEADER, HeaderTarget::Isotopes(IsotopeHeader::Nuclide)),
    HeaderPattern::new(
        ISOTOPIC_MASSES_HEADER,
        HeaderTarget::Isotopes(IsotopeHeader::Masses),
    ),
    HeaderPattern::new(MISC_HEADER, HeaderTarget::Miscellaneous),
    HeaderPattern::new(PARAMAGNETIC_HEADER, HeaderTarget::Paramagnetic),
    HeaderPattern::new(DETECTOR_HEADER, HeaderTarget::DetectorEfficiency),
    HeaderPattern::new(USER_RESOLUTION_HEADER, HeaderTarget::UserResolution),
];

/// Header patterns recognized in files of `kind`, in priority order.
pub fn header_patterns(kind: DocumentKind) -> impl Iterator<Item = &'static HeaderPattern> {
    HEADERS
        .iter()
        .filter(move |pattern| kind.allows(pattern.target.card_set()))
}

/// The longest matching header for `line`; ties go to the earlier pattern.
pub fn match_header(kind: DocumentKind, line: &str) -> Option<&'static HeaderPattern> {
    header_patterns(kind)
        .filter(|pattern| pattern.matches(line))
        .fold(None, |best: Option<&'static HeaderPattern>, pattern| match best {
            Some(current) if current.significant().len() >= pattern.significant().len() => {
                Some(current)
            }
            _ => Some(pattern),
        })
}

/// Consecutive non-blank lines of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 1-based document line of `lines[0]`.
    pub first_line: usize,
    pub lines: Vec<&'a str>,
}

/// A card produced by the dispatcher with the context of its first line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCard {
    pub card: CardInstance,
    pub context: DiagnosticContext,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDispatcher {
    kind: DocumentKind,
    options: CodecOptions,
}

impl FormatDispatcher {
    pub fn new(kind: DocumentKind, options: &CodecOptions) -> Self {
        Self {
            kind,
            options: options.clone(),
        }
    }

    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Split `text` at blank lines after enforcing the line ceiling.
    pub fn segment<'a>(&self, text: &'a str) -> ParseResult<Vec<Chunk<'a>>> {
        let line_count = text.lines().count();
        if line_count > self.options.max_lines {
            return Err(DiagnosticContext::new().error(
                SammyErrorKind::TooLarge,
                format!(
                    "document has {line_count} lines, the limit is {}",
                    self.options.max_lines
                ),
            ));
        }

        let mut chunks = Vec::new();
        let mut current: Option<Chunk<'a>> = None;
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                chunks.extend(current.take());
                continue;
            }
            current
                .get_or_insert_with(|| Chunk {
                    first_line: index + 1,
                    lines: Vec::new(),
                })
                .lines
                .push(line);
        }
        chunks.extend(current);

        debug!(kind = %self.kind, lines = line_count, chunks = chunks.len(), "document segmented");
        Ok(chunks)
    }

    /// Parse every chunk of `text` into cards, in file order.
    ///
    /// The first error aborts the whole parse.
    pub fn dispatch(&self, text: &str) -> ParseResult<Vec<ParsedCard>> {
        let chunks = self.segment(text)?;
        let mut cards: Vec<ParsedCard> = Vec::new();

        for (position, chunk) in chunks.iter().enumerate() {
            let seen =
                |card_set: CardSet| cards.iter().any(|parsed| parsed.card.card_set() == card_set);
            let parsed = match self.kind {
                DocumentKind::Input if position == 0 => parse_preamble(chunk)?,
                kind => match match_header(kind, chunk.lines[0]) {
                    Some(pattern) => vec![parse_headed(pattern, chunk)?],
                    None => {
                        let card_set = self.headerless_card(chunk, &seen)?;
                        vec![parse_body(card_set, chunk.first_line, &chunk.lines)?]
                    }
                },
            };
            cards.extend(parsed);
        }
        Ok(cards)
    }

    /// Card set of a chunk without a header, judged from its position and shape.
    fn headerless_card(
        &self,
        chunk: &Chunk<'_>,
        seen: &impl Fn(CardSet) -> bool,
    ) -> ParseResult<CardSet> {
        let candidate = match self.kind {
            _ if !sniff::starts_numeric(chunk.lines[0]) => None,
            DocumentKind::Parameter if sniff::is_fudge_chunk(&chunk.lines) => {
                Some(CardSet::Fudge).filter(|card_set| !seen(*card_set))
            }
            DocumentKind::Parameter => {
                Some(CardSet::Resonances).filter(|card_set| !seen(*card_set))
            }
            DocumentKind::Input => {
                Some(CardSet::SampleConditions).filter(|card_set| !seen(*card_set))
            }
        };

        match candidate {
            Some(card_set) => {
                debug!(
                    line = chunk.first_line,
                    card = %card_set,
                    "header-less chunk assigned by position"
                );
                Ok(card_set)
            }
            None => Err(DiagnosticContext::for_document_line(chunk.first_line, chunk.lines[0])
                .error(
                    SammyErrorKind::UnknownCardSet,
                    format!("no {} card set starts with this line", self.kind),
                )),
        }
    }
}

/// Title, element and command lines at the top of an input file.
fn parse_preamble(chunk: &Chunk<'_>) -> ParseResult<Vec<ParsedCard>> {
    let members = [CardSet::Title, CardSet::Element, CardSet::Commands];
    let mut cards = Vec::new();
    for (offset, card_set) in members.into_iter().enumerate() {
        if offset >= chunk.lines.len() {
            break;
        }
        let body = match card_set {
            CardSet::Commands => &chunk.lines[offset..],
            _ => &chunk.lines[offset..=offset],
        };
        cards.push(parse_body(card_set, chunk.first_line + offset, body)?);
    }
    Ok(cards)
}

fn parse_headed(pattern: &HeaderPattern, chunk: &Chunk<'_>) -> ParseResult<ParsedCard> {
    let card_set = pattern.target.card_set();
    debug!(line = chunk.first_line, card = %card_set, header = pattern.text, "header matched");

    let first_line = chunk.first_line + 1;
    let body = &chunk.lines[1..];
    let context = DiagnosticContext::for_card_at(card_set, first_line);
    let (card, consumed): (CardInstance, usize) = match pattern.target {
        HeaderTarget::SpinGroups(header) => {
            into_instance(SpinGroupCard::parse_header(header, body, 0, &context)?)
        }
        HeaderTarget::Resonances => {
            let (mut card, consumed) = ResonanceCard::parse(body, 0, &context)?;
            card.headed = true;
            (card.into(), consumed)
        }
        HeaderTarget::ExternalR(layout) => {
            into_instance(ExternalRCard::parse_layout(layout, body, 0, &context)?)
        }
        HeaderTarget::RadiusKeyword(header) => {
            let (mut card, consumed) =
                RadiusCard::parse_layout(RadiusLayout::Keyword, body, 0, &context)?;
            card.keyword_header = header;
            (card.into(), consumed)
        }
        HeaderTarget::Isotopes(header) => {
            let mode = match header.forced_list_mode() {
                Some(mode) => mode,
                None => body
                    .first()
                    .copied()
                    .map(sniff::isotope_list_mode)
                    .unwrap_or(GroupListMode::Standard),
            };
            into_instance(IsotopeCard::parse_mode(mode, header, body, 0, &context)?)
        }
        _ => return parse_body(card_set, first_line, body),
    };
    finish(card, consumed, body, context)
}

/// Parse `body` with the default routine of `card_set`.
fn parse_body(card_set: CardSet, first_line: usize, body: &[&str]) -> ParseResult<ParsedCard> {
    let context = DiagnosticContext::for_card_at(card_set, first_line);
    let (card, consumed) = match card_set {
        CardSet::Resonances => into_instance(ResonanceCard::parse(body, 0, &context)?),
        CardSet::Fudge => into_instance(FudgeCard::parse(body, 0, &context)?),
        CardSet::ExternalR => into_instance(ExternalRCard::parse(body, 0, &context)?),
        CardSet::Broadening => into_instance(BroadeningCard::parse(body, 0, &context)?),
        CardSet::UnusedCorrelated => into_instance(UnusedCard::parse(body, 0, &context)?),
        CardSet::Normalization => into_instance(NormalizationCard::parse(body, 0, &context)?),
        CardSet::Radius => into_instance(RadiusCard::parse(body, 0, &context)?),
        CardSet::DataReduction => into_instance(DataReductionCard::parse(body, 0, &context)?),
        CardSet::Orres => into_instance(OrresCard::parse(body, 0, &context)?),
        CardSet::Isotopes => into_instance(IsotopeCard::parse(body, 0, &context)?),
        CardSet::Miscellaneous => into_instance(MiscCard::parse(body, 0, &context)?),
        CardSet::Paramagnetic => into_instance(ParamagneticCard::parse(body, 0, &context)?),
        CardSet::DetectorEfficiency => {
            into_instance(DetectorEfficiencyCard::parse(body, 0, &context)?)
        }
        CardSet::UserResolution => into_instance(UserResolutionCard::parse(body, 0, &context)?),
        CardSet::Title => into_instance(TitleCard::parse(body, 0, &context)?),
        CardSet::Element => into_instance(ElementCard::parse(body, 0, &context)?),
        CardSet::Commands => into_instance(CommandCard::parse(body, 0, &context)?),
        CardSet::ParticlePairs => into_instance(ParticlePairCard::parse(body, 0, &context)?),
        CardSet::SampleConditions => {
            into_instance(SampleConditionsCard::parse(body, 0, &context)?)
        }
        CardSet::SpinGroups => into_instance(SpinGroupCard::parse(body, 0, &context)?),
    };
    finish(card, consumed, body, context)
}

fn into_instance<T: Into<CardInstance>>((card, consumed): (T, usize)) -> (CardInstance, usize) {
    (card.into(), consumed)
}

/// Reject lines a card left unread before its terminator.
fn finish(
    card: CardInstance,
    consumed: usize,
    body: &[&str],
    context: DiagnosticContext,
) -> ParseResult<ParsedCard> {
    if let Some(extra) = body.get(consumed) {
        return Err(context.at_line(consumed + 1, extra).error(
            SammyErrorKind::MalformedField,
            "line left over after the card body; a blank terminator is missing",
        ));
    }
    Ok(ParsedCard { card, context })
}
