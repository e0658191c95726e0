//! One model per card set, each parsing and rendering its own column layout.

pub mod broadening;
pub mod commands;
pub mod conditions;
pub mod data_reduction;
pub mod detector;
pub mod external_r;
pub mod fudge;
pub mod isotope;
pub mod misc;
pub mod normalization;
pub mod orres;
pub mod paramagnetic;
pub mod particle_pairs;
pub mod preamble;
pub mod radius;
pub mod resonance;
pub mod spin_groups;
pub mod unused;
pub mod user_resolution;

pub use broadening::{BroadeningCard, BroadeningField, GaussianBroadening};
pub use commands::CommandCard;
pub use conditions::{
    PhysicalConstants, Reaction, ReactionType, SampleConditionsCard, SampleDensity,
};
pub use data_reduction::{DataReductionCard, DataReductionParameter};
pub use detector::{DetectorEfficiency, DetectorEfficiencyCard};
pub use external_r::{ExternalRCard, ExternalREntry, ExternalRLayout};
pub use fudge::FudgeCard;
pub use isotope::{IsotopeCard, IsotopeEntry, IsotopeHeader};
pub use misc::{MiscCard, MiscKind, MiscLine};
pub use normalization::{NormalizationCard, NormalizationSet};
pub use orres::{OrresCard, OrresLine};
pub use paramagnetic::{ParamagneticCard, ParamagneticIsotope, ParamagneticNuclide};
pub use particle_pairs::{ParticlePair, ParticlePairCard, ParticlePairLayout};
pub use preamble::{ElementCard, TitleCard};
pub use radius::{GroupChannels, KeywordRadiusHeader, RadiusCard, RadiusEntry, RadiusLayout};
pub use resonance::{ResonanceCard, ResonanceEntry};
pub use spin_groups::{SpinChannel, SpinGroup, SpinGroupCard, SpinGroupHeader};
pub use unused::{UnusedCard, UnusedVariable};
pub use user_resolution::{UserResolutionCard, UserResolutionLine};

use crate::domain::{
    CardSet, DiagnosticContext, ParseResult, RenderResult, SammyError, SammyErrorKind,
    SammyResult,
};
use crate::field::LineReader;

/// Parse/render contract shared by every card set.
pub trait CardModel: Sized {
    const CARD_SET: CardSet;

    /// Parse the card body starting at `lines[cursor]`.
    ///
    /// Returns the card and the number of lines it consumed. Cards that run to
    /// a blank terminator consume every remaining line of `lines`.
    fn parse(
        lines: &[&str],
        cursor: usize,
        context: &DiagnosticContext,
    ) -> ParseResult<(Self, usize)>;

    /// Render the body lines, without header or terminator.
    fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>>;

    /// Header line written ahead of the body; `None` for positional cards.
    fn header(&self) -> Option<&'static str> {
        None
    }

    /// Cross-field rules that can only be checked on a complete card.
    fn validate(&self) -> SammyResult<()> {
        Ok(())
    }

    fn from_instance(instance: &CardInstance) -> Option<&Self>;

    fn from_instance_mut(instance: &mut CardInstance) -> Option<&mut Self>;
}

macro_rules! card_instances {
    ($($variant:ident($card:ty)),+ $(,)?) => {
        /// A parsed or caller-built card of any card set.
        #[derive(Debug, Clone, PartialEq)]
        pub enum CardInstance {
            $($variant($card),)+
        }

        impl CardInstance {
            pub fn card_set(&self) -> CardSet {
                match self {
                    $(Self::$variant(_) => <$card as CardModel>::CARD_SET,)+
                }
            }

            pub fn header(&self) -> Option<&'static str> {
                match self {
                    $(Self::$variant(card) => card.header(),)+
                }
            }

            pub fn render(&self, context: &DiagnosticContext) -> RenderResult<Vec<String>> {
                match self {
                    $(Self::$variant(card) => card.render(context),)+
                }
            }

            pub fn validate(&self) -> SammyResult<()> {
                match self {
                    $(Self::$variant(card) => card.validate(),)+
                }
            }
        }

        $(
            impl From<$card> for CardInstance {
                fn from(card: $card) -> Self {
                    Self::$variant(card)
                }
            }
        )+
    };
}

card_instances! {
    Resonances(ResonanceCard),
    Fudge(FudgeCard),
    ExternalR(ExternalRCard),
    Broadening(BroadeningCard),
    UnusedCorrelated(UnusedCard),
    Normalization(NormalizationCard),
    Radius(RadiusCard),
    DataReduction(DataReductionCard),
    Orres(OrresCard),
    Isotopes(IsotopeCard),
    Miscellaneous(MiscCard),
    Paramagnetic(ParamagneticCard),
    DetectorEfficiency(DetectorEfficiencyCard),
    UserResolution(UserResolutionCard),
    Title(TitleCard),
    Element(ElementCard),
    Commands(CommandCard),
    ParticlePairs(ParticlePairCard),
    SampleConditions(SampleConditionsCard),
    SpinGroups(SpinGroupCard),
}

impl CardInstance {
    /// Fold a later chunk of a repeatable card set into this one.
    pub fn extend(&mut self, other: CardInstance) -> SammyResult<()> {
        match (self, other) {
            (Self::UnusedCorrelated(card), Self::UnusedCorrelated(more)) => {
                card.variables.extend(more.variables);
                Ok(())
            }
            (Self::Miscellaneous(card), Self::Miscellaneous(more)) => {
                card.lines.extend(more.lines);
                Ok(())
            }
            (current, other) => Err(SammyError::new(
                SammyErrorKind::DuplicateCardSet,
                format!(
                    "card set {} ({}) may appear only once",
                    other.card_set().number(),
                    current.card_set()
                ),
            )),
        }
    }
}

/// Reader for `lines[index]` with the context narrowed to that line.
pub(crate) fn line_reader<'a>(
    lines: &[&'a str],
    index: usize,
    context: &DiagnosticContext,
) -> ParseResult<LineReader<'a>> {
    let raw = lines[index];
    LineReader::new(raw, context.at_line(index + 1, raw))
}

pub(crate) fn empty_body(context: &DiagnosticContext) -> SammyError {
    context.error(
        SammyErrorKind::MalformedField,
        "card has no data lines before its terminator",
    )
}

macro_rules! impl_instance_access {
    ($variant:ident) => {
        fn from_instance(instance: &$crate::cards::CardInstance) -> Option<&Self> {
            match instance {
                $crate::cards::CardInstance::$variant(card) => Some(card),
                _ => None,
            }
        }

        fn from_instance_mut(instance: &mut $crate::cards::CardInstance) -> Option<&mut Self> {
            match instance {
                $crate::cards::CardInstance::$variant(card) => Some(card),
                _ => None,
            }
        }
    };
}

pub(crate) use impl_instance_access;
