pub mod errors;

pub use errors::{
    DiagnosticContext, ParseResult, RenderResult, SammyError, SammyErrorKind, SammyResult,
};

use std::fmt::{Display, Formatter};

/// Which of the two SAMMY text files a document models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Parameter,
    Input,
}

impl DocumentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parameter => "parameter",
            Self::Input => "input",
        }
    }

    /// Card sets a document of this kind may hold, in canonical order.
    pub const fn canonical_order(self) -> &'static [CardSet] {
        match self {
            Self::Parameter => &PARAMETER_ORDER,
            Self::Input => &INPUT_ORDER,
        }
    }

    pub fn allows(self, card_set: CardSet) -> bool {
        self.canonical_order().contains(&card_set)
    }

    pub fn canonical_position(self, card_set: CardSet) -> Option<usize> {
        self.canonical_order()
            .iter()
            .position(|candidate| *candidate == card_set)
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// SAMNDF files open with particle pairs and spin groups ahead of card set 1.
const PARAMETER_ORDER: [CardSet; 16] = [
    CardSet::ParticlePairs,
    CardSet::SpinGroups,
    CardSet::Resonances,
    CardSet::Fudge,
    CardSet::ExternalR,
    CardSet::Broadening,
    CardSet::UnusedCorrelated,
    CardSet::Normalization,
    CardSet::Radius,
    CardSet::DataReduction,
    CardSet::Orres,
    CardSet::Isotopes,
    CardSet::Miscellaneous,
    CardSet::Paramagnetic,
    CardSet::DetectorEfficiency,
    CardSet::UserResolution,
];

const INPUT_ORDER: [CardSet; 11] = [
    CardSet::Title,
    CardSet::Element,
    CardSet::Commands,
    CardSet::ParticlePairs,
    CardSet::SampleConditions,
    CardSet::SpinGroups,
    CardSet::Broadening,
    CardSet::Normalization,
    CardSet::Miscellaneous,
    CardSet::Paramagnetic,
    CardSet::UserResolution,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardSet {
    Resonances,
    Fudge,
    ExternalR,
    Broadening,
    UnusedCorrelated,
    Normalization,
    Radius,
    DataReduction,
    Orres,
    Isotopes,
    Miscellaneous,
    Paramagnetic,
    DetectorEfficiency,
    UserResolution,
    Title,
    Element,
    Commands,
    ParticlePairs,
    SampleConditions,
    SpinGroups,
}

impl CardSet {
    /// Card-set number as printed in the SAMMY manual for the owning file.
    pub const fn number(self) -> u8 {
        match self {
            Self::Resonances | Self::Title => 1,
            Self::Fudge | Self::Element => 2,
            Self::ExternalR | Self::Commands => 3,
            Self::Broadening | Self::ParticlePairs => 4,
            Self::UnusedCorrelated | Self::SampleConditions => 5,
            Self::Normalization => 6,
            Self::Radius => 7,
            Self::DataReduction => 8,
            Self::Orres => 9,
            Self::Isotopes | Self::SpinGroups => 10,
            Self::Miscellaneous => 11,
            Self::Paramagnetic => 12,
            Self::DetectorEfficiency => 15,
            Self::UserResolution => 16,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resonances => "resonances",
            Self::Fudge => "fudge factor",
            Self::ExternalR => "external R-function",
            Self::Broadening => "broadening",
            Self::UnusedCorrelated => "unused correlated variables",
            Self::Normalization => "normalization",
            Self::Radius => "radius",
            Self::DataReduction => "data reduction",
            Self::Orres => "ORRES resolution",
            Self::Isotopes => "isotopes",
            Self::Miscellaneous => "miscellaneous",
            Self::Paramagnetic => "paramagnetic",
            Self::DetectorEfficiency => "detector efficiency",
            Self::UserResolution => "user-defined resolution",
            Self::Title => "title",
            Self::Element => "element",
            Self::Commands => "alphanumeric commands",
            Self::ParticlePairs => "particle pairs",
            Self::SampleConditions => "sample conditions",
            Self::SpinGroups => "spin groups",
        }
    }

    /// A second chunk of a repeatable card set extends the first instead of
    /// raising `DuplicateCardSet`.
    pub const fn is_repeatable(self) -> bool {
        matches!(self, Self::UnusedCorrelated | Self::Miscellaneous)
    }

    /// Cards that may appear without a header, identified by their position.
    pub const fn is_headerless(self) -> bool {
        matches!(
            self,
            Self::Resonances
                | Self::Fudge
                | Self::Title
                | Self::Element
                | Self::Commands
                | Self::SampleConditions
        )
    }

    /// Whether the card closes with its own blank line when serialized.
    pub const fn has_terminator(self) -> bool {
        !matches!(self, Self::Title | Self::Element)
    }
}

impl Display for CardSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Fit treatment of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VaryFlag {
    /// Held fixed at a value supplied by another file (-2).
    UseFromOthers,
    /// Held fixed at the value given in the parameter file (-1).
    UseFromParameterFile,
    #[default]
    Fixed,
    Varied,
    /// Propagated-uncertainty parameter (3).
    PropagatedUncertainty,
}

impl VaryFlag {
    pub const fn code(self) -> i64 {
        match self {
            Self::UseFromOthers => -2,
            Self::UseFromParameterFile => -1,
            Self::Fixed => 0,
            Self::Varied => 1,
            Self::PropagatedUncertainty => 3,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            -2 => Some(Self::UseFromOthers),
            -1 => Some(Self::UseFromParameterFile),
            0 => Some(Self::Fixed),
            1 => Some(Self::Varied),
            3 => Some(Self::PropagatedUncertainty),
            _ => None,
        }
    }

    pub const fn is_varied(self) -> bool {
        matches!(self, Self::Varied)
    }
}

/// Set of vary-flag codes a particular field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaryDomain {
    /// {0, 1, 3}
    Basic,
    /// {-2, -1, 0, 1, 3}
    Extended,
}

impl VaryDomain {
    pub const fn allows(self, flag: VaryFlag) -> bool {
        match self {
            Self::Basic => matches!(
                flag,
                VaryFlag::Fixed | VaryFlag::Varied | VaryFlag::PropagatedUncertainty
            ),
            Self::Extended => true,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "{0,1,3}",
            Self::Extended => "{-2,-1,0,1,3}",
        }
    }
}

impl Display for VaryDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// A fitted quantity and its vary flag.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Param {
    pub value: f64,
    pub vary: VaryFlag,
}

impl Param {
    pub const fn new(value: f64, vary: VaryFlag) -> Self {
        Self { value, vary }
    }

    pub const fn fixed(value: f64) -> Self {
        Self::new(value, VaryFlag::Fixed)
    }

    pub const fn varied(value: f64) -> Self {
        Self::new(value, VaryFlag::Varied)
    }
}

#[cfg(test)]
mod tests {
    use super::{CardSet, DocumentKind, VaryDomain, VaryFlag};

    #[test]
    fn vary_flag_codes_round_trip() {
        for code in [-2, -1, 0, 1, 3] {
            let flag = VaryFlag::from_code(code).expect("listed code should map to a flag");
            assert_eq!(flag.code(), code);
        }
        assert_eq!(VaryFlag::from_code(2), None);
        assert_eq!(VaryFlag::from_code(-3), None);
    }

    #[test]
    fn basic_domain_rejects_negative_flags() {
        assert!(VaryDomain::Basic.allows(VaryFlag::PropagatedUncertainty));
        assert!(!VaryDomain::Basic.allows(VaryFlag::UseFromOthers));
        assert!(!VaryDomain::Basic.allows(VaryFlag::UseFromParameterFile));
        assert!(VaryDomain::Extended.allows(VaryFlag::UseFromOthers));
    }

    #[test]
    fn canonical_orders_follow_card_numbers_within_each_file() {
        let order = DocumentKind::Parameter.canonical_order();
        assert_eq!(order[..2], [CardSet::ParticlePairs, CardSet::SpinGroups]);
        let parameter_numbers: Vec<u8> = order[2..].iter().map(|card| card.number()).collect();
        let mut sorted = parameter_numbers.clone();
        sorted.sort_unstable();
        assert_eq!(parameter_numbers, sorted);

        assert!(DocumentKind::Input.allows(CardSet::Broadening));
        assert!(!DocumentKind::Input.allows(CardSet::Resonances));
        assert_eq!(
            DocumentKind::Input.canonical_position(CardSet::Commands),
            Some(2)
        );
        assert_eq!(
            DocumentKind::Input.canonical_position(CardSet::ParticlePairs),
            Some(3)
        );
    }

    #[test]
    fn only_leading_input_cards_skip_terminators() {
        assert!(!CardSet::Title.has_terminator());
        assert!(!CardSet::Element.has_terminator());
        assert!(CardSet::Commands.has_terminator());
        assert!(CardSet::Resonances.has_terminator());
    }
}
