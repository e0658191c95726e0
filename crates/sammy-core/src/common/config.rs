//! Caller-tunable codec behaviour.

use super::constants::DEFAULT_MAX_LINES;
use serde::{Deserialize, Serialize};

/// Width of the spin-group lists in isotope cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupListMode {
    /// Standard unless some group identifier needs more than two columns.
    #[default]
    Auto,
    Standard,
    Extended,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodecOptions {
    #[serde(rename = "maxLines", default = "default_max_lines")]
    pub max_lines: usize,
    #[serde(rename = "isotopeListMode", default)]
    pub isotope_list_mode: GroupListMode,
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            isotope_list_mode: GroupListMode::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct MergeOptions {
    /// Index of the source whose broadening, normalization and other
    /// document-wide cards survive the merge.
    #[serde(default)]
    pub primary: usize,
}

impl MergeOptions {
    pub const fn with_primary(primary: usize) -> Self {
        Self { primary }
    }
}
