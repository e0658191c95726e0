//! Fixed geometry of SAMMY card images.

/// Every card line is an 80-column card image.
pub const LINE_WIDTH: usize = 80;

/// Default ceiling on document size before segmentation starts.
pub const DEFAULT_MAX_LINES: usize = 200_000;

/// Significant leading characters compared when matching a card header.
pub const HEADER_PREFIX_LENGTH: usize = 5;

/// Significant leading characters compared when matching a command keyword.
pub const COMMAND_SIGNIFICANT_LENGTH: usize = 20;

/// Value slots on each resonance line (energy or width).
pub const RESONANCE_VALUES_PER_LINE: usize = 5;

/// Largest group identifier a two-column field can hold.
pub const NARROW_GROUP_LIMIT: u32 = 99;

/// Largest group identifier a five-column field can hold.
pub const WIDE_GROUP_LIMIT: u32 = 99_999;
