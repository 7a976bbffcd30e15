//! Constants used throughout bitrow

/// Default upper bound on the magnitude (in bits) of an arbitrary-precision decode
pub const DEFAULT_MAX_MAGNITUDE_BITS: u64 = 1 << 24;

/// Largest bit count a single fixed-width field may use
pub const MAX_FIXED_BITS: u32 = 64;

/// Nominal storage widths of the declared column types
pub const BOOLEAN_WIDTH: u32 = 1;
pub const TINYINT_WIDTH: u32 = 8;
pub const SMALLINT_WIDTH: u32 = 16;
pub const INTEGER_WIDTH: u32 = 32;
pub const BIGINT_WIDTH: u32 = 64;
pub const CHAR_WIDTH: u32 = 32;

/// Largest Unicode scalar value
pub const MAX_CHAR_CODE_POINT: i64 = 0x10FFFF;

/// Name under which position stats are registered
pub const POSITION_STATS_NAME: &str = "position";
