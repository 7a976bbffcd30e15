//! Per-column encoding plans and the policy that chooses them
//!
//! A policy looks at one column's type and statistics, independent of every
//! other column, and picks the encoding with the lowest expected bit cost
//! that still recovers every value exactly.

use crate::coding::ExtendedCoding;
use crate::common::config::PolicyConfig;
use crate::storage::compaction::stats::ColumnStats;
use crate::types::ColumnType;
use serde::Serialize;
use std::fmt;

/// Encoding of an integral value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegerPlan {
    /// `value - minimum` in a `bits`-wide binary field; values outside
    /// `[minimum, maximum]` are rejected
    Fixed { minimum: i64, maximum: i64, bits: u32 },
    /// Universal code of `value - minimum + 1`
    Offset { minimum: i64 },
    /// Universal code of the signed remapping
    Signed,
}

impl IntegerPlan {
    pub fn fixed_bits(&self) -> Option<u32> {
        match self {
            IntegerPlan::Fixed { bits, .. } => Some(*bits),
            _ => None,
        }
    }
}

/// Encoding of a non-null value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValuePlan {
    /// Boolean, integer and char columns
    Integer(IntegerPlan),
    /// Raw IEEE bit pattern in a fixed field of `width` bits
    FloatBits { width: u32 },
    /// Universal code of `length + 1`, then every character through `chars`
    Text { chars: IntegerPlan },
    /// No encoding path exists for the column type
    Unsupported,
}

/// Complete encoding decision for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncodingPlan {
    /// Whether a one-bit null indicator precedes every value
    pub nullable: bool,
    pub value: ValuePlan,
}

impl EncodingPlan {
    /// Bits used by every value when the encoding is fixed-size
    pub fn fixed_bits(&self) -> Option<u64> {
        if self.nullable {
            return None;
        }
        match self.value {
            ValuePlan::Integer(plan) => plan.fixed_bits().map(u64::from),
            ValuePlan::FloatBits { width } => Some(width as u64),
            _ => None,
        }
    }
}

impl fmt::Display for EncodingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nulls = if self.nullable { "nullable " } else { "" };
        match self.value {
            ValuePlan::Integer(IntegerPlan::Fixed { minimum, bits, .. }) => {
                write!(f, "{}fixed {} bits from {}", nulls, bits, minimum)
            }
            ValuePlan::Integer(IntegerPlan::Offset { minimum }) => {
                write!(f, "{}universal offset from {}", nulls, minimum)
            }
            ValuePlan::Integer(IntegerPlan::Signed) => write!(f, "{}universal signed", nulls),
            ValuePlan::FloatBits { width } => write!(f, "{}raw {}-bit float", nulls, width),
            ValuePlan::Text { chars } => {
                let chars = EncodingPlan {
                    nullable: false,
                    value: ValuePlan::Integer(chars),
                };
                write!(f, "{}text of ({})", nulls, chars)
            }
            ValuePlan::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Strategy choosing an [`EncodingPlan`] from column statistics
pub trait EncodingPolicy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn decide(&self, column_type: ColumnType, stats: &ColumnStats) -> EncodingPlan;
}

/// Floating-point values keep their IEEE-754 bit pattern at the type's width
fn float_plan(column_type: ColumnType) -> ValuePlan {
    match column_type.nominal_width() {
        Some(width) => ValuePlan::FloatBits { width },
        None => ValuePlan::Unsupported,
    }
}

/// Default policy: narrowest fixed field unless a universal code is expected
/// to be cheaper
#[derive(Debug, Clone)]
pub struct CostPolicy {
    coding: ExtendedCoding,
    config: PolicyConfig,
}

impl CostPolicy {
    pub fn new(coding: ExtendedCoding, config: PolicyConfig) -> Self {
        Self { coding, config }
    }

    fn integer_plan(&self, stats: &ColumnStats, consult_cardinality: bool) -> IntegerPlan {
        match (stats.minimum(), stats.maximum()) {
            (Some(minimum), Some(maximum)) if minimum <= maximum => {
                let bits = stats.range_bits().unwrap_or(64);
                if self.config.allow_universal_for_bounded
                    && self.universal_is_cheaper(stats, minimum, bits, consult_cardinality)
                {
                    IntegerPlan::Offset { minimum }
                } else {
                    IntegerPlan::Fixed {
                        minimum,
                        maximum,
                        bits,
                    }
                }
            }
            (Some(minimum), None) if minimum >= 0 => IntegerPlan::Offset { minimum },
            _ => IntegerPlan::Signed,
        }
    }

    fn universal_is_cheaper(
        &self,
        stats: &ColumnStats,
        minimum: i64,
        bits: u32,
        consult_cardinality: bool,
    ) -> bool {
        if let Some(mean) = stats.mean() {
            let offset = (mean - minimum as f64).max(0.0).round() as u128 + 1;
            return self.coding.encoded_len(offset) < bits as u64;
        }
        if consult_cardinality && self.config.use_cardinality {
            if let Some(cardinality) = stats.cardinality() {
                // few distinct values spread over a wide range
                return 2 * crate::coding::bit_length(cardinality) <= bits;
            }
        }
        false
    }
}

impl EncodingPolicy for CostPolicy {
    fn name(&self) -> &'static str {
        "cost"
    }

    fn decide(&self, column_type: ColumnType, stats: &ColumnStats) -> EncodingPlan {
        let value = match column_type {
            ColumnType::Boolean
            | ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Integer
            | ColumnType::BigInt
            | ColumnType::Char => ValuePlan::Integer(self.integer_plan(stats, true)),
            ColumnType::Float | ColumnType::Double => float_plan(column_type),
            ColumnType::Varchar => ValuePlan::Text {
                chars: match self.integer_plan(stats, false) {
                    // unknown character range: code points are never negative
                    IntegerPlan::Signed => IntegerPlan::Offset { minimum: 0 },
                    plan => plan,
                },
            },
            ColumnType::Blob | ColumnType::Decimal | ColumnType::Timestamp => ValuePlan::Unsupported,
        };
        EncodingPlan {
            nullable: stats.is_nullable(),
            value,
        }
    }
}

/// Policy that never narrows: signed universal codes for every integral column
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalPolicy;

impl EncodingPolicy for UniversalPolicy {
    fn name(&self) -> &'static str {
        "universal"
    }

    fn decide(&self, column_type: ColumnType, stats: &ColumnStats) -> EncodingPlan {
        let value = match column_type {
            t if t.is_floating() => float_plan(t),
            ColumnType::Varchar => ValuePlan::Text {
                chars: IntegerPlan::Offset { minimum: 0 },
            },
            t if t.is_integral() => ValuePlan::Integer(IntegerPlan::Signed),
            _ => ValuePlan::Unsupported,
        };
        EncodingPlan {
            nullable: stats.is_nullable(),
            value,
        }
    }
}
