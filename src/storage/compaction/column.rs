//! Column compactor
//!
//! Binds one column's statistics to the encoding plan chosen for it. The plan
//! is derived once at construction; afterwards the compactor is a pure
//! function from value to bits and can be shared between threads writing
//! independent streams.
//!
//! Every value is preceded by its null indicator (`encode_null`); the typed
//! encoders run only for present values, and decoding mirrors that order.

use crate::bits::{BitReader, BitWriter};
use crate::coding::{CodedReader, CodedWriter};
use crate::common::error::Result;
use crate::storage::compaction::plan::{EncodingPlan, EncodingPolicy, IntegerPlan, ValuePlan};
use crate::storage::compaction::stats::ColumnStats;
use crate::types::ColumnType;
use crate::{config_err, decode_err, invalid_arg_err};

/// Upper bound on the capacity reserved for a decoded string
const MAX_PREALLOCATED_CHARS: u64 = 1 << 16;

#[derive(Debug, Clone)]
pub struct ColumnCompactor {
    column_type: ColumnType,
    stats: ColumnStats,
    plan: EncodingPlan,
}

impl ColumnCompactor {
    /// Creates a compactor whose plan is chosen by `policy`
    pub fn new(column_type: ColumnType, stats: ColumnStats, policy: &dyn EncodingPolicy) -> Result<Self> {
        stats.validate()?;
        Self::check_type_range(column_type, &stats)?;
        let plan = policy.decide(column_type, &stats);
        Ok(Self {
            column_type,
            stats,
            plan,
        })
    }

    /// Creates a compactor with an explicit plan
    pub fn with_plan(column_type: ColumnType, stats: ColumnStats, plan: EncodingPlan) -> Self {
        Self {
            column_type,
            stats,
            plan,
        }
    }

    /// Rejects statistics whose bounds the declared type cannot hold, so a
    /// fixed-width plan never exceeds the type's nominal width
    fn check_type_range(column_type: ColumnType, stats: &ColumnStats) -> Result<()> {
        let Some((low, high)) = column_type.value_range() else {
            return Ok(());
        };
        for bound in [stats.minimum(), stats.maximum()].into_iter().flatten() {
            if bound < low || bound > high {
                return Err(config_err!(
                    "{} column statistics bound {} outside [{}, {}]",
                    column_type,
                    bound,
                    low,
                    high
                ));
            }
        }
        Ok(())
    }

    /// Forces a null indicator when the column is declared nullable, even if
    /// the statistics saw no nulls
    pub fn declare_nullable(mut self, nullable: bool) -> Self {
        self.plan.nullable |= nullable;
        self
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn stats(&self) -> &ColumnStats {
        &self.stats
    }

    pub fn plan(&self) -> &EncodingPlan {
        &self.plan
    }

    // encoding

    /// Writes the null indicator; free for columns that are neither declared
    /// nullable nor saw a null in the statistics
    pub fn encode_null<W: BitWriter>(&self, writer: &mut CodedWriter<W>, is_null: bool) -> Result<u64> {
        if self.plan.nullable {
            writer.write_boolean(is_null)
        } else if is_null {
            Err(invalid_arg_err!(
                "null value in a non-nullable {} column",
                self.column_type
            ))
        } else {
            Ok(0)
        }
    }

    pub fn encode_boolean<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: bool) -> Result<u64> {
        Self::encode_integral(self.integer_plan()?, writer, value as i64)
    }

    pub fn encode_int<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: i32) -> Result<u64> {
        Self::encode_integral(self.integer_plan()?, writer, value as i64)
    }

    pub fn encode_long<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: i64) -> Result<u64> {
        Self::encode_integral(self.integer_plan()?, writer, value)
    }

    pub fn encode_char<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: char) -> Result<u64> {
        Self::encode_integral(self.integer_plan()?, writer, value as i64)
    }

    pub fn encode_float<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: f32) -> Result<u64> {
        match self.plan.value {
            ValuePlan::FloatBits { width: 32 } => writer.write_fixed(value.to_bits() as u64, 32),
            _ => Err(self.plan_mismatch("FLOAT")),
        }
    }

    pub fn encode_double<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: f64) -> Result<u64> {
        match self.plan.value {
            ValuePlan::FloatBits { width: 64 } => writer.write_fixed(value.to_bits(), 64),
            _ => Err(self.plan_mismatch("DOUBLE")),
        }
    }

    pub fn encode_string<W: BitWriter>(&self, writer: &mut CodedWriter<W>, value: &str) -> Result<u64> {
        let chars = match &self.plan.value {
            ValuePlan::Text { chars } => chars,
            _ => return Err(self.plan_mismatch("VARCHAR")),
        };
        let length = value.chars().count() as u64;
        let mut bits = writer.write_positive_long(length + 1)?;
        for c in value.chars() {
            bits += Self::encode_integral(chars, writer, c as i64)?;
        }
        Ok(bits)
    }

    fn encode_integral<W: BitWriter>(
        plan: &IntegerPlan,
        writer: &mut CodedWriter<W>,
        value: i64,
    ) -> Result<u64> {
        match *plan {
            IntegerPlan::Fixed {
                minimum,
                maximum,
                bits,
            } => {
                if value < minimum || value > maximum {
                    return Err(invalid_arg_err!(
                        "value {} outside column range [{}, {}]",
                        value,
                        minimum,
                        maximum
                    ));
                }
                let offset = (value as i128 - minimum as i128) as u64;
                writer.write_fixed(offset, bits)
            }
            IntegerPlan::Offset { minimum } => writer.write_bounded_long(value, minimum),
            IntegerPlan::Signed => writer.write_long(value),
        }
    }

    // decoding

    /// Reads the null indicator; `true` means no typed value follows
    pub fn decode_null<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<bool> {
        if self.plan.nullable {
            reader.read_boolean()
        } else {
            Ok(false)
        }
    }

    pub fn decode_boolean<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<bool> {
        match Self::decode_integral(self.integer_plan()?, reader)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(decode_err!("{} is not a boolean", other)),
        }
    }

    pub fn decode_int<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<i32> {
        let value = Self::decode_integral(self.integer_plan()?, reader)?;
        i32::try_from(value).map_err(|_| decode_err!("{} does not fit a 32-bit integer", value))
    }

    pub fn decode_long<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<i64> {
        Self::decode_integral(self.integer_plan()?, reader)
    }

    pub fn decode_char<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<char> {
        Self::decode_char_with(self.integer_plan()?, reader)
    }

    pub fn decode_float<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<f32> {
        match self.plan.value {
            ValuePlan::FloatBits { width: 32 } => Ok(f32::from_bits(reader.read_fixed(32)? as u32)),
            _ => Err(self.plan_mismatch("FLOAT")),
        }
    }

    pub fn decode_double<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<f64> {
        match self.plan.value {
            ValuePlan::FloatBits { width: 64 } => Ok(f64::from_bits(reader.read_fixed(64)?)),
            _ => Err(self.plan_mismatch("DOUBLE")),
        }
    }

    pub fn decode_string<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<String> {
        let chars = match &self.plan.value {
            ValuePlan::Text { chars } => chars,
            _ => return Err(self.plan_mismatch("VARCHAR")),
        };
        let length = reader.read_positive_long()? - 1;
        let mut value = String::with_capacity(length.min(MAX_PREALLOCATED_CHARS) as usize);
        for _ in 0..length {
            value.push(Self::decode_char_with(chars, reader)?);
        }
        Ok(value)
    }

    fn decode_char_with<R: BitReader>(plan: &IntegerPlan, reader: &mut CodedReader<R>) -> Result<char> {
        let code = Self::decode_integral(plan, reader)?;
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| decode_err!("{} is not a valid character", code))
    }

    fn decode_integral<R: BitReader>(plan: &IntegerPlan, reader: &mut CodedReader<R>) -> Result<i64> {
        match *plan {
            IntegerPlan::Fixed {
                minimum,
                maximum,
                bits,
            } => {
                let offset = reader.read_fixed(bits)?;
                let value = minimum as i128 + offset as i128;
                if value > maximum as i128 {
                    return Err(decode_err!(
                        "decoded value {} outside column range [{}, {}]",
                        value,
                        minimum,
                        maximum
                    ));
                }
                Ok(value as i64)
            }
            IntegerPlan::Offset { minimum } => reader.read_bounded_long(minimum),
            IntegerPlan::Signed => reader.read_long(),
        }
    }

    fn integer_plan(&self) -> Result<&IntegerPlan> {
        match &self.plan.value {
            ValuePlan::Integer(plan) => Ok(plan),
            _ => Err(self.plan_mismatch("integral")),
        }
    }

    fn plan_mismatch(&self, requested: &str) -> crate::common::error::BitrowError {
        invalid_arg_err!(
            "{} value presented to a {} column encoded as {}",
            requested,
            self.column_type,
            self.plan
        )
    }
}
