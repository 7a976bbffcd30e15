//! Extended coding
//!
//! Layers signed, optional and bounded integers onto a universal code by
//! remapping each domain into the positive integers:
//!
//! | Domain            | Mapping                                   |
//! |-------------------|-------------------------------------------|
//! | signed `v`        | `v > 0 → 2v`, `v ≤ 0 → 1 − 2v`            |
//! | optional `u64`    | `None → 1`, `Some(v) → v + 2`             |
//! | optional `i64`    | `None → 1`, `Some(v) → signed(v) + 1`     |
//! | bounded `v ≥ min` | `v − min + 1`                             |
//!
//! Compaction code only ever talks to this layer, so the universal code
//! underneath can be swapped without touching it.

use crate::bits::{BitReader, BitWriter};
use crate::coding::delta::EliasDeltaCoding;
use crate::coding::omega::EliasOmegaCoding;
use crate::coding::universal::UniversalCoding;
use crate::common::config::{CodecKind, CompactionConfig};
use crate::common::error::Result;
use crate::{decode_err, invalid_arg_err};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::sync::Arc;

/// Maps a signed value into the positive integers
fn signed_to_positive(value: i128) -> u128 {
    if value > 0 {
        (value as u128) << 1
    } else {
        1 + ((value.unsigned_abs()) << 1)
    }
}

/// Inverse of [`signed_to_positive`]
fn positive_to_signed(code: u128) -> i128 {
    if code & 1 == 0 {
        (code >> 1) as i128
    } else {
        -(((code - 1) >> 1) as i128)
    }
}

/// Signed, optional and bounded integers over one universal code
#[derive(Debug, Clone)]
pub struct ExtendedCoding {
    coding: Arc<dyn UniversalCoding>,
}

impl ExtendedCoding {
    pub fn new(coding: Arc<dyn UniversalCoding>) -> Self {
        Self { coding }
    }

    /// Extended coding over Elias omega
    pub fn omega() -> Self {
        Self::new(Arc::new(EliasOmegaCoding::new()))
    }

    /// Extended coding over Elias delta
    pub fn delta() -> Self {
        Self::new(Arc::new(EliasDeltaCoding::new()))
    }

    pub fn from_config(config: &CompactionConfig) -> Self {
        match config.codec {
            CodecKind::Omega => Self::new(Arc::new(EliasOmegaCoding::with_max_magnitude_bits(
                config.max_magnitude_bits,
            ))),
            CodecKind::Delta => Self::new(Arc::new(EliasDeltaCoding::with_max_magnitude_bits(
                config.max_magnitude_bits,
            ))),
        }
    }

    /// The universal code underneath
    pub fn universal(&self) -> &dyn UniversalCoding {
        self.coding.as_ref()
    }

    pub fn name(&self) -> &'static str {
        self.coding.name()
    }

    /// Bits needed to encode the positive `value`
    pub fn encoded_len(&self, value: u128) -> u64 {
        self.coding.encoded_len(value)
    }

    // positive

    pub fn encode_positive_u32(&self, writer: &mut dyn BitWriter, value: u32) -> Result<u64> {
        self.coding.encode_positive_u32(writer, value)
    }

    pub fn encode_positive_u64(&self, writer: &mut dyn BitWriter, value: u64) -> Result<u64> {
        self.coding.encode_positive_u64(writer, value)
    }

    pub fn encode_positive_u128(&self, writer: &mut dyn BitWriter, value: u128) -> Result<u64> {
        self.coding.encode_positive_u128(writer, value)
    }

    pub fn encode_positive_big(&self, writer: &mut dyn BitWriter, value: &BigUint) -> Result<u64> {
        self.coding.encode_positive_big(writer, value)
    }

    pub fn decode_positive_u32(&self, reader: &mut dyn BitReader) -> Result<u32> {
        self.coding.decode_positive_u32(reader)
    }

    pub fn decode_positive_u64(&self, reader: &mut dyn BitReader) -> Result<u64> {
        self.coding.decode_positive_u64(reader)
    }

    pub fn decode_positive_u128(&self, reader: &mut dyn BitReader) -> Result<u128> {
        self.coding.decode_positive_u128(reader)
    }

    pub fn decode_positive_big(&self, reader: &mut dyn BitReader) -> Result<BigUint> {
        self.coding.decode_positive_big(reader)
    }

    // signed

    pub fn encode_signed_i32(&self, writer: &mut dyn BitWriter, value: i32) -> Result<u64> {
        self.coding.encode_raw(writer, signed_to_positive(value as i128))
    }

    pub fn encode_signed_i64(&self, writer: &mut dyn BitWriter, value: i64) -> Result<u64> {
        self.coding.encode_raw(writer, signed_to_positive(value as i128))
    }

    pub fn encode_signed_big(&self, writer: &mut dyn BitWriter, value: &BigInt) -> Result<u64> {
        let code = if value.is_positive() {
            value.magnitude() << 1u32
        } else {
            (value.magnitude() << 1u32) + BigUint::one()
        };
        self.coding.encode_positive_big(writer, &code)
    }

    pub fn decode_signed_i32(&self, reader: &mut dyn BitReader) -> Result<i32> {
        let code = self.coding.decode_fixed(reader, 64)?;
        i32::try_from(positive_to_signed(code))
            .map_err(|_| decode_err!("signed code {} does not fit a 32-bit integer", code))
    }

    pub fn decode_signed_i64(&self, reader: &mut dyn BitReader) -> Result<i64> {
        let code = self.coding.decode_fixed(reader, 128)?;
        i64::try_from(positive_to_signed(code))
            .map_err(|_| decode_err!("signed code {} does not fit a 64-bit integer", code))
    }

    pub fn decode_signed_big(&self, reader: &mut dyn BitReader) -> Result<BigInt> {
        let code = self.coding.decode_positive_big(reader)?;
        let magnitude = &code >> 1u32;
        let sign = if code.bit(0) { Sign::Minus } else { Sign::Plus };
        if magnitude.is_zero() {
            return Ok(BigInt::zero());
        }
        Ok(BigInt::from_biguint(sign, magnitude))
    }

    // optional

    pub fn encode_optional_u64(&self, writer: &mut dyn BitWriter, value: Option<u64>) -> Result<u64> {
        let code = match value {
            None => 1,
            Some(v) => v as u128 + 2,
        };
        self.coding.encode_raw(writer, code)
    }

    pub fn decode_optional_u64(&self, reader: &mut dyn BitReader) -> Result<Option<u64>> {
        let code = self.coding.decode_fixed(reader, 128)?;
        if code == 1 {
            return Ok(None);
        }
        u64::try_from(code - 2)
            .map(Some)
            .map_err(|_| decode_err!("optional code {} does not fit a 64-bit integer", code))
    }

    pub fn encode_optional_i64(&self, writer: &mut dyn BitWriter, value: Option<i64>) -> Result<u64> {
        let code = match value {
            None => 1,
            Some(v) => signed_to_positive(v as i128) + 1,
        };
        self.coding.encode_raw(writer, code)
    }

    pub fn decode_optional_i64(&self, reader: &mut dyn BitReader) -> Result<Option<i64>> {
        let code = self.coding.decode_fixed(reader, 128)?;
        if code == 1 {
            return Ok(None);
        }
        i64::try_from(positive_to_signed(code - 1))
            .map(Some)
            .map_err(|_| decode_err!("optional code {} does not fit a 64-bit integer", code))
    }

    // bounded

    /// Encodes `value` relative to a known lower bound
    pub fn encode_bounded_i64(
        &self,
        writer: &mut dyn BitWriter,
        value: i64,
        minimum: i64,
    ) -> Result<u64> {
        if value < minimum {
            return Err(invalid_arg_err!(
                "value {} is below the column minimum {}",
                value,
                minimum
            ));
        }
        let code = (value as i128 - minimum as i128) as u128 + 1;
        self.coding.encode_raw(writer, code)
    }

    pub fn decode_bounded_i64(&self, reader: &mut dyn BitReader, minimum: i64) -> Result<i64> {
        let code = self.coding.decode_fixed(reader, 128)?;
        let value = (code - 1)
            .to_i128()
            .map(|offset| minimum as i128 + offset)
            .and_then(|v| v.to_i64());
        value.ok_or_else(|| decode_err!("bounded code {} does not fit a 64-bit integer", code))
    }
}

impl Default for ExtendedCoding {
    fn default() -> Self {
        Self::omega()
    }
}
