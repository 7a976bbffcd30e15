//! Elias omega coding
//!
//! A value `n > 1` is written as the omega prefix of `bit_length(n) - 1`
//! followed by the binary form of `n`; `n = 1` has an empty prefix. A single
//! `0` bit terminates the code. The leading `1` of every group doubles as the
//! continuation flag, so the decoder starts from 1 and keeps reading groups
//! whose length is the value decoded so far.

use crate::bits::{BitReader, BitWriter};
use crate::coding::universal::{bit_length, UniversalCoding};
use crate::common::constants::DEFAULT_MAX_MAGNITUDE_BITS;
use crate::common::error::Result;
use crate::decode_err;
use num_bigint::BigUint;
use num_traits::One;

/// Recursive Elias omega code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliasOmegaCoding {
    max_magnitude_bits: u64,
}

impl EliasOmegaCoding {
    pub fn new() -> Self {
        Self {
            max_magnitude_bits: DEFAULT_MAX_MAGNITUDE_BITS,
        }
    }

    /// Coding whose arbitrary-precision decoder rejects magnitudes above `max_magnitude_bits`
    pub fn with_max_magnitude_bits(max_magnitude_bits: u64) -> Self {
        Self { max_magnitude_bits }
    }

    pub fn max_magnitude_bits(&self) -> u64 {
        self.max_magnitude_bits
    }

    fn encode_prefix(writer: &mut dyn BitWriter, value: u128) -> Result<u64> {
        if value == 1 {
            return Ok(0);
        }
        let size = bit_length(value);
        Ok(Self::encode_prefix(writer, (size - 1) as u128)? + writer.write_wide(value, size)? as u64)
    }

    fn encode_prefix_big(writer: &mut dyn BitWriter, value: &BigUint) -> Result<u64> {
        if value.is_one() {
            return Ok(0);
        }
        let size = value.bits();
        Ok(Self::encode_prefix(writer, (size - 1) as u128)? + writer.write_biguint(value, size)?)
    }

    fn prefix_len(value: u128) -> u64 {
        if value == 1 {
            return 0;
        }
        let size = bit_length(value);
        size as u64 + Self::prefix_len((size - 1) as u128)
    }
}

impl Default for EliasOmegaCoding {
    fn default() -> Self {
        Self::new()
    }
}

impl UniversalCoding for EliasOmegaCoding {
    fn name(&self) -> &'static str {
        "omega"
    }

    fn encode_raw(&self, writer: &mut dyn BitWriter, value: u128) -> Result<u64> {
        Ok(Self::encode_prefix(writer, value)? + writer.write_bit(false)? as u64)
    }

    fn encode_raw_big(&self, writer: &mut dyn BitWriter, value: &BigUint) -> Result<u64> {
        Ok(Self::encode_prefix_big(writer, value)? + writer.write_bit(false)? as u64)
    }

    fn decode_fixed(&self, reader: &mut dyn BitReader, width: u32) -> Result<u128> {
        let mut value: u128 = 1;
        while reader.read_bit()? {
            if value >= width as u128 {
                return Err(decode_err!("value too large for {}-bit integer", width));
            }
            let size = value as u32;
            value = (1u128 << size) | reader.read_wide(size)?;
        }
        Ok(value)
    }

    fn decode_big(&self, reader: &mut dyn BitReader) -> Result<BigUint> {
        let mut value: u64 = 1;
        while reader.read_bit()? {
            if value < 32 {
                value = (1u64 << value) | reader.read(value as u32)?;
                continue;
            }
            if value > self.max_magnitude_bits {
                return Err(decode_err!(
                    "magnitude of {} bits exceeds the limit of {} bits",
                    value,
                    self.max_magnitude_bits
                ));
            }
            let magnitude = reader.read_biguint(value)? | (BigUint::one() << value);
            if reader.read_bit()? {
                return Err(decode_err!("value too large for an arbitrary-precision integer"));
            }
            return Ok(magnitude);
        }
        Ok(BigUint::from(value))
    }

    fn encoded_len(&self, value: u128) -> u64 {
        Self::prefix_len(value) + 1
    }
}
