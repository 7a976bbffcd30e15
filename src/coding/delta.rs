//! Elias delta coding
//!
//! `n` is written as its bit length `L` in Elias gamma form (`bit_length(L) - 1`
//! zeros, then `L` in binary) followed by the low `L - 1` bits of `n`.

use crate::bits::{BitReader, BitWriter};
use crate::coding::universal::{bit_length, UniversalCoding};
use crate::common::constants::DEFAULT_MAX_MAGNITUDE_BITS;
use crate::common::error::Result;
use crate::decode_err;
use num_bigint::BigUint;
use num_traits::One;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EliasDeltaCoding {
    max_magnitude_bits: u64,
}

impl EliasDeltaCoding {
    pub fn new() -> Self {
        Self {
            max_magnitude_bits: DEFAULT_MAX_MAGNITUDE_BITS,
        }
    }

    pub fn with_max_magnitude_bits(max_magnitude_bits: u64) -> Self {
        Self { max_magnitude_bits }
    }

    fn encode_length(writer: &mut dyn BitWriter, length: u64) -> Result<u64> {
        let size = bit_length(length);
        let zeros = writer.write(0, size - 1)?;
        Ok((zeros + writer.write(length, size)?) as u64)
    }

    /// Reads the gamma-coded bit length, allowing at most `max_zeros` leading zeros
    fn decode_length(reader: &mut dyn BitReader, max_zeros: u32) -> Result<u64> {
        let mut zeros = 0u32;
        while !reader.read_bit()? {
            zeros += 1;
            if zeros > max_zeros {
                return Err(decode_err!("length prefix of {} zeros is too long", zeros));
            }
        }
        Ok((1u64 << zeros) | reader.read(zeros)?)
    }
}

impl Default for EliasDeltaCoding {
    fn default() -> Self {
        Self::new()
    }
}

impl UniversalCoding for EliasDeltaCoding {
    fn name(&self) -> &'static str {
        "delta"
    }

    fn encode_raw(&self, writer: &mut dyn BitWriter, value: u128) -> Result<u64> {
        let length = bit_length(value);
        let prefix = Self::encode_length(writer, length as u64)?;
        Ok(prefix + writer.write_wide(value, length - 1)? as u64)
    }

    fn encode_raw_big(&self, writer: &mut dyn BitWriter, value: &BigUint) -> Result<u64> {
        let length = value.bits();
        let prefix = Self::encode_length(writer, length)?;
        Ok(prefix + writer.write_biguint(value, length - 1)?)
    }

    fn decode_fixed(&self, reader: &mut dyn BitReader, width: u32) -> Result<u128> {
        let length = Self::decode_length(reader, bit_length(width) - 1)?;
        if length > width as u64 {
            return Err(decode_err!("value too large for {}-bit integer", width));
        }
        let size = (length - 1) as u32;
        Ok((1u128 << size) | reader.read_wide(size)?)
    }

    fn decode_big(&self, reader: &mut dyn BitReader) -> Result<BigUint> {
        let length = Self::decode_length(reader, 63)?;
        let size = length - 1;
        if size > self.max_magnitude_bits {
            return Err(decode_err!(
                "magnitude of {} bits exceeds the limit of {} bits",
                size,
                self.max_magnitude_bits
            ));
        }
        if size < 64 {
            return Ok(BigUint::from((1u64 << size) | reader.read(size as u32)?));
        }
        Ok(reader.read_biguint(size)? | (BigUint::one() << size))
    }

    fn encoded_len(&self, value: u128) -> u64 {
        let length = bit_length(value) as u64;
        2 * (bit_length(length) as u64 - 1) + length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{MemoryBitReader, MemoryBitWriter};

    #[test]
    fn test_known_codes() {
        // 1 -> 1, 2 -> 010 0, 4 -> 011 00
        let coding = EliasDeltaCoding::new();
        let mut writer = MemoryBitWriter::new();
        assert_eq!(coding.encode_positive_u32(&mut writer, 1).unwrap(), 1);
        assert_eq!(coding.encode_positive_u32(&mut writer, 2).unwrap(), 4);
        assert_eq!(coding.encode_positive_u32(&mut writer, 4).unwrap(), 5);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..], &[0b1010_0011, 0b0000_0000]);
    }

    #[test]
    fn test_round_trip_mixed_widths() {
        let coding = EliasDeltaCoding::new();
        let values = [1u128, 2, 3, 17, 255, 256, (1 << 31) - 1, 1 << 53, u128::MAX];
        let mut writer = MemoryBitWriter::new();
        for value in values {
            let bits = coding.encode_positive_u128(&mut writer, value).unwrap();
            assert_eq!(bits, coding.encoded_len(value));
        }
        let len = writer.position();
        let mut reader = MemoryBitReader::with_bit_len(writer.into_bytes(), len).unwrap();
        for value in values {
            assert_eq!(coding.decode_positive_u128(&mut reader).unwrap(), value);
        }
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_big_round_trip() {
        let coding = EliasDeltaCoding::new();
        let value = (BigUint::one() << 199u32) + BigUint::from(99u8);
        let mut writer = MemoryBitWriter::new();
        coding.encode_positive_big(&mut writer, &value).unwrap();
        let len = writer.position();
        let mut reader = MemoryBitReader::with_bit_len(writer.into_bytes(), len).unwrap();
        assert_eq!(coding.decode_positive_big(&mut reader).unwrap(), value);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_narrow_decode_overflows() {
        let coding = EliasDeltaCoding::new();
        let mut writer = MemoryBitWriter::new();
        coding.encode_positive_u64(&mut writer, u64::MAX).unwrap();
        let mut reader = MemoryBitReader::new(writer.into_bytes());
        assert!(coding.decode_positive_u32(&mut reader).is_err());
    }
}
