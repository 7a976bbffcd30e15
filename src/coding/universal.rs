//! Universal coding contract
//!
//! A universal code maps every positive integer to a prefix-free bit
//! sequence. The wire form of a value never depends on the machine width used
//! to produce it: a value written through `encode_positive_u32` decodes with
//! `decode_positive_u128` and vice versa. Decoding into a width too narrow for
//! the value is a decode error.

use crate::bits::{BitReader, BitWriter};
use crate::common::error::Result;
use crate::invalid_arg_err;
use num_bigint::BigUint;
use num_traits::{PrimInt, ToPrimitive, Zero};
use std::fmt;

/// Number of significant bits in `value` (0 for zero)
pub fn bit_length<T: PrimInt>(value: T) -> u32 {
    T::zero().count_zeros() - value.leading_zeros()
}

/// Positive-integer code shared by every coded reader and writer
///
/// Implementations are stateless after construction and can be shared
/// freely between threads.
pub trait UniversalCoding: Send + Sync + fmt::Debug {
    /// Short name used in logs and configuration
    fn name(&self) -> &'static str;

    /// Encodes `value` (at least 1) without checking the contract
    fn encode_raw(&self, writer: &mut dyn BitWriter, value: u128) -> Result<u64>;

    /// Encodes an arbitrary-precision `value` (at least 1) without checking the contract
    fn encode_raw_big(&self, writer: &mut dyn BitWriter, value: &BigUint) -> Result<u64>;

    /// Decodes a value that must fit in `width` bits (at most 128)
    fn decode_fixed(&self, reader: &mut dyn BitReader, width: u32) -> Result<u128>;

    /// Decodes an arbitrary-precision value
    fn decode_big(&self, reader: &mut dyn BitReader) -> Result<BigUint>;

    /// Number of bits `encode_raw` would produce for `value`
    fn encoded_len(&self, value: u128) -> u64;

    fn encode_positive_u32(&self, writer: &mut dyn BitWriter, value: u32) -> Result<u64> {
        if value == 0 {
            return Err(invalid_arg_err!("universal codes cannot encode zero"));
        }
        self.encode_raw(writer, value as u128)
    }

    fn encode_positive_u64(&self, writer: &mut dyn BitWriter, value: u64) -> Result<u64> {
        if value == 0 {
            return Err(invalid_arg_err!("universal codes cannot encode zero"));
        }
        self.encode_raw(writer, value as u128)
    }

    fn encode_positive_u128(&self, writer: &mut dyn BitWriter, value: u128) -> Result<u64> {
        if value == 0 {
            return Err(invalid_arg_err!("universal codes cannot encode zero"));
        }
        self.encode_raw(writer, value)
    }

    fn encode_positive_big(&self, writer: &mut dyn BitWriter, value: &BigUint) -> Result<u64> {
        if value.is_zero() {
            return Err(invalid_arg_err!("universal codes cannot encode zero"));
        }
        match value.to_u128() {
            Some(small) => self.encode_raw(writer, small),
            None => self.encode_raw_big(writer, value),
        }
    }

    fn decode_positive_u32(&self, reader: &mut dyn BitReader) -> Result<u32> {
        Ok(self.decode_fixed(reader, 32)? as u32)
    }

    fn decode_positive_u64(&self, reader: &mut dyn BitReader) -> Result<u64> {
        Ok(self.decode_fixed(reader, 64)? as u64)
    }

    fn decode_positive_u128(&self, reader: &mut dyn BitReader) -> Result<u128> {
        self.decode_fixed(reader, 128)
    }

    fn decode_positive_big(&self, reader: &mut dyn BitReader) -> Result<BigUint> {
        self.decode_big(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0u32), 0);
        assert_eq!(bit_length(1u32), 1);
        assert_eq!(bit_length(17u64), 5);
        assert_eq!(bit_length(u64::MAX), 64);
        assert_eq!(bit_length(1u128 << 100), 101);
    }
}
