//! Coded writer: one bit stream bound to one extended coding

use crate::bits::BitWriter;
use crate::coding::extended::ExtendedCoding;
use crate::common::constants::MAX_FIXED_BITS;
use crate::common::error::Result;
use crate::invalid_arg_err;
use num_bigint::{BigInt, BigUint};

/// Typed write cursor
///
/// Every write returns the number of bits produced. The underlying stream is
/// only reachable again through [`CodedWriter::into_inner`].
#[derive(Debug)]
pub struct CodedWriter<W: BitWriter> {
    writer: W,
    coding: ExtendedCoding,
}

impl<W: BitWriter> CodedWriter<W> {
    pub fn new(writer: W, coding: ExtendedCoding) -> Self {
        Self { writer, coding }
    }

    pub fn coding(&self) -> &ExtendedCoding {
        &self.coding
    }

    /// Bits written so far
    pub fn position(&self) -> u64 {
        self.writer.position()
    }

    /// Pads to a byte boundary; returns the padding bits
    pub fn flush(&mut self) -> Result<u64> {
        Ok(self.writer.flush()? as u64)
    }

    /// Hands back the underlying stream
    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn write_positive_int(&mut self, value: u32) -> Result<u64> {
        self.coding.encode_positive_u32(&mut self.writer, value)
    }

    pub fn write_positive_long(&mut self, value: u64) -> Result<u64> {
        self.coding.encode_positive_u64(&mut self.writer, value)
    }

    pub fn write_positive_wide(&mut self, value: u128) -> Result<u64> {
        self.coding.encode_positive_u128(&mut self.writer, value)
    }

    pub fn write_positive_big_int(&mut self, value: &BigUint) -> Result<u64> {
        self.coding.encode_positive_big(&mut self.writer, value)
    }

    pub fn write_int(&mut self, value: i32) -> Result<u64> {
        self.coding.encode_signed_i32(&mut self.writer, value)
    }

    pub fn write_long(&mut self, value: i64) -> Result<u64> {
        self.coding.encode_signed_i64(&mut self.writer, value)
    }

    pub fn write_big_int(&mut self, value: &BigInt) -> Result<u64> {
        self.coding.encode_signed_big(&mut self.writer, value)
    }

    pub fn write_optional_long(&mut self, value: Option<u64>) -> Result<u64> {
        self.coding.encode_optional_u64(&mut self.writer, value)
    }

    pub fn write_optional_signed_long(&mut self, value: Option<i64>) -> Result<u64> {
        self.coding.encode_optional_i64(&mut self.writer, value)
    }

    pub fn write_bounded_long(&mut self, value: i64, minimum: i64) -> Result<u64> {
        self.coding.encode_bounded_i64(&mut self.writer, value, minimum)
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<u64> {
        Ok(self.writer.write_bit(value)? as u64)
    }

    /// Writes the low `bits` bits of `value` as a plain binary field
    pub fn write_fixed(&mut self, value: u64, bits: u32) -> Result<u64> {
        if bits > MAX_FIXED_BITS {
            return Err(invalid_arg_err!("fixed field of {} bits is too wide", bits));
        }
        if bits < 64 && value >> bits != 0 {
            return Err(invalid_arg_err!("value {} does not fit a {}-bit field", value, bits));
        }
        Ok(self.writer.write(value, bits)? as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::MemoryBitWriter;

    #[test]
    fn test_bit_counts_track_position() {
        let mut writer = CodedWriter::new(MemoryBitWriter::new(), ExtendedCoding::omega());
        let mut total = 0;
        total += writer.write_positive_int(1).unwrap();
        total += writer.write_long(-5).unwrap();
        total += writer.write_boolean(true).unwrap();
        total += writer.write_fixed(17, 5).unwrap();
        total += writer.write_optional_long(None).unwrap();
        assert_eq!(total, writer.position());
    }

    #[test]
    fn test_fixed_rejects_wide_values() {
        let mut writer = CodedWriter::new(MemoryBitWriter::new(), ExtendedCoding::omega());
        assert!(writer.write_fixed(32, 5).is_err());
        assert!(writer.write_fixed(0, 65).is_err());
        assert_eq!(writer.write_fixed(u64::MAX, 64).unwrap(), 64);
        assert_eq!(writer.write_fixed(0, 0).unwrap(), 0);
    }
}
