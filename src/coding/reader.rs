//! Coded reader: one bit stream bound to one extended coding

use crate::bits::BitReader;
use crate::coding::extended::ExtendedCoding;
use crate::common::constants::MAX_FIXED_BITS;
use crate::common::error::Result;
use crate::invalid_arg_err;
use num_bigint::{BigInt, BigUint};

/// Typed read cursor, the mirror of [`CodedWriter`](crate::coding::CodedWriter)
#[derive(Debug)]
pub struct CodedReader<R: BitReader> {
    reader: R,
    coding: ExtendedCoding,
}

impl<R: BitReader> CodedReader<R> {
    pub fn new(reader: R, coding: ExtendedCoding) -> Self {
        Self { reader, coding }
    }

    pub fn coding(&self) -> &ExtendedCoding {
        &self.coding
    }

    /// Bits consumed so far
    pub fn position(&self) -> u64 {
        self.reader.position()
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn read_positive_int(&mut self) -> Result<u32> {
        self.coding.decode_positive_u32(&mut self.reader)
    }

    pub fn read_positive_long(&mut self) -> Result<u64> {
        self.coding.decode_positive_u64(&mut self.reader)
    }

    pub fn read_positive_wide(&mut self) -> Result<u128> {
        self.coding.decode_positive_u128(&mut self.reader)
    }

    pub fn read_positive_big_int(&mut self) -> Result<BigUint> {
        self.coding.decode_positive_big(&mut self.reader)
    }

    pub fn read_int(&mut self) -> Result<i32> {
        self.coding.decode_signed_i32(&mut self.reader)
    }

    pub fn read_long(&mut self) -> Result<i64> {
        self.coding.decode_signed_i64(&mut self.reader)
    }

    pub fn read_big_int(&mut self) -> Result<BigInt> {
        self.coding.decode_signed_big(&mut self.reader)
    }

    pub fn read_optional_long(&mut self) -> Result<Option<u64>> {
        self.coding.decode_optional_u64(&mut self.reader)
    }

    pub fn read_optional_signed_long(&mut self) -> Result<Option<i64>> {
        self.coding.decode_optional_i64(&mut self.reader)
    }

    pub fn read_bounded_long(&mut self, minimum: i64) -> Result<i64> {
        self.coding.decode_bounded_i64(&mut self.reader, minimum)
    }

    pub fn read_boolean(&mut self) -> Result<bool> {
        self.reader.read_bit()
    }

    pub fn read_fixed(&mut self, bits: u32) -> Result<u64> {
        if bits > MAX_FIXED_BITS {
            return Err(invalid_arg_err!("fixed field of {} bits is too wide", bits));
        }
        self.reader.read(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{MemoryBitReader, MemoryBitWriter};
    use crate::coding::CodedWriter;

    #[test]
    fn test_mirrors_writer() {
        let big = BigUint::from(3u8) << 190u32;
        let mut writer = CodedWriter::new(MemoryBitWriter::new(), ExtendedCoding::omega());
        writer.write_positive_int(255).unwrap();
        writer.write_int(-5).unwrap();
        writer.write_positive_big_int(&big).unwrap();
        writer.write_bounded_long(30, 10).unwrap();
        writer.write_optional_signed_long(Some(-2)).unwrap();
        writer.write_fixed(9, 4).unwrap();
        writer.write_boolean(false).unwrap();
        let len = writer.position();

        let bytes = writer.into_inner().into_bytes();
        let stream = MemoryBitReader::with_bit_len(bytes, len).unwrap();
        let mut reader = CodedReader::new(stream, ExtendedCoding::omega());
        assert_eq!(reader.read_positive_int().unwrap(), 255);
        assert_eq!(reader.read_int().unwrap(), -5);
        assert_eq!(reader.read_positive_big_int().unwrap(), big);
        assert_eq!(reader.read_bounded_long(10).unwrap(), 30);
        assert_eq!(reader.read_optional_signed_long().unwrap(), Some(-2));
        assert_eq!(reader.read_fixed(4).unwrap(), 9);
        assert!(!reader.read_boolean().unwrap());
        assert_eq!(reader.position(), len);
    }
}
