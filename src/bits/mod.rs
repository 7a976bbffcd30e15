//! Bit-stream primitives
//!
//! Everything above this module sees a stream only through [`BitWriter`] and
//! [`BitReader`]. Bits are written most significant first, a stream only ever
//! grows at its end and is consumed strictly forwards.
//!
//! Two backings are provided:
//! - [`MemoryBitWriter`] / [`MemoryBitReader`]: in-memory buffers (`bytes`)
//! - [`StreamBitWriter`] / [`StreamBitReader`]: any `io::Write` / `io::Read`

pub mod memory;
pub mod stream;

pub use memory::{MemoryBitReader, MemoryBitWriter};
pub use stream::{StreamBitReader, StreamBitWriter};

use crate::common::error::Result;
use crate::invalid_arg_err;
use num_bigint::BigUint;

/// Sink for individual bits
///
/// Every write returns the number of bits it produced.
pub trait BitWriter {
    /// Writes a single bit
    fn write_bit(&mut self, bit: bool) -> Result<u32>;

    /// Number of bits written so far, padding included
    fn position(&self) -> u64;

    /// Pads the stream to a byte boundary with zero bits and flushes any
    /// underlying sink; returns the number of padding bits
    fn flush(&mut self) -> Result<u32>;

    /// Writes the low `count` bits of `bits`, most significant first
    fn write(&mut self, bits: u64, count: u32) -> Result<u32> {
        if count > 64 {
            return Err(invalid_arg_err!("cannot write {} bits from a 64-bit word", count));
        }
        for i in (0..count).rev() {
            self.write_bit((bits >> i) & 1 == 1)?;
        }
        Ok(count)
    }

    /// Writes the low `count` bits of a 128-bit word
    fn write_wide(&mut self, bits: u128, count: u32) -> Result<u32> {
        if count > 128 {
            return Err(invalid_arg_err!("cannot write {} bits from a 128-bit word", count));
        }
        if count > 64 {
            self.write((bits >> 64) as u64, count - 64)?;
            self.write(bits as u64, 64)?;
        } else {
            self.write(bits as u64, count)?;
        }
        Ok(count)
    }

    /// Writes the low `count` bits of an arbitrary-precision magnitude
    fn write_biguint(&mut self, value: &BigUint, count: u64) -> Result<u64> {
        for i in (0..count).rev() {
            self.write_bit(value.bit(i))?;
        }
        Ok(count)
    }
}

/// Source of individual bits
pub trait BitReader {
    /// Reads a single bit
    fn read_bit(&mut self) -> Result<bool>;

    /// Number of bits consumed so far
    fn position(&self) -> u64;

    /// Reads `count` bits (at most 64) as an unsigned word
    fn read(&mut self, count: u32) -> Result<u64> {
        if count > 64 {
            return Err(invalid_arg_err!("cannot read {} bits into a 64-bit word", count));
        }
        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u64;
        }
        Ok(value)
    }

    /// Reads `count` bits (at most 128) as an unsigned word
    fn read_wide(&mut self, count: u32) -> Result<u128> {
        if count > 128 {
            return Err(invalid_arg_err!("cannot read {} bits into a 128-bit word", count));
        }
        if count > 64 {
            let high = self.read(count - 64)? as u128;
            let low = self.read(64)? as u128;
            Ok((high << 64) | low)
        } else {
            Ok(self.read(count)? as u128)
        }
    }

    /// Reads `count` bits as an arbitrary-precision magnitude
    fn read_biguint(&mut self, count: u64) -> Result<BigUint> {
        let mut bytes = Vec::with_capacity(count.div_ceil(8) as usize);
        let lead = (count % 8) as u32;
        if lead > 0 {
            bytes.push(self.read(lead)? as u8);
        }
        for _ in 0..count / 8 {
            bytes.push(self.read(8)? as u8);
        }
        Ok(BigUint::from_bytes_be(&bytes))
    }
}
