//! In-memory bit streams backed by `bytes`

use crate::bits::{BitReader, BitWriter};
use crate::common::error::Result;
use crate::{decode_err, invalid_arg_err};
use bytes::{BufMut, Bytes, BytesMut};

/// Append-only bit buffer
#[derive(Debug, Default)]
pub struct MemoryBitWriter {
    buffer: BytesMut,
    current: u8,
    filled: u32,
    position: u64,
}

impl MemoryBitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(bytes),
            ..Default::default()
        }
    }

    /// Pads the final byte and hands back the buffer
    pub fn into_bytes(mut self) -> Bytes {
        self.pad();
        self.buffer.freeze()
    }

    fn pad(&mut self) -> u32 {
        if self.filled == 0 {
            return 0;
        }
        let padding = 8 - self.filled;
        self.buffer.put_u8(self.current << padding);
        self.current = 0;
        self.filled = 0;
        self.position += padding as u64;
        padding
    }
}

impl BitWriter for MemoryBitWriter {
    fn write_bit(&mut self, bit: bool) -> Result<u32> {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        self.position += 1;
        if self.filled == 8 {
            self.buffer.put_u8(self.current);
            self.current = 0;
            self.filled = 0;
        }
        Ok(1)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn flush(&mut self) -> Result<u32> {
        Ok(self.pad())
    }

    fn write(&mut self, bits: u64, count: u32) -> Result<u32> {
        if count > 64 {
            return Err(invalid_arg_err!("cannot write {} bits from a 64-bit word", count));
        }
        let mut remaining = count;
        // top up the partial byte, then emit whole bytes directly
        while remaining > 0 && self.filled != 0 {
            remaining -= 1;
            self.write_bit((bits >> remaining) & 1 == 1)?;
        }
        while remaining >= 8 {
            remaining -= 8;
            self.buffer.put_u8((bits >> remaining) as u8);
            self.position += 8;
        }
        while remaining > 0 {
            remaining -= 1;
            self.write_bit((bits >> remaining) & 1 == 1)?;
        }
        Ok(count)
    }
}

/// Forward-only reader over an in-memory buffer
///
/// The reader is bounded by an explicit bit length so that trailing padding
/// is never mistaken for data.
#[derive(Debug, Clone)]
pub struct MemoryBitReader {
    data: Bytes,
    bit_len: u64,
    position: u64,
}

impl MemoryBitReader {
    /// Reader over every bit of `data`
    pub fn new(data: Bytes) -> Self {
        let bit_len = data.len() as u64 * 8;
        Self {
            data,
            bit_len,
            position: 0,
        }
    }

    /// Reader over the first `bit_len` bits of `data`
    pub fn with_bit_len(data: Bytes, bit_len: u64) -> Result<Self> {
        if bit_len > data.len() as u64 * 8 {
            return Err(invalid_arg_err!(
                "bit length {} exceeds buffer of {} bytes",
                bit_len,
                data.len()
            ));
        }
        Ok(Self {
            data,
            bit_len,
            position: 0,
        })
    }

    /// Bits left before the end of the stream
    pub fn remaining(&self) -> u64 {
        self.bit_len - self.position
    }
}

impl BitReader for MemoryBitReader {
    fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.bit_len {
            return Err(decode_err!("end of stream at bit {}", self.position));
        }
        let byte = self.data[(self.position / 8) as usize];
        let bit = (byte >> (7 - (self.position % 8))) & 1 == 1;
        self.position += 1;
        Ok(bit)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn read_biguint(&mut self, count: u64) -> Result<num_bigint::BigUint> {
        // refuse before allocating for a magnitude that cannot be present
        if count > self.remaining() {
            return Err(decode_err!(
                "magnitude of {} bits exceeds the {} bits remaining",
                count,
                self.remaining()
            ));
        }
        let mut bytes = Vec::with_capacity(count.div_ceil(8) as usize);
        let lead = (count % 8) as u32;
        if lead > 0 {
            bytes.push(self.read(lead)? as u8);
        }
        for _ in 0..count / 8 {
            bytes.push(self.read(8)? as u8);
        }
        Ok(num_bigint::BigUint::from_bytes_be(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_order_is_msb_first() {
        let mut writer = MemoryBitWriter::new();
        writer.write_bit(true).unwrap();
        writer.write(0b0000001, 7).unwrap();
        writer.write(0xAB, 8).unwrap();
        assert_eq!(&writer.into_bytes()[..], &[0b1000_0001, 0xAB]);
    }

    #[test]
    fn test_padding_counts_toward_position() {
        let mut writer = MemoryBitWriter::new();
        writer.write(0b11, 2).unwrap();
        assert_eq!(writer.position(), 2);
        assert_eq!(writer.flush().unwrap(), 6);
        assert_eq!(writer.position(), 8);
        assert_eq!(writer.flush().unwrap(), 0);
    }

    #[test]
    fn test_unaligned_word_writes() {
        let mut writer = MemoryBitWriter::new();
        writer.write(0b101, 3).unwrap();
        writer.write(0xDEAD_BEEF, 32).unwrap();
        writer.write(0b1, 1).unwrap();
        let len = writer.position();
        let mut reader = MemoryBitReader::with_bit_len(writer.into_bytes(), len).unwrap();
        assert_eq!(reader.read(3).unwrap(), 0b101);
        assert_eq!(reader.read(32).unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read(1).unwrap(), 1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_bounded_reader() {
        let data = Bytes::from_static(&[0xFF]);
        assert!(MemoryBitReader::with_bit_len(data.clone(), 9).is_err());

        let mut reader = MemoryBitReader::with_bit_len(data, 3).unwrap();
        assert_eq!(reader.read(3).unwrap(), 0b111);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_biguint_larger_than_stream() {
        let mut reader = MemoryBitReader::new(Bytes::from_static(&[0u8; 4]));
        assert!(reader.read_biguint(1 << 20).is_err());
        assert_eq!(reader.position(), 0);
    }
}
