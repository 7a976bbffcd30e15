//! Bit streams over `std::io` sinks and sources
//!
//! Bytes are handed to the inner writer as soon as they fill up, so callers
//! should wrap files in `BufWriter`/`BufReader`.

use crate::bits::{BitReader, BitWriter};
use crate::common::error::{BitrowError, Result};
use crate::decode_err;
use std::io::{ErrorKind, Read, Write};

/// Bit writer over any `io::Write`
#[derive(Debug)]
pub struct StreamBitWriter<W: Write> {
    inner: W,
    current: u8,
    filled: u32,
    position: u64,
}

impl<W: Write> StreamBitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            current: 0,
            filled: 0,
            position: 0,
        }
    }

    /// Pads, flushes and returns the inner writer
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> BitWriter for StreamBitWriter<W> {
    fn write_bit(&mut self, bit: bool) -> Result<u32> {
        self.current = (self.current << 1) | bit as u8;
        self.filled += 1;
        if self.filled == 8 {
            self.inner.write_all(&[self.current])?;
            self.current = 0;
            self.filled = 0;
        }
        self.position += 1;
        Ok(1)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn flush(&mut self) -> Result<u32> {
        let mut padding = 0;
        if self.filled > 0 {
            padding = 8 - self.filled;
            self.inner.write_all(&[self.current << padding])?;
            self.current = 0;
            self.filled = 0;
            self.position += padding as u64;
        }
        self.inner.flush()?;
        Ok(padding)
    }
}

/// Bit reader over any `io::Read`
#[derive(Debug)]
pub struct StreamBitReader<R: Read> {
    inner: R,
    current: u8,
    available: u32,
    position: u64,
}

impl<R: Read> StreamBitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            available: 0,
            position: 0,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> BitReader for StreamBitReader<R> {
    fn read_bit(&mut self) -> Result<bool> {
        if self.available == 0 {
            let mut byte = [0u8; 1];
            match self.inner.read_exact(&mut byte) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Err(decode_err!("end of stream at bit {}", self.position));
                }
                Err(e) => return Err(BitrowError::Io(e)),
            }
            self.current = byte[0];
            self.available = 8;
        }
        self.available -= 1;
        self.position += 1;
        Ok((self.current >> self.available) & 1 == 1)
    }

    fn position(&self) -> u64 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_stream_round_trip() {
        let mut writer = StreamBitWriter::new(Vec::new());
        writer.write(0b1011, 4).unwrap();
        writer.write(0x1234_5678_9ABC, 48).unwrap();
        let bytes = writer.into_inner().unwrap();
        assert_eq!(bytes.len(), 7);

        let mut reader = StreamBitReader::new(Cursor::new(bytes));
        assert_eq!(reader.read(4).unwrap(), 0b1011);
        assert_eq!(reader.read(48).unwrap(), 0x1234_5678_9ABC);
        assert_eq!(reader.read(4).unwrap(), 0);
        assert!(matches!(reader.read_bit(), Err(BitrowError::Decode(_))));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_io_errors_propagate() {
        let mut writer = StreamBitWriter::new(FailingWriter);
        let result = writer.write(0xFF, 8);
        assert!(matches!(result, Err(BitrowError::Io(_))));
    }
}
