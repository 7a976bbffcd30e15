//! Position statistics
//!
//! Accumulated over a compaction run and persisted once at its end, so a
//! later indexed-access session over the same data knows:
//! - the lowest and highest row position written
//! - the width of a uniform index entry covering every position
//! - the total number of bits written
//!
//! ## Persisted format:
//! Four universal codes in field order. Each field is shifted by `+1`, which
//! turns the unset sentinel into `0`, and the shifted value is written as a
//! bounded integer with minimum `0` (code `field + 2`). An unset field needs
//! no presence flag. There is no header at this layer.
//!
//! This is one more than the `field + 1` code a plain "shift by one" reading
//! would suggest: the bounded embedding adds its own `+1` so the smallest
//! value maps to code `1`. An unset field is therefore code `1`, and readers
//! of other implementations must subtract two, not one.

use crate::bits::{BitReader, BitWriter, MemoryBitReader, MemoryBitWriter, StreamBitReader, StreamBitWriter};
use crate::coding::{bit_length, CodedReader, CodedWriter, ExtendedCoding};
use crate::common::constants::POSITION_STATS_NAME;
use crate::common::error::Result;
use crate::storage::index::IndexStats;
use crate::{decode_err, invalid_arg_err};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Value of a field nothing has been recorded for
pub const UNSET: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStats {
    pub bottom_position: i64,
    pub top_position: i64,
    pub fixed_bit_size: i32,
    pub bits_written: i64,
}

impl PositionStats {
    pub fn new() -> Self {
        Self {
            bottom_position: UNSET,
            top_position: UNSET,
            fixed_bit_size: UNSET as i32,
            bits_written: UNSET,
        }
    }

    /// Whether at least one position has been recorded
    pub fn is_set(&self) -> bool {
        self.bottom_position != UNSET
    }

    /// `top - bottom`, once a position has been recorded
    pub fn span(&self) -> Option<u64> {
        self.is_set()
            .then(|| (self.top_position - self.bottom_position) as u64)
    }

    /// Records a row starting at `position` that occupied `bits` bits
    pub fn record(&mut self, position: i64, bits: u64) -> Result<()> {
        if position < 0 {
            return Err(invalid_arg_err!("negative position {}", position));
        }
        if self.is_set() {
            self.bottom_position = self.bottom_position.min(position);
            self.top_position = self.top_position.max(position);
        } else {
            self.bottom_position = position;
            self.top_position = position;
        }
        self.fixed_bit_size = bit_length(self.top_position - self.bottom_position) as i32;
        let bits = i64::try_from(bits).map_err(|_| invalid_arg_err!("row of {} bits", bits))?;
        self.bits_written = self.bits_written.max(0) + bits;
        Ok(())
    }

    /// Merges the stats of another run over a disjoint set of rows
    pub fn merge(&mut self, other: &PositionStats) {
        if !other.is_set() {
            return;
        }
        if self.is_set() {
            self.bottom_position = self.bottom_position.min(other.bottom_position);
            self.top_position = self.top_position.max(other.top_position);
        } else {
            self.bottom_position = other.bottom_position;
            self.top_position = other.top_position;
        }
        self.fixed_bit_size = bit_length(self.top_position - self.bottom_position) as i32;
        self.bits_written = self.bits_written.max(0) + other.bits_written.max(0);
    }

    fn fields(&self) -> [i64; 4] {
        [
            self.bottom_position,
            self.top_position,
            self.fixed_bit_size as i64,
            self.bits_written,
        ]
    }

    /// Serializes into an in-memory buffer, padded to a whole byte
    pub fn to_bytes(&self, coding: &ExtendedCoding) -> Result<Bytes> {
        let mut writer = CodedWriter::new(MemoryBitWriter::new(), coding.clone());
        self.write_to(&mut writer)?;
        Ok(writer.into_inner().into_bytes())
    }

    pub fn from_bytes(data: Bytes, coding: &ExtendedCoding) -> Result<Self> {
        let mut reader = CodedReader::new(MemoryBitReader::new(data), coding.clone());
        Self::read_from(&mut reader)
    }

    /// Serializes into `sink` and hands it back once flushed
    pub fn write_to_stream<W: Write>(&self, sink: W, coding: &ExtendedCoding) -> Result<W> {
        let mut writer = CodedWriter::new(StreamBitWriter::new(sink), coding.clone());
        self.write_to(&mut writer)?;
        writer.into_inner().into_inner()
    }

    pub fn read_from_stream<R: Read>(source: R, coding: &ExtendedCoding) -> Result<Self> {
        let mut reader = CodedReader::new(StreamBitReader::new(source), coding.clone());
        Self::read_from(&mut reader)
    }
}

impl Default for PositionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexStats for PositionStats {
    fn name(&self) -> &'static str {
        POSITION_STATS_NAME
    }

    fn write_to<W: BitWriter>(&self, writer: &mut CodedWriter<W>) -> Result<u64> {
        let mut bits = 0;
        for field in self.fields() {
            if field < UNSET {
                return Err(invalid_arg_err!("position stats field {} below {}", field, UNSET));
            }
            bits += writer.write_bounded_long(field, UNSET)?;
        }
        Ok(bits)
    }

    fn read_from<R: BitReader>(reader: &mut CodedReader<R>) -> Result<Self> {
        let bottom_position = reader.read_bounded_long(UNSET)?;
        let top_position = reader.read_bounded_long(UNSET)?;
        let fixed_bit_size = reader.read_bounded_long(UNSET)?;
        let bits_written = reader.read_bounded_long(UNSET)?;
        let fixed_bit_size = i32::try_from(fixed_bit_size)
            .map_err(|_| decode_err!("fixed bit size {} out of range", fixed_bit_size))?;
        Ok(Self {
            bottom_position,
            top_position,
            fixed_bit_size,
            bits_written,
        })
    }
}
