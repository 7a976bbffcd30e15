//! Index statistics
//!
//! Summaries written once at the end of a compaction run and read once at the
//! start of a later indexed-access session over the same data. Every summary
//! is encoded with the same extended coding as the data it describes.

pub mod position;

pub use position::{PositionStats, UNSET};

use crate::bits::{BitReader, BitWriter};
use crate::coding::{CodedReader, CodedWriter};
use crate::common::error::Result;

/// A summary persisted alongside compacted data
pub trait IndexStats: Sized {
    /// Stable identifier of the summary kind
    fn name(&self) -> &'static str;

    /// Writes the summary; returns the bits written
    fn write_to<W: BitWriter>(&self, writer: &mut CodedWriter<W>) -> Result<u64>;

    fn read_from<R: BitReader>(reader: &mut CodedReader<R>) -> Result<Self>;
}
