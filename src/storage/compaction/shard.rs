//! Sharded compaction
//!
//! Independent shards of rows are compacted in parallel with Rayon. Every
//! shard gets its own writer and position statistics; the record compactor is
//! shared read-only between workers.

use crate::bits::MemoryBitWriter;
use crate::coding::{CodedWriter, ExtendedCoding};
use crate::common::error::Result;
use crate::storage::compaction::record::RecordCompactor;
use crate::storage::index::PositionStats;
use crate::types::{Value, ValueRecord};
use bytes::Bytes;
use rayon::prelude::*;
use tracing::debug;

/// Output of compacting one shard
#[derive(Debug, Clone)]
pub struct CompactedShard {
    /// Compacted rows, zero-padded to a whole byte
    pub data: Bytes,
    /// Bits used by the rows, padding excluded
    pub bit_len: u64,
    pub rows: usize,
    pub positions: PositionStats,
}

/// Compacts complete rows into one in-memory stream
///
/// Values before the compactor's start index are dropped from every row.
pub fn compact_rows(
    compactor: &RecordCompactor,
    coding: &ExtendedCoding,
    rows: &[Vec<Value>],
) -> Result<CompactedShard> {
    let mut writer = CodedWriter::new(MemoryBitWriter::new(), coding.clone());
    let mut positions = PositionStats::new();
    let skip = compactor.start_index();
    for row in rows {
        let position = writer.position() as i64;
        let tail = row.get(skip..).unwrap_or_default().to_vec();
        let bits = compactor.compact(&mut writer, &mut ValueRecord::new(tail))?;
        positions.record(position, bits)?;
    }
    let bit_len = writer.position();
    Ok(CompactedShard {
        data: writer.into_inner().into_bytes(),
        bit_len,
        rows: rows.len(),
        positions,
    })
}

/// Compacts every shard in parallel; results keep the shard order
pub fn compact_shards(
    compactor: &RecordCompactor,
    coding: &ExtendedCoding,
    shards: &[Vec<Vec<Value>>],
) -> Result<Vec<CompactedShard>> {
    let results: Vec<Result<CompactedShard>> = shards
        .par_iter()
        .map(|rows| compact_rows(compactor, coding, rows))
        .collect();

    let mut compacted = Vec::with_capacity(results.len());
    for result in results {
        compacted.push(result?);
    }
    debug!(
        shards = compacted.len(),
        bits = compacted.iter().map(|s| s.bit_len).sum::<u64>(),
        "shards compacted"
    );
    Ok(compacted)
}
