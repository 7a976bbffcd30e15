//! bitrow - value-range-aware bit compaction of typed records
//!
//! bitrow encodes rows of typed values into dense bit streams. Each column is
//! given the cheapest exact encoding its statistics allow: a narrowed
//! fixed-width field, or a self-delimiting universal code (Elias omega by
//! default) for unbounded or skewed values.
//!
//! ## Usage Example:
//! ```ignore
//! use bitrow::{CompactionContext, MemoryBitWriter, RecordCompactor, RecordStats, ValueRecord};
//!
//! let stats = RecordStats::collect(&definition, rows.iter().map(|r| r.as_slice()))?;
//! let context = CompactionContext::default()
//!     .with_definition(definition)
//!     .with_stats(stats);
//! let compactor = RecordCompactor::new(&context, None, 0)?;
//! let mut writer = context.writer(MemoryBitWriter::new());
//! for row in rows {
//!     compactor.compact(&mut writer, &mut ValueRecord::new(row))?;
//! }
//! ```

pub mod bits;
pub mod coding;
pub mod common;
pub mod storage;
pub mod types;

// Re-export common types for convenience
pub use common::{BitrowError, BitrowResult, CodecKind, CompactionConfig, PolicyConfig};

// Re-export bit streams and codings for convenience
pub use bits::{BitReader, BitWriter, MemoryBitReader, MemoryBitWriter, StreamBitReader, StreamBitWriter};
pub use coding::{
    CodedReader, CodedWriter, EliasDeltaCoding, EliasOmegaCoding, ExtendedCoding, UniversalCoding,
};

// Re-export type system for convenience
pub use types::{ColumnDefinition, ColumnType, LinearRecord, RecordDefinition, Value, ValueRecord};

// Re-export storage system for convenience
pub use storage::{
    compact_rows, compact_shards, ColumnCompactor, ColumnStats, CompactedShard, CompactionContext,
    CostPolicy, EncodingPlan, EncodingPolicy, IndexStats, IntegerPlan, PositionStats,
    RecordCompactor, RecordDecompactor, RecordStats, StatsAccumulator, UniversalPolicy, ValuePlan,
};
