//! Column and record compaction
//!
//! This module turns rows of typed values into value-range-aware bit
//! encodings:
//! - Statistics: per-column ranges, null counts and cardinality
//! - Plans: the per-column encoding chosen by a pluggable policy
//! - Column compactor: encodes and decodes single values under a plan
//! - Record compactor: drives one column compactor per column, row by row
//! - Shards: parallel compaction of independent row sets

pub mod column;
pub mod context;
pub mod plan;
pub mod record;
pub mod shard;
pub mod stats;

pub use column::ColumnCompactor;
pub use context::CompactionContext;
pub use plan::{CostPolicy, EncodingPlan, EncodingPolicy, IntegerPlan, UniversalPolicy, ValuePlan};
pub use record::{RecordCompactor, RecordDecompactor};
pub use shard::{compact_rows, compact_shards, CompactedShard};
pub use stats::{ColumnStats, NamedColumnStats, RecordStats, StatsAccumulator};
