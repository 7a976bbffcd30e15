//! Compaction context
//!
//! Everything a compactor needs that is not the data itself: the run
//! configuration, the extended coding derived from it, the encoding policy,
//! and optionally the record definition and collected statistics.
//!
//! ## Usage Example:
//! ```ignore
//! let context = CompactionContext::new(CompactionConfig::default())
//!     .with_definition(definition)
//!     .with_stats(stats);
//! let compactor = RecordCompactor::new(&context, None, 0)?;
//! let mut writer = context.writer(MemoryBitWriter::new());
//! compactor.compact(&mut writer, &mut ValueRecord::new(row))?;
//! ```

use crate::bits::{BitReader, BitWriter};
use crate::coding::{CodedReader, CodedWriter, ExtendedCoding};
use crate::common::config::CompactionConfig;
use crate::storage::compaction::plan::{CostPolicy, EncodingPolicy};
use crate::storage::compaction::stats::RecordStats;
use crate::types::RecordDefinition;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CompactionContext {
    config: CompactionConfig,
    coding: ExtendedCoding,
    policy: Arc<dyn EncodingPolicy>,
    definition: Option<RecordDefinition>,
    stats: Option<RecordStats>,
}

impl CompactionContext {
    /// Creates a context using the cost policy configured in `config`
    pub fn new(config: CompactionConfig) -> Self {
        let coding = ExtendedCoding::from_config(&config);
        let policy = Arc::new(CostPolicy::new(coding.clone(), config.policy.clone()));
        Self {
            config,
            coding,
            policy,
            definition: None,
            stats: None,
        }
    }

    pub fn with_definition(mut self, definition: RecordDefinition) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn with_stats(mut self, stats: RecordStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Replaces the default cost policy
    pub fn with_policy(mut self, policy: Arc<dyn EncodingPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }

    pub fn coding(&self) -> &ExtendedCoding {
        &self.coding
    }

    pub fn policy(&self) -> &dyn EncodingPolicy {
        self.policy.as_ref()
    }

    pub fn definition(&self) -> Option<&RecordDefinition> {
        self.definition.as_ref()
    }

    pub fn stats(&self) -> Option<&RecordStats> {
        self.stats.as_ref()
    }

    /// Wraps a bit sink in a coded writer using this context's coding
    pub fn writer<W: BitWriter>(&self, writer: W) -> CodedWriter<W> {
        CodedWriter::new(writer, self.coding.clone())
    }

    /// Wraps a bit source in a coded reader using this context's coding
    pub fn reader<R: BitReader>(&self, reader: R) -> CodedReader<R> {
        CodedReader::new(reader, self.coding.clone())
    }
}

impl Default for CompactionContext {
    fn default() -> Self {
        Self::new(CompactionConfig::default())
    }
}
