//! Storage-side components of bitrow
//!
//! This module provides:
//! - Compaction of records into coded bit streams
//! - Index statistics persisted alongside compacted data

pub mod compaction;
pub mod index;

pub use compaction::*;
pub use index::*;
