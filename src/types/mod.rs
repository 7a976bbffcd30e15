//! Type system module
//!
//! This module contains the record-level type components:
//! - ColumnType: declared column types
//! - Value: single value containers
//! - RecordDefinition: ordered column declarations
//! - LinearRecord: sequential typed cursor over one row

pub mod column_type;
pub mod record;
pub mod value;

// Re-export main types for convenience
pub use column_type::ColumnType;
pub use record::{ColumnDefinition, LinearRecord, RecordDefinition, ValueRecord};
pub use value::Value;
