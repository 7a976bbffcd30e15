//! Universal integer coding
//!
//! - [`UniversalCoding`]: contract for prefix-free codes over the positive integers
//! - [`EliasOmegaCoding`] / [`EliasDeltaCoding`]: concrete codes
//! - [`ExtendedCoding`]: signed, optional and bounded integers over a universal code
//! - [`CodedWriter`] / [`CodedReader`]: typed cursors used by everything above
//!
//! ## Usage Example:
//!
//! ```ignore
//! let mut writer = CodedWriter::new(MemoryBitWriter::new(), ExtendedCoding::omega());
//! writer.write_positive_long(1_000)?;
//! writer.write_int(-5)?;
//! ```

pub mod delta;
pub mod extended;
pub mod omega;
pub mod reader;
pub mod universal;
pub mod writer;

pub use delta::EliasDeltaCoding;
pub use extended::ExtendedCoding;
pub use omega::EliasOmegaCoding;
pub use reader::CodedReader;
pub use universal::{bit_length, UniversalCoding};
pub use writer::CodedWriter;
