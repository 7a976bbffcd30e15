use crate::common::constants::{
    BIGINT_WIDTH, BOOLEAN_WIDTH, CHAR_WIDTH, INTEGER_WIDTH, MAX_CHAR_CODE_POINT, SMALLINT_WIDTH,
    TINYINT_WIDTH,
};
use crate::common::error::{BitrowError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a record column
///
/// Blob, Decimal and Timestamp may appear in a record definition but have no
/// compaction path; reaching such a column during compaction is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Boolean type (TRUE/FALSE)
    Boolean,
    /// 8-bit signed integer
    TinyInt,
    /// 16-bit signed integer
    SmallInt,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit floating point
    Float,
    /// 64-bit double precision
    Double,
    /// Single Unicode scalar value
    Char,
    /// Variable length string
    Varchar,
    /// Binary large object
    Blob,
    /// Decimal with precision and scale
    Decimal,
    /// Timestamp value
    Timestamp,
}

impl ColumnType {
    /// Nominal storage width in bits, `None` for variable-width or unsupported types
    pub fn nominal_width(&self) -> Option<u32> {
        match self {
            ColumnType::Boolean => Some(BOOLEAN_WIDTH),
            ColumnType::TinyInt => Some(TINYINT_WIDTH),
            ColumnType::SmallInt => Some(SMALLINT_WIDTH),
            ColumnType::Integer | ColumnType::Float => Some(INTEGER_WIDTH),
            ColumnType::BigInt | ColumnType::Double => Some(BIGINT_WIDTH),
            ColumnType::Char => Some(CHAR_WIDTH),
            ColumnType::Varchar | ColumnType::Blob | ColumnType::Decimal | ColumnType::Timestamp => {
                None
            }
        }
    }

    /// Whether values are carried through the integer encoding path
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            ColumnType::Boolean
                | ColumnType::TinyInt
                | ColumnType::SmallInt
                | ColumnType::Integer
                | ColumnType::BigInt
                | ColumnType::Char
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Double)
    }

    /// Whether a compaction path exists for this type
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            ColumnType::Blob | ColumnType::Decimal | ColumnType::Timestamp
        )
    }

    /// Inclusive range of the integers the type is encoded from: the value
    /// itself for integral types, each character's code point for Varchar
    pub fn value_range(&self) -> Option<(i64, i64)> {
        match self {
            ColumnType::Boolean => Some((0, 1)),
            ColumnType::TinyInt => Some((i8::MIN as i64, i8::MAX as i64)),
            ColumnType::SmallInt => Some((i16::MIN as i64, i16::MAX as i64)),
            ColumnType::Integer => Some((i32::MIN as i64, i32::MAX as i64)),
            ColumnType::BigInt => Some((i64::MIN, i64::MAX)),
            ColumnType::Char | ColumnType::Varchar => Some((0, MAX_CHAR_CODE_POINT)),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::TinyInt => "TINYINT",
            ColumnType::SmallInt => "SMALLINT",
            ColumnType::Integer => "INTEGER",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Char => "CHAR",
            ColumnType::Varchar => "VARCHAR",
            ColumnType::Blob => "BLOB",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Timestamp => "TIMESTAMP",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for ColumnType {
    type Err = BitrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => Ok(ColumnType::Boolean),
            "TINYINT" | "BYTE" => Ok(ColumnType::TinyInt),
            "SMALLINT" | "SHORT" => Ok(ColumnType::SmallInt),
            "INTEGER" | "INT" => Ok(ColumnType::Integer),
            "BIGINT" | "LONG" => Ok(ColumnType::BigInt),
            "FLOAT" | "REAL" => Ok(ColumnType::Float),
            "DOUBLE" => Ok(ColumnType::Double),
            "CHAR" => Ok(ColumnType::Char),
            "VARCHAR" | "STRING" | "TEXT" => Ok(ColumnType::Varchar),
            "BLOB" => Ok(ColumnType::Blob),
            "DECIMAL" => Ok(ColumnType::Decimal),
            "TIMESTAMP" => Ok(ColumnType::Timestamp),
            other => Err(crate::config_err!("unknown column type '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("int".parse::<ColumnType>().unwrap(), ColumnType::Integer);
        assert_eq!("String".parse::<ColumnType>().unwrap(), ColumnType::Varchar);
        assert!("uuid".parse::<ColumnType>().is_err());
        assert_eq!(ColumnType::BigInt.to_string(), "BIGINT");
    }

    #[test]
    fn test_categories() {
        assert!(ColumnType::Char.is_integral());
        assert!(!ColumnType::Varchar.is_integral());
        assert!(ColumnType::Double.is_floating());
        assert!(!ColumnType::Decimal.is_supported());
        assert_eq!(ColumnType::SmallInt.nominal_width(), Some(16));
        assert_eq!(ColumnType::TinyInt.value_range(), Some((-128, 127)));
        assert_eq!(ColumnType::Varchar.value_range(), Some((0, 0x10FFFF)));
        assert_eq!(ColumnType::Double.value_range(), None);
    }
}
