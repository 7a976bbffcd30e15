use crate::common::error::BitrowError;
use crate::types::column_type::ColumnType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null value (type is stored separately)
    Null,
    /// Boolean value
    Boolean(bool),
    /// 8-bit signed integer
    TinyInt(i8),
    /// 16-bit signed integer
    SmallInt(i16),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    BigInt(i64),
    /// 32-bit floating point
    Float(f32),
    /// 64-bit double precision
    Double(f64),
    /// Single character
    Char(char),
    /// String value
    Varchar(String),
}

impl Value {
    pub fn integer(value: i32) -> Self {
        Value::Integer(value)
    }

    pub fn varchar(value: impl Into<String>) -> Self {
        Value::Varchar(value.into())
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get the column type of this value, `None` for null
    pub fn get_type(&self) -> Option<ColumnType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(ColumnType::Boolean),
            Value::TinyInt(_) => Some(ColumnType::TinyInt),
            Value::SmallInt(_) => Some(ColumnType::SmallInt),
            Value::Integer(_) => Some(ColumnType::Integer),
            Value::BigInt(_) => Some(ColumnType::BigInt),
            Value::Float(_) => Some(ColumnType::Float),
            Value::Double(_) => Some(ColumnType::Double),
            Value::Char(_) => Some(ColumnType::Char),
            Value::Varchar(_) => Some(ColumnType::Varchar),
        }
    }

    /// Integer view used by statistics: integers as-is, booleans as 0/1, chars as code points
    pub fn as_integral(&self) -> Option<i64> {
        match self {
            Value::Boolean(b) => Some(*b as i64),
            Value::TinyInt(v) => Some(*v as i64),
            Value::SmallInt(v) => Some(*v as i64),
            Value::Integer(v) => Some(*v as i64),
            Value::BigInt(v) => Some(*v),
            Value::Char(c) => Some(*c as i64),
            _ => None,
        }
    }

    /// Bitwise equality: floats compare by bit pattern, so NaN equals itself
    /// and 0.0 differs from -0.0
    pub fn bit_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            _ => self == other,
        }
    }

    pub(crate) fn mismatch(&self, expected: ColumnType) -> BitrowError {
        let found = self
            .get_type()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "NULL".to_string());
        BitrowError::InvalidArgument(format!("expected {} value, found {}", expected, found))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::TinyInt(v) => write!(f, "{}", v),
            Value::SmallInt(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::Varchar(s) => write!(f, "'{}'", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(Value::integer(5).get_type(), Some(ColumnType::Integer));
        assert_eq!(Value::Null.get_type(), None);
        assert_eq!(Value::Char('a').as_integral(), Some(97));
        assert_eq!(Value::Boolean(true).as_integral(), Some(1));
        assert_eq!(Value::varchar("x").as_integral(), None);
    }

    #[test]
    fn test_bit_eq() {
        assert!(Value::Double(f64::NAN).bit_eq(&Value::Double(f64::NAN)));
        assert!(!Value::Double(0.0).bit_eq(&Value::Double(-0.0)));
        assert!(Value::varchar("ab").bit_eq(&Value::varchar("ab")));
    }
}
