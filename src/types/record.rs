//! Record definitions and record cursors

use crate::common::error::Result;
use crate::config_err;
use crate::types::column_type::ColumnType;
use crate::types::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One column of a record definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default)]
    pub nullable: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
        }
    }

    pub fn nullable(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
        }
    }
}

/// Ordered list of uniquely named columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ColumnDefinition>", into = "Vec<ColumnDefinition>")]
pub struct RecordDefinition {
    columns: Vec<ColumnDefinition>,
}

impl RecordDefinition {
    pub fn new(columns: Vec<ColumnDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(config_err!("duplicate column name '{}'", column.name));
            }
        }
        Ok(Self { columns })
    }

    /// Parse a definition from a JSON array of columns
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.get(index)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|c| c.column_type).collect()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

impl TryFrom<Vec<ColumnDefinition>> for RecordDefinition {
    type Error = crate::common::error::BitrowError;

    fn try_from(columns: Vec<ColumnDefinition>) -> Result<Self> {
        RecordDefinition::new(columns)
    }
}

impl From<RecordDefinition> for Vec<ColumnDefinition> {
    fn from(definition: RecordDefinition) -> Self {
        definition.columns
    }
}

/// Sequential typed access to the columns of one row
///
/// Each getter consumes the next column; `was_null` reports whether the
/// value most recently returned was null, in which case the returned value is
/// a placeholder default.
pub trait LinearRecord {
    fn next_boolean(&mut self) -> Result<bool>;
    fn next_byte(&mut self) -> Result<i8>;
    fn next_short(&mut self) -> Result<i16>;
    fn next_int(&mut self) -> Result<i32>;
    fn next_long(&mut self) -> Result<i64>;
    fn next_float(&mut self) -> Result<f32>;
    fn next_double(&mut self) -> Result<f64>;
    fn next_char(&mut self) -> Result<char>;
    fn next_string(&mut self) -> Result<String>;
    fn was_null(&self) -> bool;
}

/// Record cursor over an in-memory row of values
#[derive(Debug, Clone)]
pub struct ValueRecord {
    values: Vec<Value>,
    position: usize,
    last_null: bool,
}

impl ValueRecord {
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            position: 0,
            last_null: false,
        }
    }

    /// Values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len() - self.position
    }

    fn next_with<T: Default>(
        &mut self,
        expected: ColumnType,
        extract: impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T> {
        let value = self.values.get(self.position).ok_or_else(|| {
            crate::invalid_arg_err!("record has no column at position {}", self.position)
        })?;
        let result = if value.is_null() {
            self.last_null = true;
            T::default()
        } else {
            self.last_null = false;
            extract(value).ok_or_else(|| value.mismatch(expected))?
        };
        self.position += 1;
        Ok(result)
    }
}

impl LinearRecord for ValueRecord {
    fn next_boolean(&mut self) -> Result<bool> {
        self.next_with(ColumnType::Boolean, |v| match v {
            Value::Boolean(b) => Some(*b),
            _ => None,
        })
    }

    fn next_byte(&mut self) -> Result<i8> {
        self.next_with(ColumnType::TinyInt, |v| match v {
            Value::TinyInt(i) => Some(*i),
            _ => None,
        })
    }

    fn next_short(&mut self) -> Result<i16> {
        self.next_with(ColumnType::SmallInt, |v| match v {
            Value::SmallInt(i) => Some(*i),
            _ => None,
        })
    }

    fn next_int(&mut self) -> Result<i32> {
        self.next_with(ColumnType::Integer, |v| match v {
            Value::Integer(i) => Some(*i),
            _ => None,
        })
    }

    fn next_long(&mut self) -> Result<i64> {
        self.next_with(ColumnType::BigInt, |v| match v {
            Value::BigInt(i) => Some(*i),
            _ => None,
        })
    }

    fn next_float(&mut self) -> Result<f32> {
        self.next_with(ColumnType::Float, |v| match v {
            Value::Float(f) => Some(*f),
            _ => None,
        })
    }

    fn next_double(&mut self) -> Result<f64> {
        self.next_with(ColumnType::Double, |v| match v {
            Value::Double(d) => Some(*d),
            _ => None,
        })
    }

    fn next_char(&mut self) -> Result<char> {
        self.next_with(ColumnType::Char, |v| match v {
            Value::Char(c) => Some(*c),
            _ => None,
        })
    }

    fn next_string(&mut self) -> Result<String> {
        self.next_with(ColumnType::Varchar, |v| match v {
            Value::Varchar(s) => Some(s.clone()),
            _ => None,
        })
    }

    fn was_null(&self) -> bool {
        self.last_null
    }
}
