//! Record compactor
//!
//! Compacts one row at a time from a [`LinearRecord`] cursor into a coded
//! stream, delegating every column to its own [`ColumnCompactor`]:
//! - The null indicator is written first for every column
//! - The typed payload follows only for present values
//! - Dispatch is by the column's declared type
//!
//! Columns before `start_index` are not part of the compacted row; the cursor
//! handed to [`RecordCompactor::compact`] must already be positioned at
//! `start_index`.
//!
//! [`RecordDecompactor`] reads rows back with the same column configuration.

use crate::bits::{BitReader, BitWriter};
use crate::coding::{CodedReader, CodedWriter};
use crate::common::error::{BitrowError, Result};
use crate::storage::compaction::column::ColumnCompactor;
use crate::storage::compaction::context::CompactionContext;
use crate::storage::compaction::plan::EncodingPlan;
use crate::storage::compaction::stats::ColumnStats;
use crate::types::{ColumnType, LinearRecord, RecordDefinition, Value};
use crate::{config_err, decode_err};
use std::sync::OnceLock;
use tracing::{debug, trace};

fn unsupported(index: usize, column_type: ColumnType) -> BitrowError {
    BitrowError::UnsupportedType(format!(
        "column {} has type {} which cannot be compacted",
        index, column_type
    ))
}

#[derive(Debug, Clone)]
pub struct RecordCompactor {
    compactors: Vec<ColumnCompactor>,
    start_index: usize,
    fixed_row_bits: OnceLock<Option<u64>>,
}

impl RecordCompactor {
    /// Builds one column compactor per column of `definition`, falling back to
    /// the context's definition when none is given
    pub fn new(
        context: &CompactionContext,
        definition: Option<&RecordDefinition>,
        start_index: usize,
    ) -> Result<Self> {
        let definition = definition
            .or_else(|| context.definition())
            .ok_or_else(|| config_err!("record definition is required"))?;
        let stats = context
            .stats()
            .ok_or_else(|| config_err!("record statistics are required"))?
            .adapt_for(definition)?;
        if start_index > definition.column_count() {
            return Err(config_err!(
                "start index {} outside [0, {}]",
                start_index,
                definition.column_count()
            ));
        }

        let mut compactors = Vec::with_capacity(definition.column_count());
        for (column, stats) in definition.columns().iter().zip(stats.column_stats()) {
            if !column.nullable && stats.null_count() > 0 {
                return Err(config_err!(
                    "column '{}' is not nullable but its statistics record {} nulls",
                    column.name,
                    stats.null_count()
                ));
            }
            let compactor = ColumnCompactor::new(column.column_type, stats.clone(), context.policy())?
                .declare_nullable(column.nullable);
            debug!(
                column = %column.name,
                column_type = %column.column_type,
                plan = %compactor.plan(),
                "column plan chosen"
            );
            compactors.push(compactor);
        }

        debug!(
            columns = compactors.len(),
            start_index,
            policy = context.policy().name(),
            coding = context.coding().name(),
            "record compactor ready"
        );
        Ok(Self {
            compactors,
            start_index,
            fixed_row_bits: OnceLock::new(),
        })
    }

    pub fn column_count(&self) -> usize {
        self.compactors.len()
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Adapted statistics for the column at `index`
    pub fn column_stats(&self, index: usize) -> Result<&ColumnStats> {
        self.compactor(index)
            .map(|c| c.stats())
            .ok_or_else(|| crate::invalid_arg_err!("no column at index {}", index))
    }

    pub fn compactor(&self, index: usize) -> Option<&ColumnCompactor> {
        self.compactors.get(index)
    }

    pub fn plan(&self, index: usize) -> Option<&EncodingPlan> {
        self.compactor(index).map(|c| c.plan())
    }

    /// Compacted size of every row, when all compacted columns use a
    /// fixed-size encoding
    pub fn fixed_row_bits(&self) -> Option<u64> {
        *self.fixed_row_bits.get_or_init(|| {
            self.compactors[self.start_index..]
                .iter()
                .map(|c| c.plan().fixed_bits())
                .sum()
        })
    }

    /// Compacts columns `[start_index, column_count)` of one row; returns the
    /// bits written
    pub fn compact<W: BitWriter>(
        &self,
        writer: &mut CodedWriter<W>,
        record: &mut dyn LinearRecord,
    ) -> Result<u64> {
        let mut bits = 0;
        for (index, column) in self.compactors.iter().enumerate().skip(self.start_index) {
            bits += Self::compact_column(index, column, writer, record)?;
        }
        trace!(bits, position = writer.position(), "row compacted");
        Ok(bits)
    }

    fn compact_column<W: BitWriter>(
        index: usize,
        column: &ColumnCompactor,
        writer: &mut CodedWriter<W>,
        record: &mut dyn LinearRecord,
    ) -> Result<u64> {
        macro_rules! present {
            ($value:expr, |$v:ident| $encode:expr) => {{
                let $v = $value;
                let is_null = record.was_null();
                let mut bits = column.encode_null(writer, is_null)?;
                if !is_null {
                    bits += $encode;
                }
                Ok(bits)
            }};
        }

        match column.column_type() {
            ColumnType::Boolean => {
                present!(record.next_boolean()?, |v| column.encode_boolean(writer, v)?)
            }
            ColumnType::TinyInt => {
                present!(record.next_byte()?, |v| column.encode_int(writer, v as i32)?)
            }
            ColumnType::SmallInt => {
                present!(record.next_short()?, |v| column.encode_int(writer, v as i32)?)
            }
            ColumnType::Integer => present!(record.next_int()?, |v| column.encode_int(writer, v)?),
            ColumnType::BigInt => present!(record.next_long()?, |v| column.encode_long(writer, v)?),
            ColumnType::Float => present!(record.next_float()?, |v| column.encode_float(writer, v)?),
            ColumnType::Double => {
                present!(record.next_double()?, |v| column.encode_double(writer, v)?)
            }
            ColumnType::Char => present!(record.next_char()?, |v| column.encode_char(writer, v)?),
            ColumnType::Varchar => {
                present!(record.next_string()?, |v| column.encode_string(writer, &v)?)
            }
            t @ (ColumnType::Blob | ColumnType::Decimal | ColumnType::Timestamp) => {
                Err(unsupported(index, t))
            }
        }
    }
}

/// Reads rows written by a [`RecordCompactor`] with the same configuration
#[derive(Debug, Clone)]
pub struct RecordDecompactor {
    compactors: Vec<ColumnCompactor>,
    start_index: usize,
}

impl RecordDecompactor {
    pub fn new(
        context: &CompactionContext,
        definition: Option<&RecordDefinition>,
        start_index: usize,
    ) -> Result<Self> {
        Ok(Self::from_compactor(&RecordCompactor::new(
            context,
            definition,
            start_index,
        )?))
    }

    pub fn from_compactor(compactor: &RecordCompactor) -> Self {
        Self {
            compactors: compactor.compactors.clone(),
            start_index: compactor.start_index,
        }
    }

    /// Decodes one row; the result holds columns `[start_index, column_count)`
    pub fn decompact<R: BitReader>(&self, reader: &mut CodedReader<R>) -> Result<Vec<Value>> {
        let mut row = Vec::with_capacity(self.compactors.len() - self.start_index);
        for (index, column) in self.compactors.iter().enumerate().skip(self.start_index) {
            row.push(Self::decompact_column(index, column, reader)?);
        }
        Ok(row)
    }

    fn decompact_column<R: BitReader>(
        index: usize,
        column: &ColumnCompactor,
        reader: &mut CodedReader<R>,
    ) -> Result<Value> {
        let column_type = column.column_type();
        if !column_type.is_supported() {
            return Err(unsupported(index, column_type));
        }
        if column.decode_null(reader)? {
            return Ok(Value::Null);
        }
        let value = match column_type {
            ColumnType::Boolean => Value::Boolean(column.decode_boolean(reader)?),
            ColumnType::TinyInt => {
                let v = column.decode_int(reader)?;
                Value::TinyInt(i8::try_from(v).map_err(|_| decode_err!("{} is not a TINYINT", v))?)
            }
            ColumnType::SmallInt => {
                let v = column.decode_int(reader)?;
                Value::SmallInt(i16::try_from(v).map_err(|_| decode_err!("{} is not a SMALLINT", v))?)
            }
            ColumnType::Integer => Value::Integer(column.decode_int(reader)?),
            ColumnType::BigInt => Value::BigInt(column.decode_long(reader)?),
            ColumnType::Float => Value::Float(column.decode_float(reader)?),
            ColumnType::Double => Value::Double(column.decode_double(reader)?),
            ColumnType::Char => Value::Char(column.decode_char(reader)?),
            ColumnType::Varchar => Value::Varchar(column.decode_string(reader)?),
            t => return Err(unsupported(index, t)),
        };
        Ok(value)
    }
}
