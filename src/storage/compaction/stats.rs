//! Column and record statistics
//!
//! Statistics are gathered by an earlier pass over the data and are read-only
//! for the duration of a compaction run. Integral columns record their value
//! range, Boolean columns 0/1, Char columns code points and Varchar columns
//! the code-point range of their characters.

use crate::coding::universal::bit_length;
use crate::common::error::Result;
use crate::config_err;
use crate::types::{ColumnType, RecordDefinition, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Immutable per-column aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    minimum: Option<i64>,
    maximum: Option<i64>,
    #[serde(default)]
    null_count: u64,
    count: u64,
    #[serde(default)]
    cardinality: Option<u64>,
    #[serde(default)]
    sum: Option<i128>,
}

impl ColumnStats {
    /// Stats for `count` values with nothing else known
    pub fn new(count: u64) -> Self {
        Self {
            minimum: None,
            maximum: None,
            null_count: 0,
            count,
            cardinality: None,
            sum: None,
        }
    }

    pub fn with_range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn with_minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_nulls(mut self, null_count: u64) -> Self {
        self.null_count = null_count;
        self
    }

    pub fn with_cardinality(mut self, cardinality: u64) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    pub fn with_sum(mut self, sum: i128) -> Self {
        self.sum = Some(sum);
        self
    }

    pub fn minimum(&self) -> Option<i64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<i64> {
        self.maximum
    }

    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn non_null_count(&self) -> u64 {
        self.count.saturating_sub(self.null_count)
    }

    pub fn cardinality(&self) -> Option<u64> {
        self.cardinality
    }

    pub fn sum(&self) -> Option<i128> {
        self.sum
    }

    /// Fraction of values that are null
    pub fn null_frequency(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.null_count as f64 / self.count as f64
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.null_count > 0
    }

    /// Mean of the non-null values, when a sum was recorded
    pub fn mean(&self) -> Option<f64> {
        let sum = self.sum?;
        match self.non_null_count() {
            0 => None,
            n => Some(sum as f64 / n as f64),
        }
    }

    /// `max - min`, when both bounds are known
    pub fn range(&self) -> Option<u64> {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) if min <= max => Some((max as i128 - min as i128) as u64),
            _ => None,
        }
    }

    /// Bits needed for a fixed-width field covering `[min, max]`
    pub fn range_bits(&self) -> Option<u32> {
        self.range().map(bit_length)
    }

    /// Checks internal consistency
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            if min > max {
                return Err(config_err!("column minimum {} exceeds maximum {}", min, max));
            }
        }
        if self.null_count > self.count {
            return Err(config_err!(
                "null count {} exceeds value count {}",
                self.null_count,
                self.count
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DistinctKey {
    Integral(i64),
    Bits(u64),
    Text(String),
}

/// Single-pass statistics gathering for one column
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    column_type: ColumnType,
    minimum: Option<i64>,
    maximum: Option<i64>,
    null_count: u64,
    count: u64,
    sum: i128,
    distinct: HashSet<DistinctKey>,
}

impl StatsAccumulator {
    pub fn new(column_type: ColumnType) -> Self {
        Self {
            column_type,
            minimum: None,
            maximum: None,
            null_count: 0,
            count: 0,
            sum: 0,
            distinct: HashSet::new(),
        }
    }

    fn observe(&mut self, value: i64) {
        self.minimum = Some(self.minimum.map_or(value, |m| m.min(value)));
        self.maximum = Some(self.maximum.map_or(value, |m| m.max(value)));
    }

    pub fn update(&mut self, value: &Value) -> Result<()> {
        self.count += 1;
        if value.is_null() {
            self.null_count += 1;
            return Ok(());
        }
        if value.get_type() != Some(self.column_type) {
            return Err(value.mismatch(self.column_type));
        }
        match value {
            Value::Float(f) => {
                self.distinct.insert(DistinctKey::Bits(f.to_bits() as u64));
            }
            Value::Double(d) => {
                self.distinct.insert(DistinctKey::Bits(d.to_bits()));
            }
            Value::Varchar(s) => {
                for c in s.chars() {
                    self.observe(c as i64);
                }
                self.distinct.insert(DistinctKey::Text(s.clone()));
            }
            other => {
                if let Some(v) = other.as_integral() {
                    self.observe(v);
                    self.sum += v as i128;
                    self.distinct.insert(DistinctKey::Integral(v));
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> ColumnStats {
        let integral = self.column_type.is_integral();
        ColumnStats {
            minimum: self.minimum,
            maximum: self.maximum,
            null_count: self.null_count,
            count: self.count,
            cardinality: Some(self.distinct.len() as u64),
            sum: integral.then_some(self.sum),
        }
    }
}

/// Statistics for one named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedColumnStats {
    pub name: String,
    pub stats: ColumnStats,
}

/// Column statistics for a whole record, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStats {
    columns: Vec<NamedColumnStats>,
}

impl RecordStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, stats: ColumnStats) -> Self {
        self.columns.push(NamedColumnStats {
            name: name.into(),
            stats,
        });
        self
    }

    /// Gathers statistics for `definition` over complete rows
    pub fn collect<'a>(
        definition: &RecordDefinition,
        rows: impl IntoIterator<Item = &'a [Value]>,
    ) -> Result<Self> {
        let mut accumulators: Vec<StatsAccumulator> = definition
            .columns()
            .iter()
            .map(|c| StatsAccumulator::new(c.column_type))
            .collect();
        for row in rows {
            if row.len() != accumulators.len() {
                return Err(crate::invalid_arg_err!(
                    "row has {} values, definition has {} columns",
                    row.len(),
                    accumulators.len()
                ));
            }
            for (accumulator, value) in accumulators.iter_mut().zip(row) {
                accumulator.update(value)?;
            }
        }
        let columns = definition
            .columns()
            .iter()
            .zip(accumulators)
            .map(|(column, accumulator)| NamedColumnStats {
                name: column.name.clone(),
                stats: accumulator.finish(),
            })
            .collect();
        Ok(Self { columns })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name).map(|c| &c.stats)
    }

    pub fn column_stats(&self) -> impl Iterator<Item = &ColumnStats> {
        self.columns.iter().map(|c| &c.stats)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Reorders and filters these stats to match `definition` one-to-one
    pub fn adapt_for(&self, definition: &RecordDefinition) -> Result<RecordStats> {
        let mut columns = Vec::with_capacity(definition.column_count());
        for column in definition.columns() {
            let mut matches = self.columns.iter().filter(|c| c.name == column.name);
            let found = matches
                .next()
                .ok_or_else(|| config_err!("no statistics for column '{}'", column.name))?;
            if matches.next().is_some() {
                return Err(config_err!("duplicate statistics for column '{}'", column.name));
            }
            columns.push(found.clone());
        }
        Ok(RecordStats { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnDefinition;

    #[test]
    fn test_derived_aggregates() {
        let stats = ColumnStats::new(10)
            .with_range(0, 17)
            .with_nulls(2)
            .with_sum(40);
        assert_eq!(stats.range_bits(), Some(5));
        assert_eq!(stats.non_null_count(), 8);
        assert_eq!(stats.mean(), Some(5.0));
        assert!((stats.null_frequency() - 0.2).abs() < 1e-9);
        assert!(stats.is_nullable());

        let constant = ColumnStats::new(3).with_range(7, 7);
        assert_eq!(constant.range_bits(), Some(0));

        let full = ColumnStats::new(3).with_range(i64::MIN, i64::MAX);
        assert_eq!(full.range_bits(), Some(64));
    }

    #[test]
    fn test_validate() {
        assert!(ColumnStats::new(1).with_range(5, 4).validate().is_err());
        assert!(ColumnStats::new(1).with_nulls(2).validate().is_err());
        assert!(ColumnStats::new(2).with_nulls(2).validate().is_ok());
    }

    #[test]
    fn test_accumulator() {
        let mut acc = StatsAccumulator::new(ColumnType::Integer);
        for v in [Value::Integer(3), Value::Null, Value::Integer(-2), Value::Integer(3)] {
            acc.update(&v).unwrap();
        }
        assert!(acc.update(&Value::BigInt(1)).is_err());
        let stats = acc.finish();
        assert_eq!(stats.minimum(), Some(-2));
        assert_eq!(stats.maximum(), Some(3));
        assert_eq!(stats.null_count(), 1);
        assert_eq!(stats.cardinality(), Some(2));
        assert_eq!(stats.sum(), Some(4));
    }

    #[test]
    fn test_varchar_accumulator_tracks_code_points() {
        let mut acc = StatsAccumulator::new(ColumnType::Varchar);
        acc.update(&Value::varchar("ab")).unwrap();
        acc.update(&Value::varchar("za")).unwrap();
        let stats = acc.finish();
        assert_eq!(stats.minimum(), Some('a' as i64));
        assert_eq!(stats.maximum(), Some('z' as i64));
        assert_eq!(stats.sum(), None);
    }

    #[test]
    fn test_adapt_for_reorders_and_filters() {
        let stats = RecordStats::new()
            .with_column("a", ColumnStats::new(1).with_range(0, 1))
            .with_column("b", ColumnStats::new(1).with_range(0, 2))
            .with_column("c", ColumnStats::new(1).with_range(0, 3));
        let definition = RecordDefinition::new(vec![
            ColumnDefinition::new("c", ColumnType::Integer),
            ColumnDefinition::new("a", ColumnType::Integer),
        ])
        .unwrap();

        let adapted = stats.adapt_for(&definition).unwrap();
        assert_eq!(adapted.names().collect::<Vec<_>>(), vec!["c", "a"]);
        assert_eq!(adapted.get("c").unwrap().maximum(), Some(3));

        let missing = RecordDefinition::new(vec![ColumnDefinition::new("d", ColumnType::Integer)])
            .unwrap();
        assert!(stats.adapt_for(&missing).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let stats = RecordStats::new().with_column(
            "id",
            ColumnStats::new(4).with_range(1, 4).with_cardinality(4),
        );
        let json = stats.to_json_string().unwrap();
        assert_eq!(RecordStats::from_json_str(&json).unwrap(), stats);
    }
}
