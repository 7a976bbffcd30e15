//! Record compaction end-to-end tests
//!
//! Rows go through statistics collection, plan selection, compaction and
//! decompaction with the same configuration.

use bitrow::{
    compact_shards, BitrowError, BitrowResult, CodecKind, ColumnDefinition, ColumnStats,
    ColumnType, CompactionConfig, CompactionContext, IntegerPlan, MemoryBitReader,
    MemoryBitWriter, RecordCompactor, RecordDecompactor, RecordDefinition, RecordStats,
    UniversalPolicy, Value, ValuePlan, ValueRecord,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn definition() -> RecordDefinition {
    RecordDefinition::new(vec![
        ColumnDefinition::new("delta", ColumnType::Integer),
        ColumnDefinition::nullable("label", ColumnType::Varchar),
        ColumnDefinition::new("active", ColumnType::Boolean),
    ])
    .expect("unique column names")
}

fn rows() -> Vec<Vec<Value>> {
    vec![
        vec![Value::Integer(-5), Value::varchar("ab"), Value::Boolean(true)],
        vec![Value::Integer(12), Value::Null, Value::Boolean(false)],
        vec![Value::Integer(0), Value::varchar(""), Value::Boolean(true)],
        vec![Value::Integer(-1), Value::varchar("zz"), Value::Boolean(false)],
    ]
}

fn context(config: CompactionConfig) -> BitrowResult<CompactionContext> {
    let rows = rows();
    let stats = RecordStats::collect(&definition(), rows.iter().map(|r| r.as_slice()))?;
    Ok(CompactionContext::new(config)
        .with_definition(definition())
        .with_stats(stats))
}

fn round_trip(context: &CompactionContext) -> BitrowResult<()> {
    let compactor = RecordCompactor::new(context, None, 0)?;
    let mut writer = context.writer(MemoryBitWriter::new());
    let mut total = 0;
    for row in rows() {
        total += compactor.compact(&mut writer, &mut ValueRecord::new(row))?;
    }
    assert_eq!(total, writer.position());

    let len = writer.position();
    let source = MemoryBitReader::with_bit_len(writer.into_inner().into_bytes(), len)?;
    let mut reader = context.reader(source);
    let decompactor = RecordDecompactor::from_compactor(&compactor);
    for row in rows() {
        assert_eq!(decompactor.decompact(&mut reader)?, row);
    }
    assert_eq!(reader.into_inner().remaining(), 0);
    Ok(())
}

#[test]
fn test_end_to_end_round_trip() -> BitrowResult<()> {
    round_trip(&context(CompactionConfig::default())?)?;
    round_trip(&context(CompactionConfig::with_codec(CodecKind::Delta))?)?;
    round_trip(&context(CompactionConfig::default())?.with_policy(Arc::new(UniversalPolicy)))
}

#[test]
fn test_row_cost_is_sum_of_column_costs() -> BitrowResult<()> {
    let context = context(CompactionConfig::default())?;
    let compactor = RecordCompactor::new(&context, None, 0)?;
    let mut writer = context.writer(MemoryBitWriter::new());
    let row_bits = compactor.compact(
        &mut writer,
        &mut ValueRecord::new(vec![Value::Integer(-5), Value::varchar("ab"), Value::Boolean(true)]),
    )?;

    let mut scratch = context.writer(MemoryBitWriter::new());
    let delta = compactor.compactor(0).expect("column 0");
    let label = compactor.compactor(1).expect("column 1");
    let active = compactor.compactor(2).expect("column 2");
    let expected = delta.encode_null(&mut scratch, false)?
        + delta.encode_int(&mut scratch, -5)?
        + label.encode_null(&mut scratch, false)?
        + label.encode_string(&mut scratch, "ab")?
        + active.encode_null(&mut scratch, false)?
        + active.encode_boolean(&mut scratch, true)?;
    assert_eq!(row_bits, expected);
    Ok(())
}

#[test]
fn test_null_emits_only_indicator() -> BitrowResult<()> {
    let context = context(CompactionConfig::default())?;
    let compactor = RecordCompactor::new(&context, None, 1)?;
    assert!(compactor.plan(1).expect("label plan").nullable);
    assert!(!compactor.plan(2).expect("active plan").nullable);

    let mut writer = context.writer(MemoryBitWriter::new());
    let bits = compactor.compact(
        &mut writer,
        &mut ValueRecord::new(vec![Value::Null, Value::Boolean(false)]),
    )?;
    // one indicator bit plus a one-bit boolean field
    assert_eq!(bits, 2);

    let len = writer.position();
    let source = MemoryBitReader::with_bit_len(writer.into_inner().into_bytes(), len)?;
    let decompactor = RecordDecompactor::from_compactor(&compactor);
    let row = decompactor.decompact(&mut context.reader(source))?;
    assert_eq!(row, vec![Value::Null, Value::Boolean(false)]);
    Ok(())
}

#[test]
fn test_bounded_column_uses_five_bits() -> BitrowResult<()> {
    let definition =
        RecordDefinition::new(vec![ColumnDefinition::new("bucket", ColumnType::Integer)])?;
    let stats = RecordStats::new().with_column("bucket", ColumnStats::new(18).with_range(0, 17));
    let context = CompactionContext::default().with_stats(stats);
    let compactor = RecordCompactor::new(&context, Some(&definition), 0)?;
    assert_eq!(
        compactor.plan(0).map(|p| p.value),
        Some(ValuePlan::Integer(IntegerPlan::Fixed {
            minimum: 0,
            maximum: 17,
            bits: 5
        }))
    );
    assert_eq!(compactor.fixed_row_bits(), Some(5));

    let mut writer = context.writer(MemoryBitWriter::new());
    for v in 0..=17 {
        let bits = compactor.compact(&mut writer, &mut ValueRecord::new(vec![Value::Integer(v)]))?;
        assert_eq!(bits, 5);
    }
    let result = compactor.compact(&mut writer, &mut ValueRecord::new(vec![Value::Integer(18)]));
    assert!(matches!(result, Err(BitrowError::InvalidArgument(_))));
    Ok(())
}

#[test]
fn test_cursor_type_mismatch_fails() -> BitrowResult<()> {
    let context = context(CompactionConfig::default())?;
    let compactor = RecordCompactor::new(&context, None, 0)?;
    let mut writer = context.writer(MemoryBitWriter::new());
    let result = compactor.compact(
        &mut writer,
        &mut ValueRecord::new(vec![Value::BigInt(1), Value::Null, Value::Boolean(true)]),
    );
    assert!(matches!(result, Err(BitrowError::InvalidArgument(_))));
    Ok(())
}

#[test]
fn test_configuration_errors() -> BitrowResult<()> {
    let no_stats = CompactionContext::default().with_definition(definition());
    assert!(matches!(
        RecordCompactor::new(&no_stats, None, 0),
        Err(BitrowError::Configuration(_))
    ));

    let context = context(CompactionConfig::default())?;
    assert!(matches!(
        RecordCompactor::new(&context, None, 4),
        Err(BitrowError::Configuration(_))
    ));

    let other = RecordDefinition::new(vec![ColumnDefinition::new("missing", ColumnType::BigInt)])?;
    assert!(matches!(
        RecordCompactor::new(&context, Some(&other), 0),
        Err(BitrowError::Configuration(_))
    ));
    Ok(())
}

#[test]
fn test_stats_json_drive_compaction() -> BitrowResult<()> {
    let json = r#"{
        "columns": [
            {"name": "active", "stats": {"minimum": 0, "maximum": 1, "null_count": 0, "count": 4}},
            {"name": "delta", "stats": {"minimum": -5, "maximum": 12, "null_count": 0, "count": 4}},
            {"name": "label", "stats": {"minimum": 97, "maximum": 122, "null_count": 1, "count": 4}}
        ]
    }"#;
    let stats = RecordStats::from_json_str(json)?;
    let context = CompactionContext::default()
        .with_definition(definition())
        .with_stats(stats);
    round_trip(&context)
}

#[test]
fn test_sharded_compaction() -> BitrowResult<()> {
    let context = context(CompactionConfig::default())?;
    let compactor = RecordCompactor::new(&context, None, 0)?;
    let shards: Vec<Vec<Vec<Value>>> = (0..8).map(|_| rows()).collect();
    let compacted = compact_shards(&compactor, context.coding(), &shards)?;

    let first = &compacted[0];
    for shard in &compacted {
        assert_eq!(shard.data, first.data);
        assert_eq!(shard.positions, first.positions);
        assert_eq!(shard.rows, 4);
    }
    assert_eq!(first.positions.bits_written as u64, first.bit_len);
    Ok(())
}

#[test]
fn test_declared_nullable_column_round_trips_null() -> BitrowResult<()> {
    let definition =
        RecordDefinition::new(vec![ColumnDefinition::nullable("s", ColumnType::Varchar)])?;
    let stats = RecordStats::new().with_column("s", ColumnStats::new(1).with_range(97, 98));
    let context = CompactionContext::default()
        .with_definition(definition)
        .with_stats(stats);
    let compactor = RecordCompactor::new(&context, None, 0)?;

    let mut writer = context.writer(MemoryBitWriter::new());
    let bits = compactor.compact(&mut writer, &mut ValueRecord::new(vec![Value::Null]))?;
    assert_eq!(bits, 1);

    let len = writer.position();
    let source = MemoryBitReader::with_bit_len(writer.into_inner().into_bytes(), len)?;
    let decompactor = RecordDecompactor::from_compactor(&compactor);
    assert_eq!(decompactor.decompact(&mut context.reader(source))?, vec![Value::Null]);
    Ok(())
}
