//! Position statistics persistence tests

use bitrow::{
    compact_rows, BitrowError, BitrowResult, CodedReader, CodedWriter, ColumnDefinition,
    ColumnType, CompactionContext, ExtendedCoding, IndexStats, MemoryBitReader, MemoryBitWriter,
    PositionStats, RecordCompactor, RecordDefinition, RecordStats, Value,
};
use pretty_assertions::assert_eq;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use tempfile::NamedTempFile;

fn sample() -> PositionStats {
    PositionStats {
        bottom_position: -1,
        top_position: 1000,
        fixed_bit_size: 10,
        bits_written: 500_000,
    }
}

#[test]
fn test_round_trip_through_file() -> BitrowResult<()> {
    let coding = ExtendedCoding::omega();
    let file = NamedTempFile::new()?;

    let mut sink = sample().write_to_stream(BufWriter::new(file.reopen()?), &coding)?;
    sink.flush()?;
    drop(sink);

    let restored = PositionStats::read_from_stream(BufReader::new(File::open(file.path())?), &coding)?;
    assert_eq!(restored, sample());
    Ok(())
}

#[test]
fn test_persisted_fields_follow_data() -> BitrowResult<()> {
    let coding = ExtendedCoding::delta();
    let mut writer = CodedWriter::new(MemoryBitWriter::new(), coding.clone());
    writer.write_positive_long(42)?;
    let stats_bits = sample().write_to(&mut writer)?;
    writer.write_positive_long(7)?;
    assert_eq!(sample().name(), "position");

    let len = writer.position();
    let source = MemoryBitReader::with_bit_len(writer.into_inner().into_bytes(), len)?;
    let mut reader = CodedReader::new(source, coding);
    assert_eq!(reader.read_positive_long()?, 42);
    let start = reader.position();
    assert_eq!(PositionStats::read_from(&mut reader)?, sample());
    assert_eq!(reader.position() - start, stats_bits);
    assert_eq!(reader.read_positive_long()?, 7);
    Ok(())
}

#[test]
fn test_truncated_index_is_decode_error() -> BitrowResult<()> {
    let coding = ExtendedCoding::omega();
    let bytes = sample().to_bytes(&coding)?;
    let truncated = bytes.slice(..bytes.len() - 2);
    assert!(matches!(
        PositionStats::from_bytes(truncated, &coding),
        Err(BitrowError::Decode(_))
    ));
    Ok(())
}

#[test]
fn test_index_of_compacted_run() -> BitrowResult<()> {
    let definition = RecordDefinition::new(vec![
        ColumnDefinition::new("id", ColumnType::BigInt),
        ColumnDefinition::nullable("note", ColumnType::Varchar),
    ])?;
    let rows: Vec<Vec<Value>> = (0..50)
        .map(|i| {
            let note = if i % 3 == 0 { Value::Null } else { Value::varchar("x".repeat(i)) };
            vec![Value::BigInt(i as i64 * 1000), note]
        })
        .collect();
    let stats = RecordStats::collect(&definition, rows.iter().map(|r| r.as_slice()))?;
    let context = CompactionContext::default()
        .with_definition(definition)
        .with_stats(stats);
    let compactor = RecordCompactor::new(&context, None, 0)?;
    let shard = compact_rows(&compactor, context.coding(), &rows)?;

    let positions = shard.positions;
    assert_eq!(positions.bottom_position, 0);
    assert!(positions.top_position > 0);
    assert_eq!(positions.bits_written as u64, shard.bit_len);
    assert_eq!(positions.fixed_bit_size as u32, 64 - (positions.top_position as u64).leading_zeros());

    let file = NamedTempFile::new()?;
    positions
        .write_to_stream(BufWriter::new(file.reopen()?), context.coding())?
        .flush()?;
    let restored =
        PositionStats::read_from_stream(BufReader::new(File::open(file.path())?), context.coding())?;
    assert_eq!(restored, positions);
    Ok(())
}
