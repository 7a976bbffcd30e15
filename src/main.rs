//! bitrow - Command line entry point
//!
//! Small driver around the library: inspect universal codes, print the
//! encoding plans a set of statistics produces, compact rows from JSON into a
//! bit stream plus its position index, and read such an index back.

use anyhow::{bail, Context, Result};
use bitrow::{
    compact_rows, BitReader, BitWriter, CodecKind, CompactionConfig, CompactionContext,
    ExtendedCoding, MemoryBitReader, MemoryBitWriter, PositionStats, RecordCompactor,
    RecordDefinition, RecordStats, Value,
};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "bitrow")]
#[command(about = "Value-range-aware bit compaction of typed records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Universal code used on the wire
    #[arg(short, long, global = true, default_value = "omega")]
    codec: CodecKind,

    /// Compaction configuration file (JSON); overrides --codec
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the code of each positive integer as a bit string
    Encode {
        #[arg(required = true)]
        values: Vec<u128>,
    },
    /// Decode a bit string holding consecutive positive integer codes
    Decode { bits: String },
    /// Print the encoding plan chosen for every column
    Plan {
        /// Record definition (JSON array of columns)
        #[arg(short, long)]
        definition: PathBuf,
        /// Record statistics (JSON)
        #[arg(short, long)]
        stats: PathBuf,
    },
    /// Compact rows (JSON array of value arrays) into a bit stream and index
    Compact {
        #[arg(short, long)]
        definition: PathBuf,
        #[arg(short, long)]
        rows: PathBuf,
        /// Record statistics; collected from the rows when absent
        #[arg(short, long)]
        stats: Option<PathBuf>,
        /// Output file for the compacted rows
        #[arg(short, long)]
        output: PathBuf,
        /// Output file for the persisted position statistics
        #[arg(short, long)]
        index: Option<PathBuf>,
        /// First column to compact
        #[arg(long, default_value_t = 0)]
        start_index: usize,
    },
    /// Print persisted position statistics
    Index { path: PathBuf },
}

fn load_config(cli: &Cli) -> Result<CompactionConfig> {
    match &cli.config {
        Some(path) => Ok(CompactionConfig::from_json_str(&read_text(path)?)?),
        None => Ok(CompactionConfig::with_codec(cli.codec)),
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn render_bits(data: Bytes, len: u64) -> Result<String> {
    let mut reader = MemoryBitReader::with_bit_len(data, len)?;
    let mut out = String::with_capacity(len as usize);
    while reader.remaining() > 0 {
        out.push(if reader.read_bit()? { '1' } else { '0' });
    }
    Ok(out)
}

fn parse_bits(bits: &str) -> Result<(Bytes, u64)> {
    let mut writer = MemoryBitWriter::new();
    for c in bits.chars().filter(|c| !c.is_whitespace()) {
        match c {
            '0' => writer.write_bit(false)?,
            '1' => writer.write_bit(true)?,
            other => bail!("invalid bit character '{}'", other),
        };
    }
    let len = writer.position();
    Ok((writer.into_bytes(), len))
}

fn encode(coding: &ExtendedCoding, values: &[u128]) -> Result<()> {
    for &value in values {
        let mut writer = MemoryBitWriter::new();
        let bits = coding.encode_positive_u128(&mut writer, value)?;
        println!("{}\t{}\t{}", value, bits, render_bits(writer.into_bytes(), bits)?);
    }
    Ok(())
}

fn decode(coding: &ExtendedCoding, bits: &str) -> Result<()> {
    let (data, len) = parse_bits(bits)?;
    let mut reader = MemoryBitReader::with_bit_len(data, len)?;
    while reader.remaining() > 0 {
        println!("{}", coding.decode_positive_big(&mut reader)?);
    }
    Ok(())
}

fn plan(config: CompactionConfig, definition: &Path, stats: &Path) -> Result<()> {
    let definition = RecordDefinition::from_json_str(&read_text(definition)?)?;
    let stats = RecordStats::from_json_str(&read_text(stats)?)?;
    let context = CompactionContext::new(config).with_stats(stats);
    let compactor = RecordCompactor::new(&context, Some(&definition), 0)?;
    for (index, column) in definition.columns().iter().enumerate() {
        if let Some(plan) = compactor.plan(index) {
            println!("{}\t{}\t{}", column.name, column.column_type, plan);
        }
    }
    match compactor.fixed_row_bits() {
        Some(bits) => println!("fixed row size: {} bits", bits),
        None => println!("variable row size"),
    }
    Ok(())
}

fn compact(
    config: CompactionConfig,
    definition: &Path,
    rows: &Path,
    stats: Option<&Path>,
    output: &Path,
    index: Option<&Path>,
    start_index: usize,
) -> Result<()> {
    let definition = RecordDefinition::from_json_str(&read_text(definition)?)?;
    let rows: Vec<Vec<Value>> =
        serde_json::from_str(&read_text(rows)?).context("rows must be a JSON array of value arrays")?;
    let stats = match stats {
        Some(path) => RecordStats::from_json_str(&read_text(path)?)?,
        None => RecordStats::collect(&definition, rows.iter().map(|r| r.as_slice()))?,
    };
    let context = CompactionContext::new(config)
        .with_definition(definition)
        .with_stats(stats);
    let compactor = RecordCompactor::new(&context, None, start_index)?;

    let shard = compact_rows(&compactor, context.coding(), &rows)?;
    fs::write(output, &shard.data).with_context(|| format!("failed to write {}", output.display()))?;
    info!(rows = shard.rows, bits = shard.bit_len, "rows compacted");
    println!("{} rows, {} bits ({} bytes)", shard.rows, shard.bit_len, shard.data.len());

    if let Some(path) = index {
        let file = fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        shard
            .positions
            .write_to_stream(BufWriter::new(file), context.coding())?
            .into_inner()
            .map_err(|e| e.into_error())?;
    }
    Ok(())
}

fn show_index(coding: &ExtendedCoding, path: &Path) -> Result<()> {
    let file = fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let stats = PositionStats::read_from_stream(BufReader::new(file), coding)?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = load_config(&cli)?;
    let coding = ExtendedCoding::from_config(&config);

    match &cli.command {
        Command::Encode { values } => encode(&coding, values),
        Command::Decode { bits } => decode(&coding, bits),
        Command::Plan { definition, stats } => plan(config, definition, stats),
        Command::Compact {
            definition,
            rows,
            stats,
            output,
            index,
            start_index,
        } => compact(
            config,
            definition,
            rows,
            stats.as_deref(),
            output,
            index.as_deref(),
            *start_index,
        ),
        Command::Index { path } => show_index(&coding, path),
    }
}
