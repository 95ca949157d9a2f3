use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use huffpack::{compress, HuffmanCodec, HuffmanError};

/// Huffman compression for UTF-8 text files.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log filter, e.g. `debug` or `huffpack=trace`.
    #[arg(long, global = true, default_value = "warn", env = "HUFFPACK_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress a text file into a huffpack container.
    Compress { input: PathBuf, output: PathBuf },
    /// Restore the text stored in a huffpack container.
    Decompress { input: PathBuf, output: PathBuf },
    /// Print size statistics and the code table for a text file.
    Stats {
        input: PathBuf,
        /// Also print the Huffman tree.
        #[arg(long)]
        show_tree: bool,
        /// Also print the packed bytes in binary.
        #[arg(long)]
        show_bytes: bool,
    },
}

fn setup_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let result = match &args.command {
        Command::Compress { input, output } => run_compress(input, output),
        Command::Decompress { input, output } => run_decompress(input, output),
        Command::Stats {
            input,
            show_tree,
            show_bytes,
        } => run_stats(input, *show_tree, *show_bytes),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "huffpack failed");
            ExitCode::FAILURE
        }
    }
}

fn run_compress(input: &Path, output: &Path) -> Result<(), HuffmanError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let container = HuffmanCodec::encode_from_reader(reader, writer)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        symbols = container.packed.symbol_count,
        bytes = container.serialized_len(),
        "compressed"
    );
    Ok(())
}

fn run_decompress(input: &Path, output: &Path) -> Result<(), HuffmanError> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    let symbols = HuffmanCodec::decode_from_reader(reader, writer)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        symbols,
        "decompressed"
    );
    Ok(())
}

fn run_stats(input: &Path, show_tree: bool, show_bytes: bool) -> Result<(), HuffmanError> {
    let content = fs::read_to_string(input)?;
    let compressed = compress(&content)?;

    let original_bytes = content.len();
    let packed_bytes = compressed.packed.bytes.len();
    println!("Original content:");
    println!("  symbols: {}", compressed.packed.symbol_count);
    println!("  size:    {original_bytes} bytes");
    println!("Encoded content:");
    println!(
        "  bits:    {} ({} padding)",
        compressed.packed.bit_count,
        compressed.packed.padding_bits()
    );
    println!("  size:    {packed_bytes} bytes");
    if original_bytes > 0 {
        let saved = (original_bytes as f64 - packed_bytes as f64) / original_bytes as f64;
        println!("  saved:   {:.2}%", saved * 100.0);
    }

    println!("Code table:");
    for (symbol, code) in compressed.code_table.iter() {
        println!("  '{}': {code}", symbol.escape_debug());
    }

    if show_bytes {
        println!("Packed bytes:");
        for row in binary_rows(&compressed.packed.bytes) {
            println!("  {row}");
        }
    }

    if let (true, Some(tree)) = (show_tree, compressed.tree.as_ref()) {
        print!("{}", tree.structure());
    }
    Ok(())
}

/// Renders bytes as space separated `{:08b}` groups, eight per row.
fn binary_rows(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(8)
        .map(|row| {
            row.iter()
                .map(|byte| format!("{byte:08b}"))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
