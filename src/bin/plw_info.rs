// Prints the header summary of a PLW file and what could be recovered from it

use clap::Parser;
use plw_reader::PlwReader;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "plw-info", version, about = "Inspect and recover PicoLog PLW files")]
struct Args {
    /// PLW file to read
    file: PathBuf,

    /// Only decode the header
    #[arg(long)]
    header_only: bool,

    /// Log decoder progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if args.header_only {
        println!("{}", PlwReader::read_summary(&args.file)?);
        return Ok(());
    }

    let reader = PlwReader::open(&args.file)?;
    println!("{}", reader.summary());
    println!(
        "Rows Recovered: {} of {}",
        reader.rows_decoded(),
        reader.sample_count()
    );

    if let (Some(min), Some(max)) = (reader.minimum_sample(), reader.maximum_sample()) {
        println!("Sample Range: {} .. {}", min, max);
    }

    let rows = reader.table().rows();
    if let (Some(first), Some(last)) = (rows.first(), rows.last()) {
        for (label, row) in [("First", first), ("Last", last)] {
            let when = reader
                .timestamp_for_record(row.time)
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "out of range".to_string());
            println!("{} Record: time={} ({}) {:?}", label, row.time, when, row.channels);
        }
    }

    if reader.is_truncated() {
        println!("Note: {} ends before its recorded sample count", reader.file_name());
    }

    Ok(())
}
