use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use spendlens::{
    Clock, DEFAULT_TIMEZONE, SAMPLE_DAYS, SQLiteStore, SystemClock, TransactionStore,
    sample_transactions, setup_logging,
};

/// A utility for creating a test database filled with sample expenses.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// Canonical IANA name of the timezone the sample dates are in.
    #[arg(long, env = "SPENDLENS_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging(LevelFilter::INFO, None)?;

    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let clock = SystemClock::new(&args.timezone)?;

    println!("Creating database at {output_path:#?}");
    let store = SQLiteStore::open(output_path)?;

    println!("Creating sample transactions for the last {SAMPLE_DAYS} days...");
    let transactions = sample_transactions(clock.now());
    store.save_all(&transactions).await?;

    println!("Success! Saved {} transactions.", transactions.len());

    Ok(())
}
