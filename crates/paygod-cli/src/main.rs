//! # paygod CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paygod_cli::ledger::{run_ledger, LedgerArgs};
use paygod_cli::validate::{run_validate, ValidateArgs};
use paygod_cli::vectors::{run_vectors, VectorsArgs};

/// PayGod kernel CLI.
///
/// Canonical JSON hashing, test-vector verification, and hash-chained
/// ledger operations.
#[derive(Parser, Debug)]
#[command(name = "paygod", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Canonicalize a JSON or YAML document and print its hash.
    Validate(ValidateArgs),

    /// Verify or regenerate test-vector suites.
    Vectors(VectorsArgs),

    /// Simulate, append to, and verify hash-chained ledgers.
    Ledger(LedgerArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("paygod CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Vectors(args) => run_vectors(&args),
        Commands::Ledger(args) => run_ledger(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
