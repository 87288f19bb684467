//! # Vectors Subcommand
//!
//! `paygod vectors verify FILE...` checks every case of every suite and
//! exits 1 if any case fails. `paygod vectors generate FILE` recomputes
//! `expected_canonical` and `expected_hash` in place.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use paygod_core::{VectorStatus, VectorSuite};

/// Arguments for the `paygod vectors` subcommand.
#[derive(Args, Debug)]
pub struct VectorsArgs {
    #[command(subcommand)]
    pub command: VectorsCommand,
}

#[derive(Subcommand, Debug)]
pub enum VectorsCommand {
    /// Verify test-vector suites against the canonicalizer.
    Verify {
        /// Suite files.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Recompute expected fields of a suite in place.
    Generate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

pub fn run_vectors(args: &VectorsArgs) -> Result<u8> {
    match &args.command {
        VectorsCommand::Verify { files } => {
            let mut had_failures = false;
            for file in files {
                had_failures |= verify_suite(file)?;
            }
            Ok(u8::from(had_failures))
        }
        VectorsCommand::Generate { file } => {
            generate_suite(file)?;
            Ok(0)
        }
    }
}

/// Returns `true` if any case failed.
fn verify_suite(path: &Path) -> Result<bool> {
    let suite = VectorSuite::load(path)
        .with_context(|| format!("failed to load test vectors from {}", path.display()))?;
    let outcomes = suite.verify();
    let passed = outcomes.iter().filter(|o| o.passed()).count();

    println!("{}: {passed}/{} passed", path.display(), outcomes.len());
    for outcome in outcomes.iter().filter(|o| !o.passed()) {
        match &outcome.status {
            VectorStatus::CanonicalMismatch { expected, actual } => {
                println!("  FAIL: {}: canonical mismatch", outcome.description);
                println!("    expected: {expected}");
                println!("    actual:   {actual}");
            }
            VectorStatus::HashMismatch { expected, actual } => {
                println!("  FAIL: {}: hash mismatch", outcome.description);
                println!("    expected: {expected}");
                println!("    actual:   {actual}");
            }
            VectorStatus::Error(message) => {
                println!("  FAIL: {}: {message}", outcome.description);
            }
            VectorStatus::Passed => {}
        }
    }
    Ok(passed != outcomes.len())
}

fn generate_suite(path: &Path) -> Result<()> {
    let mut suite = VectorSuite::load(path)
        .with_context(|| format!("failed to load test vectors from {}", path.display()))?;
    suite
        .regenerate()
        .context("failed to compute expected fields")?;
    suite
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Regenerated {} case(s) in {}",
        suite.vectors.len(),
        path.display()
    );
    Ok(())
}
