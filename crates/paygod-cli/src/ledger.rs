//! # Ledger Subcommand
//!
//! - `paygod ledger simulate`: create a ledger, append one record, verify,
//!   and optionally persist it.
//! - `paygod ledger append`: load, verify, append a record, save.
//! - `paygod ledger verify`: report the first point of divergence, or with
//!   `--audit` every violation found.
//!
//! Timestamps follow `PAYGOD_CLOCK` / `PAYGOD_STRICT` (see
//! [`ClockConfig::from_env()`]).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use paygod_core::CanonicalValue;
use paygod_ledger::{ClockConfig, Ledger, LedgerError, RecordType};

/// Arguments for the `paygod ledger` subcommand.
#[derive(Args, Debug)]
pub struct LedgerArgs {
    #[command(subcommand)]
    pub command: LedgerCommand,
}

#[derive(Subcommand, Debug)]
pub enum LedgerCommand {
    /// Create a ledger, append one record, and verify it.
    Simulate {
        /// Payload document (JSON or YAML). Defaults to a generated
        /// simulation record.
        #[arg(long)]
        payload: Option<PathBuf>,

        #[arg(long, default_value = RecordType::OBSERVATION)]
        record_type: String,

        /// Write the resulting ledger here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Append a record to a persisted ledger.
    Append {
        #[arg(long)]
        ledger: PathBuf,

        /// Payload document (JSON or YAML).
        #[arg(long)]
        payload: PathBuf,

        #[arg(long, default_value = RecordType::OBSERVATION)]
        record_type: String,
    },
    /// Verify the hash chain of a persisted ledger.
    Verify {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Run a full audit and list every violation.
        #[arg(long)]
        audit: bool,
    },
}

pub fn run_ledger(args: &LedgerArgs) -> Result<u8> {
    match &args.command {
        LedgerCommand::Simulate {
            payload,
            record_type,
            out,
        } => run_simulate(payload.as_deref(), record_type, out.as_deref()),
        LedgerCommand::Append {
            ledger,
            payload,
            record_type,
        } => run_append(ledger, payload, record_type),
        LedgerCommand::Verify { file, audit } => run_verify(file, *audit),
    }
}

/// `{"source":"simulation","amount":1000,"record_id":<uuid>}`
pub fn simulation_payload() -> CanonicalValue {
    CanonicalValue::object([
        ("record_id", CanonicalValue::from(uuid::Uuid::new_v4().to_string())),
        ("source", CanonicalValue::from("simulation")),
        ("amount", CanonicalValue::from(1000)),
    ])
}

fn record_type(tag: &str) -> Result<RecordType> {
    RecordType::new(tag).with_context(|| format!("invalid --record-type {tag:?}"))
}

fn run_simulate(payload: Option<&Path>, tag: &str, out: Option<&Path>) -> Result<u8> {
    let record_type = record_type(tag)?;
    let payload = match payload {
        Some(path) => crate::load_document(path)?,
        None => simulation_payload(),
    };
    let clock = ClockConfig::from_env()
        .context("invalid clock configuration")?
        .into_clock();

    let mut ledger = Ledger::with_clock(clock);
    println!("Genesis entry created: {}", ledger.genesis().entry_id());

    let entry = ledger.append(record_type, payload)?;
    println!(
        "Appended entry #{}: record_hash {}",
        entry.entry_index(),
        entry.record_hash()
    );

    let code = report_verification(&ledger);
    if let Some(path) = out {
        ledger
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(code)
}

fn run_append(path: &Path, payload: &Path, tag: &str) -> Result<u8> {
    let record_type = record_type(tag)?;
    let payload = crate::load_document(payload)?;
    let mut ledger = load_ledger(path)?;

    // A broken chain is never extended.
    if let Err(e) = ledger.verify() {
        println!("FAIL: {}: {e}", path.display());
        return Ok(1);
    }

    let clock = ClockConfig::from_env()
        .context("invalid clock configuration")?
        .into_clock();
    ledger.set_clock(clock);

    let entry = ledger.append(record_type, payload)?;
    println!(
        "Appended entry #{}: record_hash {}",
        entry.entry_index(),
        entry.record_hash()
    );
    ledger
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(0)
}

fn run_verify(path: &Path, audit: bool) -> Result<u8> {
    let ledger = load_ledger(path)?;
    let mut code = report_verification(&ledger);

    if audit {
        let report = ledger.audit();
        println!(
            "Audit: {} entries, {} violation(s)",
            report.entry_count,
            report.violations.len()
        );
        for violation in &report.violations {
            println!("  {violation}");
        }
        if !report.is_valid() {
            code = 1;
        }
    }
    Ok(code)
}

fn load_ledger(path: &Path) -> Result<Ledger> {
    Ledger::load(path).with_context(|| format!("failed to load ledger {}", path.display()))
}

fn report_verification(ledger: &Ledger) -> u8 {
    match ledger.verify() {
        Ok(()) => {
            println!("OK: ledger integrity verified ({} entries)", ledger.len());
            0
        }
        Err(LedgerError::ChainBroken { index, .. }) => {
            println!("FAIL: ledger corrupted at entry #{index}");
            1
        }
        Err(e) => {
            println!("FAIL: {e}");
            1
        }
    }
}
