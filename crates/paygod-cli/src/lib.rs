//! # paygod-cli: PayGod Kernel Command-Line Interface
//!
//! Provides the `paygod` binary on top of `paygod-core` and
//! `paygod-ledger`.
//!
//! ## Subcommands
//!
//! - `paygod validate`: Canonicalize a JSON or YAML document and print its hash.
//! - `paygod vectors`: Verify or regenerate test-vector suites.
//! - `paygod ledger`: Simulate, extend, and verify persisted ledgers.
//!
//! ```bash
//! paygod validate record.json --json
//! paygod vectors verify test-vectors/canonical-json.json
//! paygod ledger simulate --out ledger.json
//! paygod ledger verify ledger.json --audit
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handlers delegate to the library crates and return an exit code.

pub mod ledger;
pub mod validate;
pub mod vectors;

use std::path::Path;

use anyhow::{Context, Result};
use paygod_core::CanonicalValue;

/// Parse document text as YAML (`.yaml`/`.yml`) or JSON (anything else).
///
/// Duplicate mapping keys are rejected in both formats.
pub fn parse_document(path: &Path, content: &str) -> Result<CanonicalValue> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    if is_yaml {
        serde_yaml::from_str(content).context("invalid YAML")
    } else {
        CanonicalValue::from_json_str(content).context("invalid JSON")
    }
}

/// Read and parse a document from disk.
pub fn load_document(path: &Path) -> Result<CanonicalValue> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_document(path, &content).with_context(|| format!("failed to parse {}", path.display()))
}
