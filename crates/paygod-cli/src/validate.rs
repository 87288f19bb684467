//! # Validate Subcommand
//!
//! Parses a JSON or YAML document, canonicalizes it, and prints the tagged
//! SHA-256 of the canonical bytes.
//!
//! With `--json` the result is a single-line envelope:
//!
//! ```json
//! {"status":"success","code":0,"data":{"hash":"sha256:…","canonical_size":42}}
//! {"status":"error","code":1,"errors":[{"message":"…"}]}
//! ```
//!
//! `canonical_size` is the length of the canonical form in bytes.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use paygod_core::{sha256_digest, CanonicalBytes};

/// Arguments for the `paygod validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate (`.yaml`/`.yml` parsed as YAML, anything else as JSON).
    #[arg(value_name = "FILE")]
    pub path: PathBuf,

    /// Emit a machine-readable JSON envelope.
    #[arg(long)]
    pub json: bool,

    /// Also print the canonical form.
    #[arg(long)]
    pub print_canonical: bool,
}

const EXIT_INVALID: u8 = 1;
const EXIT_SYSTEM: u8 = 2;

#[derive(Debug)]
struct Validated {
    hash: String,
    canonical: CanonicalBytes,
}

#[derive(Debug)]
struct Failure {
    code: u8,
    message: String,
}

#[derive(Serialize)]
struct SuccessEnvelope<'a> {
    status: &'static str,
    code: u8,
    data: ValidationData<'a>,
}

#[derive(Serialize)]
struct ValidationData<'a> {
    hash: &'a str,
    canonical_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    canonical: Option<&'a str>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    status: &'static str,
    code: u8,
    errors: [ErrorMessage<'a>; 1],
}

#[derive(Serialize)]
struct ErrorMessage<'a> {
    message: &'a str,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 on success, 1 on invalid input, 2 on system error.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    match validate_document(&args.path) {
        Ok(validated) => {
            if args.json {
                let envelope = SuccessEnvelope {
                    status: "success",
                    code: 0,
                    data: ValidationData {
                        hash: &validated.hash,
                        canonical_size: validated.canonical.len(),
                        canonical: args.print_canonical.then(|| validated.canonical.as_str()),
                    },
                };
                println!("{}", serde_json::to_string(&envelope)?);
            } else {
                println!("OK: {}", args.path.display());
                println!("  hash: {}", validated.hash);
                println!("  canonical_size: {}", validated.canonical.len());
                if args.print_canonical {
                    println!("{}", validated.canonical.as_str());
                }
            }
            Ok(0)
        }
        Err(failure) => {
            tracing::debug!(code = failure.code, "validation failed: {}", failure.message);
            if args.json {
                let envelope = ErrorEnvelope {
                    status: "error",
                    code: failure.code,
                    errors: [ErrorMessage {
                        message: &failure.message,
                    }],
                };
                println!("{}", serde_json::to_string(&envelope)?);
            } else {
                eprintln!("FAIL: {}: {}", args.path.display(), failure.message);
            }
            Ok(failure.code)
        }
    }
}

fn validate_document(path: &Path) -> Result<Validated, Failure> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Failure {
            code: EXIT_INVALID,
            message: "input file not found".into(),
        },
        ErrorKind::InvalidData => Failure {
            code: EXIT_INVALID,
            message: "input is not valid UTF-8".into(),
        },
        _ => Failure {
            code: EXIT_SYSTEM,
            message: format!("system error: {e}"),
        },
    })?;

    let value = crate::parse_document(path, &content).map_err(|e| Failure {
        code: EXIT_INVALID,
        message: format!("{e:#}"),
    })?;
    let canonical = CanonicalBytes::new(&value).map_err(|e| Failure {
        code: EXIT_INVALID,
        message: e.to_string(),
    })?;

    Ok(Validated {
        hash: sha256_digest(&canonical).to_string(),
        canonical,
    })
}
