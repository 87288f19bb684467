//! # Ledger Error Types

use paygod_core::{CanonicalizationError, ContentDigest};
use thiserror::Error;

/// Errors specific to ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A payload or entry could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A persisted digest carries a tag other than `sha256`.
    #[error("unsupported digest algorithm {tag:?} in {field} of entry #{index}")]
    UnsupportedDigestAlgorithm {
        /// Position of the entry in the persisted sequence.
        index: usize,
        /// `prev_hash` or `record_hash`.
        field: &'static str,
        /// The tag found.
        tag: String,
    },

    /// The recorded `prev_hash` of an entry does not match the recomputed
    /// digest of its predecessor. `index` is the first point of divergence.
    #[error("chain broken at entry #{index}: recorded prev_hash {recorded}, recomputed {expected}")]
    ChainBroken {
        /// Index of the first entry whose link fails.
        index: u64,
        /// Digest recomputed from the predecessor's current bytes.
        expected: ContentDigest,
        /// Digest recorded in the entry.
        recorded: ContentDigest,
    },

    /// `"genesis"` is reserved for the synthesized first entry.
    #[error("record type {0:?} is reserved or empty")]
    ReservedRecordType(String),

    /// A persisted ledger is structurally unusable.
    #[error("malformed ledger: {0}")]
    MalformedLedger(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors loading kernel configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `PAYGOD_CLOCK` is set but is not an RFC 3339 instant.
    #[error("PAYGOD_CLOCK is not a valid RFC 3339 timestamp: {0}")]
    InvalidClock(String),

    /// `PAYGOD_STRICT=1` without `PAYGOD_CLOCK`.
    #[error("PAYGOD_STRICT=1 requires PAYGOD_CLOCK to be set")]
    StrictClockMissing,
}
