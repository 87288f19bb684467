//! # Error Types
//!
//! Structured errors for canonicalization, digest parsing, and the
//! surrounding I/O helpers. All errors use `thiserror`.
//!
//! Every failure in this crate is deterministic for a given input. There is
//! no transient error class: retrying the same call yields the same error.

use thiserror::Error;

/// Top-level error type for `paygod-core`.
#[derive(Error, Debug)]
pub enum PaygodError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A digest string could not be interpreted.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),

    /// A timestamp was not a valid UTC instant.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// A test-vector file was structurally invalid.
    #[error("test vector error: {0}")]
    Vector(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
///
/// Both variants are final for the offending value: callers must reject the
/// value, never coerce it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanonicalizationError {
    /// The value is not well-formed (duplicate mapping keys, unparseable
    /// input, unrepresentable structure).
    #[error("malformed value: {0}")]
    MalformedValue(String),

    /// NaN and infinite numbers have no canonical form.
    #[error("number {0} has no canonical form (NaN and infinities are rejected)")]
    NonCanonicalizableNumber(f64),
}

/// Error interpreting a tagged digest string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    /// The algorithm tag is not one this kernel computes.
    #[error("unsupported digest algorithm: {0:?}")]
    UnsupportedDigestAlgorithm(String),

    /// The string is not `<algorithm>:<64 lowercase hex chars>`.
    #[error("malformed digest: {0}")]
    MalformedDigest(String),
}
