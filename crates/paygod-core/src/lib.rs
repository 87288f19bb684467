//! # paygod-core: Integrity Primitives for the PayGod Kernel
//!
//! This crate is the leaf of the workspace. It defines the value model that
//! every record is expressed in, the one canonical serialization of that
//! model, and the tagged digest computed over canonical bytes. The ledger
//! crate builds its hash chain entirely on top of these three pieces.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value model.** [`CanonicalValue`] is an exhaustive enum. The
//!    canonicalizer matches every variant, so a new value shape cannot be
//!    silently skipped.
//!
//! 2. **`CanonicalBytes` newtype.** All digest computation flows through
//!    [`CanonicalBytes::new()`]. There is exactly one canonicalizer in the
//!    workspace; producers and verifiers cannot drift apart.
//!
//! 3. **Tagged digests.** [`ContentDigest`] renders as `sha256:<hex>` and
//!    parsing checks the algorithm tag as well as the hex body.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] is UTC, seconds precision,
//!    rendered with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `paygod-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
mod number;
pub mod temporal;
pub mod value;
pub mod vectors;

// Re-export primary types for ergonomic imports.
pub use canonical::{canonicalize, CanonicalBytes};
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, DigestError, PaygodError};
pub use temporal::Timestamp;
pub use value::{CanonicalValue, Number};
pub use vectors::{TestVector, VectorOutcome, VectorStatus, VectorSuite};
