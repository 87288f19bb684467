//! # paygod-ledger: Hash-Chained Ledger
//!
//! Append-only ledger whose entries are linked by the digest of the
//! canonical form of their predecessor. Built entirely on `paygod-core`:
//! every hash in this crate is `sha256_digest(CanonicalBytes)`.
//!
//! ## Modules
//!
//! - [`entry`]: `LedgerEntry`, `EntryId`, `RecordType`.
//! - [`ledger`]: `Ledger` (create, append, verify).
//! - [`audit`]: full-sequence audit collecting every violation.
//! - [`store`]: JSON persistence.
//! - [`shared`]: `SharedLedger`, a lock-guarded handle for multi-threaded use.
//! - [`clock`]: timestamp source and its environment configuration.
//!
//! ## Crate Policy
//!
//! - Depends only on `paygod-core` within the workspace.
//! - No `unsafe` code.
//! - No process-wide ledger: callers own their `Ledger` instances.

pub mod audit;
pub mod clock;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod shared;
pub mod store;

pub use audit::{AuditReport, Violation, ViolationKind};
pub use clock::{Clock, ClockConfig, FixedClock, SystemClock};
pub use entry::{EntryId, LedgerEntry, RecordType};
pub use error::{ConfigError, LedgerError};
pub use ledger::Ledger;
pub use shared::SharedLedger;
