//! A ledger shared between threads.

use std::sync::Arc;

use paygod_core::CanonicalValue;
use parking_lot::RwLock;

use crate::audit::AuditReport;
use crate::entry::{LedgerEntry, RecordType};
use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Thread-safe, cloneable handle to one [`Ledger`].
///
/// `append` holds the write lock across reading the last entry, computing
/// both digests, and pushing, so two appenders can never link to the same
/// predecessor. Readers take the read lock and never see a partial entry.
/// `parking_lot::RwLock` does not poison, so a panicking writer leaves the
/// ledger usable.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    /// Wrap an existing ledger.
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Append a record; returns a copy of the new entry.
    pub fn append(
        &self,
        record_type: RecordType,
        payload: CanonicalValue,
    ) -> Result<LedgerEntry, LedgerError> {
        self.inner
            .write()
            .append(record_type, payload)
            .map(LedgerEntry::clone)
    }

    /// [`Ledger::verify()`] under the read lock.
    pub fn verify(&self) -> Result<(), LedgerError> {
        self.inner.read().verify()
    }

    /// [`Ledger::audit()`] under the read lock.
    pub fn audit(&self) -> AuditReport {
        self.inner.read().audit()
    }

    /// Copy of every entry at one instant.
    pub fn snapshot(&self) -> Vec<LedgerEntry> {
        self.inner.read().entries().to_vec()
    }

    /// Number of entries, genesis included.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Serialize under the read lock.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        self.inner.read().to_json()
    }
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new(Ledger::create())
    }
}
