//! # Hash-Chained Ledger
//!
//! An ordered, append-only sequence of [`LedgerEntry`] values. Entry `i`
//! records in `prev_hash` the digest of the canonical form of entry `i - 1`
//! (the whole entry, not only its payload), so altering any byte of any
//! entry breaks the link that follows it.
//!
//! ## Integrity Model
//!
//! 1. [`Ledger::create()`] synthesizes a genesis entry with sentinel
//!    `prev_hash` and `record_hash`.
//! 2. [`Ledger::append()`] canonicalizes and digests the previous entry and
//!    the new payload, then pushes the new entry.
//! 3. [`Ledger::verify()`] replays step 2 over the stored sequence and
//!    reports the first index whose recorded `prev_hash` disagrees.
//!
//! Verification cannot tell which of two adjacent entries was altered: a
//! change to entry `k` surfaces as a break at `k + 1`. Everything from the
//! reported index onward is untrustworthy. Breaks are reported, never
//! repaired.

use std::fmt;

use paygod_core::{sha256_digest, CanonicalBytes, CanonicalValue};

use crate::clock::{Clock, SystemClock};
use crate::entry::{LedgerEntry, RecordType};
use crate::error::LedgerError;

/// Append-only hash-chained ledger. Never empty: entry 0 is genesis.
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::create()
    }
}

impl Ledger {
    /// Create a ledger holding only a genesis entry, stamped by the system
    /// clock.
    pub fn create() -> Self {
        Self::with_clock(Box::new(SystemClock))
    }

    /// Create a ledger whose timestamps come from `clock`.
    pub fn with_clock(clock: Box<dyn Clock>) -> Self {
        let genesis = LedgerEntry::genesis(clock.now());
        tracing::debug!(entry_id = %genesis.entry_id(), "created ledger");
        Self {
            entries: vec![genesis],
            clock,
        }
    }

    /// Rebuild a ledger from stored entries, without verifying them.
    ///
    /// Tampered sequences load so that [`Ledger::verify()`] can report
    /// them. Only an empty sequence is refused.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Result<Self, LedgerError> {
        if entries.is_empty() {
            return Err(LedgerError::MalformedLedger(
                "ledger has no entries; a genesis entry is required".into(),
            ));
        }
        Ok(Self {
            entries,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the clock used for subsequent appends.
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    /// Append a record.
    ///
    /// `prev_hash` is the digest of the canonical form of the current last
    /// entry; `record_hash` is the digest of the canonical payload. The
    /// new `entry_index` is the ledger length, whatever index the stored
    /// last entry claims. The
    /// timestamp never goes backwards, even if the clock does.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Canonicalization`] if the payload (or the previous
    /// entry) cannot be canonicalized. The ledger is left unchanged.
    pub fn append(
        &mut self,
        record_type: RecordType,
        payload: CanonicalValue,
    ) -> Result<&LedgerEntry, LedgerError> {
        let record_hash = sha256_digest(&CanonicalBytes::new(&payload)?);
        let last = self.last();
        let prev_hash = last.content_digest()?;
        let entry_index = self.entries.len() as u64;
        let timestamp = self.clock.now().max(last.timestamp());

        let entry = LedgerEntry::new(
            entry_index,
            timestamp,
            prev_hash,
            record_hash,
            record_type,
            payload,
        );
        tracing::debug!(
            index = entry_index,
            record_type = %entry.record_type(),
            record_hash = %record_hash,
            "appended ledger entry"
        );
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Check every `prev_hash` link.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ChainBroken`] naming the first index whose recorded
    /// `prev_hash` (tag or bytes) differs from the recomputed digest of its
    /// predecessor. [`LedgerError::Canonicalization`] if a stored entry can
    /// no longer be canonicalized.
    pub fn verify(&self) -> Result<(), LedgerError> {
        for (i, pair) in self.entries.windows(2).enumerate() {
            let expected = pair[0].content_digest()?;
            let recorded = *pair[1].prev_hash();
            if expected != recorded {
                let index = (i + 1) as u64;
                tracing::warn!(index, %expected, %recorded, "ledger chain broken");
                return Err(LedgerError::ChainBroken {
                    index,
                    expected,
                    recorded,
                });
            }
        }
        Ok(())
    }

    /// All entries, genesis first.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn genesis(&self) -> &LedgerEntry {
        &self.entries[0]
    }

    pub fn last(&self) -> &LedgerEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Consume the ledger, yielding its entries.
    pub fn into_entries(self) -> Vec<LedgerEntry> {
        self.entries
    }

    #[cfg(test)]
    pub(crate) fn entries_mut(&mut self) -> &mut [LedgerEntry] {
        &mut self.entries
    }
}
