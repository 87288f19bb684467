//! Full-ledger audit.
//!
//! [`Ledger::verify()`] stops at the first broken `prev_hash` link. An
//! audit walks the whole sequence and collects every violation it finds,
//! including checks the link walk does not make: payload digests, genesis
//! shape, index contiguity, and timestamp order.

use std::fmt;

use paygod_core::{sha256_digest, CanonicalBytes, ContentDigest};

use crate::entry::LedgerEntry;
use crate::ledger::Ledger;

/// Result of auditing a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditReport {
    pub entry_count: u64,
    pub hash_chain_valid: bool,
    pub record_hashes_valid: bool,
    pub indices_contiguous: bool,
    pub timestamps_monotonic: bool,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Position of the first `prev_hash` break, matching what
    /// [`Ledger::verify()`] reports.
    pub fn first_break(&self) -> Option<u64> {
        self.violations
            .iter()
            .find(|v| v.kind == ViolationKind::ChainBreak)
            .map(|v| v.position)
    }
}

/// A specific integrity violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Position of the entry in the sequence (not its recorded index).
    pub position: u64,
    pub kind: ViolationKind,
    pub description: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {:?}: {}", self.position, self.kind, self.description)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// Genesis entry is missing its sentinel hashes, tag, or empty payload.
    MalformedGenesis,
    /// A non-initial entry carries the reserved genesis tag.
    MisplacedGenesis,
    /// `entry_index` does not equal the position.
    IndexGap,
    /// `prev_hash` does not match the predecessor's digest.
    ChainBreak,
    /// `record_hash` does not match the payload's digest.
    RecordHashMismatch,
    /// Timestamp earlier than the predecessor's.
    TimestampRegression,
    /// The entry could not be canonicalized.
    Uncanonicalizable,
}

impl Ledger {
    /// Check every invariant over every entry and collect all violations.
    pub fn audit(&self) -> AuditReport {
        let entries = self.entries();
        let mut report = AuditReport {
            entry_count: entries.len() as u64,
            hash_chain_valid: true,
            record_hashes_valid: true,
            indices_contiguous: true,
            timestamps_monotonic: true,
            violations: Vec::new(),
        };

        for (i, entry) in entries.iter().enumerate() {
            let position = i as u64;
            let mut push = |kind, description: String| {
                report.violations.push(Violation {
                    position,
                    kind,
                    description,
                })
            };

            if entry.entry_index() != position {
                report.indices_contiguous = false;
                push(
                    ViolationKind::IndexGap,
                    format!("expected entry_index {position}, got {}", entry.entry_index()),
                );
            }

            if i == 0 {
                if let Some(problem) = genesis_problem(entry) {
                    push(ViolationKind::MalformedGenesis, problem);
                }
            } else {
                if entry.is_genesis() {
                    push(
                        ViolationKind::MisplacedGenesis,
                        "reserved genesis tag on a non-initial entry".into(),
                    );
                }

                let prev = &entries[i - 1];
                match prev.content_digest() {
                    Ok(expected) if expected != *entry.prev_hash() => {
                        report.hash_chain_valid = false;
                        push(
                            ViolationKind::ChainBreak,
                            format!("recorded prev_hash {}, recomputed {expected}", entry.prev_hash()),
                        );
                    }
                    Ok(_) => {}
                    Err(e) => {
                        report.hash_chain_valid = false;
                        push(ViolationKind::Uncanonicalizable, format!("predecessor: {e}"));
                    }
                }

                match CanonicalBytes::new(entry.record_payload()) {
                    Ok(bytes) => {
                        let actual = sha256_digest(&bytes);
                        if actual != *entry.record_hash() {
                            report.record_hashes_valid = false;
                            push(
                                ViolationKind::RecordHashMismatch,
                                format!("recorded record_hash {}, recomputed {actual}", entry.record_hash()),
                            );
                        }
                    }
                    Err(e) => {
                        report.record_hashes_valid = false;
                        push(ViolationKind::Uncanonicalizable, format!("payload: {e}"));
                    }
                }

                if entry.timestamp() < prev.timestamp() {
                    report.timestamps_monotonic = false;
                    push(
                        ViolationKind::TimestampRegression,
                        format!("{} precedes {}", entry.timestamp(), prev.timestamp()),
                    );
                }
            }
        }

        if !report.is_valid() {
            tracing::warn!(violations = report.violations.len(), "ledger audit failed");
        }
        report
    }
}

fn genesis_problem(entry: &LedgerEntry) -> Option<String> {
    let sentinel = ContentDigest::sentinel();
    if *entry.prev_hash() != sentinel {
        Some("prev_hash is not the sentinel".into())
    } else if *entry.record_hash() != sentinel {
        Some("record_hash is not the sentinel".into())
    } else if !entry.is_genesis() {
        Some(format!("record_type is {:?}", entry.record_type().as_str()))
    } else if !entry.record_payload().is_empty_object() {
        Some("payload is not empty".into())
    } else {
        None
    }
}
