//! # Ledger Persistence
//!
//! A persisted ledger is a JSON array of entry mappings, genesis first:
//!
//! ```json
//! [
//!   {
//!     "entry_id": "…",
//!     "entry_index": 0,
//!     "timestamp": "2026-01-15T12:00:00Z",
//!     "prev_hash": "sha256:000…",
//!     "record_hash": "sha256:000…",
//!     "record_type": "genesis",
//!     "record_payload": {}
//!   }
//! ]
//! ```
//!
//! Loading does not verify the chain; callers run [`Ledger::verify()`] on
//! the result. It does check digest tags before anything else, so a file
//! written with another hash algorithm is reported as such rather than as a
//! generic parse failure.

use std::path::Path;

use paygod_core::DigestAlgorithm;
use serde_json::Value;

use crate::entry::LedgerEntry;
use crate::error::LedgerError;
use crate::ledger::Ledger;

const DIGEST_FIELDS: [&str; 2] = ["prev_hash", "record_hash"];

impl Ledger {
    /// Serialize all entries as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        let mut json = serde_json::to_string_pretty(self.entries())?;
        json.push('\n');
        Ok(json)
    }

    /// Parse a persisted ledger.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnsupportedDigestAlgorithm`] for a digest tagged
    ///   with anything other than `sha256`.
    /// - [`LedgerError::MalformedLedger`] if the document is not an array or
    ///   the array is empty.
    /// - [`LedgerError::Serialization`] for any other shape problem,
    ///   including duplicate keys inside a payload.
    pub fn from_json_str(json: &str) -> Result<Self, LedgerError> {
        let raw: Value = serde_json::from_str(json)?;
        let Value::Array(items) = &raw else {
            return Err(LedgerError::MalformedLedger(
                "persisted ledger must be a JSON array of entries".into(),
            ));
        };
        check_digest_tags(items)?;

        let entries: Vec<LedgerEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Write the ledger to `path`.
    pub fn save(&self, path: &Path) -> Result<(), LedgerError> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), entries = self.len(), "saved ledger");
        Ok(())
    }

    /// Read a ledger from `path`. The chain is not verified.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let content = std::fs::read_to_string(path)?;
        let ledger = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), entries = ledger.len(), "loaded ledger");
        Ok(ledger)
    }
}

fn check_digest_tags(items: &[Value]) -> Result<(), LedgerError> {
    for (index, item) in items.iter().enumerate() {
        for field in DIGEST_FIELDS {
            let Some(Value::String(digest)) = item.get(field) else {
                continue;
            };
            // Untagged or malformed bodies are left to deserialization.
            let Some((tag, _)) = digest.split_once(':') else {
                continue;
            };
            if DigestAlgorithm::from_tag(tag).is_err() {
                return Err(LedgerError::UnsupportedDigestAlgorithm {
                    index,
                    field,
                    tag: tag.to_owned(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use paygod_core::{CanonicalValue, Timestamp};

    use super::*;
    use crate::clock::FixedClock;
    use crate::entry::RecordType;

    fn sample() -> Ledger {
        let clock = FixedClock(Timestamp::parse("2026-01-15T12:00:00Z").unwrap());
        let mut ledger = Ledger::with_clock(Box::new(clock));
        let payload = CanonicalValue::from_json_str(
            r#"{"source":"simulation","amount":250.75,"note":"café","tags":["a","b"]}"#,
        )
        .unwrap();
        ledger.append(RecordType::observation(), payload).unwrap();
        ledger
    }

    #[test]
    fn json_roundtrip_preserves_chain() {
        let ledger = sample();
        let restored = Ledger::from_json_str(&ledger.to_json().unwrap()).unwrap();
        assert_eq!(restored.entries(), ledger.entries());
        assert!(restored.verify().is_ok());
    }

    #[test]
    fn non_ascii_written_literally() {
        assert!(sample().to_json().unwrap().contains("café"));
    }

    #[test]
    fn foreign_digest_tag_reported_with_position() {
        let json = sample().to_json().unwrap();
        let tampered = json.replacen("\"record_hash\": \"sha256:", "\"record_hash\": \"blake3:", 2);
        match Ledger::from_json_str(&tampered) {
            Err(LedgerError::UnsupportedDigestAlgorithm { index, field, tag }) => {
                assert_eq!(index, 0);
                assert_eq!(field, "record_hash");
                assert_eq!(tag, "blake3");
            }
            other => panic!("expected UnsupportedDigestAlgorithm, got {other:?}"),
        }
    }

    #[test]
    fn empty_array_is_malformed() {
        assert!(matches!(
            Ledger::from_json_str("[]"),
            Err(LedgerError::MalformedLedger(_))
        ));
    }

    #[test]
    fn non_array_is_malformed() {
        assert!(matches!(
            Ledger::from_json_str("{}"),
            Err(LedgerError::MalformedLedger(_))
        ));
    }

    #[test]
    fn duplicate_payload_keys_rejected() {
        let json = sample().to_json().unwrap();
        let tampered = json.replacen("\"source\": \"simulation\"", "\"source\": \"a\", \"source\": \"b\"", 1);
        assert!(matches!(
            Ledger::from_json_str(&tampered),
            Err(LedgerError::Serialization(_))
        ));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let ledger = sample();
        ledger.save(&path).unwrap();
        let loaded = Ledger::load(&path).unwrap();
        assert_eq!(loaded.entries(), ledger.entries());
    }
}
