//! # Ledger Entries
//!
//! A [`LedgerEntry`] is immutable once built: its fields are private and
//! exposed through getters only. The persisted form is a JSON mapping with
//! exactly seven fields, and the canonical form hashed into the successor's
//! `prev_hash` is the same mapping run through the canonicalizer.

use std::fmt;

use paygod_core::{
    sha256_digest, CanonicalBytes, CanonicalValue, CanonicalizationError, ContentDigest, Timestamp,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

/// Globally unique entry identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Lowercase hyphenated; this is the form hashed into the chain.
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Semantic kind of an entry.
///
/// `"genesis"` is reserved for the entry synthesized by `Ledger::create()`;
/// [`RecordType::new()`] refuses it, so an appended record can never pose
/// as a genesis entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordType(String);

impl RecordType {
    /// Tag of the genesis entry.
    pub const GENESIS: &'static str = "genesis";
    /// Default tag for observed records.
    pub const OBSERVATION: &'static str = "observation";

    /// Validate a record tag for appending.
    ///
    /// # Errors
    ///
    /// [`LedgerError::ReservedRecordType`] for `"genesis"` or an empty tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, LedgerError> {
        let tag = tag.into();
        if tag.is_empty() || tag == Self::GENESIS {
            return Err(LedgerError::ReservedRecordType(tag));
        }
        Ok(Self(tag))
    }

    /// The `"observation"` tag.
    pub fn observation() -> Self {
        Self(Self::OBSERVATION.to_owned())
    }

    pub(crate) fn genesis() -> Self {
        Self(Self::GENESIS.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this entry carries the reserved `genesis` tag.
    pub fn is_genesis(&self) -> bool {
        self.0 == Self::GENESIS
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Persisted entries may legitimately carry "genesis"; only emptiness is
// rejected when reading.
impl TryFrom<String> for RecordType {
    type Error = String;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        if tag.is_empty() {
            return Err("record_type must not be empty".to_owned());
        }
        Ok(Self(tag))
    }
}

impl From<RecordType> for String {
    fn from(t: RecordType) -> Self {
        t.0
    }
}

/// One link in the hash chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerEntry {
    entry_id: EntryId,
    entry_index: u64,
    timestamp: Timestamp,
    prev_hash: ContentDigest,
    record_hash: ContentDigest,
    record_type: RecordType,
    record_payload: CanonicalValue,
}

impl LedgerEntry {
    pub(crate) fn genesis(timestamp: Timestamp) -> Self {
        Self {
            entry_id: EntryId::new(),
            entry_index: 0,
            timestamp,
            prev_hash: ContentDigest::sentinel(),
            record_hash: ContentDigest::sentinel(),
            record_type: RecordType::genesis(),
            record_payload: CanonicalValue::empty_object(),
        }
    }

    pub(crate) fn new(
        entry_index: u64,
        timestamp: Timestamp,
        prev_hash: ContentDigest,
        record_hash: ContentDigest,
        record_type: RecordType,
        record_payload: CanonicalValue,
    ) -> Self {
        Self {
            entry_id: EntryId::new(),
            entry_index,
            timestamp,
            prev_hash,
            record_hash,
            record_type,
            record_payload,
        }
    }

    /// Unique identifier assigned at creation.
    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    /// Zero-based position in the ledger; genesis is 0.
    pub fn entry_index(&self) -> u64 {
        self.entry_index
    }

    /// Creation instant (UTC, whole seconds).
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Digest of the predecessor's canonical form; the sentinel for genesis.
    pub fn prev_hash(&self) -> &ContentDigest {
        &self.prev_hash
    }

    /// Digest of the canonical payload as recorded at append time.
    pub fn record_hash(&self) -> &ContentDigest {
        &self.record_hash
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// The recorded document.
    pub fn record_payload(&self) -> &CanonicalValue {
        &self.record_payload
    }

    pub fn is_genesis(&self) -> bool {
        self.record_type.is_genesis()
    }

    /// The full entry as a value, with the seven persisted field names.
    pub fn to_canonical_value(&self) -> CanonicalValue {
        CanonicalValue::object([
            ("entry_id", CanonicalValue::from(self.entry_id.to_string())),
            ("entry_index", CanonicalValue::from(self.entry_index)),
            ("timestamp", CanonicalValue::from(self.timestamp.to_iso8601())),
            ("prev_hash", CanonicalValue::from(self.prev_hash.to_string())),
            ("record_hash", CanonicalValue::from(self.record_hash.to_string())),
            ("record_type", CanonicalValue::from(self.record_type.as_str())),
            ("record_payload", self.record_payload.clone()),
        ])
    }

    /// Canonical bytes of the full entry.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(&self.to_canonical_value())
    }

    /// Digest of the full entry; this is what the successor's `prev_hash`
    /// must equal.
    pub fn content_digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_bytes()?))
    }

    /// Digest of the payload alone, recomputed from the current bytes.
    pub fn payload_digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&CanonicalBytes::new(&self.record_payload)?))
    }

    #[cfg(test)]
    pub(crate) fn payload_mut(&mut self) -> &mut CanonicalValue {
        &mut self.record_payload
    }

    #[cfg(test)]
    pub(crate) fn set_timestamp(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENESIS_JSON: &str = r#"{
        "entry_id": "00000000-0000-4000-8000-000000000000",
        "entry_index": 0,
        "timestamp": "2026-01-15T12:00:00Z",
        "prev_hash": "sha256:0000000000000000000000000000000000000000000000000000000000000000",
        "record_hash": "sha256:0000000000000000000000000000000000000000000000000000000000000000",
        "record_type": "genesis",
        "record_payload": {}
    }"#;

    #[test]
    fn test_record_type_rejects_reserved_and_empty() {
        assert!(matches!(RecordType::new("genesis"), Err(LedgerError::ReservedRecordType(_))));
        assert!(matches!(RecordType::new(""), Err(LedgerError::ReservedRecordType(_))));
        assert_eq!(RecordType::new("observation").unwrap(), RecordType::observation());
    }

    #[test]
    fn test_record_type_deserializes_genesis() {
        let t: RecordType = serde_json::from_str("\"genesis\"").unwrap();
        assert!(t.is_genesis());
        assert!(serde_json::from_str::<RecordType>("\"\"").is_err());
    }

    #[test]
    fn test_canonical_form_of_genesis() {
        let entry: LedgerEntry = serde_json::from_str(GENESIS_JSON).unwrap();
        let zero = format!("sha256:{}", "0".repeat(64));
        let expected = format!(
            "{{\"entry_id\":\"00000000-0000-4000-8000-000000000000\",\"entry_index\":0,\
             \"prev_hash\":\"{zero}\",\"record_hash\":\"{zero}\",\"record_payload\":{{}},\
             \"record_type\":\"genesis\",\"timestamp\":\"2026-01-15T12:00:00Z\"}}"
        );
        assert_eq!(entry.canonical_bytes().unwrap().as_str(), expected);
        assert_eq!(
            entry.content_digest().unwrap().to_string(),
            "sha256:929aebdc237d65a6870555f250818c472c77e10a0e53dd375e7eda32e4b093fe"
        );
    }

    #[test]
    fn test_serde_matches_canonical_field_names() {
        let entry: LedgerEntry = serde_json::from_str(GENESIS_JSON).unwrap();
        let json = serde_json::to_string(&entry).unwrap();
        let reparsed = CanonicalValue::from_json_str(&json).unwrap();
        assert_eq!(
            CanonicalBytes::new(&reparsed).unwrap(),
            entry.canonical_bytes().unwrap()
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = GENESIS_JSON.replace("\"record_payload\": {}", "\"record_payload\": {}, \"extra\": 1");
        assert!(serde_json::from_str::<LedgerEntry>(&json).is_err());
    }

    #[test]
    fn test_genesis_constructor() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let g = LedgerEntry::genesis(ts);
        assert_eq!(g.entry_index(), 0);
        assert!(g.prev_hash().is_sentinel());
        assert!(g.record_hash().is_sentinel());
        assert!(g.is_genesis());
        assert!(g.record_payload().is_empty_object());
    }

    #[test]
    fn test_entry_ids_are_unique() {
        assert_ne!(EntryId::new(), EntryId::new());
    }
}
