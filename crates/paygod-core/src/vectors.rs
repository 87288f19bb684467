//! # Test Vectors
//!
//! The interoperability contract between producers and verifiers is a JSON
//! file of cases:
//!
//! ```json
//! [
//!   {
//!     "description": "keys are sorted",
//!     "input": {"b": 2, "a": 1},
//!     "expected_canonical": "{\"a\":1,\"b\":2}",
//!     "expected_hash": "sha256:..."
//!   }
//! ]
//! ```
//!
//! A conforming implementation reproduces `expected_canonical` and
//! `expected_hash` byte-for-byte for every case. [`VectorSuite::verify()`]
//! checks that; [`VectorSuite::regenerate()`] fills the expected fields in
//! from the inputs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalBytes;
use crate::digest::{sha256_digest, ContentDigest};
use crate::error::PaygodError;
use crate::value::CanonicalValue;

/// One test-vector case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestVector {
    /// Human-readable case name.
    pub description: String,
    /// The value to canonicalize.
    pub input: CanonicalValue,
    /// The exact canonical text.
    #[serde(default)]
    pub expected_canonical: String,
    /// Tagged digest of `expected_canonical`'s UTF-8 bytes.
    #[serde(default)]
    pub expected_hash: String,
}

impl TestVector {
    /// Build a case with expected fields computed from `input`.
    pub fn generate(
        description: impl Into<String>,
        input: CanonicalValue,
    ) -> Result<Self, PaygodError> {
        let canonical = CanonicalBytes::new(&input)?;
        Ok(Self {
            description: description.into(),
            expected_canonical: canonical.as_str().to_owned(),
            expected_hash: sha256_digest(&canonical).to_string(),
            input,
        })
    }

    /// Check this case against the canonicalizer.
    pub fn verify(&self) -> VectorOutcome {
        let status = match self.check() {
            Ok(status) => status,
            Err(e) => VectorStatus::Error(e.to_string()),
        };
        VectorOutcome {
            description: self.description.clone(),
            status,
        }
    }

    fn check(&self) -> Result<VectorStatus, PaygodError> {
        // Surface a foreign or malformed tag as a digest error rather than a
        // plain mismatch.
        ContentDigest::parse(&self.expected_hash)?;

        let canonical = CanonicalBytes::new(&self.input)?;
        if canonical.as_str() != self.expected_canonical {
            return Ok(VectorStatus::CanonicalMismatch {
                expected: self.expected_canonical.clone(),
                actual: canonical.as_str().to_owned(),
            });
        }
        let actual_hash = sha256_digest(&canonical).to_string();
        if actual_hash != self.expected_hash {
            return Ok(VectorStatus::HashMismatch {
                expected: self.expected_hash.clone(),
                actual: actual_hash,
            });
        }
        Ok(VectorStatus::Passed)
    }
}

/// Result of checking one case.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorOutcome {
    /// The case's `description` field.
    pub description: String,
    pub status: VectorStatus,
}

impl VectorOutcome {
    /// True when both the canonical text and the hash matched.
    pub fn passed(&self) -> bool {
        self.status == VectorStatus::Passed
    }
}

/// How a single case fared.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorStatus {
    /// Canonical text and hash both matched.
    Passed,
    /// The canonical text differs from `expected_canonical`.
    CanonicalMismatch { expected: String, actual: String },
    /// The canonical text matched but the digest did not.
    HashMismatch { expected: String, actual: String },
    /// The input or the expected hash could not be processed.
    Error(String),
}

/// An ordered list of test-vector cases, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorSuite {
    pub vectors: Vec<TestVector>,
}

impl VectorSuite {
    /// Parse a suite from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, PaygodError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a suite from a file.
    pub fn load(path: &Path) -> Result<Self, PaygodError> {
        let content = std::fs::read_to_string(path)?;
        let suite = Self::from_json_str(&content)
            .map_err(|e| PaygodError::Vector(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), cases = suite.vectors.len(), "loaded test vectors");
        Ok(suite)
    }

    /// Write the suite as pretty-printed JSON (non-ASCII kept literal).
    pub fn save(&self, path: &Path) -> Result<(), PaygodError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check every case, in order.
    pub fn verify(&self) -> Vec<VectorOutcome> {
        self.vectors.iter().map(TestVector::verify).collect()
    }

    /// Recompute `expected_canonical` and `expected_hash` for every case.
    ///
    /// Fails on the first input that cannot be canonicalized, leaving the
    /// suite unchanged.
    pub fn regenerate(&mut self) -> Result<(), PaygodError> {
        let regenerated = self
            .vectors
            .iter()
            .map(|v| TestVector::generate(v.description.clone(), v.input.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        self.vectors = regenerated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"[
      {
        "description": "sorted keys",
        "input": {"b": 2, "a": 1},
        "expected_canonical": "{\"a\":1,\"b\":2}",
        "expected_hash": "sha256:43258cff783fe7036d8a43033f830adfc60ec037382473548ac742b888292777"
      },
      {
        "description": "empty object",
        "input": {},
        "expected_canonical": "{}",
        "expected_hash": "sha256:44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
      }
    ]"#;

    #[test]
    fn test_suite_verifies() {
        let suite = VectorSuite::from_json_str(SUITE).unwrap();
        let outcomes = suite.verify();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(VectorOutcome::passed), "{outcomes:?}");
    }

    #[test]
    fn test_canonical_mismatch_reported() {
        let mut suite = VectorSuite::from_json_str(SUITE).unwrap();
        suite.vectors[0].expected_canonical = r#"{"b":2,"a":1}"#.into();
        let outcome = &suite.verify()[0];
        assert!(matches!(outcome.status, VectorStatus::CanonicalMismatch { .. }));
    }

    #[test]
    fn test_hash_mismatch_reported() {
        let mut suite = VectorSuite::from_json_str(SUITE).unwrap();
        suite.vectors[1].expected_hash = format!("sha256:{}", "1".repeat(64));
        assert!(matches!(suite.verify()[1].status, VectorStatus::HashMismatch { .. }));
    }

    #[test]
    fn test_untagged_hash_is_an_error() {
        let mut suite = VectorSuite::from_json_str(SUITE).unwrap();
        suite.vectors[1].expected_hash =
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a".into();
        assert!(matches!(suite.verify()[1].status, VectorStatus::Error(_)));
    }

    #[test]
    fn test_foreign_tag_is_an_error() {
        let mut suite = VectorSuite::from_json_str(SUITE).unwrap();
        suite.vectors[1].expected_hash = format!("blake3:{}", "0".repeat(64));
        match &suite.verify()[1].status {
            VectorStatus::Error(msg) => assert!(msg.contains("unsupported digest algorithm")),
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_regenerate_fills_expected_fields() {
        let mut suite = VectorSuite::from_json_str(
            r#"[{"description": "fresh", "input": {"z": [1.0, 2.5], "a": "é"}}]"#,
        )
        .unwrap();
        assert!(!suite.verify()[0].passed());
        suite.regenerate().unwrap();
        assert_eq!(suite.vectors[0].expected_canonical, "{\"a\":\"é\",\"z\":[1,2.5]}");
        assert!(suite.verify()[0].passed());
    }

    #[test]
    fn test_regenerate_rejects_nan_input() {
        let mut suite = VectorSuite {
            vectors: vec![TestVector {
                description: "nan".into(),
                input: CanonicalValue::from(f64::NAN),
                expected_canonical: String::new(),
                expected_hash: String::new(),
            }],
        };
        assert!(suite.regenerate().is_err());
    }

    #[test]
    fn test_duplicate_keys_in_input_rejected_at_load() {
        let result = VectorSuite::from_json_str(r#"[{"description":"d","input":{"a":1,"a":2}}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.json");
        let suite = VectorSuite::from_json_str(SUITE).unwrap();
        suite.save(&path).unwrap();
        assert_eq!(VectorSuite::load(&path).unwrap(), suite);
    }
}
