//! # Content Digest: Tagged SHA-256 Digests
//!
//! Defines `ContentDigest` and `DigestAlgorithm`.
//!
//! ## Wire Form
//!
//! A digest is exchanged as `<algorithm>:<lowercase hex>`, for example
//! `sha256:44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a`.
//! Comparisons are over the tagged value, so the algorithm tag is checked
//! along with the digest bytes. Parsing a string with any other tag fails
//! with [`DigestError::UnsupportedDigestAlgorithm`].
//!
//! ## Security Invariant
//!
//! `ContentDigest` can only be computed from `CanonicalBytes` through
//! [`sha256_digest()`]. Raw byte slices cannot be hashed into a
//! `ContentDigest`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::DigestError;

/// The hash algorithm that produced a content digest.
///
/// The kernel computes SHA-256 only. The tag is still carried on every
/// digest so that a verifier can refuse digests produced by anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256.
    Sha256,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Resolve an algorithm tag.
    pub fn from_tag(tag: &str) -> Result<Self, DigestError> {
        match tag {
            "sha256" => Ok(Self::Sha256),
            other => Err(DigestError::UnsupportedDigestAlgorithm(other.to_owned())),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A content digest with its algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    algorithm: DigestAlgorithm,
    bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a digest from raw bytes and algorithm.
    ///
    /// Prefer [`sha256_digest()`] when hashing a value.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// The all-zero SHA-256 digest, `sha256:000…0`.
    ///
    /// Used as the predecessor hash of a ledger's genesis entry.
    pub fn sentinel() -> Self {
        Self::new(DigestAlgorithm::Sha256, [0u8; 32])
    }

    /// Returns true for the all-zero sentinel.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }

    /// The algorithm that produced this digest.
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Render the digest body as a lowercase hex string (no tag).
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a tagged digest string, `<algorithm>:<64 lowercase hex chars>`.
    ///
    /// # Errors
    ///
    /// `UnsupportedDigestAlgorithm` for an unknown tag, `MalformedDigest` for
    /// a missing separator or a body that is not 64 lowercase hex characters.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        let (tag, hex) = s
            .split_once(':')
            .ok_or_else(|| DigestError::MalformedDigest(format!("missing algorithm tag in {s:?}")))?;
        let algorithm = DigestAlgorithm::from_tag(tag)?;
        let bytes = decode_hex(hex)?;
        Ok(Self::new(algorithm, bytes))
    }
}

fn decode_hex(hex: &str) -> Result<[u8; 32], DigestError> {
    if hex.len() != 64 {
        return Err(DigestError::MalformedDigest(format!(
            "expected 64 hex characters, got {}",
            hex.len()
        )));
    }
    let mut bytes = [0u8; 32];
    for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
        let hi = hex_nibble(chunk[0])?;
        let lo = hex_nibble(chunk[1])?;
        bytes[i] = (hi << 4) | lo;
    }
    Ok(bytes)
}

fn hex_nibble(c: u8) -> Result<u8, DigestError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(DigestError::MalformedDigest(format!(
            "invalid lowercase hex character {:?}",
            c as char
        ))),
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl FromStr for ContentDigest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`, so every digest in the
/// kernel is computed over the one canonical form.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::new(DigestAlgorithm::Sha256, bytes)
}

/// Compute a SHA-256 hex string (untagged) from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}
