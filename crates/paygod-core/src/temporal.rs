//! # Temporal Types: UTC-Only Timestamps
//!
//! Defines `Timestamp`, a UTC-only instant truncated to seconds and rendered
//! as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Ledger entries are hashed over their canonical form, timestamp included,
//! so the textual form must be unique for an instant. Local offsets and
//! sub-second digits would give one instant several spellings: constructors
//! remove them, and [`Timestamp::parse()`] refuses any text that would not
//! render back byte-for-byte.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PaygodError;

const PERSISTED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse the persisted form, `YYYY-MM-DDTHH:MM:SSZ`, exactly.
    ///
    /// Explicit offsets (`+00:00` included) and fractional seconds are
    /// rejected rather than normalized, so a parsed timestamp always renders
    /// back to the text it came from.
    pub fn parse(s: &str) -> Result<Self, PaygodError> {
        let naive = NaiveDateTime::parse_from_str(s, PERSISTED_FORMAT).map_err(|e| {
            PaygodError::Timestamp(format!(
                "timestamp must be YYYY-MM-DDTHH:MM:SSZ (UTC, whole seconds), got {s:?}: {e}"
            ))
        })?;
        let ts = Self(Utc.from_utc_datetime(&naive));
        if ts.to_iso8601() != s {
            return Err(PaygodError::Timestamp(format!(
                "timestamp {s:?} is not in canonical form, expected {:?}",
                ts.to_iso8601()
            )));
        }
        Ok(ts)
    }

    /// Parse an RFC 3339 string with any offset, converting to UTC.
    ///
    /// For ingesting external input such as a clock override. Persisted
    /// entries go through [`Timestamp::parse()`].
    pub fn parse_lenient(s: &str) -> Result<Self, PaygodError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| PaygodError::Timestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}")))?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO 8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format(PERSISTED_FORMAT).to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let ts = Timestamp::from_utc(dt.with_nanosecond(123_456_789).unwrap());
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:30:45Z");
    }

    #[test]
    fn test_parse_z_suffix_accepted() {
        let ts = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        assert_eq!(ts.to_string(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_offsets_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00+00:00").is_err());
        assert!(Timestamp::parse("2026-01-15T17:00:00+05:00").is_err());
    }

    #[test]
    fn test_parse_subseconds_rejected() {
        assert!(Timestamp::parse("2026-01-15T12:00:00.123456Z").is_err());
        assert!(Timestamp::parse("2026-01-15T12:00:00.250Z").is_err());
    }

    #[test]
    fn test_parse_requires_exact_spelling() {
        assert!(Timestamp::parse("2026-1-15T12:00:00Z").is_err());
        assert!(Timestamp::parse("2026-01-15t12:00:00Z").is_err());
        assert!(Timestamp::parse("2026-01-15T12:00:00z").is_err());
    }

    #[test]
    fn test_parse_lenient_truncates_subseconds() {
        let ts = Timestamp::parse_lenient("2026-01-15T12:00:00.123456Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_serde_rejects_subseconds() {
        assert!(serde_json::from_str::<Timestamp>("\"2026-06-30T23:59:59.5Z\"").is_err());
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(Timestamp::parse("not-a-dateZ").is_err());
        assert!(Timestamp::parse("2026-01-15").is_err());
        assert!(Timestamp::parse("").is_err());
    }

    #[test]
    fn test_parse_lenient_converts_offset() {
        let ts = Timestamp::parse_lenient("2026-01-15T17:00:00+05:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2026-01-15T12:00:00Z");
    }

    #[test]
    fn test_ordering() {
        let earlier = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let later = Timestamp::parse("2026-01-15T12:00:01Z").unwrap();
        assert!(earlier < later);
    }

    #[test]
    fn test_serde_uses_iso8601_string() {
        let ts = Timestamp::parse("2026-06-30T23:59:59Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-06-30T23:59:59Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_serde_rejects_offset() {
        assert!(serde_json::from_str::<Timestamp>("\"2026-06-30T23:59:59+01:00\"").is_err());
    }
}
