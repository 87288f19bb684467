//! Ledger clock and its environment configuration.
//!
//! Entries are stamped by a [`Clock`]. Production uses [`SystemClock`];
//! reproducible runs pin time with [`FixedClock`], selected from the
//! environment by [`ClockConfig::from_env()`].

use paygod_core::Timestamp;

use crate::error::ConfigError;

/// Source of entry timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock, UTC, truncated to seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Clock selection read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockConfig {
    /// Instant pinned by `PAYGOD_CLOCK`, if any.
    pub fixed: Option<Timestamp>,
    /// `PAYGOD_STRICT=1`.
    pub strict: bool,
}

impl ClockConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PAYGOD_CLOCK` (optional): RFC 3339 instant; offsets are converted
    ///   to UTC and sub-second precision is dropped.
    /// - `PAYGOD_STRICT` (optional): `1` makes `PAYGOD_CLOCK` mandatory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let strict = lookup("PAYGOD_STRICT").is_some_and(|v| v.trim() == "1");
        let fixed = match lookup("PAYGOD_CLOCK").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                Timestamp::parse_lenient(raw.trim())
                    .map_err(|_| ConfigError::InvalidClock(raw.clone()))?,
            ),
            None => None,
        };
        if strict && fixed.is_none() {
            return Err(ConfigError::StrictClockMissing);
        }
        Ok(Self { fixed, strict })
    }

    /// Build the configured clock.
    pub fn into_clock(self) -> Box<dyn Clock> {
        match self.fixed {
            Some(ts) => {
                tracing::debug!(clock = %ts, "using fixed ledger clock");
                Box::new(FixedClock(ts))
            }
            None => Box::new(SystemClock),
        }
    }
}
