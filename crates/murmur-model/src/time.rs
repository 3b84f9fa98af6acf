//! Wall-clock timestamps for decoded events.
//!
//! The gateway stamps entities with wall-clock times (message creation, edit,
//! typing start). We keep them as Unix milliseconds in a newtype rather than
//! `std::time::SystemTime` so that comparisons against a retention window are
//! plain integer arithmetic and deterministic in tests.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A point in wall-clock time, in Unix milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Construct from Unix milliseconds.
    pub const fn from_unix_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The raw Unix-millisecond value.
    pub const fn as_unix_millis(self) -> u64 {
        self.0
    }

    /// This timestamp shifted forward, saturating at the representable
    /// maximum.
    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration.as_millis() as u64))
    }

    /// Time elapsed from this timestamp until `later`.
    ///
    /// Returns [`Duration::ZERO`] when `later` is not actually later; skewed
    /// event clocks must never produce a panic or an underflow here.
    pub fn saturating_elapsed(self, later: Self) -> Duration {
        Duration::from_millis(later.0.saturating_sub(self.0))
    }
}
