//! Clock abstraction for deterministic testing.
//!
//! Decouples garbage-collection retention checks from system time. Production
//! uses [`SystemClock`]; tests drive a [`ManualClock`] forward by hand so
//! sweeps are reproducible.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use murmur_model::Timestamp;

/// Source of "now" for retention decisions.
///
/// # Invariants
///
/// Implementations must never move backwards within one execution context;
/// the garbage collector assumes a later cycle observes a later (or equal)
/// timestamp.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let since_epoch =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Timestamp::from_unix_millis(since_epoch.as_millis() as u64)
    }
}

/// Hand-stepped clock for tests and simulations.
///
/// Clones share the underlying time, so a test can hand one handle to the
/// cache and keep another to advance between cycles.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// A manual clock starting at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self { now: Arc::new(AtomicU64::new(start.as_unix_millis())) }
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        self.now.fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_unix_millis(self.now.load(Ordering::Relaxed))
    }
}
