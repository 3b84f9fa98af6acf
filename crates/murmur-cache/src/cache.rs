//! The synchronous cycle driver.
//!
//! [`Cache`] owns the current snapshot generation and runs update cycles
//! against it: derive a builder, apply the batch, run the maintenance
//! processor, freeze, publish. It performs no I/O and makes no scheduling
//! decisions; the embedding gateway task decides when a batch is ready and
//! at what cadence cycles run.

use std::sync::Arc;

use murmur_model::{UpdateEvent, User};

use crate::{
    clock::{Clock, SystemClock},
    error::CacheError,
    snapshot::CacheSnapshot,
};

/// Driver owning the current cache generation.
///
/// Cheap to read from: [`snapshot`](Self::snapshot) hands out an `Arc` to the
/// current generation, and readers holding older generations are never
/// affected by later cycles.
#[derive(Debug)]
pub struct Cache<C = SystemClock> {
    clock: C,
    current: Arc<CacheSnapshot>,
}

impl Cache<SystemClock> {
    /// A cache over the system clock, seeded with the caller's bot identity.
    pub fn new(bot_user: User) -> Self {
        Self::with_clock(SystemClock, bot_user)
    }
}

impl<C: Clock> Cache<C> {
    /// A cache over a caller-supplied clock, seeded with the caller's bot
    /// identity.
    pub fn with_clock(clock: C, bot_user: User) -> Self {
        Self { clock, current: Arc::new(CacheSnapshot::seed(bot_user)) }
    }

    /// A cache resuming from an existing snapshot.
    ///
    /// This is also the configuration seam: seed the snapshot with a custom
    /// maintenance processor via [`CacheSnapshot::seed_with`].
    pub fn from_snapshot(clock: C, snapshot: CacheSnapshot) -> Self {
        Self { clock, current: Arc::new(snapshot) }
    }

    /// The current snapshot generation.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        Arc::clone(&self.current)
    }

    /// Run one full update cycle over a batch of decoded events.
    ///
    /// On success the returned snapshot is the new current generation, with
    /// its sequence advanced by exactly one. On error the cycle is aborted
    /// whole: the failed builder is discarded and the previous generation
    /// stays current.
    pub fn update(&mut self, events: &[UpdateEvent]) -> Result<Arc<CacheSnapshot>, CacheError> {
        let mut builder = self.current.to_builder();
        for event in events {
            builder.apply(event)?;
        }
        builder.run_processor(self.clock.now());

        let next = Arc::new(builder.freeze());
        self.current = Arc::clone(&next);
        Ok(next)
    }
}
