//! Cache
//!
//! Snapshot/update cache engine for a chat-platform gateway client. The cache
//! maintains a local, continuously-updated mirror of remote state by replaying
//! decoded update events over an initial snapshot, one cycle at a time.
//!
//! # Architecture
//!
//! The engine is sans-IO and fully synchronous. An external driver (the
//! gateway task) owns the cadence: it derives a [`CacheBuilder`] from the
//! current [`CacheSnapshot`], applies a batch of [`UpdateEvent`]s, runs the
//! pending maintenance [`Processor`], and freezes the builder into the next
//! generation. Snapshots are immutable and structurally independent, so any
//! number of readers can hold any number of generations concurrently; the
//! single active builder is private to the driver for the batch's duration.
//!
//! # Components
//!
//! - [`CacheSnapshot`]: immutable point-in-time view of all cached state
//! - [`CacheBuilder`]: mutable in-progress generation, one per update cycle
//! - [`FrozenMap`] / [`WorkingMap`]: the keyed entity maps behind both
//! - [`Processor`]: composable periodic maintenance, garbage collection by
//!   default
//! - [`Cache`]: the synchronous cycle driver
//! - [`Clock`]: wall-clock seam, replaceable for deterministic tests
//!
//! [`UpdateEvent`]: murmur_model::UpdateEvent

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod builder;
mod cache;
mod clock;
mod error;
mod map;
mod processor;
mod snapshot;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CacheError;
pub use map::{FrozenMap, WorkingMap};
pub use processor::{
    DEFAULT_KEEP_MESSAGES, DEFAULT_KEEP_TYPING, DEFAULT_PERIOD, MaintenanceAction, Processor,
    StepOutcome,
};
pub use snapshot::CacheSnapshot;
