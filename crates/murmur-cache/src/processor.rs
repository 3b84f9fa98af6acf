//! Maintenance processors.
//!
//! A processor is the maintenance action a snapshot carries for the *next*
//! update cycle. Stepping a processor runs it against the cycle's builder and
//! yields the processor to install into the resulting snapshot, so the chain
//! replaces itself forward indefinitely. Two built-in variants compose with
//! each other and with caller-supplied actions: a countdown combinator that
//! fires its inner action once every N cycles, and the garbage collector
//! that expires stale messages and typing stamps.
//!
//! Stepping never fails. A panic inside a custom action is deliberately not
//! caught; it propagates to the driver, which owns the abort-or-skip policy
//! for that cycle.

use std::{fmt, sync::Arc, time::Duration};

use murmur_model::Timestamp;

use crate::builder::CacheBuilder;

/// Cycles between garbage-collection runs in the default processor.
pub const DEFAULT_PERIOD: u32 = 10;

/// Message retention window of the default processor.
pub const DEFAULT_KEEP_MESSAGES: Duration = Duration::from_secs(30 * 60);

/// Typing-stamp retention window of the default processor.
pub const DEFAULT_KEEP_TYPING: Duration = Duration::from_secs(5 * 60);

/// What a processor decided about its own replacement.
///
/// `Unchanged` is the explicit "this variant chose not to change" signal the
/// countdown combinator short-circuits on: it reinstalls its existing inner
/// action directly instead of wrapping a freshly built copy, so a stateless
/// inner action never causes nested re-wrapping or a second invocation in
/// the same cycle.
#[derive(Debug)]
pub enum StepOutcome {
    /// Keep the current processor value for the next cycle.
    Unchanged,
    /// Install this processor for the next cycle.
    Replace(Processor),
}

/// A caller-supplied maintenance action.
pub trait MaintenanceAction: fmt::Debug + Send + Sync {
    /// Run once against the cycle's builder and choose the processor for the
    /// next cycle.
    fn run(&self, builder: &mut CacheBuilder, now: Timestamp) -> StepOutcome;
}

/// The maintenance action to run on the next builder.
#[derive(Debug, Clone)]
pub enum Processor {
    /// Run `inner` once every `period + 1` cycles, counting `remaining`
    /// cycles down between firings.
    EveryN {
        /// Countdown value the counter resets to after firing.
        period: u32,
        /// Cycles left before `inner` fires.
        remaining: u32,
        /// The action to fire.
        inner: Box<Processor>,
    },

    /// Expire messages and typing stamps older than their retention windows.
    ///
    /// A channel whose message map (or typing map) comes out of the sweep
    /// empty is dropped from the nested map entirely.
    CleanGarbage {
        /// How long messages are kept, measured against their effective
        /// (edited-else-created) timestamp.
        keep_messages: Duration,
        /// How long typing stamps are kept.
        keep_typing: Duration,
    },

    /// A caller-supplied action.
    Custom(Arc<dyn MaintenanceAction>),
}

impl Processor {
    /// A countdown garbage collector: sweep once per `period`-cycle
    /// countdown with the given retention windows.
    ///
    /// [`Processor::default`] is this with [`DEFAULT_PERIOD`] and the
    /// default windows.
    pub fn clean_every(period: u32, keep_messages: Duration, keep_typing: Duration) -> Self {
        Self::EveryN {
            period,
            remaining: period,
            inner: Box::new(Self::CleanGarbage { keep_messages, keep_typing }),
        }
    }

    /// Step this processor against the cycle's builder.
    ///
    /// Invoked exactly once per builder-to-snapshot transition, after all of
    /// the cycle's events have been applied.
    pub fn step(&self, builder: &mut CacheBuilder, now: Timestamp) -> StepOutcome {
        match self {
            Self::EveryN { period, remaining, inner } => {
                if *remaining > 0 {
                    return StepOutcome::Replace(Self::EveryN {
                        period: *period,
                        remaining: remaining - 1,
                        inner: inner.clone(),
                    });
                }

                let next_inner = match inner.step(builder, now) {
                    StepOutcome::Unchanged => inner.clone(),
                    StepOutcome::Replace(next) => Box::new(next),
                };

                StepOutcome::Replace(Self::EveryN {
                    period: *period,
                    remaining: *period,
                    inner: next_inner,
                })
            },

            Self::CleanGarbage { keep_messages, keep_typing } => {
                clean_garbage(builder, now, *keep_messages, *keep_typing);
                StepOutcome::Unchanged
            },

            Self::Custom(action) => action.run(builder, now),
        }
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::clean_every(DEFAULT_PERIOD, DEFAULT_KEEP_MESSAGES, DEFAULT_KEEP_TYPING)
    }
}

/// Sweep expired messages and typing stamps out of the builder.
fn clean_garbage(
    builder: &mut CacheBuilder,
    now: Timestamp,
    keep_messages: Duration,
    keep_typing: Duration,
) {
    let mut dropped_messages = 0usize;
    let mut dropped_channels = 0usize;

    builder.messages_mut().modify_or_remove(|_, messages| {
        messages.modify_or_remove(|_, message| {
            let expired = message.effective_timestamp().saturating_elapsed(now) > keep_messages;
            if expired {
                dropped_messages += 1;
            }
            !expired
        });
        if messages.is_empty() {
            dropped_channels += 1;
            return false;
        }
        true
    });

    let mut dropped_stamps = 0usize;

    builder.typing_mut().modify_or_remove(|_, stamps| {
        stamps.modify_or_remove(|_, started| {
            let expired = started.saturating_elapsed(now) > keep_typing;
            if expired {
                dropped_stamps += 1;
            }
            !expired
        });
        !stamps.is_empty()
    });

    tracing::debug!(dropped_messages, dropped_channels, dropped_stamps, "garbage sweep");
}
