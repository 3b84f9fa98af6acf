//! Error types for the cache engine.
//!
//! The cache assumes the decoding layer already validated structural
//! well-formedness, so a payload that is missing a field its category
//! requires is a logic error: the handler propagates it and never guesses.
//! Updates that merely reference entities the cache does not hold are *not*
//! errors; the cache is a best-effort partial mirror and skips those.

use thiserror::Error;

/// Errors that can occur while applying an update event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An event payload is structurally unusable for its category.
    #[error("malformed {event} event: {reason}")]
    MalformedEvent {
        /// Wire-style name of the offending event.
        event: &'static str,
        /// What the payload was missing or carrying wrongly.
        reason: &'static str,
    },
}
