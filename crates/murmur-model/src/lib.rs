//! Data model for the murmur gateway cache.
//!
//! Decoded, wire-shaped types shared by the event-decoding layer and the
//! cache engine: typed identifiers, entity records, wall-clock timestamps,
//! and the [`UpdateEvent`] enum the cache replays.
//!
//! # Components
//!
//! - [`Id`]: phantom-tagged 64-bit entity identifiers
//! - [`Timestamp`]: Unix-millisecond wall-clock time
//! - Entity records: [`User`], [`Guild`], [`DmChannel`], [`Message`],
//!   [`Ban`], ...
//! - [`UpdateEvent`]: one decoded gateway event, tagged with its category

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ban;
mod channel;
mod event;
mod guild;
pub mod id;
mod message;
mod time;
mod user;

pub use ban::Ban;
pub use channel::{ChannelKind, ChannelPayload, DmChannel, GroupDmChannel, GuildChannel};
pub use event::UpdateEvent;
pub use guild::{Guild, UnavailableGuild};
pub use id::Id;
pub use message::{Message, MessageEdit, Reaction};
pub use time::Timestamp;
pub use user::{PartialUser, User};
