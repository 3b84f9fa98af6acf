//! Channel records and the wire-shaped channel payload.
//!
//! The gateway delivers one channel object shape for every channel kind; which
//! fields are populated depends on the kind. The cache stores direct-message
//! and group channels in their own collections and folds guild channels into
//! their owning guild record, so the decoded payload keeps the union shape
//! ([`ChannelPayload`]) and the cache-side records are kind-specific.

use serde::{Deserialize, Serialize};

use crate::{
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, UserMarker},
    },
    user::User,
};

/// Kind tag of a decoded channel payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    /// One-to-one direct message channel.
    Dm,
    /// Multi-party direct message channel.
    GroupDm,
    /// Text channel inside a guild.
    GuildText,
}

/// Wire-shaped union of all channel kinds, as carried by channel events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPayload {
    /// Identifier of the channel.
    pub id: Id<ChannelMarker>,

    /// Which kind of channel this payload describes.
    pub kind: ChannelKind,

    /// Owning guild; present exactly for guild-kind channels.
    pub guild_id: Option<Id<GuildMarker>>,

    /// Channel name; absent for direct-message channels.
    pub name: Option<String>,

    /// Channel topic; only meaningful for guild channels.
    pub topic: Option<String>,

    /// Owner of a group DM; absent for other kinds.
    pub owner_id: Option<Id<UserMarker>>,

    /// Recipients of a direct-message or group channel.
    pub recipients: Vec<User>,
}

/// A one-to-one direct message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DmChannel {
    /// Identifier of the channel.
    pub id: Id<ChannelMarker>,

    /// The other party.
    pub recipient: User,
}

/// A multi-party direct message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDmChannel {
    /// Identifier of the channel.
    pub id: Id<ChannelMarker>,

    /// Group name, when one is set.
    pub name: Option<String>,

    /// User who created the group.
    pub owner_id: Id<UserMarker>,

    /// Current recipients, excluding the bot itself.
    pub recipients: Vec<User>,
}

/// A text channel inside a guild, stored on the guild record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildChannel {
    /// Identifier of the channel.
    pub id: Id<ChannelMarker>,

    /// Channel name.
    pub name: String,

    /// Channel topic, when set.
    pub topic: Option<String>,
}
