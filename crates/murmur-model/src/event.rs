//! Decoded gateway update events.
//!
//! The transport layer owns framing, decompression, and payload decoding; the
//! cache consumes these already-decoded events. One variant exists per entity
//! category the cache maintains, and each carries exactly the identifiers and
//! field values its handler merges.

use serde::{Deserialize, Serialize};

use crate::{
    ban::Ban,
    channel::{ChannelPayload, DmChannel, GroupDmChannel},
    guild::{Guild, UnavailableGuild},
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker},
    },
    message::{Message, MessageEdit},
    time::Timestamp,
    user::{PartialUser, User},
};

/// A decoded update event, tagged with its entity category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateEvent {
    /// Initial session payload: the bot's own identity plus the partial
    /// state known at connect time.
    Ready {
        /// The bot's own user record.
        user: User,
        /// Direct-message channels open at connect time.
        dm_channels: Vec<DmChannel>,
        /// Group channels open at connect time.
        group_dm_channels: Vec<GroupDmChannel>,
        /// Guilds known to exist but not yet described.
        unavailable_guilds: Vec<UnavailableGuild>,
    },

    /// A channel was created.
    ChannelCreate(ChannelPayload),

    /// A channel was updated. Same merge semantics as creation.
    ChannelUpdate(ChannelPayload),

    /// A channel was deleted.
    ChannelDelete(ChannelPayload),

    /// A guild became available with full state.
    GuildCreate(Guild),

    /// A guild's own fields changed.
    GuildUpdate(Guild),

    /// A guild became unavailable or was left.
    GuildDelete(UnavailableGuild),

    /// A guild member changed; carries only changed user fields.
    MemberUpdate {
        /// Guild the membership belongs to.
        guild_id: Id<GuildMarker>,
        /// Changed fields of the member's user record.
        user: PartialUser,
    },

    /// A message was posted.
    MessageCreate(Message),

    /// A message was edited; carries only changed fields.
    MessageUpdate(MessageEdit),

    /// A single message was deleted.
    MessageDelete {
        /// Channel the message lived in.
        channel_id: Id<ChannelMarker>,
        /// Identifier of the deleted message.
        id: Id<MessageMarker>,
    },

    /// Several messages were deleted at once.
    MessageDeleteBulk {
        /// Channel the messages lived in.
        channel_id: Id<ChannelMarker>,
        /// Identifiers of the deleted messages.
        ids: Vec<Id<MessageMarker>>,
    },

    /// A user added a reaction to a message.
    ReactionAdd {
        /// Channel the message lives in.
        channel_id: Id<ChannelMarker>,
        /// Message reacted to.
        message_id: Id<MessageMarker>,
        /// User who reacted.
        user_id: Id<UserMarker>,
        /// Emoji, in its canonical string form.
        emoji: String,
    },

    /// A user removed their reaction from a message.
    ReactionRemove {
        /// Channel the message lives in.
        channel_id: Id<ChannelMarker>,
        /// Message the reaction was removed from.
        message_id: Id<MessageMarker>,
        /// User whose reaction was removed.
        user_id: Id<UserMarker>,
        /// Emoji, in its canonical string form.
        emoji: String,
    },

    /// All reactions were cleared from a message.
    ReactionRemoveAll {
        /// Channel the message lives in.
        channel_id: Id<ChannelMarker>,
        /// Message whose reactions were cleared.
        message_id: Id<MessageMarker>,
    },

    /// A user was banned from a guild.
    BanAdd {
        /// Guild the ban applies to.
        guild_id: Id<GuildMarker>,
        /// The ban record.
        ban: Ban,
    },

    /// A user's ban was lifted.
    BanRemove {
        /// Guild the ban applied to.
        guild_id: Id<GuildMarker>,
        /// User whose ban was lifted.
        user_id: Id<UserMarker>,
    },

    /// A user's own record changed.
    UserUpdate(User),

    /// A user started typing in a channel.
    TypingStart {
        /// Channel the user is typing in.
        channel_id: Id<ChannelMarker>,
        /// The typing user.
        user_id: Id<UserMarker>,
        /// When typing started.
        timestamp: Timestamp,
    },
}

impl UpdateEvent {
    /// Stable wire-style name of this event, for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "READY",
            Self::ChannelCreate(_) => "CHANNEL_CREATE",
            Self::ChannelUpdate(_) => "CHANNEL_UPDATE",
            Self::ChannelDelete(_) => "CHANNEL_DELETE",
            Self::GuildCreate(_) => "GUILD_CREATE",
            Self::GuildUpdate(_) => "GUILD_UPDATE",
            Self::GuildDelete(_) => "GUILD_DELETE",
            Self::MemberUpdate { .. } => "GUILD_MEMBER_UPDATE",
            Self::MessageCreate(_) => "MESSAGE_CREATE",
            Self::MessageUpdate(_) => "MESSAGE_UPDATE",
            Self::MessageDelete { .. } => "MESSAGE_DELETE",
            Self::MessageDeleteBulk { .. } => "MESSAGE_DELETE_BULK",
            Self::ReactionAdd { .. } => "MESSAGE_REACTION_ADD",
            Self::ReactionRemove { .. } => "MESSAGE_REACTION_REMOVE",
            Self::ReactionRemoveAll { .. } => "MESSAGE_REACTION_REMOVE_ALL",
            Self::BanAdd { .. } => "GUILD_BAN_ADD",
            Self::BanRemove { .. } => "GUILD_BAN_REMOVE",
            Self::UserUpdate(_) => "USER_UPDATE",
            Self::TypingStart { .. } => "TYPING_START",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UpdateEvent;
    use crate::id::Id;

    #[test]
    fn names_are_wire_style() {
        let event = UpdateEvent::MessageDelete { channel_id: Id::new(1), id: Id::new(2) };
        assert_eq!(event.name(), "MESSAGE_DELETE");

        let event = UpdateEvent::ReactionRemoveAll { channel_id: Id::new(1), message_id: Id::new(2) };
        assert_eq!(event.name(), "MESSAGE_REACTION_REMOVE_ALL");
    }
}
