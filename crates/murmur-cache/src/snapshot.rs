//! Immutable cache snapshots.
//!
//! A [`CacheSnapshot`] is one fully-populated generation of cached remote
//! state. Once frozen it is never mutated; every collection is a structurally
//! independent copy of the builder that produced it, so any number of readers
//! can hold any number of generations concurrently without synchronization.

use murmur_model::{
    Ban, DmChannel, GroupDmChannel, Guild, Id, Message, Timestamp, UnavailableGuild, User,
    id::marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker},
};

use crate::{builder::CacheBuilder, map::FrozenMap, processor::Processor};

/// An immutable point-in-time view of all cached entity state.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    /// Generation counter; advances by exactly one per freeze.
    pub(crate) sequence: u64,
    /// The bot's own identity.
    pub(crate) bot_user: User,
    /// Open direct-message channels.
    pub(crate) dm_channels: FrozenMap<ChannelMarker, DmChannel>,
    /// Open group channels.
    pub(crate) group_dm_channels: FrozenMap<ChannelMarker, GroupDmChannel>,
    /// Guilds known to exist but not described.
    pub(crate) unavailable_guilds: FrozenMap<GuildMarker, UnavailableGuild>,
    /// Fully-described guilds.
    pub(crate) guilds: FrozenMap<GuildMarker, Guild>,
    /// Message history per channel.
    pub(crate) messages: FrozenMap<ChannelMarker, FrozenMap<MessageMarker, Message>>,
    /// Last typing stamp per channel per user.
    pub(crate) typing: FrozenMap<ChannelMarker, FrozenMap<UserMarker, Timestamp>>,
    /// Users seen by the cache.
    pub(crate) users: FrozenMap<UserMarker, User>,
    /// Bans per guild.
    pub(crate) bans: FrozenMap<GuildMarker, FrozenMap<UserMarker, Ban>>,
    /// Maintenance action for the next update cycle.
    pub(crate) processor: Processor,
}

impl CacheSnapshot {
    /// An empty generation-zero snapshot with the default maintenance
    /// processor.
    ///
    /// The caller supplies whatever identity it has for the bot; before the
    /// gateway handshake that is typically a placeholder, replaced when the
    /// ready event arrives.
    pub fn seed(bot_user: User) -> Self {
        Self::seed_with(bot_user, Processor::default())
    }

    /// An empty generation-zero snapshot carrying a caller-chosen
    /// maintenance processor.
    pub fn seed_with(bot_user: User, processor: Processor) -> Self {
        Self {
            sequence: 0,
            bot_user,
            dm_channels: FrozenMap::new(),
            group_dm_channels: FrozenMap::new(),
            unavailable_guilds: FrozenMap::new(),
            guilds: FrozenMap::new(),
            messages: FrozenMap::new(),
            typing: FrozenMap::new(),
            users: FrozenMap::new(),
            bans: FrozenMap::new(),
            processor,
        }
    }

    /// Full copy into a mutable builder seeded with this snapshot's state.
    pub fn to_builder(&self) -> CacheBuilder {
        CacheBuilder {
            sequence: self.sequence,
            bot_user: self.bot_user.clone(),
            dm_channels: self.dm_channels.thaw(),
            group_dm_channels: self.group_dm_channels.thaw(),
            unavailable_guilds: self.unavailable_guilds.thaw(),
            guilds: self.guilds.thaw(),
            messages: self.messages.thaw_with(FrozenMap::thaw),
            typing: self.typing.thaw_with(FrozenMap::thaw),
            users: self.users.thaw(),
            bans: self.bans.thaw_with(FrozenMap::thaw),
            processor: self.processor.clone(),
        }
    }

    /// Generation counter of this snapshot.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The bot's own identity.
    pub fn bot_user(&self) -> &User {
        &self.bot_user
    }

    /// Open direct-message channels.
    pub fn dm_channels(&self) -> &FrozenMap<ChannelMarker, DmChannel> {
        &self.dm_channels
    }

    /// Open group channels.
    pub fn group_dm_channels(&self) -> &FrozenMap<ChannelMarker, GroupDmChannel> {
        &self.group_dm_channels
    }

    /// Guilds known to exist but not yet described.
    pub fn unavailable_guilds(&self) -> &FrozenMap<GuildMarker, UnavailableGuild> {
        &self.unavailable_guilds
    }

    /// Fully-described guilds.
    pub fn guilds(&self) -> &FrozenMap<GuildMarker, Guild> {
        &self.guilds
    }

    /// Message history per channel.
    pub fn messages(&self) -> &FrozenMap<ChannelMarker, FrozenMap<MessageMarker, Message>> {
        &self.messages
    }

    /// Last typing stamp per channel per user.
    pub fn typing(&self) -> &FrozenMap<ChannelMarker, FrozenMap<UserMarker, Timestamp>> {
        &self.typing
    }

    /// Users seen by the cache.
    pub fn users(&self) -> &FrozenMap<UserMarker, User> {
        &self.users
    }

    /// Bans per guild.
    pub fn bans(&self) -> &FrozenMap<GuildMarker, FrozenMap<UserMarker, Ban>> {
        &self.bans
    }

    /// Maintenance action that will run on the next update cycle.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// A cached message, when the channel and message are both known.
    pub fn message(
        &self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) -> Option<&Message> {
        self.messages.get(channel_id).and_then(|inner| inner.get(message_id))
    }

    /// When `user_id` last started typing in `channel_id`, if recorded.
    pub fn typing_started(
        &self,
        channel_id: Id<ChannelMarker>,
        user_id: Id<UserMarker>,
    ) -> Option<Timestamp> {
        self.typing.get(channel_id).and_then(|inner| inner.get(user_id)).copied()
    }

    /// A cached ban, when the guild and user are both known.
    pub fn ban(&self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) -> Option<&Ban> {
        self.bans.get(guild_id).and_then(|inner| inner.get(user_id))
    }
}
