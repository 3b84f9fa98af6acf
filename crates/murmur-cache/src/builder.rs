//! Mutable snapshot builders.
//!
//! A [`CacheBuilder`] is one in-progress snapshot generation: the driver
//! derives it from the current [`CacheSnapshot`], applies a batch of decoded
//! update events to it, runs the pending maintenance processor, and freezes
//! it into the next generation. The builder is private to the driver for the
//! duration of the batch; no locking is needed because one cycle completes
//! before the next begins.
//!
//! Handler rules, applied uniformly across categories:
//!
//! - create and update are the same idempotent upsert, except where the event
//!   only carries changed fields (member and message updates merge)
//! - an update referencing an entity the cache does not hold is skipped, not
//!   an error; the cache is a best-effort partial mirror
//! - deletions remove the record from its owning map but never collapse a
//!   nested map's emptied inner maps; that is the garbage collector's job
//! - a payload that is structurally unusable for its category propagates as
//!   [`CacheError::MalformedEvent`]

use murmur_model::{
    Ban, ChannelKind, ChannelPayload, DmChannel, GroupDmChannel, Guild, GuildChannel, Id, Message,
    MessageEdit, PartialUser, Reaction, Timestamp, UnavailableGuild, UpdateEvent, User,
    id::marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker},
};

use crate::{
    error::CacheError,
    map::WorkingMap,
    processor::{Processor, StepOutcome},
    snapshot::CacheSnapshot,
};

/// A mutable, in-progress snapshot generation.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    /// Sequence of the snapshot this builder was derived from.
    pub(crate) sequence: u64,
    /// The bot's own identity.
    pub(crate) bot_user: User,
    /// Open direct-message channels.
    pub(crate) dm_channels: WorkingMap<ChannelMarker, DmChannel>,
    /// Open group channels.
    pub(crate) group_dm_channels: WorkingMap<ChannelMarker, GroupDmChannel>,
    /// Guilds known to exist but not described.
    pub(crate) unavailable_guilds: WorkingMap<GuildMarker, UnavailableGuild>,
    /// Fully-described guilds.
    pub(crate) guilds: WorkingMap<GuildMarker, Guild>,
    /// Message history per channel.
    pub(crate) messages: WorkingMap<ChannelMarker, WorkingMap<MessageMarker, Message>>,
    /// Last typing stamp per channel per user.
    pub(crate) typing: WorkingMap<ChannelMarker, WorkingMap<UserMarker, Timestamp>>,
    /// Users seen by the cache.
    pub(crate) users: WorkingMap<UserMarker, User>,
    /// Bans per guild.
    pub(crate) bans: WorkingMap<GuildMarker, WorkingMap<UserMarker, Ban>>,
    /// Maintenance action pending for this cycle.
    pub(crate) processor: Processor,
}

impl CacheBuilder {
    /// A from-scratch builder at generation zero with the default
    /// maintenance processor.
    ///
    /// The caller supplies whatever bot identity it has; see
    /// [`CacheSnapshot::seed`].
    pub fn seed(bot_user: User) -> Self {
        Self {
            sequence: 0,
            bot_user,
            dm_channels: WorkingMap::new(),
            group_dm_channels: WorkingMap::new(),
            unavailable_guilds: WorkingMap::new(),
            guilds: WorkingMap::new(),
            messages: WorkingMap::new(),
            typing: WorkingMap::new(),
            users: WorkingMap::new(),
            bans: WorkingMap::new(),
            processor: Processor::default(),
        }
    }

    /// Apply one decoded update event to this builder's working state.
    pub fn apply(&mut self, event: &UpdateEvent) -> Result<(), CacheError> {
        match event {
            UpdateEvent::Ready { user, dm_channels, group_dm_channels, unavailable_guilds } => {
                self.handle_ready(user, dm_channels, group_dm_channels, unavailable_guilds);
                Ok(())
            },
            UpdateEvent::ChannelCreate(payload) | UpdateEvent::ChannelUpdate(payload) => {
                self.upsert_channel(payload, event.name())
            },
            UpdateEvent::ChannelDelete(payload) => self.delete_channel(payload, event.name()),
            UpdateEvent::GuildCreate(guild) => {
                self.handle_guild_create(guild);
                Ok(())
            },
            UpdateEvent::GuildUpdate(guild) => {
                self.handle_guild_update(guild);
                Ok(())
            },
            UpdateEvent::GuildDelete(guild) => {
                self.handle_guild_delete(guild);
                Ok(())
            },
            UpdateEvent::MemberUpdate { guild_id, user } => {
                self.handle_member_update(*guild_id, user);
                Ok(())
            },
            UpdateEvent::MessageCreate(message) => {
                self.handle_message_create(message);
                Ok(())
            },
            UpdateEvent::MessageUpdate(edit) => {
                self.handle_message_update(edit);
                Ok(())
            },
            UpdateEvent::MessageDelete { channel_id, id } => {
                self.remove_messages(*channel_id, std::slice::from_ref(id));
                Ok(())
            },
            UpdateEvent::MessageDeleteBulk { channel_id, ids } => {
                self.remove_messages(*channel_id, ids);
                Ok(())
            },
            UpdateEvent::ReactionAdd { channel_id, message_id, user_id, emoji } => {
                self.handle_reaction_add(*channel_id, *message_id, *user_id, emoji);
                Ok(())
            },
            UpdateEvent::ReactionRemove { channel_id, message_id, user_id, emoji } => {
                self.handle_reaction_remove(*channel_id, *message_id, *user_id, emoji);
                Ok(())
            },
            UpdateEvent::ReactionRemoveAll { channel_id, message_id } => {
                self.handle_reaction_remove_all(*channel_id, *message_id);
                Ok(())
            },
            UpdateEvent::BanAdd { guild_id, ban } => {
                self.handle_ban_add(*guild_id, ban);
                Ok(())
            },
            UpdateEvent::BanRemove { guild_id, user_id } => {
                self.handle_ban_remove(*guild_id, *user_id);
                Ok(())
            },
            UpdateEvent::UserUpdate(user) => {
                self.handle_user_update(user);
                Ok(())
            },
            UpdateEvent::TypingStart { channel_id, user_id, timestamp } => {
                self.typing.entry_or_default(*channel_id).insert(*user_id, *timestamp);
                Ok(())
            },
        }
    }

    /// Run the pending maintenance processor once and install its successor.
    ///
    /// Invoked by the driver after all of the batch's events have been
    /// applied, immediately before [`freeze`](Self::freeze).
    pub fn run_processor(&mut self, now: Timestamp) {
        let processor = self.processor.clone();
        if let StepOutcome::Replace(next) = processor.step(self, now) {
            self.processor = next;
        }
    }

    /// Freeze this builder into the next immutable snapshot generation.
    ///
    /// All-or-nothing: the new snapshot's sequence is the seed sequence plus
    /// exactly one, and every collection is an independent copy.
    pub fn freeze(self) -> CacheSnapshot {
        let sequence = self.sequence + 1;
        tracing::debug!(sequence, "freezing cache generation");

        CacheSnapshot {
            sequence,
            bot_user: self.bot_user,
            dm_channels: self.dm_channels.freeze(),
            group_dm_channels: self.group_dm_channels.freeze(),
            unavailable_guilds: self.unavailable_guilds.freeze(),
            guilds: self.guilds.freeze(),
            messages: self.messages.freeze_with(WorkingMap::freeze),
            typing: self.typing.freeze_with(WorkingMap::freeze),
            users: self.users.freeze(),
            bans: self.bans.freeze_with(WorkingMap::freeze),
            processor: self.processor,
        }
    }

    /// Sequence of the snapshot this builder was derived from.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The bot's own identity.
    pub fn bot_user(&self) -> &User {
        &self.bot_user
    }

    /// Replace the bot's own identity.
    pub fn set_bot_user(&mut self, user: User) {
        self.bot_user = user;
    }

    /// Replace the pending maintenance processor.
    pub fn set_processor(&mut self, processor: Processor) {
        self.processor = processor;
    }

    /// Open direct-message channels.
    pub fn dm_channels(&self) -> &WorkingMap<ChannelMarker, DmChannel> {
        &self.dm_channels
    }

    /// Open group channels.
    pub fn group_dm_channels(&self) -> &WorkingMap<ChannelMarker, GroupDmChannel> {
        &self.group_dm_channels
    }

    /// Guilds known to exist but not yet described.
    pub fn unavailable_guilds(&self) -> &WorkingMap<GuildMarker, UnavailableGuild> {
        &self.unavailable_guilds
    }

    /// Fully-described guilds.
    pub fn guilds(&self) -> &WorkingMap<GuildMarker, Guild> {
        &self.guilds
    }

    /// Message history per channel.
    pub fn messages(&self) -> &WorkingMap<ChannelMarker, WorkingMap<MessageMarker, Message>> {
        &self.messages
    }

    /// Last typing stamp per channel per user.
    pub fn typing(&self) -> &WorkingMap<ChannelMarker, WorkingMap<UserMarker, Timestamp>> {
        &self.typing
    }

    /// Users seen by the cache.
    pub fn users(&self) -> &WorkingMap<UserMarker, User> {
        &self.users
    }

    /// Bans per guild.
    pub fn bans(&self) -> &WorkingMap<GuildMarker, WorkingMap<UserMarker, Ban>> {
        &self.bans
    }

    /// Open direct-message channels, mutably.
    pub fn dm_channels_mut(&mut self) -> &mut WorkingMap<ChannelMarker, DmChannel> {
        &mut self.dm_channels
    }

    /// Open group channels, mutably.
    pub fn group_dm_channels_mut(&mut self) -> &mut WorkingMap<ChannelMarker, GroupDmChannel> {
        &mut self.group_dm_channels
    }

    /// Guilds known to exist but not yet described, mutably.
    pub fn unavailable_guilds_mut(&mut self) -> &mut WorkingMap<GuildMarker, UnavailableGuild> {
        &mut self.unavailable_guilds
    }

    /// Fully-described guilds, mutably.
    pub fn guilds_mut(&mut self) -> &mut WorkingMap<GuildMarker, Guild> {
        &mut self.guilds
    }

    /// Message history per channel, mutably.
    pub fn messages_mut(
        &mut self,
    ) -> &mut WorkingMap<ChannelMarker, WorkingMap<MessageMarker, Message>> {
        &mut self.messages
    }

    /// Last typing stamp per channel per user, mutably.
    pub fn typing_mut(
        &mut self,
    ) -> &mut WorkingMap<ChannelMarker, WorkingMap<UserMarker, Timestamp>> {
        &mut self.typing
    }

    /// Users seen by the cache, mutably.
    pub fn users_mut(&mut self) -> &mut WorkingMap<UserMarker, User> {
        &mut self.users
    }

    /// Bans per guild, mutably.
    pub fn bans_mut(&mut self) -> &mut WorkingMap<GuildMarker, WorkingMap<UserMarker, Ban>> {
        &mut self.bans
    }

    fn handle_ready(
        &mut self,
        user: &User,
        dm_channels: &[DmChannel],
        group_dm_channels: &[GroupDmChannel],
        unavailable_guilds: &[UnavailableGuild],
    ) {
        self.bot_user = user.clone();
        for channel in dm_channels {
            self.dm_channels.insert(channel.id, channel.clone());
        }
        for channel in group_dm_channels {
            self.group_dm_channels.insert(channel.id, channel.clone());
        }
        for guild in unavailable_guilds {
            self.unavailable_guilds.insert(guild.id, guild.clone());
        }
    }

    fn upsert_channel(
        &mut self,
        payload: &ChannelPayload,
        event: &'static str,
    ) -> Result<(), CacheError> {
        match payload.kind {
            ChannelKind::Dm => {
                let [recipient] = payload.recipients.as_slice() else {
                    return Err(CacheError::MalformedEvent {
                        event,
                        reason: "direct-message channel without exactly one recipient",
                    });
                };
                self.dm_channels
                    .insert(payload.id, DmChannel { id: payload.id, recipient: recipient.clone() });
            },
            ChannelKind::GroupDm => {
                let Some(owner_id) = payload.owner_id else {
                    return Err(CacheError::MalformedEvent {
                        event,
                        reason: "group channel without an owner",
                    });
                };
                self.group_dm_channels.insert(
                    payload.id,
                    GroupDmChannel {
                        id: payload.id,
                        name: payload.name.clone(),
                        owner_id,
                        recipients: payload.recipients.clone(),
                    },
                );
            },
            ChannelKind::GuildText => {
                let (guild_id, name) = guild_channel_fields(payload, event)?;
                let Some(guild) = self.guilds.get_mut(guild_id) else {
                    tracing::trace!(event, channel_id = %payload.id, guild_id = %guild_id,
                        "skipping channel update for uncached guild");
                    return Ok(());
                };
                guild.upsert_channel(GuildChannel {
                    id: payload.id,
                    name: name.to_owned(),
                    topic: payload.topic.clone(),
                });
            },
        }
        Ok(())
    }

    fn delete_channel(
        &mut self,
        payload: &ChannelPayload,
        event: &'static str,
    ) -> Result<(), CacheError> {
        match payload.kind {
            ChannelKind::Dm => {
                self.dm_channels.remove(payload.id);
            },
            ChannelKind::GroupDm => {
                self.group_dm_channels.remove(payload.id);
            },
            ChannelKind::GuildText => {
                let Some(guild_id) = payload.guild_id else {
                    return Err(CacheError::MalformedEvent {
                        event,
                        reason: "guild channel without a guild id",
                    });
                };
                match self.guilds.get_mut(guild_id) {
                    Some(guild) => guild.remove_channel(payload.id),
                    None => tracing::trace!(event, channel_id = %payload.id, guild_id = %guild_id,
                        "skipping channel delete for uncached guild"),
                }
            },
        }
        Ok(())
    }

    fn handle_guild_create(&mut self, guild: &Guild) {
        self.unavailable_guilds.remove(guild.id);
        self.guilds.insert(guild.id, guild.clone());
    }

    /// Guild updates omit the channel list; an upsert keeps the one already
    /// cached rather than wiping it.
    fn handle_guild_update(&mut self, guild: &Guild) {
        let mut incoming = guild.clone();
        if incoming.channels.is_empty()
            && let Some(existing) = self.guilds.get(guild.id)
        {
            incoming.channels = existing.channels.clone();
        }
        self.guilds.insert(incoming.id, incoming);
    }

    fn handle_guild_delete(&mut self, guild: &UnavailableGuild) {
        self.guilds.remove(guild.id);
        if guild.unavailable {
            self.unavailable_guilds.insert(guild.id, guild.clone());
        } else {
            // Actually left the guild: its bans have no other cleanup path.
            self.unavailable_guilds.remove(guild.id);
            self.bans.remove(guild.id);
        }
    }

    fn handle_member_update(&mut self, guild_id: Id<GuildMarker>, user: &PartialUser) {
        match self.users.get_mut(user.id) {
            Some(existing) => existing.merge(user),
            None => tracing::trace!(guild_id = %guild_id, user_id = %user.id,
                "skipping member update for uncached user"),
        }
    }

    fn handle_message_create(&mut self, message: &Message) {
        self.users.insert(message.author.id, message.author.clone());
        self.messages.entry_or_default(message.channel_id).insert(message.id, message.clone());
    }

    fn handle_message_update(&mut self, edit: &MessageEdit) {
        let cached =
            self.messages.get_mut(edit.channel_id).and_then(|inner| inner.get_mut(edit.id));
        match cached {
            Some(message) => message.apply_edit(edit),
            None => tracing::trace!(channel_id = %edit.channel_id, message_id = %edit.id,
                "skipping edit for uncached message"),
        }
    }

    fn remove_messages(&mut self, channel_id: Id<ChannelMarker>, ids: &[Id<MessageMarker>]) {
        // An emptied inner map is left in place; the garbage collector owns
        // collapsing it.
        if let Some(inner) = self.messages.get_mut(channel_id) {
            for id in ids {
                inner.remove(*id);
            }
        }
    }

    fn handle_reaction_add(
        &mut self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        user_id: Id<UserMarker>,
        emoji: &str,
    ) {
        let me = user_id == self.bot_user.id;
        let cached = self.messages.get_mut(channel_id).and_then(|inner| inner.get_mut(message_id));
        let Some(message) = cached else {
            tracing::trace!(channel_id = %channel_id, message_id = %message_id,
                "skipping reaction for uncached message");
            return;
        };

        match message.reactions.iter_mut().find(|reaction| reaction.emoji == emoji) {
            Some(reaction) => {
                reaction.count += 1;
                reaction.me |= me;
            },
            None => message.reactions.push(Reaction { emoji: emoji.to_owned(), count: 1, me }),
        }
    }

    fn handle_reaction_remove(
        &mut self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
        user_id: Id<UserMarker>,
        emoji: &str,
    ) {
        let me = user_id == self.bot_user.id;
        let cached = self.messages.get_mut(channel_id).and_then(|inner| inner.get_mut(message_id));
        let Some(message) = cached else {
            return;
        };

        if let Some(reaction) = message.reactions.iter_mut().find(|reaction| reaction.emoji == emoji)
        {
            reaction.count = reaction.count.saturating_sub(1);
            if me {
                reaction.me = false;
            }
        }
        message.reactions.retain(|reaction| reaction.count > 0);
    }

    fn handle_reaction_remove_all(
        &mut self,
        channel_id: Id<ChannelMarker>,
        message_id: Id<MessageMarker>,
    ) {
        let cached = self.messages.get_mut(channel_id).and_then(|inner| inner.get_mut(message_id));
        if let Some(message) = cached {
            message.reactions.clear();
        }
    }

    fn handle_ban_add(&mut self, guild_id: Id<GuildMarker>, ban: &Ban) {
        self.bans.entry_or_default(guild_id).insert(ban.user.id, ban.clone());
    }

    fn handle_ban_remove(&mut self, guild_id: Id<GuildMarker>, user_id: Id<UserMarker>) {
        if let Some(inner) = self.bans.get_mut(guild_id) {
            inner.remove(user_id);
        }
    }

    fn handle_user_update(&mut self, user: &User) {
        if user.id == self.bot_user.id {
            self.bot_user = user.clone();
        }
        self.users.insert(user.id, user.clone());
    }
}

/// The guild id and name a guild-kind channel payload must carry.
fn guild_channel_fields<'a>(
    payload: &'a ChannelPayload,
    event: &'static str,
) -> Result<(Id<GuildMarker>, &'a str), CacheError> {
    let guild_id = payload.guild_id.ok_or(CacheError::MalformedEvent {
        event,
        reason: "guild channel without a guild id",
    })?;
    let name = payload.name.as_deref().ok_or(CacheError::MalformedEvent {
        event,
        reason: "guild channel without a name",
    })?;
    Ok((guild_id, name))
}
