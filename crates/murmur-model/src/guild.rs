//! Guild records.

use serde::{Deserialize, Serialize};

use crate::{
    channel::GuildChannel,
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, UserMarker},
    },
};

/// A guild the cache holds full state for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    /// Identifier of the guild.
    pub id: Id<GuildMarker>,

    /// Guild name.
    pub name: String,

    /// Icon image hash, when set.
    pub icon: Option<String>,

    /// Identifier of the owning user.
    pub owner_id: Id<UserMarker>,

    /// Total member count as reported by the gateway, when known.
    pub member_count: Option<u64>,

    /// Channels belonging to this guild.
    ///
    /// Guild-kind channel events edit this list in place; it is empty on
    /// guild updates that omit the channel list.
    pub channels: Vec<GuildChannel>,
}

impl Guild {
    /// Insert or replace a channel in this guild's channel list.
    pub fn upsert_channel(&mut self, channel: GuildChannel) {
        match self.channels.iter_mut().find(|existing| existing.id == channel.id) {
            Some(existing) => *existing = channel,
            None => self.channels.push(channel),
        }
    }

    /// Remove a channel from this guild's channel list, if present.
    pub fn remove_channel(&mut self, id: Id<ChannelMarker>) {
        self.channels.retain(|channel| channel.id != id);
    }
}

/// A guild the gateway has told us exists but not yet described.
///
/// Guilds start out unavailable in the ready payload and become available
/// when their full create event arrives; they can also drop back to
/// unavailable during outages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableGuild {
    /// Identifier of the guild.
    pub id: Id<GuildMarker>,

    /// Whether the guild is merely unavailable (`true`) or was actually
    /// left/deleted (`false`).
    pub unavailable: bool,
}

#[cfg(test)]
mod tests {
    use super::Guild;
    use crate::{channel::GuildChannel, id::Id};

    fn guild() -> Guild {
        Guild {
            id: Id::new(1),
            name: "guild".to_owned(),
            icon: None,
            owner_id: Id::new(2),
            member_count: None,
            channels: Vec::new(),
        }
    }

    #[test]
    fn upsert_channel_replaces_by_id() {
        let mut guild = guild();
        guild.upsert_channel(GuildChannel { id: Id::new(10), name: "a".to_owned(), topic: None });
        guild.upsert_channel(GuildChannel { id: Id::new(10), name: "b".to_owned(), topic: None });

        assert_eq!(guild.channels.len(), 1);
        assert_eq!(guild.channels[0].name, "b");
    }

    #[test]
    fn remove_channel_is_a_noop_for_unknown_ids() {
        let mut guild = guild();
        guild.upsert_channel(GuildChannel { id: Id::new(10), name: "a".to_owned(), topic: None });
        guild.remove_channel(Id::new(11));

        assert_eq!(guild.channels.len(), 1);
    }
}
