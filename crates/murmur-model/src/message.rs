//! Message records and partial message edits.

use serde::{Deserialize, Serialize};

use crate::{
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
    time::Timestamp,
    user::User,
};

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Identifier of the message.
    pub id: Id<MessageMarker>,

    /// Channel the message was posted in.
    pub channel_id: Id<ChannelMarker>,

    /// Author of the message.
    pub author: User,

    /// Message text.
    pub content: String,

    /// When the message was created.
    pub timestamp: Timestamp,

    /// When the message was last edited, if ever.
    pub edited_timestamp: Option<Timestamp>,

    /// Reaction tallies on this message.
    pub reactions: Vec<Reaction>,
}

impl Message {
    /// The timestamp retention decisions are made against: the last edit
    /// time when the message has been edited, the creation time otherwise.
    pub fn effective_timestamp(&self) -> Timestamp {
        self.edited_timestamp.unwrap_or(self.timestamp)
    }

    /// Merge the fields present on an edit into this record.
    pub fn apply_edit(&mut self, edit: &MessageEdit) {
        if let Some(content) = &edit.content {
            self.content = content.clone();
        }
        if let Some(edited) = edit.edited_timestamp {
            self.edited_timestamp = Some(edited);
        }
        if let Some(reactions) = &edit.reactions {
            self.reactions = reactions.clone();
        }
    }
}

/// A partial message update; `None` fields were not included in the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEdit {
    /// Identifier of the edited message.
    pub id: Id<MessageMarker>,

    /// Channel the message lives in.
    pub channel_id: Id<ChannelMarker>,

    /// New message text, when changed.
    pub content: Option<String>,

    /// Edit time, when the platform stamped one.
    pub edited_timestamp: Option<Timestamp>,

    /// Replacement reaction tallies, when included.
    pub reactions: Option<Vec<Reaction>>,
}

/// An aggregated reaction on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// The emoji, as its canonical string form.
    pub emoji: String,

    /// How many users reacted with this emoji.
    pub count: u64,

    /// Whether the bot itself is among the reactors.
    pub me: bool,
}

#[cfg(test)]
mod tests {
    use super::{Message, MessageEdit};
    use crate::{id::Id, time::Timestamp, user::User};

    fn message() -> Message {
        Message {
            id: Id::new(5),
            channel_id: Id::new(6),
            author: User {
                id: Id::new(7),
                username: "author".to_owned(),
                discriminator: 1,
                avatar: None,
                bot: false,
            },
            content: "hello".to_owned(),
            timestamp: Timestamp::from_unix_millis(1_000),
            edited_timestamp: None,
            reactions: Vec::new(),
        }
    }

    #[test]
    fn effective_timestamp_prefers_the_edit_time() {
        let mut message = message();
        assert_eq!(message.effective_timestamp(), Timestamp::from_unix_millis(1_000));

        message.edited_timestamp = Some(Timestamp::from_unix_millis(2_500));
        assert_eq!(message.effective_timestamp(), Timestamp::from_unix_millis(2_500));
    }

    #[test]
    fn apply_edit_merges_present_fields_only() {
        let mut message = message();
        message.apply_edit(&MessageEdit {
            id: message.id,
            channel_id: message.channel_id,
            content: None,
            edited_timestamp: Some(Timestamp::from_unix_millis(3_000)),
            reactions: None,
        });

        assert_eq!(message.content, "hello");
        assert_eq!(message.edited_timestamp, Some(Timestamp::from_unix_millis(3_000)));
    }
}
