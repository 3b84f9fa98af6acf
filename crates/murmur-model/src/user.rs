//! User records.

use serde::{Deserialize, Serialize};

use crate::id::{Id, marker::UserMarker};

/// A platform user as decoded from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier of the user.
    pub id: Id<UserMarker>,

    /// Display name.
    pub username: String,

    /// Four-digit tag disambiguating equal usernames.
    pub discriminator: u16,

    /// Avatar image hash, when the user has one set.
    pub avatar: Option<String>,

    /// Whether this account is a bot account.
    pub bot: bool,
}

impl User {
    /// Merge the fields present on a partial update into this record.
    ///
    /// Absent fields leave the existing value untouched. The identifier is
    /// never changed; callers match records by id before merging.
    pub fn merge(&mut self, partial: &PartialUser) {
        if let Some(username) = &partial.username {
            self.username = username.clone();
        }
        if let Some(discriminator) = partial.discriminator {
            self.discriminator = discriminator;
        }
        if let Some(avatar) = &partial.avatar {
            self.avatar = Some(avatar.clone());
        }
    }
}

/// A user payload that only carries changed fields.
///
/// Member updates deliver these; `None` means "not included in the event",
/// not "cleared".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialUser {
    /// Identifier of the user the update applies to.
    pub id: Id<UserMarker>,

    /// New display name, when changed.
    pub username: Option<String>,

    /// New discriminator, when changed.
    pub discriminator: Option<u16>,

    /// New avatar hash, when changed.
    pub avatar: Option<String>,
}
