//! Guild ban records.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// A ban of a user from a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ban {
    /// The banned user.
    pub user: User,

    /// Moderator-supplied reason, when one was given.
    pub reason: Option<String>,
}
