//! Departure snapshots.
//!
//! A snapshot is built from the registry as it stands *before* a PART, KICK
//! or QUIT is applied, so events can still report where a user was.

use slirc_wire::UserHostmask;

use super::registry::Registry;
use super::user::UserId;

/// Immutable copy of a user at the moment it left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSnapshot {
    pub id: UserId,
    pub nick: String,
    pub login: String,
    pub hostname: String,
    pub real_name: String,
    pub server: String,
    pub away_message: Option<String>,
    pub account: Option<String>,
    pub is_identified: bool,
    /// Channel names the user occupied, ordered by name.
    pub channels: Vec<String>,
}

impl UserSnapshot {
    pub fn hostmask(&self) -> UserHostmask {
        UserHostmask::new(&self.nick, &self.login, &self.hostname)
    }

    pub fn was_in(&self, channel: &str, registry: &Registry) -> bool {
        let cm = registry.casemapping();
        self.channels.iter().any(|c| cm.equals(c, channel))
    }
}

/// Capture `id` as it currently stands. Pure: reads only.
pub fn snapshot_user(registry: &Registry, id: UserId) -> Option<UserSnapshot> {
    let user = registry.user_by_id(id)?;
    Some(UserSnapshot {
        id,
        nick: user.nick.clone(),
        login: user.login.clone(),
        hostname: user.hostname.clone(),
        real_name: user.real_name.clone(),
        server: user.server.clone(),
        away_message: user.away_message.clone(),
        account: user.account.clone(),
        is_identified: user.is_identified,
        channels: registry
            .channels_of(id)
            .into_iter()
            .map(|c| c.name.clone())
            .collect(),
    })
}
