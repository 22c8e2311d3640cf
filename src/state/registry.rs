//! The identity registry: users, channels and the memberships between them.
//!
//! Lookups are case-insensitive under the session's [`Casemapping`]. Users
//! are keyed internally by [`UserId`] so a rename keeps identity and
//! memberships. The bot's own user is always present and is never purged.

use std::collections::HashMap;

use slirc_wire::{Casemapping, UserHostmask};
use tracing::trace;

use super::channel::{Channel, Privileges};
use super::user::{User, UserId};

#[derive(Debug)]
pub struct Registry {
    casemapping: Casemapping,
    own: UserId,
    users: HashMap<UserId, User>,
    /// Folded nick -> user.
    nicks: HashMap<String, UserId>,
    /// Folded channel name -> channel.
    channels: HashMap<String, Channel>,
}

impl Registry {
    pub fn new(own_nick: &str, casemapping: Casemapping) -> Self {
        let own_user = User::new(&UserHostmask::from_nick(own_nick));
        let own = own_user.id();
        let mut registry = Self {
            casemapping,
            own,
            users: HashMap::new(),
            nicks: HashMap::new(),
            channels: HashMap::new(),
        };
        registry.nicks.insert(registry.fold(own_nick), own);
        registry.users.insert(own, own_user);
        registry
    }

    fn fold(&self, name: &str) -> String {
        self.casemapping.to_lower(name)
    }

    pub fn casemapping(&self) -> Casemapping {
        self.casemapping
    }

    /// Switch case mapping and re-key every index under it.
    pub(crate) fn set_casemapping(&mut self, casemapping: Casemapping) {
        if casemapping == self.casemapping {
            return;
        }
        self.casemapping = casemapping;

        self.nicks = self
            .users
            .values()
            .map(|u| (casemapping.to_lower(&u.nick), u.id()))
            .collect();
        self.channels = std::mem::take(&mut self.channels)
            .into_values()
            .map(|c| (casemapping.to_lower(&c.name), c))
            .collect();
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub fn own_id(&self) -> UserId {
        self.own
    }

    /// The bot's own user.
    pub fn own_user(&self) -> &User {
        // The own entry is inserted in `new` and never removed.
        &self.users[&self.own]
    }

    pub fn own_nick(&self) -> &str {
        &self.own_user().nick
    }

    pub fn is_own(&self, id: UserId) -> bool {
        id == self.own
    }

    pub fn is_own_nick(&self, nick: &str) -> bool {
        self.casemapping.equals(nick, self.own_nick())
    }

    pub fn user(&self, nick: &str) -> Option<&User> {
        let id = self.nicks.get(&self.fold(nick))?;
        self.users.get(id)
    }

    pub fn user_by_id(&self, id: UserId) -> Option<&User> {
        self.users.get(&id)
    }

    pub(crate) fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Find a user by nick, creating it if unknown. Known users absorb any
    /// login/hostname carried by `mask`.
    pub(crate) fn get_or_create_user(&mut self, mask: &UserHostmask) -> UserId {
        let key = self.fold(&mask.nick);
        if let Some(&id) = self.nicks.get(&key) {
            if let Some(user) = self.users.get_mut(&id) {
                user.absorb(mask);
            }
            return id;
        }

        let user = User::new(mask);
        let id = user.id();
        trace!(nick = %mask.nick, %id, "created user");
        self.nicks.insert(key, id);
        self.users.insert(id, user);
        id
    }

    /// Re-index a user under a new nick, keeping identity and memberships.
    ///
    /// A different user already holding `new_nick` is stale and is dropped.
    pub(crate) fn rename(&mut self, id: UserId, new_nick: &str) {
        let Some(old_nick) = self.users.get(&id).map(|u| u.nick.clone()) else {
            return;
        };

        let new_key = self.fold(new_nick);
        if let Some(&holder) = self.nicks.get(&new_key) {
            if holder != id && !self.is_own(holder) {
                self.remove_from_all(holder);
                self.users.remove(&holder);
            }
        }

        let old_key = self.fold(&old_nick);
        if self.nicks.get(&old_key) == Some(&id) {
            self.nicks.remove(&old_key);
        }
        self.nicks.insert(new_key, id);
        if let Some(user) = self.users.get_mut(&id) {
            user.nick = new_nick.to_owned();
        }
    }

    /// Drop a user with no memberships left. The own user is kept.
    /// Returns whether the user was removed.
    pub(crate) fn purge_if_orphan(&mut self, id: UserId) -> bool {
        if self.is_own(id) || self.channels.values().any(|c| c.contains(id)) {
            return false;
        }
        let Some(user) = self.users.remove(&id) else {
            return false;
        };
        let key = self.fold(&user.nick);
        if self.nicks.get(&key) == Some(&id) {
            self.nicks.remove(&key);
        }
        trace!(nick = %user.nick, "purged user");
        true
    }

    // ------------------------------------------------------------------
    // Channels
    // ------------------------------------------------------------------

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.get(&self.fold(name))
    }

    pub(crate) fn channel_mut(&mut self, name: &str) -> Option<&mut Channel> {
        let key = self.fold(name);
        self.channels.get_mut(&key)
    }

    pub fn channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub(crate) fn get_or_create_channel(&mut self, name: &str) -> &mut Channel {
        let key = self.fold(name);
        self.channels.entry(key).or_insert_with(|| {
            trace!(channel = %name, "created channel");
            Channel::new(name)
        })
    }

    /// Remove a channel outright and purge members left with nothing.
    pub(crate) fn remove_channel(&mut self, name: &str) -> Option<Channel> {
        let key = self.fold(name);
        let channel = self.channels.remove(&key)?;
        for (id, _) in channel.members() {
            self.purge_if_orphan(id);
        }
        Some(channel)
    }

    // ------------------------------------------------------------------
    // Memberships
    // ------------------------------------------------------------------

    /// Channels `id` is in, ordered by name.
    pub fn channels_of(&self, id: UserId) -> Vec<&Channel> {
        let mut channels: Vec<&Channel> =
            self.channels.values().filter(|c| c.contains(id)).collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        channels
    }

    /// Members of `channel`, ordered by nick.
    pub fn users_in(&self, channel: &str) -> Vec<&User> {
        let Some(channel) = self.channel(channel) else {
            return Vec::new();
        };
        let mut users: Vec<&User> = channel
            .members()
            .filter_map(|(id, _)| self.users.get(&id))
            .collect();
        users.sort_by(|a, b| a.nick.cmp(&b.nick));
        users
    }

    pub fn is_member(&self, channel: &str, nick: &str) -> bool {
        match (self.channel(channel), self.user(nick)) {
            (Some(c), Some(u)) => c.contains(u.id()),
            _ => false,
        }
    }

    pub fn privileges(&self, channel: &str, nick: &str) -> Option<Privileges> {
        let user = self.user(nick)?;
        self.channel(channel)?.privileges(user.id()).copied()
    }

    pub fn is_op(&self, channel: &str, nick: &str) -> bool {
        self.privileges(channel, nick).is_some_and(|p| p.op)
    }

    pub fn has_voice(&self, channel: &str, nick: &str) -> bool {
        self.privileges(channel, nick).is_some_and(|p| p.voice)
    }

    /// Add `id` to `channel`, creating the channel if needed.
    /// Returns `false` when the membership already existed.
    pub(crate) fn add_membership(&mut self, channel: &str, id: UserId) -> bool {
        self.get_or_create_channel(channel).add_member(id)
    }

    pub(crate) fn remove_membership(&mut self, channel: &str, id: UserId) -> Option<Privileges> {
        self.channel_mut(channel)?.remove_member(id)
    }

    /// Remove `id` from every channel.
    pub(crate) fn remove_from_all(&mut self, id: UserId) {
        for channel in self.channels.values_mut() {
            channel.remove_member(id);
        }
    }
}
