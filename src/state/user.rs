//! User-related types.

use std::fmt;

use slirc_wire::UserHostmask;
use uuid::Uuid;

/// Stable identity of a user, unchanged across nick changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid);

impl UserId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A user known to this connection.
///
/// Channel membership is owned by the registry; ask
/// [`Registry::channels_of`](super::Registry::channels_of) for it.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    pub nick: String,
    /// Username (ident), possibly prefixed with `~`.
    pub login: String,
    pub hostname: String,
    pub real_name: String,
    /// Server the user is connected to, as reported by WHO/WHOIS.
    pub server: String,
    pub hops: Option<u32>,
    /// `Some` while the user is away; the message may be empty.
    pub away_message: Option<String>,
    pub is_identified: bool,
    /// Services account, from account-notify, extended-join or WHOIS.
    pub account: Option<String>,
    pub is_ircop: bool,
}

impl User {
    pub(crate) fn new(mask: &UserHostmask) -> Self {
        Self {
            id: UserId::new(),
            nick: mask.nick.clone(),
            login: mask.login.clone(),
            hostname: mask.hostname.clone(),
            real_name: String::new(),
            server: String::new(),
            hops: None,
            away_message: None,
            is_identified: false,
            account: None,
            is_ircop: false,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    /// Current `nick!login@host` mask.
    pub fn hostmask(&self) -> UserHostmask {
        UserHostmask::new(&self.nick, &self.login, &self.hostname)
    }

    pub fn is_away(&self) -> bool {
        self.away_message.is_some()
    }

    /// Fill in login and hostname from a fresher mask. Empty parts are
    /// ignored so a bare-nick reference never erases known data.
    pub(crate) fn absorb(&mut self, mask: &UserHostmask) {
        if !mask.login.is_empty() {
            self.login.clone_from(&mask.login);
        }
        if !mask.hostname.is_empty() {
            self.hostname.clone_from(&mask.hostname);
        }
    }

    /// Record a services account. `None` (or `*` on the wire) logs out.
    pub(crate) fn set_account(&mut self, account: Option<String>) {
        self.is_identified = account.is_some();
        self.account = account;
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}
