//! Message source parsing.
//!
//! A prefix is either a server name or a user's `nick!login@host` mask.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::casemap::{irc_eq, irc_to_lower};

/// A user's `nick!login@hostname` mask.
///
/// Two hostmasks are equal when their nicknames are equal under RFC 1459
/// case mapping; login and hostname do not take part in equality.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserHostmask {
    /// Nickname.
    pub nick: String,
    /// Username (ident), possibly prefixed with `~`.
    pub login: String,
    /// Hostname or cloak.
    pub hostname: String,
}

impl UserHostmask {
    /// Build a hostmask from its parts.
    pub fn new(
        nick: impl Into<String>,
        login: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            login: login.into(),
            hostname: hostname.into(),
        }
    }

    /// A hostmask that only knows the nickname.
    pub fn from_nick(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ..Self::default()
        }
    }

    /// Split `nick!login@host`. Missing parts are left empty, so a bare
    /// nickname parses too.
    pub fn parse(s: &str) -> Self {
        let (rest, hostname) = match s.split_once('@') {
            Some((rest, host)) => (rest, host),
            None => (s, ""),
        };
        let (nick, login) = match rest.split_once('!') {
            Some((nick, login)) => (nick, login),
            None => (rest, ""),
        };
        Self::new(nick, login, hostname)
    }

    /// Whether the login carries the `~` no-ident marker.
    pub fn is_unverified_login(&self) -> bool {
        self.login.starts_with('~')
    }
}

impl PartialEq for UserHostmask {
    fn eq(&self, other: &Self) -> bool {
        irc_eq(&self.nick, &other.nick)
    }
}

impl Eq for UserHostmask {}

impl Hash for UserHostmask {
    fn hash<H: Hasher>(&self, state: &mut H) {
        irc_to_lower(&self.nick).hash(state);
    }
}

impl fmt::Display for UserHostmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nick)?;
        if !self.login.is_empty() {
            write!(f, "!{}", self.login)?;
        }
        if !self.hostname.is_empty() {
            write!(f, "@{}", self.hostname)?;
        }
        Ok(())
    }
}

/// Origin of a message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prefix {
    /// Server name (e.g. `irc.example.com`).
    Server(String),
    /// A user.
    User(UserHostmask),
}

impl Prefix {
    /// Parse a prefix leniently.
    ///
    /// A prefix without `!` or `@` that contains a dot names a server;
    /// everything else is a user (services such as `NickServ` included).
    pub fn parse(s: &str) -> Self {
        if !s.contains(['!', '@']) && s.contains('.') {
            Prefix::Server(s.to_owned())
        } else {
            Prefix::User(UserHostmask::parse(s))
        }
    }

    /// The user's hostmask, if this prefix is a user.
    pub fn user(&self) -> Option<&UserHostmask> {
        match self {
            Prefix::User(mask) => Some(mask),
            Prefix::Server(_) => None,
        }
    }

    /// Consume into the user's hostmask, if this prefix is a user.
    pub fn into_user(self) -> Option<UserHostmask> {
        match self {
            Prefix::User(mask) => Some(mask),
            Prefix::Server(_) => None,
        }
    }

    /// The nickname, if this prefix is a user.
    pub fn nick(&self) -> Option<&str> {
        self.user().map(|m| m.nick.as_str())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Server(name) => f.write_str(name),
            Prefix::User(mask) => mask.fmt(f),
        }
    }
}

impl From<&str> for Prefix {
    fn from(s: &str) -> Self {
        Prefix::parse(s)
    }
}
