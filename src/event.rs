//! Events produced by the pipeline.
//!
//! One raw line becomes zero or more [`Event`]s. Consumers match on the
//! variant they care about; a MODE line yields both the raw [`Event::Mode`]
//! and one typed event per recognised flag.

use chrono::{DateTime, Utc};
use slirc_wire::{Prefix, UserHostmask};

use crate::aggregate::{ChannelListEntry, WhoRow, WhoisRecord};
use crate::state::{ListEntry, UserSnapshot};

/// Fields shared by every channel mode event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelModeContext {
    pub channel: String,
    /// The user who changed the mode. `None` for server-originated changes
    /// and for the `324` mode reply.
    pub source: Option<UserHostmask>,
}

/// How a capability set changed after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapChangeKind {
    New,
    Del,
    Ack,
    Nak,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------
    /// `001`: registration finished under `nick`.
    Connect { nick: String, server: Option<String> },
    /// `004`: server name, version and supported mode letters.
    ServerInfo {
        server: String,
        version: String,
        user_modes: String,
        channel_modes: String,
    },
    /// Any numeric the router understands, in addition to its typed events.
    ServerResponse { code: u16, params: Vec<String> },
    /// Catch-all for unknown commands, unknown numerics and malformed lines.
    Unknown { line: String },
    /// Server `PING`; the output side is expected to answer `PONG <token>`.
    ServerPing { token: String },
    /// Server `ERROR`, usually right before the link closes.
    ServerError { message: String },
    /// `433`: the nick we asked for is taken.
    NickAlreadyInUse { nick: String },
    /// Capability set changed after registration (`CAP NEW/DEL/ACK/NAK`).
    CapChange { kind: CapChangeKind, caps: Vec<String> },

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------
    Join {
        channel: String,
        user: UserHostmask,
        /// The bot itself joined; channel metadata (WHO, MODE) should be fetched.
        self_join: bool,
    },
    Part {
        channel: String,
        user: UserSnapshot,
        reason: Option<String>,
    },
    Quit {
        user: UserSnapshot,
        reason: Option<String>,
    },
    Kick {
        channel: String,
        source: Option<UserHostmask>,
        recipient: UserSnapshot,
        reason: Option<String>,
    },
    NickChange {
        old_nick: String,
        new_nick: String,
        user: UserHostmask,
    },

    // ------------------------------------------------------------------
    // User state
    // ------------------------------------------------------------------
    /// `AWAY`; `message` is `None` when the user came back.
    Away {
        user: UserHostmask,
        message: Option<String>,
    },
    /// account-notify; `None` means logged out.
    AccountChange {
        user: UserHostmask,
        account: Option<String>,
    },
    /// `CHGHOST`.
    HostChange {
        user: UserHostmask,
        login: String,
        hostname: String,
    },

    // ------------------------------------------------------------------
    // Messages and CTCP
    // ------------------------------------------------------------------
    Message {
        channel: String,
        user: UserHostmask,
        message: String,
    },
    PrivateMessage {
        user: UserHostmask,
        message: String,
    },
    Notice {
        target: String,
        source: Option<Prefix>,
        message: String,
    },
    Action {
        target: String,
        user: UserHostmask,
        action: String,
    },
    Version { target: String, user: UserHostmask },
    /// CTCP PING; the reply must echo `ping_value`.
    Ping {
        target: String,
        user: UserHostmask,
        ping_value: Option<String>,
    },
    Time { target: String, user: UserHostmask },
    Finger { target: String, user: UserHostmask },
    Invite {
        user: Option<UserHostmask>,
        channel: String,
    },

    // ------------------------------------------------------------------
    // Topic
    // ------------------------------------------------------------------
    Topic {
        channel: String,
        old_topic: Option<String>,
        topic: String,
        setter: Option<UserHostmask>,
        timestamp: Option<DateTime<Utc>>,
        /// A live `TOPIC` change rather than a join-time reply.
        changed: bool,
    },

    // ------------------------------------------------------------------
    // Modes
    // ------------------------------------------------------------------
    /// The mode line exactly as received.
    Mode {
        ctx: ChannelModeContext,
        mode: String,
        args: Vec<String>,
    },
    UserMode {
        target: String,
        source: Option<Prefix>,
        mode: String,
    },
    Op { ctx: ChannelModeContext, recipient: UserHostmask, set: bool },
    Voice { ctx: ChannelModeContext, recipient: UserHostmask, set: bool },
    HalfOp { ctx: ChannelModeContext, recipient: UserHostmask, set: bool },
    Owner { ctx: ChannelModeContext, recipient: UserHostmask, set: bool },
    SuperOp { ctx: ChannelModeContext, recipient: UserHostmask, set: bool },
    SetChannelLimit { ctx: ChannelModeContext, limit: u32 },
    RemoveChannelLimit { ctx: ChannelModeContext },
    SetChannelKey { ctx: ChannelModeContext, key: String },
    /// `-k`; `key` is the argument given, if any.
    RemoveChannelKey { ctx: ChannelModeContext, key: Option<String> },
    InviteOnly { ctx: ChannelModeContext, set: bool },
    Moderated { ctx: ChannelModeContext, set: bool },
    Secret { ctx: ChannelModeContext, set: bool },
    Private { ctx: ChannelModeContext, set: bool },
    TopicProtection { ctx: ChannelModeContext, set: bool },
    NoExternalMessages { ctx: ChannelModeContext, set: bool },
    SetChannelBan { ctx: ChannelModeContext, mask: String },
    RemoveChannelBan { ctx: ChannelModeContext, mask: String },

    // ------------------------------------------------------------------
    // Aggregated replies
    // ------------------------------------------------------------------
    /// `321`..`323` LIST result.
    ChannelInfo { channels: Vec<ChannelListEntry> },
    /// WHO (`complete: true`) or NAMES (`complete: false`) result.
    UserList {
        channel: String,
        users: Vec<WhoRow>,
        complete: bool,
    },
    Whois(Box<WhoisRecord>),
    Motd { motd: String },
    BanList {
        channel: String,
        entries: Vec<ListEntry>,
    },
}

impl Event {
    /// Short variant name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Connect { .. } => "connect",
            Event::ServerInfo { .. } => "server_info",
            Event::ServerResponse { .. } => "server_response",
            Event::Unknown { .. } => "unknown",
            Event::ServerPing { .. } => "server_ping",
            Event::ServerError { .. } => "server_error",
            Event::NickAlreadyInUse { .. } => "nick_already_in_use",
            Event::CapChange { .. } => "cap_change",
            Event::Join { .. } => "join",
            Event::Part { .. } => "part",
            Event::Quit { .. } => "quit",
            Event::Kick { .. } => "kick",
            Event::NickChange { .. } => "nick_change",
            Event::Away { .. } => "away",
            Event::AccountChange { .. } => "account_change",
            Event::HostChange { .. } => "host_change",
            Event::Message { .. } => "message",
            Event::PrivateMessage { .. } => "private_message",
            Event::Notice { .. } => "notice",
            Event::Action { .. } => "action",
            Event::Version { .. } => "version",
            Event::Ping { .. } => "ping",
            Event::Time { .. } => "time",
            Event::Finger { .. } => "finger",
            Event::Invite { .. } => "invite",
            Event::Topic { .. } => "topic",
            Event::Mode { .. } => "mode",
            Event::UserMode { .. } => "user_mode",
            Event::Op { .. } => "op",
            Event::Voice { .. } => "voice",
            Event::HalfOp { .. } => "half_op",
            Event::Owner { .. } => "owner",
            Event::SuperOp { .. } => "super_op",
            Event::SetChannelLimit { .. } => "set_channel_limit",
            Event::RemoveChannelLimit { .. } => "remove_channel_limit",
            Event::SetChannelKey { .. } => "set_channel_key",
            Event::RemoveChannelKey { .. } => "remove_channel_key",
            Event::InviteOnly { .. } => "invite_only",
            Event::Moderated { .. } => "moderated",
            Event::Secret { .. } => "secret",
            Event::Private { .. } => "private",
            Event::TopicProtection { .. } => "topic_protection",
            Event::NoExternalMessages { .. } => "no_external_messages",
            Event::SetChannelBan { .. } => "set_channel_ban",
            Event::RemoveChannelBan { .. } => "remove_channel_ban",
            Event::ChannelInfo { .. } => "channel_info",
            Event::UserList { .. } => "user_list",
            Event::Whois(_) => "whois",
            Event::Motd { .. } => "motd",
            Event::BanList { .. } => "ban_list",
        }
    }

    /// The shared mode context, for channel mode events.
    pub fn mode_context(&self) -> Option<&ChannelModeContext> {
        match self {
            Event::Mode { ctx, .. }
            | Event::Op { ctx, .. }
            | Event::Voice { ctx, .. }
            | Event::HalfOp { ctx, .. }
            | Event::Owner { ctx, .. }
            | Event::SuperOp { ctx, .. }
            | Event::SetChannelLimit { ctx, .. }
            | Event::RemoveChannelLimit { ctx }
            | Event::SetChannelKey { ctx, .. }
            | Event::RemoveChannelKey { ctx, .. }
            | Event::InviteOnly { ctx, .. }
            | Event::Moderated { ctx, .. }
            | Event::Secret { ctx, .. }
            | Event::Private { ctx, .. }
            | Event::TopicProtection { ctx, .. }
            | Event::NoExternalMessages { ctx, .. }
            | Event::SetChannelBan { ctx, .. }
            | Event::RemoveChannelBan { ctx, .. } => Some(ctx),
            _ => None,
        }
    }

    /// The channel this event concerns, if any.
    pub fn channel(&self) -> Option<&str> {
        if let Some(ctx) = self.mode_context() {
            return Some(&ctx.channel);
        }
        match self {
            Event::Join { channel, .. }
            | Event::Part { channel, .. }
            | Event::Kick { channel, .. }
            | Event::Message { channel, .. }
            | Event::Invite { channel, .. }
            | Event::Topic { channel, .. }
            | Event::UserList { channel, .. }
            | Event::BanList { channel, .. } => Some(channel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ChannelModeContext {
        ChannelModeContext {
            channel: "#c".to_string(),
            source: None,
        }
    }

    #[test]
    fn test_mode_context_shared() {
        let op = Event::Op {
            ctx: ctx(),
            recipient: UserHostmask::from_nick("a"),
            set: true,
        };
        assert_eq!(op.mode_context(), Some(&ctx()));
        assert_eq!(op.channel(), Some("#c"));
        assert_eq!(op.name(), "op");
    }

    #[test]
    fn test_channel_absent_for_connection_events() {
        let ping = Event::ServerPing {
            token: "x".to_string(),
        };
        assert_eq!(ping.channel(), None);
        assert!(ping.mode_context().is_none());
    }
}
