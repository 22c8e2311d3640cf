//! Handler context and the handler trait.

use slirc_wire::{ChannelExt, Isupport, ModeTable, RawMessage, UserHostmask};

use crate::aggregate::Aggregators;
use crate::error::{HandlerError, HandlerResult};
use crate::event::Event;
use crate::state::{Registry, UserId};

/// What the server has told us about itself.
#[derive(Debug, Default)]
pub struct ServerState {
    /// Name from `004` (or the `001` prefix).
    pub name: Option<String>,
    pub isupport: Isupport,
    /// Argument table for the mode decoder, from `PREFIX`/`CHANMODES`.
    pub mode_table: ModeTable,
}

/// Everything a handler may read or mutate while processing one line.
pub struct Context<'a> {
    pub registry: &'a mut Registry,
    pub server: &'a mut ServerState,
    pub aggregators: &'a mut Aggregators,
    pub events: &'a mut Vec<Event>,
}

impl Context<'_> {
    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Whether `name` is a channel under the advertised `CHANTYPES`.
    pub fn is_channel(&self, name: &str) -> bool {
        name.is_channel_name_with(self.server.isupport.chantypes())
    }

    /// The sending user, or [`HandlerError::MissingSource`] for server or
    /// prefix-less lines.
    pub fn source_user(&self, msg: &RawMessage) -> Result<UserHostmask, HandlerError> {
        msg.source()
            .and_then(|p| p.into_user())
            .filter(|mask| !mask.nick.is_empty())
            .ok_or(HandlerError::MissingSource)
    }

    /// The sending user, if there is one, registered in the registry.
    pub fn track_source(&mut self, msg: &RawMessage) -> Option<(UserId, UserHostmask)> {
        let mask = self.source_user(msg).ok()?;
        let id = self.registry.get_or_create_user(&mask);
        Some((id, mask))
    }

    /// Current hostmask for a registry user, falling back to the nick.
    pub fn hostmask_of(&self, id: UserId, nick: &str) -> UserHostmask {
        self.registry
            .user_by_id(id)
            .map(|u| u.hostmask())
            .unwrap_or_else(|| UserHostmask::from_nick(nick))
    }
}

/// Handles one command word or numeric.
pub trait Handler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult;
}

/// Required argument `index`, or [`HandlerError::NeedMoreParams`].
pub fn require<'m>(msg: &'m RawMessage, index: usize) -> Result<&'m str, HandlerError> {
    msg.arg(index).ok_or(HandlerError::NeedMoreParams)
}
