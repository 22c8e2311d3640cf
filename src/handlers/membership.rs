//! JOIN, PART, KICK, QUIT and NICK.
//!
//! Departures follow one order: snapshot the user from the registry as it
//! stands, then remove memberships, then purge what is left orphaned. The
//! emitted event carries the snapshot.

use slirc_wire::{RawMessage, UserHostmask};
use tracing::debug;

use super::context::{Context, Handler, require};
use crate::error::{HandlerError, HandlerResult};
use crate::event::Event;
use crate::state::{UserId, UserSnapshot, snapshot_user};

fn snapshot(ctx: &Context<'_>, id: UserId) -> Result<UserSnapshot, HandlerError> {
    snapshot_user(&*ctx.registry, id).ok_or_else(|| HandlerError::Malformed(id.to_string()))
}

/// Remove `id` from `channel`. When the bot itself leaves, the channel goes too.
fn depart(ctx: &mut Context<'_>, channel: &str, id: UserId) {
    if ctx.registry.is_own(id) {
        debug!(channel, "left channel");
        ctx.registry.remove_channel(channel);
    } else {
        ctx.registry.remove_membership(channel, id);
        ctx.registry.purge_if_orphan(id);
    }
}

pub struct JoinHandler;

impl Handler for JoinHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let channels = require(msg, 0)?;
        let self_join = ctx.registry.is_own_nick(&mask.nick);
        let id = ctx.registry.get_or_create_user(&mask);

        // extended-join: JOIN <channel> <account> :<real name>
        if let (Some(account), Some(real_name)) = (msg.arg(1), msg.arg(2)) {
            if let Some(user) = ctx.registry.user_mut(id) {
                user.set_account((account != "*").then(|| account.to_owned()));
                user.real_name = real_name.to_owned();
            }
        }

        for channel in channels.split(',').filter(|c| !c.is_empty()) {
            if self_join {
                debug!(channel, "joined channel");
            }
            ctx.registry.add_membership(channel, id);
            let user = ctx.hostmask_of(id, &mask.nick);
            ctx.emit(Event::Join {
                channel: channel.to_owned(),
                user,
                self_join,
            });
        }
        Ok(())
    }
}

pub struct PartHandler;

impl Handler for PartHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let channels = require(msg, 0)?;
        let reason = msg.arg(1).map(str::to_owned);

        for channel in channels.split(',').filter(|c| !c.is_empty()) {
            // Looked up per channel: an earlier departure may have purged the user.
            let id = ctx.registry.get_or_create_user(&mask);
            let user = snapshot(ctx, id)?;
            depart(ctx, channel, id);
            ctx.emit(Event::Part {
                channel: channel.to_owned(),
                user,
                reason: reason.clone(),
            });
        }
        Ok(())
    }
}

pub struct KickHandler;

impl Handler for KickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let channel = require(msg, 0)?;
        let nick = require(msg, 1)?;
        let reason = msg.arg(2).map(str::to_owned);
        // Servers and services may kick; the source is optional.
        let source = ctx.source_user(msg).ok();

        let id = ctx.registry.get_or_create_user(&UserHostmask::from_nick(nick));
        let recipient = snapshot(ctx, id)?;
        depart(ctx, channel, id);

        ctx.emit(Event::Kick {
            channel: channel.to_owned(),
            source,
            recipient,
            reason,
        });
        Ok(())
    }
}

pub struct QuitHandler;

impl Handler for QuitHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let reason = msg.arg(0).map(str::to_owned);

        let id = ctx.registry.get_or_create_user(&mask);
        let user = snapshot(ctx, id)?;

        if ctx.registry.is_own(id) {
            let names: Vec<String> = ctx.registry.channels().map(|c| c.name.clone()).collect();
            for name in names {
                ctx.registry.remove_channel(&name);
            }
        } else {
            ctx.registry.remove_from_all(id);
            ctx.registry.purge_if_orphan(id);
        }

        ctx.emit(Event::Quit { user, reason });
        Ok(())
    }
}

pub struct NickHandler;

impl Handler for NickHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let new_nick = require(msg, 0)?;
        if new_nick.is_empty() {
            return Err(HandlerError::NeedMoreParams);
        }

        let id = ctx.registry.get_or_create_user(&mask);
        ctx.registry.rename(id, new_nick);
        if ctx.registry.is_own(id) {
            debug!(old = %mask.nick, new = new_nick, "own nick changed");
        }

        let user = ctx.hostmask_of(id, new_nick);
        ctx.emit(Event::NickChange {
            old_nick: mask.nick,
            new_nick: new_nick.to_owned(),
            user,
        });
        Ok(())
    }
}
