//! PRIVMSG and NOTICE, with CTCP sub-dispatch.

use slirc_wire::{Ctcp, CtcpKind, RawMessage};

use super::context::{Context, Handler, require};
use crate::error::{HandlerError, HandlerResult};
use crate::event::Event;

/// Strip STATUSMSG prefixes (`@#chan`) and report the channel, if the
/// target is one.
fn channel_target<'t>(ctx: &Context<'_>, target: &'t str) -> Option<&'t str> {
    let (_, bare) = ctx.server.mode_table.strip_prefixes(target);
    ctx.is_channel(bare).then_some(bare)
}

/// CTCP requests that map to a typed event.
fn is_tracked_ctcp(kind: &CtcpKind) -> bool {
    matches!(
        kind,
        CtcpKind::Action | CtcpKind::Version | CtcpKind::Ping | CtcpKind::Time | CtcpKind::Finger
    )
}

pub struct PrivmsgHandler;

impl Handler for PrivmsgHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let target = require(msg, 0)?;
        let text = require(msg, 1)?;
        let ctcp = Ctcp::parse(text);
        if let Some(kind) = ctcp.as_ref().map(|c| &c.kind).filter(|k| !is_tracked_ctcp(k)) {
            return Err(HandlerError::Unhandled(format!("CTCP {}", kind.as_str())));
        }

        let (id, mask) = ctx.track_source(msg).ok_or(HandlerError::MissingSource)?;
        let user = ctx.hostmask_of(id, &mask.nick);

        if let Some(ctcp) = ctcp {
            let target = target.to_owned();
            let event = match ctcp.kind {
                CtcpKind::Action => Event::Action {
                    target,
                    user,
                    action: ctcp.params.unwrap_or_default().to_owned(),
                },
                CtcpKind::Version => Event::Version { target, user },
                CtcpKind::Ping => Event::Ping {
                    target,
                    user,
                    ping_value: ctcp.params.map(str::to_owned),
                },
                CtcpKind::Time => Event::Time { target, user },
                CtcpKind::Finger => Event::Finger { target, user },
                other => return Err(HandlerError::Unhandled(format!("CTCP {}", other.as_str()))),
            };
            ctx.emit(event);
            return Ok(());
        }

        let event = match channel_target(ctx, target) {
            Some(channel) => Event::Message {
                channel: channel.to_owned(),
                user,
                message: text.to_owned(),
            },
            None => Event::PrivateMessage {
                user,
                message: text.to_owned(),
            },
        };
        ctx.emit(event);
        Ok(())
    }
}

pub struct NoticeHandler;

impl Handler for NoticeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let target = require(msg, 0)?;
        let text = require(msg, 1)?;
        ctx.track_source(msg);

        ctx.emit(Event::Notice {
            target: target.to_owned(),
            source: msg.source(),
            message: text.to_owned(),
        });
        Ok(())
    }
}
