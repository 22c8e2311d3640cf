//! MODE decoding.
//!
//! A channel MODE line is decoded into ordered changes (see
//! [`parse_mode_changes`]), applied to the channel, and reported as one
//! typed event per recognised flag followed by the raw [`Event::Mode`].
//! Unknown letters skip the typed step but still land in the raw event and
//! in the channel's stored mode string.

use chrono::Utc;
use slirc_wire::{ModeChange, RawMessage, UserHostmask, parse_mode_changes};

use super::context::{Context, Handler, require};
use crate::error::HandlerResult;
use crate::event::{ChannelModeContext, Event};
use crate::state::ListEntry;

/// Apply `modes`/`args` to `channel` and emit the resulting events.
///
/// `source` is `None` for server-originated changes and the `324` reply.
pub fn decode_channel_modes(
    ctx: &mut Context<'_>,
    channel: &str,
    source: Option<UserHostmask>,
    modes: &str,
    args: &[&str],
) {
    let table = ctx.server.mode_table.clone();
    let changes = parse_mode_changes(modes, args, &table);
    let channel = ctx.registry.get_or_create_channel(channel).name.clone();
    let mode_ctx = ChannelModeContext {
        channel: channel.clone(),
        source,
    };

    for change in changes {
        let event = if table.is_prefix_mode(change.flag) {
            apply_privilege(ctx, &channel, &mode_ctx, change)
        } else {
            apply_channel_flag(ctx, &channel, &mode_ctx, change, table.list.as_str())
        };
        if let Some(event) = event {
            ctx.emit(event);
        }
    }

    ctx.emit(Event::Mode {
        ctx: mode_ctx,
        mode: modes.to_owned(),
        args: args.iter().map(|a| (*a).to_owned()).collect(),
    });
}

fn apply_privilege(
    ctx: &mut Context<'_>,
    channel: &str,
    mode_ctx: &ChannelModeContext,
    change: ModeChange,
) -> Option<Event> {
    let nick = change.arg?;
    let set = change.adding;
    let id = ctx.registry.get_or_create_user(&UserHostmask::from_nick(&nick));
    if let Some(chan) = ctx.registry.channel_mut(channel) {
        chan.privileges_mut(id).set(change.flag, set);
    }

    let recipient = ctx.hostmask_of(id, &nick);
    let ctx = mode_ctx.clone();
    Some(match change.flag {
        'o' => Event::Op { ctx, recipient, set },
        'v' => Event::Voice { ctx, recipient, set },
        'h' => Event::HalfOp { ctx, recipient, set },
        'q' => Event::Owner { ctx, recipient, set },
        'a' => Event::SuperOp { ctx, recipient, set },
        _ => return None,
    })
}

fn apply_channel_flag(
    ctx: &mut Context<'_>,
    channel: &str,
    mode_ctx: &ChannelModeContext,
    change: ModeChange,
    list_modes: &str,
) -> Option<Event> {
    let chan = ctx.registry.channel_mut(channel)?;
    let ctx = mode_ctx.clone();
    let set = change.adding;

    match (change.flag, set) {
        ('l', true) => {
            let limit = change.arg?.parse::<u32>().ok()?;
            chan.set_mode('l', Some(limit.to_string()));
            Some(Event::SetChannelLimit { ctx, limit })
        }
        ('l', false) => {
            chan.unset_mode('l');
            Some(Event::RemoveChannelLimit { ctx })
        }
        ('k', true) => {
            let key = change.arg?;
            chan.set_mode('k', Some(key.clone()));
            Some(Event::SetChannelKey { ctx, key })
        }
        ('k', false) => {
            chan.unset_mode('k');
            Some(Event::RemoveChannelKey {
                ctx,
                key: change.arg,
            })
        }
        ('b', true) => {
            let mask = change.arg?;
            chan.add_ban(ListEntry {
                mask: mask.clone(),
                set_by: ctx.source.as_ref().map(ToString::to_string),
                set_at: Some(Utc::now()),
            });
            Some(Event::SetChannelBan { ctx, mask })
        }
        ('b', false) => {
            let mask = change.arg?;
            chan.remove_ban(&mask);
            Some(Event::RemoveChannelBan { ctx, mask })
        }
        // Other list modes (excepts, invex) are not tracked.
        (flag, _) if list_modes.contains(flag) => None,
        (flag, set) => {
            if set {
                chan.set_mode(flag, change.arg);
            } else {
                chan.unset_mode(flag);
            }
            match flag {
                'i' => Some(Event::InviteOnly { ctx, set }),
                'm' => Some(Event::Moderated { ctx, set }),
                's' => Some(Event::Secret { ctx, set }),
                'p' => Some(Event::Private { ctx, set }),
                't' => Some(Event::TopicProtection { ctx, set }),
                'n' => Some(Event::NoExternalMessages { ctx, set }),
                _ => None,
            }
        }
    }
}

pub struct ModeHandler;

impl Handler for ModeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let target = require(msg, 0)?;
        let modes = require(msg, 1)?;
        let args = msg.args_from(2);

        if ctx.is_channel(target) {
            let source = ctx.track_source(msg).map(|(_, mask)| mask);
            decode_channel_modes(ctx, target, source, modes, &args);
        } else {
            if let Ok(user) = ctx.source_user(msg) {
                ctx.registry.get_or_create_user(&user);
            }
            ctx.emit(Event::UserMode {
                target: target.to_owned(),
                source: msg.source(),
                mode: modes.to_owned(),
            });
        }
        Ok(())
    }
}

/// `324 RPL_CHANNELMODEIS`: the full current mode set, decoded like a live
/// MODE with no acting user.
pub struct ChannelModeIsHandler;

impl Handler for ChannelModeIsHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let channel = require(msg, 1)?;
        let modes = require(msg, 2)?;
        let args = msg.args_from(3);

        ctx.registry.get_or_create_channel(channel).clear_modes();
        decode_channel_modes(ctx, channel, None, modes, &args);
        Ok(())
    }
}
