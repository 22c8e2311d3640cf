//! Channel metadata: TOPIC, INVITE and the topic, creation-time and ban
//! list numerics.

use chrono::{DateTime, Utc};
use slirc_wire::{RawMessage, UserHostmask};

use super::context::{Context, Handler, require};
use crate::aggregate::parse_ban_row;
use crate::error::{HandlerError, HandlerResult};
use crate::event::Event;

fn unix_time(arg: Option<&str>) -> Option<DateTime<Utc>> {
    let secs = arg?.parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// Live `TOPIC` change: stamped with the current time.
pub struct TopicHandler;

impl Handler for TopicHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let name = require(msg, 0)?;
        let topic = msg.arg(1).unwrap_or_default();
        let setter = ctx.track_source(msg).map(|(_, mask)| mask);
        let now = Utc::now();

        let channel = ctx.registry.get_or_create_channel(name);
        let old = std::mem::replace(&mut channel.topic, topic.to_owned());
        channel.topic_setter.clone_from(&setter);
        channel.topic_timestamp = Some(now);
        let name = channel.name.clone();

        ctx.emit(Event::Topic {
            channel: name,
            old_topic: (!old.is_empty()).then_some(old),
            topic: topic.to_owned(),
            setter,
            timestamp: Some(now),
            changed: true,
        });
        Ok(())
    }
}

/// `332 RPL_TOPIC`: join-time topic, setter still unknown.
pub struct TopicReplyHandler;

impl Handler for TopicReplyHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let name = require(msg, 1)?;
        let topic = msg.arg(2).unwrap_or_default();

        let channel = ctx.registry.get_or_create_channel(name);
        let old = std::mem::replace(&mut channel.topic, topic.to_owned());
        let name = channel.name.clone();

        ctx.emit(Event::Topic {
            channel: name,
            old_topic: (!old.is_empty() && old != topic).then_some(old),
            topic: topic.to_owned(),
            setter: None,
            timestamp: None,
            changed: false,
        });
        Ok(())
    }
}

/// `333 RPL_TOPICWHOTIME`: attach setter and time, then re-emit the topic.
pub struct TopicWhoTimeHandler;

impl Handler for TopicWhoTimeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let name = require(msg, 1)?;
        let setter = UserHostmask::parse(require(msg, 2)?);
        let timestamp = unix_time(msg.arg(3));

        let channel = ctx.registry.get_or_create_channel(name);
        channel.topic_setter = Some(setter.clone());
        channel.topic_timestamp = timestamp;
        let topic = channel.topic.clone();
        let name = channel.name.clone();

        ctx.emit(Event::Topic {
            channel: name,
            old_topic: None,
            topic,
            setter: Some(setter),
            timestamp,
            changed: false,
        });
        Ok(())
    }
}

/// `329 RPL_CREATIONTIME`.
pub struct CreationTimeHandler;

impl Handler for CreationTimeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let name = require(msg, 1)?;
        let created = unix_time(msg.arg(2))
            .ok_or_else(|| HandlerError::Malformed(msg.arg(2).unwrap_or_default().to_owned()))?;
        ctx.registry.get_or_create_channel(name).created = Some(created);
        Ok(())
    }
}

pub struct InviteHandler;

impl Handler for InviteHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let channel = require(msg, 1)?;
        let user = ctx.track_source(msg).map(|(_, mask)| mask);
        ctx.emit(Event::Invite {
            user,
            channel: channel.to_owned(),
        });
        Ok(())
    }
}

/// `367 RPL_BANLIST` rows.
pub struct BanListRowHandler;

impl Handler for BanListRowHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let row = parse_ban_row(msg).ok_or(HandlerError::NeedMoreParams)?;
        ctx.aggregators.bans.push(row);
        Ok(())
    }
}

/// `368 RPL_ENDOFBANLIST`: replace the channel's bans and emit the list.
pub struct BanListEndHandler;

impl Handler for BanListEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let name = require(msg, 1)?;
        let casemapping = ctx.registry.casemapping();
        let entries: Vec<_> = ctx
            .aggregators
            .bans
            .finish()
            .into_iter()
            .filter(|(channel, _)| casemapping.equals(channel, name))
            .map(|(_, entry)| entry)
            .collect();

        if let Some(channel) = ctx.registry.channel_mut(name) {
            channel.replace_bans(entries.clone());
        }
        ctx.emit(Event::BanList {
            channel: name.to_owned(),
            entries,
        });
        Ok(())
    }
}
