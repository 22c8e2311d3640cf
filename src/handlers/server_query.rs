//! Multi-line query replies: LIST, MOTD, WHO, NAMES and WHOIS.
//!
//! Row numerics only buffer. The terminal numeric drains the buffer, folds
//! what it learned into the registry and emits one aggregate event.

use slirc_wire::{RawMessage, UserHostmask};
use tracing::debug;

use super::context::{Context, Handler, require};
use crate::aggregate::{ChannelListEntry, WhoRow, WhoisRecord, parse_names_row};
use crate::error::{HandlerError, HandlerResult};
use crate::event::Event;
use crate::state::UserId;

// ----------------------------------------------------------------------
// LIST
// ----------------------------------------------------------------------

/// `321 RPL_LISTSTART`
pub struct ListStartHandler;

impl Handler for ListStartHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &RawMessage) -> HandlerResult {
        if !ctx.aggregators.list.start() {
            debug!("LIST header while already collecting");
        }
        Ok(())
    }
}

/// `322 RPL_LIST`
pub struct ListRowHandler;

impl Handler for ListRowHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let entry = ChannelListEntry::from_reply(msg)
            .ok_or_else(|| HandlerError::Malformed("LIST row".into()))?;
        ctx.aggregators.list.push(entry);
        Ok(())
    }
}

/// `323 RPL_LISTEND`
pub struct ListEndHandler;

impl Handler for ListEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &RawMessage) -> HandlerResult {
        let channels = ctx.aggregators.list.finish();
        ctx.emit(Event::ChannelInfo { channels });
        Ok(())
    }
}

// ----------------------------------------------------------------------
// MOTD
// ----------------------------------------------------------------------

/// `375 RPL_MOTDSTART`
pub struct MotdStartHandler;

impl Handler for MotdStartHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &RawMessage) -> HandlerResult {
        ctx.aggregators.motd.start();
        Ok(())
    }
}

/// `372 RPL_MOTD`
pub struct MotdLineHandler;

impl Handler for MotdLineHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let text = require(msg, 1)?;
        ctx.aggregators.motd.push(text);
        Ok(())
    }
}

/// `376 RPL_ENDOFMOTD` and `422 ERR_NOMOTD`. The latter flushes an empty MOTD.
pub struct MotdEndHandler;

impl Handler for MotdEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, _msg: &RawMessage) -> HandlerResult {
        let motd = ctx.aggregators.motd.finish();
        ctx.emit(Event::Motd { motd });
        Ok(())
    }
}

// ----------------------------------------------------------------------
// WHO and NAMES
// ----------------------------------------------------------------------

/// Create or refresh the user a WHO/NAMES row describes.
fn track_row(ctx: &mut Context<'_>, row: &WhoRow, full: bool) -> UserId {
    let mask = UserHostmask::new(&row.nick, &row.login, &row.hostname);
    let id = ctx.registry.get_or_create_user(&mask);
    if !full {
        return id;
    }

    if let Some(user) = ctx.registry.user_mut(id) {
        user.real_name.clone_from(&row.real_name);
        user.server.clone_from(&row.server);
        user.hops = Some(row.hops);
        user.is_ircop = row.ircop;
        if !row.away {
            user.away_message = None;
        } else if user.away_message.is_none() {
            user.away_message = Some(String::new());
        }
    }
    id
}

fn join_row(ctx: &mut Context<'_>, channel: &str, id: UserId, row: &WhoRow) {
    ctx.registry.add_membership(channel, id);
    if let Some(chan) = ctx.registry.channel_mut(channel) {
        *chan.privileges_mut(id) = row.privileges;
    }
}

/// `352 RPL_WHOREPLY`
pub struct WhoRowHandler;

impl Handler for WhoRowHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let row = WhoRow::from_reply(msg, &ctx.server.mode_table)
            .ok_or_else(|| HandlerError::Malformed("WHO row".into()))?;
        ctx.aggregators.who.push(row);
        Ok(())
    }
}

/// `315 RPL_ENDOFWHO <client> <target> :End of WHO list`
///
/// Memberships are only recorded when the query target was a channel. A
/// WHO for a single nick also carries a channel column, but it names some
/// channel the user happens to share and must not create it.
pub struct WhoEndHandler;

impl Handler for WhoEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let target = require(msg, 1)?;
        let rows = ctx.aggregators.who.finish();
        let channel_query = ctx.is_channel(target);
        let casemapping = ctx.registry.casemapping();

        for row in &rows {
            let id = track_row(ctx, row, true);
            if channel_query && casemapping.equals(&row.channel, target) {
                join_row(ctx, target, id, row);
            }
        }

        ctx.emit(Event::UserList {
            channel: target.to_owned(),
            users: rows,
            complete: true,
        });
        Ok(())
    }
}

/// `353 RPL_NAMREPLY`
pub struct NamesRowHandler;

impl Handler for NamesRowHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let (_, rows) = parse_names_row(msg, &ctx.server.mode_table)
            .ok_or_else(|| HandlerError::Malformed("NAMES row".into()))?;
        ctx.aggregators.names.extend(rows);
        Ok(())
    }
}

/// `366 RPL_ENDOFNAMES <client> <channel> :End of NAMES list`
///
/// Membership is applied only for channels we are tracking; NAMES for a
/// channel we are not in is reported but not recorded.
pub struct NamesEndHandler;

impl Handler for NamesEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let channel = require(msg, 1)?;
        let casemapping = ctx.registry.casemapping();
        let rows: Vec<WhoRow> = ctx
            .aggregators
            .names
            .finish()
            .into_iter()
            .filter(|row| casemapping.equals(&row.channel, channel))
            .collect();

        if ctx.registry.channel(channel).is_some() {
            for row in &rows {
                let id = track_row(ctx, row, false);
                join_row(ctx, channel, id, row);
            }
        }

        ctx.emit(Event::UserList {
            channel: channel.to_owned(),
            users: rows,
            complete: false,
        });
        Ok(())
    }
}

// ----------------------------------------------------------------------
// WHOIS
// ----------------------------------------------------------------------

/// `311`, `312`, `313`, `317`, `319`, `330`, `307` and `671`.
pub struct WhoisRowHandler;

impl Handler for WhoisRowHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let code = msg.numeric().ok_or(HandlerError::NeedMoreParams)?;
        if ctx.aggregators.whois.apply(
            code,
            msg,
            &ctx.server.mode_table,
            ctx.registry.casemapping(),
        ) {
            Ok(())
        } else {
            Err(HandlerError::Malformed(format!("WHOIS row {code}")))
        }
    }
}

/// `318 RPL_ENDOFWHOIS <client> <nick> :End of WHOIS`
pub struct WhoisEndHandler;

impl Handler for WhoisEndHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let nick = require(msg, 1)?;
        let record = ctx.aggregators.whois.finish(nick, ctx.registry.casemapping());
        if record.exists {
            absorb_whois(ctx, &record);
        }
        ctx.emit(Event::Whois(Box::new(record)));
        Ok(())
    }
}

fn absorb_whois(ctx: &mut Context<'_>, record: &WhoisRecord) {
    let mask = UserHostmask::new(&record.nick, &record.login, &record.hostname);
    let id = ctx.registry.get_or_create_user(&mask);
    if let Some(user) = ctx.registry.user_mut(id) {
        user.real_name.clone_from(&record.real_name);
        if !record.server.is_empty() {
            user.server.clone_from(&record.server);
        }
        user.away_message.clone_from(&record.away_message);
        user.is_ircop = record.is_ircop;
        if record.registered_as.is_some() {
            user.set_account(record.registered_as.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::context::testing::Bench;

    #[test]
    fn test_list_flush() {
        let mut bench = Bench::new("bot");
        bench.run(&ListStartHandler, ":srv 321 bot Channel :Users Name");
        bench.run(&ListRowHandler, ":srv 322 bot #a 5 :first");
        bench.run(&ListRowHandler, ":srv 322 bot #b 2 :");
        let events = bench.run(&ListEndHandler, ":srv 323 bot :End of LIST");

        let Event::ChannelInfo { channels } = &events[0] else {
            panic!("expected ChannelInfo, got {events:?}");
        };
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].name, "#a");
        assert_eq!(channels[1].topic, "");
        assert!(!bench.aggregators.list.is_collecting());
    }

    #[test]
    fn test_no_motd_flushes_empty() {
        let mut bench = Bench::new("bot");
        let events = bench.run(&MotdEndHandler, ":srv 422 bot :MOTD File is missing");
        assert_eq!(events, vec![Event::Motd { motd: String::new() }]);
    }

    #[test]
    fn test_single_nick_who_creates_no_channel() {
        let mut bench = Bench::new("bot");
        bench.run(&WhoRowHandler, ":srv 352 bot #chan ~a host srv alice H :0 Alice A");
        let events = bench.run(&WhoEndHandler, ":srv 315 bot alice :End of WHO list");

        assert!(bench.registry.channel("#chan").is_none());
        let alice = bench.registry.user("alice").expect("user tracked");
        assert_eq!(alice.real_name, "Alice A");
        assert!(matches!(&events[0], Event::UserList { complete: true, users, .. } if users.len() == 1));
    }

    #[test]
    fn test_names_ignored_for_untracked_channel() {
        let mut bench = Bench::new("bot");
        bench.run(&NamesRowHandler, ":srv 353 bot = #elsewhere :@op plain");
        let events = bench.run(&NamesEndHandler, ":srv 366 bot #elsewhere :End of NAMES list");

        assert!(bench.registry.channel("#elsewhere").is_none());
        assert!(matches!(&events[0], Event::UserList { complete: false, users, .. } if users.len() == 2));
    }

    #[test]
    fn test_whois_sets_account() {
        let mut bench = Bench::new("bot");
        bench.run(&WhoisRowHandler, ":srv 311 bot X ~x host.example * :Ex");
        bench.run(&WhoisRowHandler, ":srv 330 bot X xacct :is logged in as");
        let events = bench.run(&WhoisEndHandler, ":srv 318 bot X :End of WHOIS");

        let Event::Whois(record) = &events[0] else {
            panic!("expected Whois, got {events:?}");
        };
        assert!(record.exists);
        let user = bench.registry.user("x").expect("tracked");
        assert_eq!(user.account.as_deref(), Some("xacct"));
        assert!(user.is_identified);
    }
}
