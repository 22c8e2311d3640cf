//! AWAY, ACCOUNT, CHGHOST and the `301` away reply.

use slirc_wire::{RawMessage, UserHostmask};

use super::context::{Context, Handler, require};
use crate::error::HandlerResult;
use crate::event::Event;

/// away-notify. `AWAY :text` means away, even with empty text; a bare
/// `AWAY` means back.
pub struct AwayHandler;

impl Handler for AwayHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let id = ctx.registry.get_or_create_user(&mask);
        let message = msg.arg(0).map(str::to_owned);

        if let Some(user) = ctx.registry.user_mut(id) {
            user.away_message = message.clone();
        }
        let user = ctx.hostmask_of(id, &mask.nick);
        ctx.emit(Event::Away { user, message });
        Ok(())
    }
}

/// account-notify. `*` means the user logged out.
pub struct AccountHandler;

impl Handler for AccountHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let account = require(msg, 0)?;
        let account = (account != "*").then(|| account.to_owned());

        let id = ctx.registry.get_or_create_user(&mask);
        if let Some(user) = ctx.registry.user_mut(id) {
            user.set_account(account.clone());
        }
        let user = ctx.hostmask_of(id, &mask.nick);
        ctx.emit(Event::AccountChange { user, account });
        Ok(())
    }
}

/// `CHGHOST <new login> <new host>`. The event carries the old mask.
pub struct ChghostHandler;

impl Handler for ChghostHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let mask = ctx.source_user(msg)?;
        let login = require(msg, 0)?.to_owned();
        let hostname = require(msg, 1)?.to_owned();

        let id = ctx.registry.get_or_create_user(&mask);
        let old = ctx.hostmask_of(id, &mask.nick);
        if let Some(user) = ctx.registry.user_mut(id) {
            user.login.clone_from(&login);
            user.hostname.clone_from(&hostname);
        }
        ctx.emit(Event::HostChange {
            user: old,
            login,
            hostname,
        });
        Ok(())
    }
}

/// `301 RPL_AWAY <client> <nick> :<message>`.
///
/// Part of a WHOIS reply while one is being collected, otherwise the answer
/// to a message sent to an away user.
pub struct AwayReplyHandler;

impl Handler for AwayReplyHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let nick = require(msg, 1)?;
        let message = msg.arg(2).unwrap_or_default().to_owned();

        if ctx.aggregators.whois.is_collecting() {
            let casemapping = ctx.registry.casemapping();
            ctx.aggregators
                .whois
                .apply(301, msg, &ctx.server.mode_table, casemapping);
            return Ok(());
        }

        let id = ctx.registry.get_or_create_user(&UserHostmask::from_nick(nick));
        if let Some(user) = ctx.registry.user_mut(id) {
            user.away_message = Some(message);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::context::testing::Bench;

    #[test]
    fn test_empty_away_is_still_away() {
        let mut bench = Bench::new("bot");
        let events = bench.run(&AwayHandler, ":alice!a@h AWAY :");
        assert_eq!(
            events,
            vec![Event::Away {
                user: UserHostmask::new("alice", "a", "h"),
                message: Some(String::new()),
            }]
        );
        assert!(bench.registry.user("alice").is_some_and(|u| u.is_away()));

        bench.run(&AwayHandler, ":alice!a@h AWAY");
        assert!(bench.registry.user("alice").is_some_and(|u| !u.is_away()));
    }

    #[test]
    fn test_account_logout() {
        let mut bench = Bench::new("bot");
        bench.run(&AccountHandler, ":alice!a@h ACCOUNT alice");
        assert!(bench.registry.user("alice").is_some_and(|u| u.is_identified));

        let events = bench.run(&AccountHandler, ":alice!a@h ACCOUNT *");
        assert!(matches!(&events[0], Event::AccountChange { account: None, .. }));
        assert!(bench.registry.user("alice").is_some_and(|u| u.account.is_none()));
    }

    #[test]
    fn test_chghost_updates_mask() {
        let mut bench = Bench::new("bot");
        let events = bench.run(&ChghostHandler, ":alice!a@old.host CHGHOST al new.host");
        assert!(matches!(
            &events[0],
            Event::HostChange { user, hostname, .. }
                if user.hostname == "old.host" && hostname == "new.host"
        ));
        let user = bench.registry.user("alice").expect("tracked");
        assert_eq!(user.hostmask().to_string(), "alice!al@new.host");
    }
}
