//! Connection-level handlers: PING, ERROR and the registration numerics.

use slirc_wire::RawMessage;
use tracing::{info, warn};

use super::context::{Context, Handler, require};
use crate::error::HandlerResult;
use crate::event::Event;

/// `PING <token>` from the server.
pub struct PingHandler;

impl Handler for PingHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let token = msg.last_arg().unwrap_or_default().to_owned();
        ctx.emit(Event::ServerPing { token });
        Ok(())
    }
}

pub struct ErrorHandler;

impl Handler for ErrorHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let message = msg.last_arg().unwrap_or_default().to_owned();
        warn!(%message, "server sent ERROR");
        ctx.emit(Event::ServerError { message });
        Ok(())
    }
}

/// `001 RPL_WELCOME`: the first argument is the nick we are registered under,
/// which may differ from the one we asked for.
pub struct WelcomeHandler;

impl Handler for WelcomeHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let nick = require(msg, 0)?;
        let own = ctx.registry.own_id();
        ctx.registry.rename(own, nick);

        if ctx.server.name.is_none() {
            ctx.server.name = msg.prefix.clone();
        }
        info!(nick, server = ?ctx.server.name, "registered");
        ctx.emit(Event::Connect {
            nick: nick.to_owned(),
            server: ctx.server.name.clone(),
        });
        Ok(())
    }
}

/// `004 RPL_MYINFO <nick> <server> <version> <usermodes> <chanmodes> ...`
pub struct MyInfoHandler;

impl Handler for MyInfoHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let server = require(msg, 1)?.to_owned();
        let version = require(msg, 2)?.to_owned();
        let user_modes = msg.arg(3).unwrap_or_default().to_owned();
        let channel_modes = msg.arg(4).unwrap_or_default().to_owned();

        ctx.server.name = Some(server.clone());
        ctx.emit(Event::ServerInfo {
            server,
            version,
            user_modes,
            channel_modes,
        });
        Ok(())
    }
}

/// `005 RPL_ISUPPORT`. Tokens accumulate across lines; the mode table and
/// casemapping are rebuilt after each one.
pub struct IsupportHandler;

impl Handler for IsupportHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let args: Vec<&str> = msg.args().collect();
        ctx.server.isupport.apply_reply(&args);

        match ctx.server.isupport.mode_table() {
            Ok(table) => ctx.server.mode_table = table,
            Err(error) => warn!(%error, "ignoring malformed mode tokens"),
        }

        if let Some(casemapping) = ctx.server.isupport.casemapping() {
            if casemapping != ctx.registry.casemapping() {
                info!(?casemapping, "switching casemapping");
                ctx.registry.set_casemapping(casemapping);
            }
        }
        Ok(())
    }
}

/// `433 ERR_NICKNAMEINUSE <client> <nick> :...`
pub struct NickInUseHandler;

impl Handler for NickInUseHandler {
    fn handle(&self, ctx: &mut Context<'_>, msg: &RawMessage) -> HandlerResult {
        let nick = require(msg, 1)?.to_owned();
        warn!(%nick, "nickname in use");
        ctx.emit(Event::NickAlreadyInUse { nick });
        Ok(())
    }
}

/// Numerics with no typed event of their own. Routing them still yields a
/// `ServerResponse`.
pub struct AcknowledgeHandler;

impl Handler for AcknowledgeHandler {
    fn handle(&self, _ctx: &mut Context<'_>, _msg: &RawMessage) -> HandlerResult {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::context::testing::Bench;
    use slirc_wire::Casemapping;

    #[test]
    fn test_welcome_renames_own_user() {
        let mut bench = Bench::new("bot");
        let events = bench.run(&WelcomeHandler, ":irc.test 001 bot_ :Welcome");

        assert_eq!(bench.registry.own_nick(), "bot_");
        assert_eq!(
            events,
            vec![Event::Connect {
                nick: "bot_".into(),
                server: Some("irc.test".into()),
            }]
        );
    }

    #[test]
    fn test_isupport_updates_mode_table_and_casemapping() {
        let mut bench = Bench::new("bot");
        bench.run(
            &IsupportHandler,
            ":irc.test 005 bot PREFIX=(qaohv)~&@%+ CHANMODES=beI,k,l,imnpst CASEMAPPING=ascii :are supported",
        );

        assert!(bench.server.mode_table.is_prefix_mode('q'));
        assert_eq!(bench.server.mode_table.symbol_for_mode('a'), Some('&'));
        assert_eq!(bench.registry.casemapping(), Casemapping::Ascii);
    }

    #[test]
    fn test_isupport_keeps_table_on_bad_prefix() {
        let mut bench = Bench::new("bot");
        bench.run(&IsupportHandler, ":irc.test 005 bot PREFIX=(ov)@ :are supported");
        assert!(bench.server.mode_table.is_prefix_mode('o'));
        assert!(bench.server.mode_table.is_prefix_mode('v'));
    }

    #[test]
    fn test_ping_token_from_trailing() {
        let mut bench = Bench::new("bot");
        let events = bench.run(&PingHandler, "PING :irc.test");
        assert_eq!(events, vec![Event::ServerPing { token: "irc.test".into() }]);
    }
}
