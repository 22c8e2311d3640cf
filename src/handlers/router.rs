//! Command and numeric dispatch.
//!
//! Word commands are keyed by name, numerics by [`Response`]. A numeric
//! with a handler first yields a [`Event::ServerResponse`], then whatever
//! typed events its handler emits. Anything without a handler, and any line
//! a handler rejects, becomes one [`Event::Unknown`] carrying the raw text.

use std::collections::HashMap;

use slirc_wire::{RawMessage, Response};
use tracing::debug;

use super::channel::{
    BanListEndHandler, BanListRowHandler, CreationTimeHandler, InviteHandler, TopicHandler,
    TopicReplyHandler, TopicWhoTimeHandler,
};
use super::connection::{
    AcknowledgeHandler, ErrorHandler, IsupportHandler, MyInfoHandler, NickInUseHandler,
    PingHandler, WelcomeHandler,
};
use super::context::{Context, Handler};
use super::membership::{JoinHandler, KickHandler, NickHandler, PartHandler, QuitHandler};
use super::messaging::{NoticeHandler, PrivmsgHandler};
use super::mode::{ChannelModeIsHandler, ModeHandler};
use super::server_query::{
    ListEndHandler, ListRowHandler, ListStartHandler, MotdEndHandler, MotdLineHandler,
    MotdStartHandler, NamesEndHandler, NamesRowHandler, WhoEndHandler, WhoRowHandler,
    WhoisEndHandler, WhoisRowHandler,
};
use super::user_status::{AccountHandler, AwayHandler, AwayReplyHandler, ChghostHandler};
use crate::event::Event;

/// Dispatch table for incoming lines.
pub struct Router {
    commands: HashMap<&'static str, Box<dyn Handler>>,
    numerics: HashMap<Response, Box<dyn Handler>>,
    /// Lines routed per command word, numerics included as their code.
    command_counts: HashMap<String, u64>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// A router with every built-in handler registered.
    pub fn new() -> Self {
        let mut commands: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Connection
        commands.insert("PING", Box::new(PingHandler));
        commands.insert("ERROR", Box::new(ErrorHandler));

        // Membership
        commands.insert("JOIN", Box::new(JoinHandler));
        commands.insert("PART", Box::new(PartHandler));
        commands.insert("KICK", Box::new(KickHandler));
        commands.insert("QUIT", Box::new(QuitHandler));
        commands.insert("NICK", Box::new(NickHandler));

        // Messaging
        commands.insert("PRIVMSG", Box::new(PrivmsgHandler));
        commands.insert("NOTICE", Box::new(NoticeHandler));

        // Channel state
        commands.insert("TOPIC", Box::new(TopicHandler));
        commands.insert("INVITE", Box::new(InviteHandler));
        commands.insert("MODE", Box::new(ModeHandler));

        // IRCv3 user state
        commands.insert("AWAY", Box::new(AwayHandler));
        commands.insert("ACCOUNT", Box::new(AccountHandler));
        commands.insert("CHGHOST", Box::new(ChghostHandler));

        let mut numerics: HashMap<Response, Box<dyn Handler>> = HashMap::new();
        use Response::*;

        // Registration
        numerics.insert(RPL_WELCOME, Box::new(WelcomeHandler));
        numerics.insert(RPL_MYINFO, Box::new(MyInfoHandler));
        numerics.insert(RPL_ISUPPORT, Box::new(IsupportHandler));
        numerics.insert(ERR_NICKNAMEINUSE, Box::new(NickInUseHandler));

        // Channel replies
        numerics.insert(RPL_TOPIC, Box::new(TopicReplyHandler));
        numerics.insert(RPL_TOPICWHOTIME, Box::new(TopicWhoTimeHandler));
        numerics.insert(RPL_CREATIONTIME, Box::new(CreationTimeHandler));
        numerics.insert(RPL_CHANNELMODEIS, Box::new(ChannelModeIsHandler));
        numerics.insert(RPL_BANLIST, Box::new(BanListRowHandler));
        numerics.insert(RPL_ENDOFBANLIST, Box::new(BanListEndHandler));

        // Aggregated replies
        numerics.insert(RPL_LISTSTART, Box::new(ListStartHandler));
        numerics.insert(RPL_LIST, Box::new(ListRowHandler));
        numerics.insert(RPL_LISTEND, Box::new(ListEndHandler));
        numerics.insert(RPL_MOTDSTART, Box::new(MotdStartHandler));
        numerics.insert(RPL_MOTD, Box::new(MotdLineHandler));
        numerics.insert(RPL_ENDOFMOTD, Box::new(MotdEndHandler));
        numerics.insert(ERR_NOMOTD, Box::new(MotdEndHandler));
        numerics.insert(RPL_WHOREPLY, Box::new(WhoRowHandler));
        numerics.insert(RPL_ENDOFWHO, Box::new(WhoEndHandler));
        numerics.insert(RPL_NAMREPLY, Box::new(NamesRowHandler));
        numerics.insert(RPL_ENDOFNAMES, Box::new(NamesEndHandler));
        numerics.insert(RPL_AWAY, Box::new(AwayReplyHandler));
        for row in [
            RPL_WHOISUSER,
            RPL_WHOISSERVER,
            RPL_WHOISOPERATOR,
            RPL_WHOISIDLE,
            RPL_WHOISCHANNELS,
            RPL_WHOISACCOUNT,
            RPL_WHOISREGNICK,
            RPL_WHOISSECURE,
        ] {
            numerics.insert(row, Box::new(WhoisRowHandler));
        }
        numerics.insert(RPL_ENDOFWHOIS, Box::new(WhoisEndHandler));

        // Recognised, reported as ServerResponse only. During the handshake
        // the SASL numerics pass through the negotiator first.
        for code in [
            RPL_YOURHOST,
            RPL_CREATED,
            RPL_UNAWAY,
            RPL_NOWAWAY,
            RPL_NOTOPIC,
            ERR_NOSUCHNICK,
            ERR_INVALIDCAPCMD,
            ERR_UNKNOWNCOMMAND,
            ERR_ERRONEUSNICKNAME,
            RPL_LOGGEDIN,
            RPL_LOGGEDOUT,
            ERR_NICKLOCKED,
            RPL_SASLSUCCESS,
            ERR_SASLFAIL,
            ERR_SASLTOOLONG,
            ERR_SASLABORTED,
            ERR_SASLALREADY,
            RPL_SASLMECHS,
        ] {
            numerics.insert(code, Box::new(AcknowledgeHandler));
        }

        Self {
            commands,
            numerics,
            command_counts: HashMap::new(),
        }
    }

    /// Replace or add the handler for a word command.
    pub fn register(&mut self, command: &'static str, handler: Box<dyn Handler>) {
        self.commands.insert(command, handler);
    }

    /// Replace or add the handler for a numeric.
    pub fn register_numeric(&mut self, response: Response, handler: Box<dyn Handler>) {
        self.numerics.insert(response, handler);
    }

    /// Whether a handler exists for this line's command.
    pub fn handles(&self, msg: &RawMessage) -> bool {
        self.handler_for(msg).is_some()
    }

    fn handler_for(&self, msg: &RawMessage) -> Option<&dyn Handler> {
        let handler = match msg.numeric() {
            Some(code) => self.numerics.get(&Response::from_code(code)?),
            None => self.commands.get(msg.command.to_ascii_uppercase().as_str()),
        };
        handler.map(Box::as_ref)
    }

    /// Route one tokenized line, appending its events to `ctx.events`.
    /// Never fails: rejection degrades to [`Event::Unknown`].
    pub fn route(&mut self, ctx: &mut Context<'_>, msg: &RawMessage, line: &str) {
        self.count(&msg.command);

        let Some(handler) = self.handler_for(msg) else {
            ctx.emit(Event::Unknown {
                line: line.to_owned(),
            });
            return;
        };

        let mark = ctx.events.len();
        if let Some(code) = msg.numeric() {
            ctx.emit(Event::ServerResponse {
                code,
                params: msg.args().map(str::to_owned).collect(),
            });
        }

        if let Err(error) = handler.handle(ctx, msg) {
            debug!(command = %msg.command, %error, "degrading line to unknown");
            ctx.events.truncate(mark);
            ctx.emit(Event::Unknown {
                line: line.to_owned(),
            });
        }
    }

    fn count(&mut self, command: &str) {
        *self
            .command_counts
            .entry(command.to_ascii_uppercase())
            .or_insert(0) += 1;
    }

    /// Lines seen per command, most frequent first.
    pub fn command_stats(&self) -> Vec<(String, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (cmd.clone(), *count))
            .collect();
        stats.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Aggregators;
    use crate::handlers::context::ServerState;
    use crate::state::Registry;
    use slirc_wire::Casemapping;

    fn route(router: &mut Router, registry: &mut Registry, line: &str) -> Vec<Event> {
        let mut server = ServerState::default();
        let mut aggregators = Aggregators::default();
        let mut events = Vec::new();
        let mut ctx = Context {
            registry,
            server: &mut server,
            aggregators: &mut aggregators,
            events: &mut events,
        };
        let msg = RawMessage::parse(line).expect("valid line");
        router.route(&mut ctx, &msg, line);
        events
    }

    #[test]
    fn test_unknown_command() {
        let mut router = Router::new();
        let mut registry = Registry::new("bot", Casemapping::Rfc1459);
        let events = route(&mut router, &mut registry, ":srv WALLOPS :hello");
        assert_eq!(
            events,
            vec![Event::Unknown {
                line: ":srv WALLOPS :hello".into()
            }]
        );
    }

    #[test]
    fn test_unknown_numeric() {
        let mut router = Router::new();
        let mut registry = Registry::new("bot", Casemapping::Rfc1459);
        let events = route(&mut router, &mut registry, ":srv 251 bot :There are 3 users");
        assert!(matches!(&events[..], [Event::Unknown { .. }]));
    }

    #[test]
    fn test_numeric_yields_server_response_first() {
        let mut router = Router::new();
        let mut registry = Registry::new("bot", Casemapping::Rfc1459);
        let events = route(&mut router, &mut registry, ":srv 433 * bot :Nickname is already in use");
        assert_eq!(
            events[0],
            Event::ServerResponse {
                code: 433,
                params: vec!["*".into(), "bot".into(), "Nickname is already in use".into()],
            }
        );
        assert_eq!(events[1], Event::NickAlreadyInUse { nick: "bot".into() });
    }

    #[test]
    fn test_malformed_known_command_degrades() {
        let mut router = Router::new();
        let mut registry = Registry::new("bot", Casemapping::Rfc1459);
        let events = route(&mut router, &mut registry, ":srv 433 *");
        assert_eq!(events, vec![Event::Unknown { line: ":srv 433 *".into() }]);
    }

    #[test]
    fn test_lowercase_command_word() {
        let mut router = Router::new();
        let mut registry = Registry::new("bot", Casemapping::Rfc1459);
        let events = route(&mut router, &mut registry, "ping :token");
        assert_eq!(events, vec![Event::ServerPing { token: "token".into() }]);
        assert_eq!(router.command_stats(), vec![("PING".to_owned(), 1)]);
    }
}
