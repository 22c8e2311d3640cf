//! Integration test common infrastructure.
//!
//! Builds sessions in a known phase and feeds them server lines.

#![allow(dead_code)]

use slirc_bot::caps::CapHandler;
use slirc_bot::{BotConfig, Event, Session};

/// Nick every test session registers under.
pub const NICK: &str = "Bot";

/// A session that has finished the handshake (no capabilities) and seen `001`.
pub fn registered() -> Session {
    let mut session = Session::new(BotConfig::new(NICK));
    session.start();
    feed(&mut session, ":irc.test CAP * LS :");
    session.take_outgoing();
    feed(&mut session, &format!(":irc.test 001 {NICK} :Welcome to the test network"));
    session
}

/// A session that has sent `CAP LS 302` with the given handlers.
pub fn negotiating(handlers: Vec<Box<dyn CapHandler>>) -> Session {
    let mut session = Session::with_handlers(BotConfig::new(NICK), handlers);
    session.start();
    session
}

/// Feed one line, panicking on a handshake error.
pub fn feed(session: &mut Session, line: &str) -> Vec<Event> {
    session
        .process_line(line)
        .unwrap_or_else(|e| panic!("line {line:?} failed: {e}"))
}

/// Feed several lines and collect every event.
pub fn feed_all(session: &mut Session, lines: &[&str]) -> Vec<Event> {
    lines.iter().flat_map(|line| feed(session, line)).collect()
}

/// The outgoing queue rendered as strings.
pub fn outgoing(session: &mut Session) -> Vec<String> {
    session
        .take_outgoing()
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Events with the `ServerResponse` companions of numerics removed.
pub fn typed(events: Vec<Event>) -> Vec<Event> {
    events
        .into_iter()
        .filter(|e| !matches!(e, Event::ServerResponse { .. }))
        .collect()
}
