//! Integration tests for messages, CTCP, topics and connection numerics.

mod common;

use common::{NICK, feed, feed_all, registered, typed};
use slirc_bot::{BotConfig, Event, Session};

#[test]
fn test_channel_and_private_messages() {
    let mut session = registered();
    let events = feed_all(
        &mut session,
        &[
            ":Alice!a@h PRIVMSG #c :hello all",
            &format!(":Alice!a@h PRIVMSG {NICK} :hello you"),
            ":Alice!a@h PRIVMSG @#c :ops only",
        ],
    );

    assert!(matches!(&events[0], Event::Message { channel, message, .. } if channel == "#c" && message == "hello all"));
    assert!(matches!(&events[1], Event::PrivateMessage { message, .. } if message == "hello you"));
    assert!(matches!(&events[2], Event::Message { channel, .. } if channel == "#c"));
}

#[test]
fn test_message_with_empty_trailing() {
    let mut session = registered();
    let events = feed(&mut session, ":Alice!a@h PRIVMSG #c :");
    assert!(matches!(&events[..], [Event::Message { message, .. }] if message.is_empty()));
}

#[test]
fn test_ctcp_dispatch() {
    let mut session = registered();
    let events = feed_all(
        &mut session,
        &[
            ":Alice!a@h PRIVMSG #c :\x01ACTION waves\x01",
            &format!(":Alice!a@h PRIVMSG {NICK} :\x01VERSION\x01"),
            &format!(":Alice!a@h PRIVMSG {NICK} :\x01PING 12345\x01"),
            &format!(":Alice!a@h PRIVMSG {NICK} :\x01TIME\x01"),
            &format!(":Alice!a@h PRIVMSG {NICK} :\x01FINGER\x01"),
        ],
    );

    let names: Vec<_> = events.iter().map(Event::name).collect();
    assert_eq!(names, vec!["action", "version", "ping", "time", "finger"]);
    assert!(matches!(&events[0], Event::Action { target, action, .. } if target == "#c" && action == "waves"));
    assert!(matches!(&events[2], Event::Ping { ping_value: Some(v), .. } if v == "12345"));
}

#[test]
fn test_notice_from_server_and_user() {
    let mut session = registered();
    let events = feed_all(
        &mut session,
        &[
            ":irc.test NOTICE * :*** Looking up your hostname",
            ":NickServ!services@services.test NOTICE Bot :Please identify",
        ],
    );
    assert!(matches!(&events[0], Event::Notice { source: Some(p), .. } if p.user().is_none()));
    assert!(matches!(&events[1], Event::Notice { source: Some(p), .. } if p.nick() == Some("NickServ")));
}

#[test]
fn test_join_time_topic_then_live_change() {
    let mut session = registered();
    feed(&mut session, &format!(":{NICK}!bot@h JOIN #c"));

    let events = typed(feed_all(
        &mut session,
        &[
            ":irc.test 332 Bot #c :Welcome to #c",
            ":irc.test 333 Bot #c Op!o@h 1700000000",
        ],
    ));
    assert!(matches!(&events[0], Event::Topic { changed: false, setter: None, topic, .. } if topic == "Welcome to #c"));
    assert!(matches!(
        &events[1],
        Event::Topic { changed: false, setter: Some(s), timestamp: Some(t), .. }
            if s.nick == "Op" && t.timestamp() == 1_700_000_000
    ));

    let events = feed(&mut session, ":Op!o@h TOPIC #c :New topic");
    assert!(matches!(
        &events[..],
        [Event::Topic { changed: true, old_topic: Some(old), topic, .. }]
            if old == "Welcome to #c" && topic == "New topic"
    ));
    let channel = session.registry().channel("#c").expect("channel");
    assert_eq!(channel.topic, "New topic");
    assert_eq!(channel.topic_setter.as_ref().map(|s| s.nick.as_str()), Some("Op"));
}

#[test]
fn test_invite() {
    let mut session = registered();
    let events = feed(&mut session, &format!(":Alice!a@h INVITE {NICK} :#secret"));
    assert!(matches!(
        &events[..],
        [Event::Invite { user: Some(u), channel }] if u.nick == "Alice" && channel == "#secret"
    ));
}

#[test]
fn test_welcome_confirms_nick() {
    let mut session = Session::new(BotConfig::new("Bot"));
    session.start();
    feed(&mut session, ":irc.test CAP * LS :");
    let events = typed(feed(&mut session, ":irc.test 001 Bot_ :Welcome"));
    assert_eq!(
        events,
        vec![Event::Connect {
            nick: "Bot_".into(),
            server: Some("irc.test".into()),
        }]
    );
    assert_eq!(session.registry().own_nick(), "Bot_");
}

#[test]
fn test_server_info_and_isupport() {
    let mut session = registered();
    let events = typed(feed_all(
        &mut session,
        &[
            ":irc.test 004 Bot irc.test ircd-9.9 iow bklmnopstv",
            ":irc.test 005 Bot NETWORK=TestNet CHANTYPES=#& :are supported by this server",
        ],
    ));
    assert!(matches!(&events[0], Event::ServerInfo { version, .. } if version == "ircd-9.9"));
    assert_eq!(session.isupport().network(), Some("TestNet"));
    assert_eq!(session.server().name.as_deref(), Some("irc.test"));

    // '&' is now a channel prefix.
    let events = feed(&mut session, ":Alice!a@h PRIVMSG &local :hi");
    assert!(matches!(&events[..], [Event::Message { channel, .. }] if channel == "&local"));
}

#[test]
fn test_nick_in_use() {
    let mut session = registered();
    let events = typed(feed(&mut session, ":irc.test 433 * Bot :Nickname is already in use"));
    assert_eq!(events, vec![Event::NickAlreadyInUse { nick: "Bot".into() }]);
}

#[test]
fn test_server_error() {
    let mut session = registered();
    let events = feed(&mut session, "ERROR :Closing Link: bot (Ping timeout)");
    assert_eq!(
        events,
        vec![Event::ServerError {
            message: "Closing Link: bot (Ping timeout)".into()
        }]
    );
}

#[test]
fn test_unknown_lines_never_fail() {
    let mut session = registered();
    for line in [
        ":irc.test 251 Bot :There are 5 users",
        ":irc.test WALLOPS :server going down",
        ":Alice!a@h PRIVMSG",
        "   ",
        ":Alice!a@h PRIVMSG #c :\x01DCC SEND file 1 2 3\x01",
    ] {
        let events = feed(&mut session, line);
        assert!(
            matches!(&events[..], [Event::Unknown { .. }]),
            "{line:?} gave {events:?}"
        );
    }
}

#[test]
fn test_away_notify_round_trip() {
    let mut session = registered();
    feed(&mut session, ":Alice!a@h JOIN #c");
    feed(&mut session, ":Alice!a@h AWAY :");
    assert_eq!(
        session.registry().user("alice").and_then(|u| u.away_message.clone()),
        Some(String::new())
    );
    feed(&mut session, ":Alice!a@h AWAY");
    assert!(session.registry().user("alice").is_some_and(|u| !u.is_away()));
}

#[test]
fn test_casemapping_switch_rekeys_registry() {
    let mut session = registered();
    feed(&mut session, ":Nick[x]!a@h JOIN #c");
    assert!(session.registry().user("nick{x}").is_some());

    feed(&mut session, ":irc.test 005 Bot CASEMAPPING=ascii :are supported");
    let registry = session.registry();
    assert!(registry.user("nick{x}").is_none());
    assert!(registry.user("NICK[X]").is_some());
}
