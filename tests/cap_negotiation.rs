//! Integration tests for the CAP/SASL handshake as driven through a session.

mod common;

use common::{NICK, feed, negotiating, outgoing, registered};
use slirc_bot::caps::{CapHandler, EnableCap, SaslPlain};
use slirc_bot::slirc_wire::sasl::encode_plain;
use slirc_bot::{CapChangeKind, CapNegotiationError, ConnectionPhase, Event};

fn sasl_and_unknown() -> Vec<Box<dyn CapHandler>> {
    vec![
        Box::new(SaslPlain::new("botacct", "hunter2", true)),
        Box::new(EnableCap::new("example.org/not-offered")),
    ]
}

#[test]
fn test_sasl_handshake_end_to_end() {
    let mut session = negotiating(sasl_and_unknown());
    assert_eq!(session.phase(), ConnectionPhase::NegotiatingCaps);

    let events = feed(&mut session, ":irc.test CAP * LS :multi-prefix sasl=PLAIN,EXTERNAL");
    assert!(events.is_empty());
    assert_eq!(outgoing(&mut session), vec!["CAP REQ :sasl"]);

    feed(&mut session, ":irc.test CAP * ACK :sasl");
    assert_eq!(outgoing(&mut session), vec!["AUTHENTICATE PLAIN"]);

    feed(&mut session, "AUTHENTICATE +");
    assert_eq!(
        outgoing(&mut session),
        vec![format!("AUTHENTICATE {}", encode_plain("botacct", "hunter2"))]
    );

    let events = feed(&mut session, ":irc.test 900 Bot Bot!bot@h botacct :You are now logged in as botacct");
    assert!(matches!(&events[..], [Event::ServerResponse { code: 900, .. }]));

    let events = feed(&mut session, ":irc.test 903 Bot :SASL authentication successful");
    assert!(matches!(&events[..], [Event::ServerResponse { code: 903, .. }]));
    assert_eq!(outgoing(&mut session), vec!["CAP END"]);
    assert_eq!(session.phase(), ConnectionPhase::Normal);
    assert!(session.enabled_caps().contains("sasl"));

    let events = feed(&mut session, &format!(":irc.test 001 {NICK} :Welcome"));
    assert!(events.iter().any(|e| matches!(e, Event::Connect { .. })));
}

#[test]
fn test_nothing_matching_sends_only_cap_end() {
    let handlers: Vec<Box<dyn CapHandler>> = vec![Box::new(EnableCap::new("away-notify"))];
    let mut session = negotiating(handlers);
    feed(&mut session, ":irc.test CAP * LS :multi-prefix");
    assert_eq!(outgoing(&mut session), vec!["CAP END"]);
    assert_eq!(session.phase(), ConnectionPhase::Normal);
    assert!(session.enabled_caps().is_empty());
}

#[test]
fn test_multiline_ls_then_ack() {
    let handlers: Vec<Box<dyn CapHandler>> = vec![
        Box::new(EnableCap::new("multi-prefix")),
        Box::new(EnableCap::new("away-notify")),
    ];
    let mut session = negotiating(handlers);
    feed(&mut session, ":irc.test CAP * LS * :multi-prefix extended-join");
    assert!(outgoing(&mut session).is_empty());
    assert!(session.cap_state().is_some_and(|s| s.offered.contains_key("extended-join")));

    feed(&mut session, ":irc.test CAP * LS :away-notify");
    assert_eq!(outgoing(&mut session), vec!["CAP REQ :away-notify multi-prefix"]);

    feed(&mut session, ":irc.test CAP * ACK :multi-prefix away-notify");
    assert_eq!(outgoing(&mut session), vec!["CAP END"]);
    let enabled: Vec<_> = session.enabled_caps().iter().cloned().collect();
    assert_eq!(enabled, vec!["away-notify", "multi-prefix"]);
}

#[test]
fn test_mandatory_sasl_failure_is_fatal() {
    let mut session = negotiating(sasl_and_unknown());
    feed(&mut session, ":irc.test CAP * LS :sasl");
    feed(&mut session, ":irc.test CAP * ACK :sasl");
    feed(&mut session, "AUTHENTICATE +");

    let err = session
        .process_line(":irc.test 904 Bot :SASL authentication failed")
        .unwrap_err();
    assert_eq!(
        err,
        CapNegotiationError::SaslFailed {
            code: 904,
            message: "SASL authentication failed".into(),
        }
    );
    assert_eq!(err.error_code(), "sasl_failed");
}

#[test]
fn test_mandatory_cap_missing_is_fatal() {
    let mut session = negotiating(sasl_and_unknown());
    let err = session
        .process_line(":irc.test CAP * LS :multi-prefix")
        .unwrap_err();
    assert_eq!(err, CapNegotiationError::MandatoryUnavailable("sasl".into()));
}

#[test]
fn test_ping_answered_during_handshake() {
    let mut session = negotiating(sasl_and_unknown());
    let events = feed(&mut session, "PING :irc.test");
    assert_eq!(events, vec![Event::ServerPing { token: "irc.test".into() }]);
}

#[test]
fn test_cap_new_and_del_after_registration() {
    let mut session = registered();

    let events = feed(&mut session, ":irc.test CAP Bot NEW :away-notify");
    assert_eq!(
        events,
        vec![Event::CapChange {
            kind: CapChangeKind::New,
            caps: vec!["away-notify".into()],
        }]
    );

    feed(&mut session, ":irc.test CAP Bot ACK :away-notify");
    assert!(session.enabled_caps().contains("away-notify"));

    let events = feed(&mut session, ":irc.test CAP Bot DEL :away-notify");
    assert!(matches!(&events[..], [Event::CapChange { kind: CapChangeKind::Del, .. }]));
    assert!(session.enabled_caps().is_empty());
}

#[tokio::test]
async fn test_events_over_channel_sink() {
    let mut session = registered();
    let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    for line in [":A!a@h JOIN #c", ":A!a@h PRIVMSG #c :hello", ":A!a@h PART #c"] {
        session.process_line_into(line, &mut tx).expect("routed");
    }
    drop(tx);

    let mut kinds = Vec::new();
    while let Some(event) = rx.recv().await {
        kinds.push(event.name());
    }
    assert_eq!(kinds, vec!["join", "message", "part"]);
}
