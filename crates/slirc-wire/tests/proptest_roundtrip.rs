//! Property-based tests for line tokenizing.
//!
//! Random well-formed lines must tokenize, and a rendered message must
//! tokenize back to the same parts.

use proptest::prelude::*;
use slirc_wire::{parse_mode_changes, ModeTable, Prefix, RawMessage};

fn nickname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z\\[\\]\\\\^_`{|}][a-zA-Z0-9\\-\\[\\]\\\\^_`{|}]{0,8}")
        .expect("valid regex")
}

fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("~?[a-zA-Z][a-zA-Z0-9]{0,9}").expect("valid regex")
}

fn hostname_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]+(\\.[a-z0-9]+)*").expect("valid regex")
}

fn channel_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[#&][a-zA-Z0-9_\\-]{1,49}").expect("valid regex")
}

/// Middle parameter: no space, not starting with `:`.
fn middle_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9#&*=+\\-_.!@]{1,20}").expect("valid regex")
}

fn trailing_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just(" ".to_string()),
        Just(":".to_string()),
        Just(": leading colon".to_string()),
        Just("multiple   spaces   here".to_string()),
        prop::string::string_regex("[^\r\n\0]{0,400}").expect("valid regex"),
    ]
}

fn tags_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop::string::string_regex("\\+?[a-zA-Z][a-zA-Z0-9\\-]{0,15}").expect("valid regex"),
            prop::option::of(prop::string::string_regex("[a-zA-Z0-9._\\-]{0,40}").expect("valid regex")),
        ),
        1..4,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| match v {
                Some(v) => format!("{}={}", k, v),
                None => k,
            })
            .collect::<Vec<_>>()
            .join(";")
    })
}

fn user_prefix_strategy() -> impl Strategy<Value = String> {
    (nickname_strategy(), username_strategy(), hostname_strategy())
        .prop_map(|(n, u, h)| format!("{}!{}@{}", n, u, h))
}

fn command_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[A-Z]{3,10}").expect("valid regex"),
        (0u16..1000).prop_map(|n| format!("{:03}", n)),
    ]
}

proptest! {
    #[test]
    fn test_rendered_message_roundtrips(
        tags in prop::option::of(tags_strategy()),
        prefix in prop::option::of(user_prefix_strategy()),
        command in command_strategy(),
        params in prop::collection::vec(middle_strategy(), 0..6),
        trailing in prop::option::of(trailing_strategy()),
    ) {
        let msg = RawMessage {
            tags,
            prefix,
            command,
            params,
            trailing,
        };
        let line = msg.to_string();
        let reparsed = RawMessage::parse(&line).expect("rendered line tokenizes");
        prop_assert_eq!(reparsed, msg);
    }

    #[test]
    fn test_trailing_never_merges_into_middle(
        channel in channel_strategy(),
        text in trailing_strategy(),
    ) {
        let line = format!(":srv.example 332 me {} :{}", channel, text);
        let msg = RawMessage::parse(&line).expect("valid line");
        prop_assert_eq!(msg.params.len(), 2);
        prop_assert_eq!(msg.trailing.as_deref(), Some(text.as_str()));
        prop_assert_eq!(msg.last_arg(), Some(text.as_str()));
    }

    #[test]
    fn test_user_prefix_parts(
        nick in nickname_strategy(),
        user in username_strategy(),
        host in hostname_strategy(),
    ) {
        let prefix = Prefix::parse(&format!("{}!{}@{}", nick, user, host));
        let mask = prefix.user().expect("user prefix");
        prop_assert_eq!(&mask.nick, &nick);
        prop_assert_eq!(&mask.login, &user);
        prop_assert_eq!(&mask.hostname, &host);
    }

    #[test]
    fn test_mode_parse_never_panics(
        modes in "[+\\-a-zA-Z]{0,20}",
        args in prop::collection::vec(middle_strategy(), 0..6),
    ) {
        let changes = parse_mode_changes(&modes, &args, &ModeTable::default());
        let flags = modes.chars().filter(|c| *c != '+' && *c != '-').count();
        prop_assert_eq!(changes.len(), flags);
        let consumed = changes.iter().filter(|c| c.arg.is_some()).count();
        prop_assert!(consumed <= args.len());
    }

    #[test]
    fn test_arbitrary_input_never_panics(line in "[^\0]{0,600}") {
        let _ = RawMessage::parse(&line);
    }
}
