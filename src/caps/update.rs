//! Capability changes after registration (cap-notify).

use std::collections::BTreeSet;

use slirc_wire::RawMessage;

use crate::event::{CapChangeKind, Event};

/// Apply a post-registration `CAP NEW/DEL/ACK/NAK` to the enabled set.
///
/// Returns `None` for subcommands that carry no change (`LS`, `LIST`).
pub fn apply_cap_update(enabled: &mut BTreeSet<String>, msg: &RawMessage) -> Option<Event> {
    let sub = msg.arg(1)?.to_ascii_uppercase();
    let list = msg.last_arg().unwrap_or_default();
    let names = || {
        list.split_whitespace()
            .map(|t| t.split_once('=').map_or(t, |(name, _)| name))
    };

    let kind = match sub.as_str() {
        "NEW" => CapChangeKind::New,
        "DEL" => {
            for name in names() {
                enabled.remove(name);
            }
            CapChangeKind::Del
        }
        "ACK" => {
            for token in names() {
                match token.strip_prefix('-') {
                    Some(name) => {
                        enabled.remove(name);
                    }
                    None => {
                        enabled.insert(token.trim_start_matches(['~', '=']).to_owned());
                    }
                }
            }
            CapChangeKind::Ack
        }
        "NAK" => CapChangeKind::Nak,
        _ => return None,
    };

    Some(Event::CapChange {
        kind,
        caps: names().map(str::to_owned).collect(),
    })
}
