//! NAMES (`353`/`366`) rows.

use slirc_wire::{ModeTable, RawMessage, UserHostmask};

use super::who::WhoRow;
use crate::state::Privileges;

/// Decode one `353 RPL_NAMREPLY` line into its channel and rows.
///
/// `:srv 353 <me> <symbol> <channel> :<names>`. The visibility symbol is
/// optional on some servers. Every leading prefix symbol is honoured
/// (multi-prefix), and `nick!user@host` entries (userhost-in-names) fill
/// the login and hostname.
pub fn parse_names_row(msg: &RawMessage, table: &ModeTable) -> Option<(String, Vec<WhoRow>)> {
    let count = msg.arg_count();
    if count < 3 {
        return None;
    }
    let channel = msg.arg(count - 2)?;
    let names = msg.arg(count - 1)?;

    let rows = names
        .split_whitespace()
        .filter_map(|entry| {
            let (modes, rest) = table.strip_prefixes(entry);
            if rest.is_empty() {
                return None;
            }
            let mask = UserHostmask::parse(rest);
            Some(WhoRow {
                channel: channel.to_owned(),
                nick: mask.nick,
                login: mask.login,
                hostname: mask.hostname,
                privileges: Privileges::from_modes(modes),
                ..WhoRow::default()
            })
        })
        .collect();

    Some((channel.to_owned(), rows))
}
