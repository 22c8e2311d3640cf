//! Ban list (`367`/`368`) rows.

use chrono::DateTime;
use slirc_wire::RawMessage;

use crate::state::ListEntry;

/// `:srv 367 <me> <channel> <mask> [<setter> <unix time>]`
pub fn parse_ban_row(msg: &RawMessage) -> Option<(String, ListEntry)> {
    let channel = msg.arg(1)?;
    let mask = msg.arg(2)?;
    let entry = ListEntry {
        mask: mask.to_owned(),
        set_by: msg.arg(3).map(str::to_owned),
        set_at: msg
            .arg(4)
            .and_then(|t| t.parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
    };
    Some((channel.to_owned(), entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ban_row_full() {
        let msg = RawMessage::parse(":srv 367 Bot #chan *!*@spam op!u@h 1700000000").unwrap();
        let (channel, entry) = parse_ban_row(&msg).unwrap();
        assert_eq!(channel, "#chan");
        assert_eq!(entry.mask, "*!*@spam");
        assert_eq!(entry.set_by.as_deref(), Some("op!u@h"));
        assert_eq!(entry.set_at.map(|t| t.timestamp()), Some(1_700_000_000));
    }

    #[test]
    fn test_ban_row_bare() {
        let msg = RawMessage::parse(":srv 367 Bot #chan *!*@spam").unwrap();
        let (_, entry) = parse_ban_row(&msg).unwrap();
        assert!(entry.set_by.is_none());
        assert!(entry.set_at.is_none());
    }
}
