//! LIST (`321`/`322`/`323`) rows.

use slirc_wire::RawMessage;

/// One `322 RPL_LIST` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelListEntry {
    pub name: String,
    pub users: u32,
    pub topic: String,
}

impl ChannelListEntry {
    /// `:srv 322 <me> <channel> <users> :<topic>`
    pub fn from_reply(msg: &RawMessage) -> Option<Self> {
        let name = msg.arg(1)?;
        let users = msg.arg(2)?.parse().ok()?;
        let topic = msg.arg(3).unwrap_or_default();
        Some(Self {
            name: name.to_owned(),
            users,
            topic: topic.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_row() {
        let msg = RawMessage::parse(":irc.server 322 Bot #chan 5 :Some Topic").unwrap();
        let row = ChannelListEntry::from_reply(&msg).unwrap();
        assert_eq!(row.name, "#chan");
        assert_eq!(row.users, 5);
        assert_eq!(row.topic, "Some Topic");
    }

    #[test]
    fn test_list_row_without_topic() {
        let msg = RawMessage::parse(":irc.server 322 Bot #chan 0").unwrap();
        assert_eq!(ChannelListEntry::from_reply(&msg).unwrap().topic, "");
    }

    #[test]
    fn test_list_row_bad_count() {
        let msg = RawMessage::parse(":irc.server 322 Bot #chan many :x").unwrap();
        assert!(ChannelListEntry::from_reply(&msg).is_none());
    }
}
