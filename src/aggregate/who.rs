//! WHO (`352`/`315`) rows.

use slirc_wire::{ModeTable, RawMessage};

use crate::state::Privileges;

/// One decoded user row from WHO or NAMES.
///
/// NAMES rows only carry the nick, privileges and (with userhost-in-names)
/// the login and hostname; the remaining fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoRow {
    /// Channel column of the reply; `*` when the server had none to show.
    pub channel: String,
    pub nick: String,
    pub login: String,
    pub hostname: String,
    pub server: String,
    /// `G` (gone) flag.
    pub away: bool,
    /// `*` flag.
    pub ircop: bool,
    pub privileges: Privileges,
    pub hops: u32,
    pub real_name: String,
}

impl WhoRow {
    /// `:srv 352 <me> <channel> <login> <host> <server> <nick> <flags> :<hops> <real name>`
    pub fn from_reply(msg: &RawMessage, table: &ModeTable) -> Option<Self> {
        let channel = msg.arg(1)?;
        let login = msg.arg(2)?;
        let hostname = msg.arg(3)?;
        let server = msg.arg(4)?;
        let nick = msg.arg(5)?;
        let flags = msg.arg(6)?;
        let last = msg.arg(7).unwrap_or_default();

        let (hops, real_name) = match last.split_once(' ') {
            Some((hops, name)) => (hops, name),
            None => (last, ""),
        };

        let (away, ircop, privileges) = decode_who_flags(flags, table);

        Some(Self {
            channel: channel.to_owned(),
            nick: nick.to_owned(),
            login: login.to_owned(),
            hostname: hostname.to_owned(),
            server: server.to_owned(),
            away,
            ircop,
            privileges,
            hops: hops.parse().unwrap_or(0),
            real_name: real_name.to_owned(),
        })
    }
}

/// Decode a WHO flags column such as `H*@+` into `(away, ircop, privileges)`.
///
/// Letters other than `H`/`G`/`*` and the table's prefix symbols (bot or
/// registered markers on some networks) are ignored.
pub fn decode_who_flags(flags: &str, table: &ModeTable) -> (bool, bool, Privileges) {
    let mut away = false;
    let mut ircop = false;
    let mut privileges = Privileges::default();
    for c in flags.chars() {
        match c {
            'G' => away = true,
            'H' => away = false,
            '*' => ircop = true,
            symbol => {
                if let Some(mode) = table.mode_for_symbol(symbol) {
                    privileges.set(mode, true);
                }
            }
        }
    }
    (away, ircop, privileges)
}
