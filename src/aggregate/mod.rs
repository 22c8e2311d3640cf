//! Multi-line reply aggregation.
//!
//! Each reply family (LIST, WHO, WHOIS, MOTD, NAMES, ban list) is either
//! idle or collecting. Row numerics append to the in-flight buffer and the
//! terminal numeric takes it, leaving the accumulator idle again. IRC does
//! not interleave these replies on one connection, so one buffer per family
//! is enough.

mod bans;
mod list;
mod motd;
mod names;
mod who;
mod whois;

pub use bans::parse_ban_row;
pub use list::ChannelListEntry;
pub use motd::MotdAccumulator;
pub use names::parse_names_row;
pub use who::{WhoRow, decode_who_flags};
pub use whois::{WhoisAccumulator, WhoisRecord};

use crate::state::ListEntry;

/// An idle/collecting buffer of rows.
#[derive(Debug)]
pub struct Accumulator<T> {
    rows: Option<Vec<T>>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Self { rows: None }
    }
}

impl<T> Accumulator<T> {
    pub fn is_collecting(&self) -> bool {
        self.rows.is_some()
    }

    /// Enter the collecting state. Ignored (returns `false`) if already collecting.
    pub fn start(&mut self) -> bool {
        if self.rows.is_some() {
            return false;
        }
        self.rows = Some(Vec::new());
        true
    }

    /// Append a row, starting collection if idle (servers may omit the header).
    pub fn push(&mut self, row: T) {
        self.rows.get_or_insert_with(Vec::new).push(row);
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = T>) {
        self.rows.get_or_insert_with(Vec::new).extend(rows);
    }

    /// Take every buffered row and return to idle.
    pub fn finish(&mut self) -> Vec<T> {
        self.rows.take().unwrap_or_default()
    }
}

/// Every in-flight reply buffer for one connection.
#[derive(Debug, Default)]
pub struct Aggregators {
    pub list: Accumulator<ChannelListEntry>,
    pub who: Accumulator<WhoRow>,
    pub whois: WhoisAccumulator,
    pub motd: MotdAccumulator,
    pub names: Accumulator<WhoRow>,
    pub bans: Accumulator<(String, ListEntry)>,
}
