//! WHOIS accumulation.
//!
//! Rows `311`, `319`, `317`, `312`, `330`, `307` (plus `301`, `313`, `671`)
//! fill one record for the queried nick; `318` flushes it.

use chrono::{DateTime, Utc};
use slirc_wire::{Casemapping, ModeTable, RawMessage};
use tracing::debug;

/// Everything learned from one WHOIS exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoisRecord {
    pub nick: String,
    pub login: String,
    pub hostname: String,
    pub real_name: String,
    pub server: String,
    pub server_info: String,
    pub idle_seconds: Option<u64>,
    pub signon_time: Option<DateTime<Utc>>,
    /// Channel names with their prefix symbols removed.
    pub channels: Vec<String>,
    /// Account name from `330`, or the nick itself from `307`.
    pub registered_as: Option<String>,
    pub away_message: Option<String>,
    pub is_ircop: bool,
    pub is_secure: bool,
    /// `false` when `318` arrived without a `311` (no such nick).
    pub exists: bool,
}

impl WhoisRecord {
    fn new(nick: &str) -> Self {
        Self {
            nick: nick.to_owned(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
pub struct WhoisAccumulator {
    current: Option<WhoisRecord>,
}

impl WhoisAccumulator {
    pub fn is_collecting(&self) -> bool {
        self.current.is_some()
    }

    /// Record for `nick`, replacing an in-flight record for another nick.
    fn record_for(&mut self, nick: &str, casemapping: Casemapping) -> &mut WhoisRecord {
        let stale = self
            .current
            .as_ref()
            .is_some_and(|r| !casemapping.equals(&r.nick, nick));
        if stale {
            debug!(nick, "discarding unfinished whois");
            self.current = None;
        }
        self.current.get_or_insert_with(|| WhoisRecord::new(nick))
    }

    /// Fold one WHOIS row numeric in. Returns `false` if the row is malformed.
    ///
    /// Nicks are compared under `casemapping`, the one the registry uses.
    pub fn apply(
        &mut self,
        code: u16,
        msg: &RawMessage,
        table: &ModeTable,
        casemapping: Casemapping,
    ) -> bool {
        let Some(nick) = msg.arg(1) else {
            return false;
        };

        match code {
            311 => {
                let (Some(login), Some(hostname)) = (msg.arg(2), msg.arg(3)) else {
                    return false;
                };
                let real_name = if msg.arg_count() > 5 {
                    msg.last_arg().unwrap_or_default()
                } else {
                    ""
                };
                let record = self.record_for(nick, casemapping);
                record.nick = nick.to_owned();
                record.login = login.to_owned();
                record.hostname = hostname.to_owned();
                record.real_name = real_name.to_owned();
                record.exists = true;
            }
            319 => {
                let list = msg.arg(2).unwrap_or_default();
                let channels = list
                    .split_whitespace()
                    .map(|entry| table.strip_prefixes(entry).1.to_owned())
                    .filter(|name| !name.is_empty());
                self.record_for(nick, casemapping).channels.extend(channels);
            }
            317 => {
                let record = self.record_for(nick, casemapping);
                record.idle_seconds = msg.arg(2).and_then(|s| s.parse().ok());
                record.signon_time = msg
                    .arg(3)
                    .and_then(|s| s.parse::<i64>().ok())
                    .and_then(|secs| DateTime::from_timestamp(secs, 0));
            }
            312 => {
                let record = self.record_for(nick, casemapping);
                record.server = msg.arg(2).unwrap_or_default().to_owned();
                record.server_info = msg.arg(3).unwrap_or_default().to_owned();
            }
            330 => {
                let Some(account) = msg.arg(2) else {
                    return false;
                };
                self.record_for(nick, casemapping).registered_as = Some(account.to_owned());
            }
            307 => {
                let record = self.record_for(nick, casemapping);
                if record.registered_as.is_none() {
                    record.registered_as = Some(nick.to_owned());
                }
            }
            301 => {
                self.record_for(nick, casemapping).away_message =
                    Some(msg.arg(2).unwrap_or_default().to_owned());
            }
            313 => self.record_for(nick, casemapping).is_ircop = true,
            671 => self.record_for(nick, casemapping).is_secure = true,
            _ => return false,
        }
        true
    }

    /// `318`: take the record for `nick`. A query that produced no `311`
    /// yields a record with `exists == false`.
    pub fn finish(&mut self, nick: &str, casemapping: Casemapping) -> WhoisRecord {
        match self.current.take() {
            Some(record) if casemapping.equals(&record.nick, nick) => record,
            _ => WhoisRecord::new(nick),
        }
    }
}
