//! ISUPPORT (`005`) tracking.
//!
//! Servers advertise their features over one or more `RPL_ISUPPORT` lines.
//! [`Isupport`] accumulates them and derives the pieces a client needs:
//! the mode argument table, channel prefixes and the case mapping.
//!
//! # Example
//!
//! ```
//! use slirc_wire::isupport::Isupport;
//!
//! let mut isupport = Isupport::default();
//! isupport.apply_reply(&["me", "NETWORK=TestNet", "PREFIX=(ov)@+", "are supported by this server"]);
//!
//! assert_eq!(isupport.network(), Some("TestNet"));
//! let table = isupport.mode_table().unwrap();
//! assert_eq!(table.symbol_for_mode('o'), Some('@'));
//! assert!(!table.is_prefix_mode('h'));
//! ```

use std::collections::BTreeMap;

use crate::casemap::Casemapping;
use crate::chan::DEFAULT_CHANTYPES;
use crate::error::IsupportError;
use crate::mode::ModeTable;

/// Accumulated ISUPPORT tokens, keyed by uppercase name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isupport {
    entries: BTreeMap<String, Option<String>>,
}

impl Isupport {
    /// Fold the arguments of one `005` line into the table.
    ///
    /// The first argument (our nickname) and a final human-readable text
    /// containing a space are skipped. `-KEY` removes a previously
    /// advertised token.
    pub fn apply_reply<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut tokens: Vec<&str> = args.iter().map(AsRef::as_ref).skip(1).collect();
        if tokens.last().is_some_and(|last| last.contains(' ')) {
            tokens.pop();
        }

        for token in tokens {
            if let Some(removed) = token.strip_prefix('-') {
                self.entries.remove(&removed.to_ascii_uppercase());
                continue;
            }
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value.to_owned())),
                None => (token, None),
            };
            if !key.is_empty() {
                self.entries.insert(key.to_ascii_uppercase(), value);
            }
        }
    }

    /// `Some(Some(value))` for `KEY=value`, `Some(None)` for a bare `KEY`.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .get(&key.to_ascii_uppercase())
            .map(Option::as_deref)
    }

    /// Whether `key` was advertised.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The `NETWORK` name.
    pub fn network(&self) -> Option<&str> {
        self.get("NETWORK").flatten()
    }

    /// The `CHANTYPES` prefixes, or the RFC default.
    pub fn chantypes(&self) -> &str {
        self.get("CHANTYPES").flatten().unwrap_or(DEFAULT_CHANTYPES)
    }

    /// The `CASEMAPPING`, if advertised and understood.
    pub fn casemapping(&self) -> Option<Casemapping> {
        self.get("CASEMAPPING").flatten()?.parse().ok()
    }

    /// Build the mode argument table from `PREFIX` and `CHANMODES`,
    /// falling back to the conventional table for whatever is missing.
    pub fn mode_table(&self) -> Result<ModeTable, IsupportError> {
        let mut table = ModeTable::default();

        if let Some(prefix) = self.get("PREFIX").flatten() {
            table.prefixes = parse_prefix(prefix)?;
        }

        if let Some(chanmodes) = self.get("CHANMODES").flatten() {
            let mut groups = chanmodes.split(',');
            table.list = groups.next().unwrap_or("").to_owned();
            table.always = groups.next().unwrap_or("").to_owned();
            table.on_set = groups.next().unwrap_or("").to_owned();
            table.never = groups.next().unwrap_or("").to_owned();
        }

        Ok(table)
    }
}

/// Parse a `PREFIX` value such as `(qaohv)~&@%+` into `(mode, symbol)` pairs.
///
/// An empty value means the server has no membership prefixes.
pub fn parse_prefix(value: &str) -> Result<Vec<(char, char)>, IsupportError> {
    if value.is_empty() {
        return Ok(Vec::new());
    }

    let inner = value
        .strip_prefix('(')
        .ok_or_else(|| IsupportError::MalformedPrefix(value.to_owned()))?;
    let (modes, symbols) = inner
        .split_once(')')
        .ok_or_else(|| IsupportError::MalformedPrefix(value.to_owned()))?;

    if modes.chars().count() != symbols.chars().count() {
        return Err(IsupportError::PrefixLengthMismatch(value.to_owned()));
    }

    Ok(modes.chars().zip(symbols.chars()).collect())
}
