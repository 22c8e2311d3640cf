use std::str::FromStr;

use crate::error::{ProtocolError, Result};
use crate::prefix::Prefix;

use super::nom_parser::ParsedLine;
use super::tags::{split_tags, unescape_tag_value};

/// One tokenized IRC line.
///
/// The last parameter of a line may be introduced by `:` and contain spaces;
/// it is kept apart from the middle parameters in [`trailing`](Self::trailing)
/// so that an empty trailing (`AWAY :`) can be told apart from none at all
/// (`AWAY`).
///
/// # Example
///
/// ```
/// use slirc_wire::RawMessage;
///
/// let msg: RawMessage = ":nick!user@host PRIVMSG #channel :Hello there".parse().unwrap();
/// assert_eq!(msg.prefix.as_deref(), Some("nick!user@host"));
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.params, vec!["#channel"]);
/// assert_eq!(msg.trailing.as_deref(), Some("Hello there"));
/// assert_eq!(msg.to_string(), ":nick!user@host PRIVMSG #channel :Hello there");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessage {
    /// Raw IRCv3 tags section, without the leading `@`.
    pub tags: Option<String>,
    /// Message source, without the leading `:`.
    pub prefix: Option<String>,
    /// Command word or three-digit numeric.
    pub command: String,
    /// Middle parameters, in order.
    pub params: Vec<String>,
    /// Trailing parameter with its introducing `:` stripped.
    pub trailing: Option<String>,
}

impl RawMessage {
    /// Tokenize a single line (without or with a trailing CRLF).
    pub fn parse(line: &str) -> Result<Self> {
        let parsed = ParsedLine::parse(line).map_err(|cause| ProtocolError::InvalidMessage {
            string: line.to_owned(),
            cause,
        })?;

        Ok(Self {
            tags: parsed.tags.map(str::to_owned),
            prefix: parsed.prefix.map(str::to_owned),
            command: parsed.command.to_owned(),
            params: parsed.params.iter().map(|p| (*p).to_owned()).collect(),
            trailing: parsed.trailing.map(str::to_owned),
        })
    }

    /// Start building an outgoing line for `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    /// Set the source prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Append a middle parameter.
    #[must_use]
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Set the trailing parameter.
    #[must_use]
    pub fn with_trailing(mut self, trailing: impl Into<String>) -> Self {
        self.trailing = Some(trailing.into());
        self
    }

    /// The numeric code, if the command is exactly three digits.
    pub fn numeric(&self) -> Option<u16> {
        if self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit()) {
            self.command.parse().ok()
        } else {
            None
        }
    }

    /// Whether the command is a numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.numeric().is_some()
    }

    /// Whether the command word matches `name`, ignoring ASCII case.
    pub fn is_command(&self, name: &str) -> bool {
        self.command.eq_ignore_ascii_case(name)
    }

    /// All arguments in order: the middle parameters followed by the
    /// trailing one, if present.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .map(String::as_str)
            .chain(self.trailing.as_deref())
    }

    /// The argument at `index` counting the trailing parameter last.
    pub fn arg(&self, index: usize) -> Option<&str> {
        match self.params.get(index) {
            Some(param) => Some(param),
            None if index == self.params.len() => self.trailing.as_deref(),
            None => None,
        }
    }

    /// Number of arguments including the trailing parameter.
    pub fn arg_count(&self) -> usize {
        self.params.len() + usize::from(self.trailing.is_some())
    }

    /// The final argument, trailing or not.
    pub fn last_arg(&self) -> Option<&str> {
        self.trailing
            .as_deref()
            .or_else(|| self.params.last().map(String::as_str))
    }

    /// Arguments from `start` to the end, trailing included.
    pub fn args_from(&self, start: usize) -> Vec<&str> {
        self.args().skip(start).collect()
    }

    /// The parsed message source.
    pub fn source(&self) -> Option<Prefix> {
        self.prefix.as_deref().map(Prefix::parse)
    }

    /// The nickname of the source, when the source is a user.
    pub fn source_nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        let nick = prefix.split(['!', '@']).next()?;
        if nick.is_empty() || (!prefix.contains(['!', '@']) && nick.contains('.')) {
            None
        } else {
            Some(nick)
        }
    }

    /// Unescaped value of the tag `key`, if present with a value.
    pub fn tag_value(&self, key: &str) -> Option<String> {
        split_tags(self.tags.as_deref()?)
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v)
            .map(unescape_tag_value)
    }

    /// Whether the tag `key` is present, with or without a value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tags
            .as_deref()
            .is_some_and(|raw| split_tags(raw).any(|(k, _)| k == key))
    }
}

impl FromStr for RawMessage {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
