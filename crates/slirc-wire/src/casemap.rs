//! IRC case-mapping functions.
//!
//! IRC compares nicknames and channel names case-insensitively, with some
//! punctuation treated as the lowercase form of other punctuation. Servers
//! announce which mapping they use through the `CASEMAPPING` ISUPPORT token.

use std::fmt;
use std::str::FromStr;

/// A case mapping announced by `CASEMAPPING`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Casemapping {
    /// ASCII letters plus `[]\~` → `{}|^`.
    #[default]
    Rfc1459,
    /// ASCII letters plus `[]\` → `{}|` (no `~`).
    StrictRfc1459,
    /// ASCII letters only.
    Ascii,
}

impl Casemapping {
    /// Lowercase one character under this mapping.
    #[inline]
    pub const fn lower_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (Self::Rfc1459 | Self::StrictRfc1459, '[') => '{',
            (Self::Rfc1459 | Self::StrictRfc1459, ']') => '}',
            (Self::Rfc1459 | Self::StrictRfc1459, '\\') => '|',
            (Self::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Lowercase a string under this mapping.
    pub fn to_lower(self, s: &str) -> String {
        s.chars().map(|c| self.lower_char(c)).collect()
    }

    /// Compare two strings under this mapping.
    pub fn equals(self, a: &str, b: &str) -> bool {
        a.len() == b.len()
            && a.chars()
                .zip(b.chars())
                .all(|(ca, cb)| self.lower_char(ca) == self.lower_char(cb))
    }

    /// The ISUPPORT token value for this mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rfc1459 => "rfc1459",
            Self::StrictRfc1459 => "strict-rfc1459",
            Self::Ascii => "ascii",
        }
    }
}

impl FromStr for Casemapping {
    type Err = ();

    /// Unknown mappings (e.g. `rfc7613`) are rejected so callers can keep
    /// their current mapping.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rfc1459" => Ok(Self::Rfc1459),
            "strict-rfc1459" => Ok(Self::StrictRfc1459),
            "ascii" => Ok(Self::Ascii),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Casemapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a single character to IRC lowercase using RFC 1459 case mapping.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    Casemapping::Rfc1459.lower_char(c)
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    Casemapping::Rfc1459.to_lower(s)
}

/// Compare two strings using RFC 1459 case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    Casemapping::Rfc1459.equals(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irc_lower_char() {
        assert_eq!(irc_lower_char('A'), 'a');
        assert_eq!(irc_lower_char('['), '{');
        assert_eq!(irc_lower_char(']'), '}');
        assert_eq!(irc_lower_char('\\'), '|');
        assert_eq!(irc_lower_char('~'), '^');
        assert_eq!(irc_lower_char('#'), '#');
    }

    #[test]
    fn test_irc_to_lower() {
        assert_eq!(irc_to_lower("AUser"), "auser");
        assert_eq!(irc_to_lower("#Channel[1]"), "#channel{1}");
        assert_eq!(irc_to_lower("Test~Name"), "test^name");
    }

    #[test]
    fn test_irc_eq() {
        assert!(irc_eq("AUSER", "aUser"));
        assert!(irc_eq("#channel[1]", "#CHANNEL{1}"));
        assert!(!irc_eq("short", "longer"));
    }

    #[test]
    fn test_mapping_variants() {
        assert_eq!(Casemapping::Ascii.to_lower("Nick[]"), "nick[]");
        assert_eq!(Casemapping::StrictRfc1459.to_lower("A~[]"), "a~{}");
        assert_eq!(Casemapping::Rfc1459.to_lower("A~[]"), "a^{}");
    }

    #[test]
    fn test_mapping_from_str() {
        assert_eq!("RFC1459".parse(), Ok(Casemapping::Rfc1459));
        assert_eq!("ascii".parse(), Ok(Casemapping::Ascii));
        assert_eq!("strict-rfc1459".parse(), Ok(Casemapping::StrictRfc1459));
        assert!("rfc7613".parse::<Casemapping>().is_err());
    }
}
