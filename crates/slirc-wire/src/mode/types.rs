//! Mode letter classification.
//!
//! Which mode letters take a positional argument depends on the server.
//! [`ModeTable`] starts with the conventional set and is replaced once the
//! server announces `PREFIX` and `CHANMODES` (see [`crate::isupport`]).
//!
//! # Reference
//! - RFC 2812 Section 3.2.3 (Channel Modes)
//! - Modern IRC documentation: <https://modern.ircdocs.horse/#chanmodes-parameter>

/// One decoded `(sign, flag, argument)` tuple.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeChange {
    /// `true` for `+`, `false` for `-`.
    pub adding: bool,
    /// The mode letter.
    pub flag: char,
    /// The positional argument consumed by this flag, if any.
    pub arg: Option<String>,
}

impl ModeChange {
    /// Build a change.
    pub fn new(adding: bool, flag: char, arg: Option<String>) -> Self {
        Self { adding, flag, arg }
    }

    /// `+` or `-`.
    pub fn sign(&self) -> char {
        if self.adding {
            '+'
        } else {
            '-'
        }
    }
}

/// Channel mode letters grouped by how they take arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModeTable {
    /// Membership prefix modes as `(mode, symbol)`, highest rank first.
    pub prefixes: Vec<(char, char)>,
    /// Type A: list modes, argument whenever one is given.
    pub list: String,
    /// Type B: argument on set and unset.
    pub always: String,
    /// Type C: argument on set only.
    pub on_set: String,
    /// Type D: never an argument.
    pub never: String,
}

impl Default for ModeTable {
    /// `q a o h v` prefixes, `b e I` lists, `k` always, `l` on set.
    fn default() -> Self {
        Self {
            prefixes: vec![('q', '~'), ('a', '&'), ('o', '@'), ('h', '%'), ('v', '+')],
            list: "beI".to_string(),
            always: "k".to_string(),
            on_set: "l".to_string(),
            never: "imnpstrRcCMNOQSTz".to_string(),
        }
    }
}

impl ModeTable {
    /// Whether `flag` consumes a positional argument in this direction.
    ///
    /// Unknown letters never do.
    pub fn takes_arg(&self, flag: char, adding: bool) -> bool {
        if self.is_prefix_mode(flag) || self.list.contains(flag) || self.always.contains(flag) {
            true
        } else if self.on_set.contains(flag) {
            adding
        } else {
            false
        }
    }

    /// Whether `flag` grants a membership privilege.
    pub fn is_prefix_mode(&self, flag: char) -> bool {
        self.prefixes.iter().any(|&(mode, _)| mode == flag)
    }

    /// The mode letter for a NAMES/WHO prefix symbol such as `@`.
    pub fn mode_for_symbol(&self, symbol: char) -> Option<char> {
        self.prefixes
            .iter()
            .find(|&&(_, sym)| sym == symbol)
            .map(|&(mode, _)| mode)
    }

    /// The prefix symbol for a mode letter such as `o`.
    pub fn symbol_for_mode(&self, mode: char) -> Option<char> {
        self.prefixes
            .iter()
            .find(|&&(m, _)| m == mode)
            .map(|&(_, sym)| sym)
    }

    /// Split leading prefix symbols from a nickname (`@+nick` → `(['o','v'], "nick")`).
    pub fn strip_prefixes<'a>(&self, name: &'a str) -> (Vec<char>, &'a str) {
        let mut modes = Vec::new();
        let mut rest = name;
        while let Some(c) = rest.chars().next() {
            match self.mode_for_symbol(c) {
                Some(mode) => {
                    modes.push(mode);
                    rest = &rest[c.len_utf8()..];
                }
                None => break,
            }
        }
        (modes, rest)
    }
}
