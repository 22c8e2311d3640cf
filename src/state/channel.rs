//! Channel-related types.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use slirc_wire::UserHostmask;

use super::user::UserId;

/// Per-membership privilege flags. Any combination may be set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Privileges {
    pub owner: bool,    // +q (~)
    pub super_op: bool, // +a (&)
    pub op: bool,       // +o (@)
    pub half_op: bool,  // +h (%)
    pub voice: bool,    // +v (+)
}

impl Privileges {
    /// Build from mode letters such as `['o', 'v']`. Unknown letters are skipped.
    pub fn from_modes(modes: impl IntoIterator<Item = char>) -> Self {
        let mut privileges = Self::default();
        for mode in modes {
            privileges.set(mode, true);
        }
        privileges
    }

    /// Set or clear the flag for `mode`. Returns `false` for letters that
    /// do not map to a tracked privilege.
    pub fn set(&mut self, mode: char, value: bool) -> bool {
        match mode {
            'q' => self.owner = value,
            'a' => self.super_op = value,
            'o' => self.op = value,
            'h' => self.half_op = value,
            'v' => self.voice = value,
            _ => return false,
        }
        true
    }

    pub fn has(&self, mode: char) -> bool {
        match mode {
            'q' => self.owner,
            'a' => self.super_op,
            'o' => self.op,
            'h' => self.half_op,
            'v' => self.voice,
            _ => false,
        }
    }

    /// Highest prefix character. Priority: ~ > & > @ > % > +
    pub fn prefix_char(&self) -> Option<char> {
        if self.owner {
            Some('~')
        } else if self.super_op {
            Some('&')
        } else if self.op {
            Some('@')
        } else if self.half_op {
            Some('%')
        } else if self.voice {
            Some('+')
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// An entry in a channel list (bans).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub mask: String,
    pub set_by: Option<String>,
    pub set_at: Option<DateTime<Utc>>,
}

impl ListEntry {
    pub fn new(mask: impl Into<String>) -> Self {
        Self {
            mask: mask.into(),
            set_by: None,
            set_at: None,
        }
    }
}

/// A channel the connection knows about.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub topic: String,
    pub topic_setter: Option<UserHostmask>,
    pub topic_timestamp: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    /// Simple and parameter modes currently set, keyed by flag letter.
    /// List and membership modes live elsewhere.
    modes: BTreeMap<char, Option<String>>,
    bans: Vec<ListEntry>,
    members: HashMap<UserId, Privileges>,
}

impl Channel {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topic: String::new(),
            topic_setter: None,
            topic_timestamp: None,
            created: None,
            modes: BTreeMap::new(),
            bans: Vec::new(),
            members: HashMap::new(),
        }
    }

    /// The stored mode string, e.g. `+klnt pw 10`. Empty when no modes are set.
    pub fn mode(&self) -> String {
        if self.modes.is_empty() {
            return String::new();
        }
        let mut flags = String::from("+");
        let mut args = Vec::new();
        for (flag, arg) in &self.modes {
            flags.push(*flag);
            if let Some(arg) = arg {
                args.push(arg.as_str());
            }
        }
        if args.is_empty() {
            flags
        } else {
            format!("{} {}", flags, args.join(" "))
        }
    }

    pub fn has_mode(&self, flag: char) -> bool {
        self.modes.contains_key(&flag)
    }

    pub fn is_invite_only(&self) -> bool {
        self.has_mode('i')
    }

    pub fn is_moderated(&self) -> bool {
        self.has_mode('m')
    }

    pub fn is_secret(&self) -> bool {
        self.has_mode('s')
    }

    pub fn is_private(&self) -> bool {
        self.has_mode('p')
    }

    pub fn has_topic_protection(&self) -> bool {
        self.has_mode('t')
    }

    pub fn has_no_external_messages(&self) -> bool {
        self.has_mode('n')
    }

    pub fn limit(&self) -> Option<u32> {
        self.modes.get(&'l')?.as_deref()?.parse().ok()
    }

    pub fn key(&self) -> Option<&str> {
        self.modes.get(&'k')?.as_deref()
    }

    pub(crate) fn set_mode(&mut self, flag: char, arg: Option<String>) {
        self.modes.insert(flag, arg);
    }

    pub(crate) fn unset_mode(&mut self, flag: char) {
        self.modes.remove(&flag);
    }

    /// Forget every stored simple mode (a fresh 324 replaces them).
    pub(crate) fn clear_modes(&mut self) {
        self.modes.clear();
    }

    pub fn bans(&self) -> &[ListEntry] {
        &self.bans
    }

    pub(crate) fn add_ban(&mut self, entry: ListEntry) {
        match self.bans.iter_mut().find(|b| b.mask == entry.mask) {
            Some(existing) => *existing = entry,
            None => self.bans.push(entry),
        }
    }

    pub(crate) fn remove_ban(&mut self, mask: &str) {
        self.bans.retain(|b| b.mask != mask);
    }

    pub(crate) fn replace_bans(&mut self, entries: Vec<ListEntry>) {
        self.bans = entries;
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn members(&self) -> impl Iterator<Item = (UserId, &Privileges)> + '_ {
        self.members.iter().map(|(id, p)| (*id, p))
    }

    pub fn privileges(&self, id: UserId) -> Option<&Privileges> {
        self.members.get(&id)
    }

    pub fn is_op(&self, id: UserId) -> bool {
        self.privileges(id).is_some_and(|p| p.op)
    }

    pub fn has_voice(&self, id: UserId) -> bool {
        self.privileges(id).is_some_and(|p| p.voice)
    }

    /// Add a membership with no privileges. Returns `false` if it existed.
    pub(crate) fn add_member(&mut self, id: UserId) -> bool {
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(id, Privileges::default());
        true
    }

    pub(crate) fn remove_member(&mut self, id: UserId) -> Option<Privileges> {
        self.members.remove(&id)
    }

    /// Privileges for `id`, adding the membership if it was missing.
    pub(crate) fn privileges_mut(&mut self, id: UserId) -> &mut Privileges {
        self.members.entry(id).or_default()
    }
}
