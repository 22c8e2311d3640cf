//! Channel name detection.
//!
//! # Reference
//! - RFC 2812 Section 1.3: Channel names

/// Channel prefixes assumed until the server announces `CHANTYPES`.
pub const DEFAULT_CHANTYPES: &str = "#&+!";

/// Extension trait for telling channel names apart from nicknames.
pub trait ChannelExt {
    /// Whether this looks like a channel under the default `CHANTYPES`.
    fn is_channel_name(&self) -> bool {
        self.is_channel_name_with(DEFAULT_CHANTYPES)
    }

    /// Whether this looks like a channel given the announced prefixes.
    ///
    /// The name must start with one of `chantypes` and contain no space,
    /// comma, BEL or other control character. Length is not checked; the
    /// server decides what it accepts.
    fn is_channel_name_with(&self, chantypes: &str) -> bool;
}

impl ChannelExt for str {
    fn is_channel_name_with(&self, chantypes: &str) -> bool {
        let mut chars = self.chars();
        match chars.next() {
            Some(first) if chantypes.contains(first) => {}
            _ => return false,
        }
        chars.all(|c| c != ' ' && c != ',' && !c.is_control())
    }
}

impl ChannelExt for String {
    fn is_channel_name_with(&self, chantypes: &str) -> bool {
        self.as_str().is_channel_name_with(chantypes)
    }
}
