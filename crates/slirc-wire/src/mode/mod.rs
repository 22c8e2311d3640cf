//! Channel and user mode strings.

mod parse;
mod types;

pub use self::parse::{parse_mode_changes, parse_user_mode_changes};
pub use self::types::{ModeChange, ModeTable};
