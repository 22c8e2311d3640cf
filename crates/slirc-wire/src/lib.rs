//! # slirc-wire
//!
//! Wire-level building blocks for an IRC client: a line tokenizer that
//! keeps the trailing parameter apart from the middle ones, hostmask and
//! prefix parsing, RFC 1459 case mapping, positional mode-string decoding,
//! CTCP parsing, ISUPPORT tracking and SASL PLAIN encoding.
//!
//! Nothing in this crate keeps session state; see `slirc-bot` for that.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_wire::{RawMessage, Prefix};
//!
//! let msg: RawMessage = ":AUser!u@h JOIN :#c".parse().expect("valid line");
//! assert_eq!(msg.command, "JOIN");
//! assert_eq!(msg.trailing.as_deref(), Some("#c"));
//! assert_eq!(msg.source().and_then(|p| p.nick().map(str::to_owned)).as_deref(), Some("AUser"));
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod casemap;
pub mod chan;
pub mod ctcp;
pub mod error;
pub mod isupport;
pub mod message;
pub mod mode;
pub mod prefix;
pub mod response;
pub mod sasl;

pub use self::casemap::{irc_eq, irc_lower_char, irc_to_lower, Casemapping};
pub use self::chan::ChannelExt;
pub use self::ctcp::{Ctcp, CtcpKind};
pub use self::error::{IsupportError, MessageParseError, ProtocolError};
pub use self::isupport::Isupport;
pub use self::message::RawMessage;
pub use self::mode::{parse_mode_changes, parse_user_mode_changes, ModeChange, ModeTable};
pub use self::prefix::{Prefix, UserHostmask};
pub use self::response::Response;
