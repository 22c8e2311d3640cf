//! slirc-bot - client-side IRC protocol input pipeline.
//!
//! Raw server lines go in, ordered [`Event`]s come out. Along the way the
//! [`Session`] keeps an identity registry of users, channels and
//! memberships, decodes MODE lines, folds multi-line replies (WHO, WHOIS,
//! NAMES, LIST, MOTD, ban lists) into single events, and runs the CAP/SASL
//! handshake. Tokenizing and other wire-only concerns live in
//! [`slirc_wire`].
//!
//! ```no_run
//! use slirc_bot::{BotConfig, Session};
//!
//! let mut session = Session::new(BotConfig::new("slircbot"));
//! for line in session.start() {
//!     println!("-> {line}");
//! }
//! for event in session.process_line(":irc.example CAP * LS :multi-prefix").unwrap() {
//!     println!("{event:?}");
//! }
//! ```

pub mod aggregate;
pub mod caps;
pub mod config;
pub mod emit;
pub mod error;
pub mod event;
pub mod handlers;
pub mod session;
pub mod state;
pub mod telemetry;

pub use config::{BotConfig, ConfigError};
pub use emit::{EventSink, FnSink};
pub use error::{CapNegotiationError, HandlerError};
pub use event::{CapChangeKind, ChannelModeContext, Event};
pub use session::{ConnectionPhase, Session};
pub use state::{Channel, Privileges, Registry, User, UserId, UserSnapshot};

pub use slirc_wire;
