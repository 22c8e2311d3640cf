//! IRCv3 capability negotiation.
//!
//! - [`handler`]: the [`CapHandler`] trait and the stock handlers
//! - [`negotiator`]: the handshake state machine, including SASL PLAIN
//! - [`update`]: `CAP NEW/DEL/ACK/NAK` once registered

pub mod handler;
pub mod negotiator;
mod update;

pub use handler::{CapHandler, EnableCap, OfferedCaps, SaslCredentials, SaslPlain};
pub use negotiator::{CapAction, CapNegotiator, CapState, SaslStep};
pub use update::apply_cap_update;
