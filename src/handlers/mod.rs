//! Line handlers.
//!
//! Each handler reacts to one command word or numeric: it reads the line,
//! updates the registry and aggregators through a [`Context`], and pushes
//! events. The [`Router`] owns the dispatch table.
//!
//! Handlers check required arguments before mutating anything, so a line
//! that degrades to [`Event::Unknown`](crate::Event::Unknown) leaves the
//! registry as it was.

mod channel;
mod connection;
mod context;
mod membership;
mod messaging;
mod mode;
mod router;
mod server_query;
mod user_status;

pub use context::{Context, Handler, ServerState, require};
pub use mode::decode_channel_modes;
pub use router::Router;
