//! Session state: the identity registry and the types it hands out.
//!
//! - [`Registry`]: users, channels and memberships, case-insensitive
//! - [`UserSnapshot`]: departure copy taken before a user is removed

mod channel;
mod registry;
mod snapshot;
mod user;

pub use channel::{Channel, ListEntry, Privileges};
pub use registry::Registry;
pub use snapshot::{UserSnapshot, snapshot_user};
pub use user::{User, UserId};
