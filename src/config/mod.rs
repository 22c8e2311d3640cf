//! Configuration loading and management.
//!
//! - [`types`]: [`BotConfig`] and its tables
//! - [`validation`]: startup checks
//! - [`defaults`]: serde default functions

mod defaults;
mod types;
mod validation;

pub use types::{BotConfig, CapConfig, ConfigError, SaslConfig};
pub use validation::{ValidationError, validate};
