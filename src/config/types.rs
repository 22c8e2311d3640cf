//! Core configuration types.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use slirc_wire::Casemapping;
use thiserror::Error;

use super::defaults::{default_realname, default_true};
use crate::caps::{CapHandler, EnableCap, SaslPlain};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot identity and handshake configuration.
///
/// ```toml
/// nick = "slircbot"
/// realname = "Example bot"
/// casemapping = "rfc1459"
///
/// [[caps]]
/// name = "multi-prefix"
///
/// [[caps]]
/// name = "away-notify"
/// mandatory = false
///
/// [sasl]
/// account = "slircbot"
/// password = "hunter2"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Nick requested at registration.
    pub nick: String,
    /// Username for `USER`. Defaults to the nick.
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default = "default_realname")]
    pub realname: String,
    /// Sent as `PASS` before anything else when set.
    #[serde(default)]
    pub server_password: Option<String>,
    /// Mapping used until the server advertises `CASEMAPPING`.
    #[serde(default)]
    pub casemapping: Casemapping,
    #[serde(default)]
    pub caps: Vec<CapConfig>,
    #[serde(default)]
    pub sasl: Option<SaslConfig>,
}

/// One `[[caps]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CapConfig {
    pub name: String,
    /// Abort the handshake if the server does not grant it.
    #[serde(default)]
    pub mandatory: bool,
}

/// `[sasl]` PLAIN credentials.
#[derive(Clone, Deserialize)]
pub struct SaslConfig {
    pub account: String,
    pub password: String,
    #[serde(default = "default_true")]
    pub mandatory: bool,
}

impl std::fmt::Debug for SaslConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaslConfig")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .field("mandatory", &self.mandatory)
            .finish()
    }
}

impl BotConfig {
    /// Minimal configuration: a nick, no capabilities.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            login: None,
            realname: default_realname(),
            server_password: None,
            casemapping: Casemapping::default(),
            caps: Vec::new(),
            sasl: None,
        }
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(content.parse::<Self>()?)
    }

    pub fn login(&self) -> &str {
        self.login.as_deref().unwrap_or(&self.nick)
    }

    /// Capability handlers for the handshake, in declaration order, with
    /// SASL last.
    pub fn cap_handlers(&self) -> Vec<Box<dyn CapHandler>> {
        let mut handlers: Vec<Box<dyn CapHandler>> = self
            .caps
            .iter()
            .map(|cap| -> Box<dyn CapHandler> {
                if cap.mandatory {
                    Box::new(EnableCap::required(cap.name.clone()))
                } else {
                    Box::new(EnableCap::new(cap.name.clone()))
                }
            })
            .collect();

        if let Some(sasl) = &self.sasl {
            handlers.push(Box::new(SaslPlain::new(
                sasl.account.clone(),
                sasl.password.clone(),
                sasl.mandatory,
            )));
        }
        handlers
    }
}

impl FromStr for BotConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_minimal_config() {
        let config: BotConfig = "nick = \"bot\"".parse().unwrap();
        assert_eq!(config.nick, "bot");
        assert_eq!(config.login(), "bot");
        assert_eq!(config.casemapping, Casemapping::Rfc1459);
        assert!(config.cap_handlers().is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: BotConfig = r#"
            nick = "bot"
            login = "botuser"
            realname = "A Bot"
            casemapping = "strict-rfc1459"

            [[caps]]
            name = "multi-prefix"
            mandatory = true

            [[caps]]
            name = "away-notify"

            [sasl]
            account = "acct"
            password = "secret"
            mandatory = false
        "#
        .parse()
        .unwrap();

        assert_eq!(config.login(), "botuser");
        assert_eq!(config.casemapping, Casemapping::StrictRfc1459);

        let handlers = config.cap_handlers();
        let caps: Vec<_> = handlers.iter().map(|h| h.capability()).collect();
        assert_eq!(caps, vec!["multi-prefix", "away-notify", "sasl"]);
        assert!(handlers[0].mandatory());
        assert!(!handlers[1].mandatory());
        assert!(!handlers[2].mandatory());
        assert!(!format!("{:?}", config.sasl).contains("secret"));
    }

    #[test]
    fn test_sasl_mandatory_by_default() {
        let config: BotConfig = "nick = \"bot\"\n[sasl]\naccount = \"a\"\npassword = \"p\""
            .parse()
            .unwrap();
        assert!(config.sasl.is_some_and(|s| s.mandatory));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nick = \"filebot\"").unwrap();
        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.nick, "filebot");
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            BotConfig::load("/nonexistent/slirc-bot.toml"),
            Err(ConfigError::Io(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "nick = ").unwrap();
        assert!(matches!(BotConfig::load(file.path()), Err(ConfigError::Parse(_))));
    }
}
