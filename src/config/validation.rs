//! Configuration validation.
//!
//! Catches mistakes the handshake would otherwise only reveal once a server
//! rejects us.

use thiserror::Error;

use super::BotConfig;

/// Validation errors for configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("nick is required")]
    MissingNick,
    #[error("nick contains characters not allowed by IRC: '{0}'")]
    InvalidNick(String),
    #[error("login must not contain spaces or '@': '{0}'")]
    InvalidLogin(String),
    #[error("caps[{0}].name is empty")]
    EmptyCapName(usize),
    #[error("'sasl' is configured through the [sasl] table, not [[caps]]")]
    SaslInCaps,
    #[error("sasl.account is required")]
    MissingSaslAccount,
}

fn nick_is_valid(nick: &str) -> bool {
    let mut chars = nick.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let special = |c: char| "[]\\`_^{|}".contains(c);
    (first.is_ascii_alphabetic() || special(first))
        && chars.all(|c| c.is_ascii_alphanumeric() || special(c) || c == '-')
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &BotConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    } else if !nick_is_valid(&config.nick) {
        errors.push(ValidationError::InvalidNick(config.nick.clone()));
    }

    if let Some(login) = &config.login
        && (login.is_empty() || login.contains([' ', '@']))
    {
        errors.push(ValidationError::InvalidLogin(login.clone()));
    }

    for (i, cap) in config.caps.iter().enumerate() {
        if cap.name.trim().is_empty() {
            errors.push(ValidationError::EmptyCapName(i));
        } else if cap.name.eq_ignore_ascii_case("sasl") {
            errors.push(ValidationError::SaslInCaps);
        }
    }

    if let Some(sasl) = &config.sasl
        && sasl.account.is_empty()
    {
        errors.push(ValidationError::MissingSaslAccount);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
