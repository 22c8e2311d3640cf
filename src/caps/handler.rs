//! Pluggable capability handlers.

use std::collections::BTreeMap;
use std::fmt;

/// Capabilities offered in `CAP LS`, with their values (`sasl=PLAIN,EXTERNAL`).
pub type OfferedCaps = BTreeMap<String, Option<String>>;

/// Decides whether one capability is requested and reacts to the answer.
///
/// Failure of a mandatory handler (not offered, NAK, SASL failure) aborts
/// the handshake; an optional handler is skipped.
pub trait CapHandler: fmt::Debug + Send {
    /// Capability name as it appears in `CAP LS`.
    fn capability(&self) -> &str;

    fn mandatory(&self) -> bool;

    /// Request the capability? Defaults to "it was offered".
    fn should_request(&self, offered: &OfferedCaps) -> bool {
        offered.contains_key(self.capability())
    }

    fn handle_ack(&mut self) {}

    fn handle_nak(&mut self) {}

    /// Credentials for a SASL PLAIN exchange once the capability is acked.
    fn sasl_credentials(&self) -> Option<SaslCredentials> {
        None
    }
}

/// Account and password for SASL PLAIN.
#[derive(Clone, PartialEq, Eq)]
pub struct SaslCredentials {
    pub account: String,
    pub password: String,
}

impl fmt::Debug for SaslCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaslCredentials")
            .field("account", &self.account)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request a capability when offered and record whether it was granted.
#[derive(Debug, Clone)]
pub struct EnableCap {
    name: String,
    mandatory: bool,
    enabled: bool,
}

impl EnableCap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mandatory: false,
            enabled: false,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self {
            mandatory: true,
            ..Self::new(name)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl CapHandler for EnableCap {
    fn capability(&self) -> &str {
        &self.name
    }

    fn mandatory(&self) -> bool {
        self.mandatory
    }

    fn handle_ack(&mut self) {
        self.enabled = true;
    }

    fn handle_nak(&mut self) {
        self.enabled = false;
    }
}

/// SASL PLAIN login through the `sasl` capability.
#[derive(Debug, Clone)]
pub struct SaslPlain {
    credentials: SaslCredentials,
    mandatory: bool,
}

impl SaslPlain {
    pub fn new(account: impl Into<String>, password: impl Into<String>, mandatory: bool) -> Self {
        Self {
            credentials: SaslCredentials {
                account: account.into(),
                password: password.into(),
            },
            mandatory,
        }
    }
}

impl CapHandler for SaslPlain {
    fn capability(&self) -> &str {
        "sasl"
    }

    fn mandatory(&self) -> bool {
        self.mandatory
    }

    /// Only request `sasl` when PLAIN is among the advertised mechanisms
    /// (or none are listed).
    fn should_request(&self, offered: &OfferedCaps) -> bool {
        match offered.get("sasl") {
            Some(mechanisms) => slirc_wire::sasl::plain_offered(mechanisms.as_deref()),
            None => false,
        }
    }

    fn sasl_credentials(&self) -> Option<SaslCredentials> {
        Some(self.credentials.clone())
    }
}
