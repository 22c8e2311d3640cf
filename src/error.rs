//! Errors surfaced by the session.
//!
//! Malformed or unexpected lines never fail: they degrade to
//! [`Event::Unknown`](crate::event::Event::Unknown). The only error a caller
//! sees from line processing is [`CapNegotiationError`], which means the
//! handshake cannot continue and the connection should be dropped.

use thiserror::Error;

/// The CAP/SASL handshake failed for a mandatory handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapNegotiationError {
    /// The server answered `CAP NAK` for a mandatory capability.
    #[error("mandatory capability rejected: {0}")]
    MandatoryRejected(String),

    /// A mandatory capability was not offered in `CAP LS`.
    #[error("mandatory capability not offered: {0}")]
    MandatoryUnavailable(String),

    /// `902`/`904`/`905` (or PLAIN not offered) with mandatory SASL.
    #[error("SASL authentication failed ({code}): {message}")]
    SaslFailed { code: u16, message: String },

    /// `906` with mandatory SASL.
    #[error("SASL authentication aborted")]
    SaslAborted,

    /// Registration completed without CAP while mandatory handlers were configured.
    #[error("server does not support capability negotiation")]
    CapUnsupported,
}

impl CapNegotiationError {
    /// Get a static error code string for logging.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MandatoryRejected(_) => "mandatory_rejected",
            Self::MandatoryUnavailable(_) => "mandatory_unavailable",
            Self::SaslFailed { .. } => "sasl_failed",
            Self::SaslAborted => "sasl_aborted",
            Self::CapUnsupported => "cap_unsupported",
        }
    }
}

/// Reasons a direct handler could not use a line. The router turns these
/// into an unknown-line event; they never reach the caller.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters")]
    NeedMoreParams,

    #[error("missing user source")]
    MissingSource,

    #[error("malformed argument: {0}")]
    Malformed(String),

    /// Recognised command carrying something this core does not model
    /// (e.g. a CTCP other than ACTION/VERSION/PING/TIME/FINGER).
    #[error("unhandled: {0}")]
    Unhandled(String),
}

pub type HandlerResult = Result<(), HandlerError>;
