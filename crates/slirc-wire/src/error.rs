//! Error types for the wire layer.
//!
//! Tokenizer failures are reported as [`ProtocolError`]; the session layer
//! never propagates them, it degrades the offending line to an unknown-line
//! event instead.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Failed to tokenize an IRC line.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The line that could not be tokenized.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

impl ProtocolError {
    /// The raw line that failed to tokenize.
    pub fn line(&self) -> &str {
        match self {
            Self::InvalidMessage { string, .. } => string,
        }
    }
}

/// Errors encountered while splitting a line into its parts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// Line was empty (or only whitespace / line terminators).
    #[error("empty message")]
    EmptyMessage,

    /// Command was missing or was neither a word nor a three-digit numeric.
    #[error("invalid command")]
    InvalidCommand,

    /// Text remained after the command that is not separated by a space.
    #[error("unexpected input after command at position {position}")]
    TrailingGarbage {
        /// Byte offset of the unexpected input.
        position: usize,
    },

    /// Parser failure with position information.
    #[error("parse error at position {position}: {context}")]
    ParseContext {
        /// Byte offset where parsing failed.
        position: usize,
        /// Description of what the parser was doing.
        context: String,
    },
}

/// Errors that can occur while decoding ISUPPORT tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IsupportError {
    /// PREFIX value was not of the form `(modes)symbols`.
    #[error("malformed PREFIX value: {0}")]
    MalformedPrefix(String),

    /// PREFIX modes and symbols had different lengths.
    #[error("PREFIX modes and symbols differ in length: {0}")]
    PrefixLengthMismatch(String),
}
