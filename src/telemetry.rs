//! Telemetry utilities for line timing and message correlation.

use std::time::Instant;

use slirc_wire::RawMessage;
use tracing::trace;

/// Guard timing the processing of one line.
///
/// Logs the elapsed time at `trace` level when dropped.
pub struct LineTimer {
    command: String,
    start: Instant,
}

impl LineTimer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }
}

impl Drop for LineTimer {
    fn drop(&mut self) {
        let elapsed_us = self.start.elapsed().as_micros() as u64;
        trace!(command = %self.command, elapsed_us, "line processed");
    }
}

/// Extract msgid from message tags if present.
pub fn extract_msgid(msg: &RawMessage) -> Option<String> {
    msg.tag_value("msgid")
}

/// Standardized span constructors.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Span for one incoming line.
    pub fn line(command: &str, msgid: Option<&str>) -> Span {
        if let Some(msgid) = msgid {
            debug_span!("line", command = %command, msgid = %msgid)
        } else {
            debug_span!("line", command = %command)
        }
    }

    /// Span covering the CAP/SASL handshake of one connection.
    pub fn handshake(nick: &str) -> Span {
        info_span!("handshake", nick = %nick)
    }
}
