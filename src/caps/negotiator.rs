//! Sans-IO CAP/SASL negotiation.
//!
//! The negotiator consumes server lines during the handshake and produces
//! [`CapAction`]s (lines to send, completion). It does no I/O itself.
//!
//! ```text
//! CAP LS 302 -> (CAP LS [* ...]) -> CAP REQ -> ACK/NAK
//!            -> [AUTHENTICATE PLAIN -> + -> payload -> 903/904]
//!            -> CAP END
//! ```

use std::collections::BTreeSet;

use slirc_wire::RawMessage;
use slirc_wire::sasl::{PLAIN, authenticate_payloads, encode_plain, plain_offered};
use tracing::{debug, info, warn};

use super::handler::{CapHandler, OfferedCaps};
use crate::error::CapNegotiationError;

/// Progress of the embedded SASL PLAIN exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaslStep {
    #[default]
    None,
    /// `AUTHENTICATE PLAIN` sent, waiting for `AUTHENTICATE +`.
    MechSent,
    /// Credentials sent, waiting for `903` or a failure numeric.
    AwaitingContinue,
    Done,
}

impl SaslStep {
    fn in_progress(self) -> bool {
        matches!(self, SaslStep::MechSent | SaslStep::AwaitingContinue)
    }
}

/// Handshake-only capability bookkeeping.
#[derive(Debug, Default)]
pub struct CapState {
    pub offered: OfferedCaps,
    pub requested: BTreeSet<String>,
    pub enabled: BTreeSet<String>,
    pub sasl_step: SaslStep,
}

/// Output of the negotiator.
#[derive(Debug, Clone, PartialEq)]
pub enum CapAction {
    /// Send this line to the server.
    Send(RawMessage),
    /// `CAP END` has been queued; negotiation is over.
    Complete,
}

#[derive(Debug)]
pub struct CapNegotiator {
    handlers: Vec<Box<dyn CapHandler>>,
    state: CapState,
    /// Decision already made for this connection's `CAP LS`.
    decided: bool,
    /// Requested and not yet answered.
    pending: BTreeSet<String>,
    /// Index of the handler running SASL.
    sasl_handler: Option<usize>,
    finished: bool,
}

impl CapNegotiator {
    pub fn new(handlers: Vec<Box<dyn CapHandler>>) -> Self {
        Self {
            handlers,
            state: CapState::default(),
            decided: false,
            pending: BTreeSet::new(),
            sasl_handler: None,
            finished: false,
        }
    }

    /// `CAP LS 302`, the opening line of the handshake.
    pub fn ls_request() -> RawMessage {
        RawMessage::new("CAP").with_param("LS").with_param("302")
    }

    pub fn state(&self) -> &CapState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_mandatory(&self) -> bool {
        self.handlers.iter().any(|h| h.mandatory())
    }

    /// Give up the handshake state, keeping only the enabled set.
    pub fn into_enabled(self) -> BTreeSet<String> {
        self.state.enabled
    }

    /// Feed one handshake line.
    pub fn feed(&mut self, msg: &RawMessage) -> Result<Vec<CapAction>, CapNegotiationError> {
        if self.finished {
            return Ok(Vec::new());
        }

        if msg.is_command("CAP") {
            let list = msg.last_arg().unwrap_or_default();
            return match msg.arg(1).map(str::to_ascii_uppercase).as_deref() {
                Some("LS") => self.handle_ls(msg),
                Some("ACK") => self.handle_ack(list),
                Some("NAK") => self.handle_nak(list),
                _ => Ok(Vec::new()),
            };
        }

        if msg.is_command("AUTHENTICATE") {
            return Ok(self.handle_authenticate(msg));
        }

        match msg.numeric() {
            Some(900) => {
                info!(account = msg.arg(2).unwrap_or_default(), "logged in");
                Ok(Vec::new())
            }
            Some(903) | Some(907) => {
                if !self.state.sasl_step.in_progress() {
                    return Ok(Vec::new());
                }
                info!("SASL authentication succeeded");
                self.state.sasl_step = SaslStep::Done;
                Ok(self.maybe_finish())
            }
            Some(code @ (902 | 904 | 905)) => {
                let message = msg.last_arg().unwrap_or("SASL authentication failed");
                self.sasl_failed(code, message)
            }
            Some(906) => self.sasl_failed(906, "aborted"),
            _ => Ok(Vec::new()),
        }
    }

    fn handle_ls(&mut self, msg: &RawMessage) -> Result<Vec<CapAction>, CapNegotiationError> {
        // CAP * LS * :caps... (more follows) / CAP * LS :caps...
        let (more, list) = if msg.arg(2) == Some("*") && msg.arg_count() > 3 {
            (true, msg.arg(3).unwrap_or_default())
        } else {
            (false, msg.arg(2).unwrap_or_default())
        };

        for token in list.split_whitespace() {
            let (name, value) = match token.split_once('=') {
                Some((name, value)) => (name, Some(value.to_owned())),
                None => (token, None),
            };
            self.state.offered.insert(name.to_owned(), value);
        }

        if more || self.decided {
            return Ok(Vec::new());
        }
        self.decided = true;

        let mut request = BTreeSet::new();
        for handler in &self.handlers {
            let cap = handler.capability();
            if handler.should_request(&self.state.offered) {
                request.insert(cap.to_owned());
            } else if handler.mandatory() {
                return Err(CapNegotiationError::MandatoryUnavailable(cap.to_owned()));
            } else {
                debug!(cap, "skipping optional capability");
            }
        }

        if request.is_empty() {
            return Ok(self.finish());
        }

        let line = request.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
        self.state.requested.clone_from(&request);
        self.pending = request;
        Ok(vec![CapAction::Send(
            RawMessage::new("CAP").with_param("REQ").with_trailing(line),
        )])
    }

    fn handlers_for(&self, cap: &str) -> Vec<usize> {
        self.handlers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.capability().eq_ignore_ascii_case(cap))
            .map(|(i, _)| i)
            .collect()
    }

    fn handle_ack(&mut self, list: &str) -> Result<Vec<CapAction>, CapNegotiationError> {
        let mut actions = Vec::new();

        for token in list.split_whitespace() {
            if let Some(name) = token.strip_prefix('-') {
                self.pending.remove(name);
                self.state.enabled.remove(name);
                continue;
            }
            let name = token.trim_start_matches(['~', '=']);
            self.pending.remove(name);
            self.state.enabled.insert(name.to_owned());

            for idx in self.handlers_for(name) {
                self.handlers[idx].handle_ack();
                if self.handlers[idx].sasl_credentials().is_some()
                    && self.state.sasl_step == SaslStep::None
                {
                    actions.extend(self.start_sasl(idx)?);
                }
            }
        }

        actions.extend(self.maybe_finish());
        Ok(actions)
    }

    fn handle_nak(&mut self, list: &str) -> Result<Vec<CapAction>, CapNegotiationError> {
        for name in list.split_whitespace() {
            self.pending.remove(name);
            self.state.requested.remove(name);

            for idx in self.handlers_for(name) {
                self.handlers[idx].handle_nak();
                if self.handlers[idx].mandatory() {
                    return Err(CapNegotiationError::MandatoryRejected(name.to_owned()));
                }
                debug!(cap = name, "optional capability rejected");
            }
        }
        Ok(self.maybe_finish())
    }

    fn start_sasl(&mut self, idx: usize) -> Result<Vec<CapAction>, CapNegotiationError> {
        let mechanisms = self.state.offered.get("sasl").and_then(|v| v.as_deref());
        if !plain_offered(mechanisms) {
            self.sasl_handler = Some(idx);
            self.state.sasl_step = SaslStep::MechSent;
            return self.sasl_failed(908, "PLAIN mechanism not offered");
        }

        self.sasl_handler = Some(idx);
        self.state.sasl_step = SaslStep::MechSent;
        Ok(vec![CapAction::Send(
            RawMessage::new("AUTHENTICATE").with_param(PLAIN),
        )])
    }

    fn handle_authenticate(&mut self, msg: &RawMessage) -> Vec<CapAction> {
        if msg.arg(0) != Some("+") || self.state.sasl_step != SaslStep::MechSent {
            return Vec::new();
        }
        let Some(credentials) = self
            .sasl_handler
            .and_then(|idx| self.handlers.get(idx))
            .and_then(|h| h.sasl_credentials())
        else {
            return Vec::new();
        };

        let encoded = encode_plain(&credentials.account, &credentials.password);
        self.state.sasl_step = SaslStep::AwaitingContinue;
        authenticate_payloads(&encoded)
            .into_iter()
            .map(|chunk| CapAction::Send(RawMessage::new("AUTHENTICATE").with_param(chunk)))
            .collect()
    }

    fn sasl_failed(
        &mut self,
        code: u16,
        message: &str,
    ) -> Result<Vec<CapAction>, CapNegotiationError> {
        if !self.state.sasl_step.in_progress() {
            return Ok(Vec::new());
        }
        self.state.sasl_step = SaslStep::Done;

        let mandatory = self
            .sasl_handler
            .and_then(|idx| self.handlers.get(idx))
            .is_some_and(|h| h.mandatory());
        if mandatory {
            return Err(if code == 906 {
                CapNegotiationError::SaslAborted
            } else {
                CapNegotiationError::SaslFailed {
                    code,
                    message: message.to_owned(),
                }
            });
        }

        warn!(code, message, "optional SASL failed, continuing without it");
        Ok(self.maybe_finish())
    }

    fn maybe_finish(&mut self) -> Vec<CapAction> {
        if self.pending.is_empty() && !self.state.sasl_step.in_progress() {
            self.finish()
        } else {
            Vec::new()
        }
    }

    fn finish(&mut self) -> Vec<CapAction> {
        self.finished = true;
        vec![
            CapAction::Send(RawMessage::new("CAP").with_param("END")),
            CapAction::Complete,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::handler::{EnableCap, SaslPlain};

    fn line(s: &str) -> RawMessage {
        RawMessage::parse(s).unwrap()
    }

    fn sent(actions: &[CapAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(|a| match a {
                CapAction::Send(msg) => Some(msg.to_string()),
                CapAction::Complete => None,
            })
            .collect()
    }

    fn negotiator() -> CapNegotiator {
        CapNegotiator::new(vec![
            Box::new(SaslPlain::new("acct", "pw", true)),
            Box::new(EnableCap::new("example.org/unknown")),
        ])
    }

    #[test]
    fn test_sasl_happy_path() {
        let mut neg = negotiator();
        let out = neg.feed(&line(":srv CAP * LS :multi-prefix sasl")).unwrap();
        assert_eq!(sent(&out), vec!["CAP REQ :sasl"]);

        let out = neg.feed(&line(":srv CAP * ACK :sasl")).unwrap();
        assert_eq!(sent(&out), vec!["AUTHENTICATE PLAIN"]);
        assert_eq!(neg.state().sasl_step, SaslStep::MechSent);

        let out = neg.feed(&line("AUTHENTICATE +")).unwrap();
        assert_eq!(sent(&out), vec![format!("AUTHENTICATE {}", encode_plain("acct", "pw"))]);
        assert_eq!(neg.state().sasl_step, SaslStep::AwaitingContinue);

        neg.feed(&line(":srv 900 Bot Bot!u@h acct :You are now logged in")).unwrap();
        let out = neg.feed(&line(":srv 903 Bot :SASL authentication successful")).unwrap();
        assert_eq!(sent(&out), vec!["CAP END"]);
        assert!(out.contains(&CapAction::Complete));
        assert!(neg.is_finished());
        assert!(neg.into_enabled().contains("sasl"));
    }

    #[test]
    fn test_nothing_matching_ends_immediately() {
        let mut neg = CapNegotiator::new(vec![Box::new(EnableCap::new("away-notify"))]);
        let out = neg.feed(&line(":srv CAP * LS :multi-prefix")).unwrap();
        assert_eq!(sent(&out), vec!["CAP END"]);
        assert!(neg.is_finished());
    }

    #[test]
    fn test_mandatory_unavailable() {
        let mut neg = negotiator();
        let err = neg.feed(&line(":srv CAP * LS :multi-prefix")).unwrap_err();
        assert_eq!(err, CapNegotiationError::MandatoryUnavailable("sasl".into()));
    }

    #[test]
    fn test_multiline_ls_waits() {
        let mut neg = CapNegotiator::new(vec![Box::new(EnableCap::new("away-notify"))]);
        assert!(neg.feed(&line(":srv CAP * LS * :multi-prefix")).unwrap().is_empty());
        let out = neg.feed(&line(":srv CAP * LS :away-notify")).unwrap();
        assert_eq!(sent(&out), vec!["CAP REQ :away-notify"]);
        assert!(neg.state().offered.contains_key("multi-prefix"));
    }

    #[test]
    fn test_cap_values_recorded() {
        let mut neg = CapNegotiator::new(vec![]);
        neg.feed(&line(":srv CAP * LS :sasl=PLAIN,EXTERNAL")).unwrap();
        assert_eq!(
            neg.state().offered.get("sasl"),
            Some(&Some("PLAIN,EXTERNAL".to_string()))
        );
    }

    #[test]
    fn test_mandatory_nak_fails() {
        let mut neg = CapNegotiator::new(vec![Box::new(EnableCap::required("batch"))]);
        neg.feed(&line(":srv CAP * LS :batch")).unwrap();
        let err = neg.feed(&line(":srv CAP * NAK :batch")).unwrap_err();
        assert_eq!(err, CapNegotiationError::MandatoryRejected("batch".into()));
    }

    #[test]
    fn test_optional_nak_ends() {
        let mut neg = CapNegotiator::new(vec![Box::new(EnableCap::new("batch"))]);
        neg.feed(&line(":srv CAP * LS :batch")).unwrap();
        let out = neg.feed(&line(":srv CAP * NAK :batch")).unwrap();
        assert_eq!(sent(&out), vec!["CAP END"]);
        assert!(neg.state().enabled.is_empty());
    }

    #[test]
    fn test_mandatory_sasl_failure() {
        let mut neg = negotiator();
        neg.feed(&line(":srv CAP * LS :sasl")).unwrap();
        neg.feed(&line(":srv CAP * ACK :sasl")).unwrap();
        neg.feed(&line("AUTHENTICATE +")).unwrap();
        let err = neg
            .feed(&line(":srv 904 Bot :SASL authentication failed"))
            .unwrap_err();
        assert_eq!(
            err,
            CapNegotiationError::SaslFailed {
                code: 904,
                message: "SASL authentication failed".into()
            }
        );
    }

    #[test]
    fn test_optional_sasl_failure_continues() {
        let mut neg = CapNegotiator::new(vec![Box::new(SaslPlain::new("a", "b", false))]);
        neg.feed(&line(":srv CAP * LS :sasl")).unwrap();
        neg.feed(&line(":srv CAP * ACK :sasl")).unwrap();
        neg.feed(&line("AUTHENTICATE +")).unwrap();
        let out = neg.feed(&line(":srv 904 Bot :bad")).unwrap();
        assert_eq!(sent(&out), vec!["CAP END"]);
    }

    #[test]
    fn test_mandatory_sasl_abort() {
        let mut neg = negotiator();
        neg.feed(&line(":srv CAP * LS :sasl")).unwrap();
        neg.feed(&line(":srv CAP * ACK :sasl")).unwrap();
        let err = neg.feed(&line(":srv 906 Bot :aborted")).unwrap_err();
        assert_eq!(err, CapNegotiationError::SaslAborted);
    }

    #[test]
    fn test_long_credentials_are_chunked() {
        let password = "p".repeat(600);
        let mut neg = CapNegotiator::new(vec![Box::new(SaslPlain::new("acct", password, true))]);
        neg.feed(&line(":srv CAP * LS :sasl")).unwrap();
        neg.feed(&line(":srv CAP * ACK :sasl")).unwrap();
        let out = sent(&neg.feed(&line("AUTHENTICATE +")).unwrap());
        assert!(out.len() >= 2);
        assert!(out.iter().all(|l| l.starts_with("AUTHENTICATE ")));
        assert!(out[0].len() == "AUTHENTICATE ".len() + 400);
    }
}
