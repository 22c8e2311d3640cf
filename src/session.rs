//! Per-connection protocol session.
//!
//! A [`Session`] turns raw server lines into ordered [`Event`]s while
//! keeping the registry, server facts and reply buffers current. It is
//! sans-IO: lines go in through [`Session::process_line`], and handshake
//! lines to send come out of [`Session::take_outgoing`].
//!
//! ```text
//! PreRegistration --start()--> NegotiatingCaps --CAP END--> Normal
//!                                    |
//!                                    +--001 without CAP (no mandatory caps)--> Normal
//! ```

use std::collections::BTreeSet;
use std::mem;

use slirc_wire::RawMessage;
use tracing::{debug, info, warn};

use crate::aggregate::Aggregators;
use crate::caps::{CapAction, CapHandler, CapNegotiator, CapState, apply_cap_update};
use crate::config::BotConfig;
use crate::emit::EventSink;
use crate::error::CapNegotiationError;
use crate::event::Event;
use crate::handlers::{Context, Router, ServerState};
use crate::state::{Channel, Registry};
use crate::telemetry::{LineTimer, extract_msgid, spans};

/// Where the connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// [`Session::start`] has not been called.
    PreRegistration,
    /// `CAP LS` sent, waiting for the handshake to finish.
    NegotiatingCaps,
    /// Handshake over; every line is routed.
    Normal,
}

/// SASL replies that belong to the handshake but are also reported.
fn is_sasl_numeric(code: u16) -> bool {
    (900..=908).contains(&code)
}

pub struct Session {
    config: BotConfig,
    phase: ConnectionPhase,
    registry: Registry,
    server: ServerState,
    aggregators: Aggregators,
    router: Router,
    negotiator: Option<CapNegotiator>,
    enabled_caps: BTreeSet<String>,
    outgoing: Vec<RawMessage>,
}

impl Session {
    /// A session using the capability handlers `config` describes.
    pub fn new(config: BotConfig) -> Self {
        let handlers = config.cap_handlers();
        Self::with_handlers(config, handlers)
    }

    /// A session with a caller-supplied capability handler list.
    pub fn with_handlers(config: BotConfig, handlers: Vec<Box<dyn CapHandler>>) -> Self {
        let registry = Registry::new(&config.nick, config.casemapping);
        Self {
            config,
            phase: ConnectionPhase::PreRegistration,
            registry,
            server: ServerState::default(),
            aggregators: Aggregators::default(),
            router: Router::new(),
            negotiator: Some(CapNegotiator::new(handlers)),
            enabled_caps: BTreeSet::new(),
            outgoing: Vec::new(),
        }
    }

    /// Begin registration. Returns the opening lines: `PASS` (if set),
    /// `CAP LS 302`, `NICK` and `USER`.
    pub fn start(&mut self) -> Vec<RawMessage> {
        let _span = spans::handshake(&self.config.nick).entered();
        debug!("starting registration");
        self.phase = ConnectionPhase::NegotiatingCaps;

        let mut lines = Vec::with_capacity(4);
        if let Some(password) = &self.config.server_password {
            lines.push(RawMessage::new("PASS").with_param(password.as_str()));
        }
        lines.push(CapNegotiator::ls_request());
        lines.push(RawMessage::new("NICK").with_param(self.config.nick.as_str()));
        lines.push(
            RawMessage::new("USER")
                .with_param(self.config.login())
                .with_param("0")
                .with_param("*")
                .with_trailing(self.config.realname.as_str()),
        );
        lines
    }

    /// Process one line (without CRLF) and return its events in order.
    ///
    /// The only error is a failed handshake, which the caller should treat
    /// as fatal to the connection.
    pub fn process_line(&mut self, line: &str) -> Result<Vec<Event>, CapNegotiationError> {
        let mut events = Vec::new();
        self.process_line_into(line, &mut events)?;
        Ok(events)
    }

    /// Like [`process_line`](Self::process_line), handing events to `sink`.
    pub fn process_line_into<S: EventSink + ?Sized>(
        &mut self,
        line: &str,
        sink: &mut S,
    ) -> Result<(), CapNegotiationError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let msg = match RawMessage::parse(line) {
            Ok(msg) => msg,
            Err(error) => {
                debug!(%error, "unparseable line");
                sink.emit(Event::Unknown {
                    line: line.to_owned(),
                });
                return Ok(());
            }
        };

        let _timer = LineTimer::new(msg.command.as_str());
        let msgid = extract_msgid(&msg);
        let _span = spans::line(&msg.command, msgid.as_deref()).entered();

        let mut events = Vec::new();
        match self.phase {
            ConnectionPhase::NegotiatingCaps => self.handle_handshake(&msg, line, &mut events)?,
            ConnectionPhase::PreRegistration | ConnectionPhase::Normal => {
                self.handle_registered(&msg, line, &mut events)
            }
        }

        for event in events {
            sink.emit(event);
        }
        Ok(())
    }

    fn handle_handshake(
        &mut self,
        msg: &RawMessage,
        line: &str,
        events: &mut Vec<Event>,
    ) -> Result<(), CapNegotiationError> {
        let cap_line = msg.is_command("CAP") || msg.is_command("AUTHENTICATE");
        let code = msg.numeric();

        if cap_line || code.is_some_and(is_sasl_numeric) {
            let actions = match self.negotiator.as_mut() {
                Some(negotiator) => negotiator.feed(msg)?,
                None => Vec::new(),
            };
            self.apply_actions(actions);
            if cap_line {
                return Ok(());
            }
        }

        if code == Some(1) && self.phase == ConnectionPhase::NegotiatingCaps {
            // Registered without the handshake finishing: the server ignored CAP.
            if self.negotiator.as_ref().is_some_and(CapNegotiator::has_mandatory) {
                return Err(CapNegotiationError::CapUnsupported);
            }
            warn!("server registered us without capability negotiation");
            self.negotiator = None;
            self.phase = ConnectionPhase::Normal;
        }

        if code.is_some() || msg.is_command("PING") || msg.is_command("ERROR") {
            self.route(msg, line, events);
        } else {
            debug!(command = %msg.command, "unexpected line during handshake");
            events.push(Event::Unknown {
                line: line.to_owned(),
            });
        }
        Ok(())
    }

    fn handle_registered(&mut self, msg: &RawMessage, line: &str, events: &mut Vec<Event>) {
        if msg.is_command("CAP") {
            match apply_cap_update(&mut self.enabled_caps, msg) {
                Some(event) => events.push(event),
                None => events.push(Event::Unknown {
                    line: line.to_owned(),
                }),
            }
            return;
        }
        self.route(msg, line, events);
    }

    fn route(&mut self, msg: &RawMessage, line: &str, events: &mut Vec<Event>) {
        let mut ctx = Context {
            registry: &mut self.registry,
            server: &mut self.server,
            aggregators: &mut self.aggregators,
            events,
        };
        self.router.route(&mut ctx, msg, line);
    }

    fn apply_actions(&mut self, actions: Vec<CapAction>) {
        for action in actions {
            match action {
                CapAction::Send(line) => self.outgoing.push(line),
                CapAction::Complete => {
                    if let Some(negotiator) = self.negotiator.take() {
                        self.enabled_caps = negotiator.into_enabled();
                    }
                    info!(caps = ?self.enabled_caps, "capability negotiation complete");
                    self.phase = ConnectionPhase::Normal;
                }
            }
        }
    }

    /// Lines queued by the handshake, oldest first.
    pub fn take_outgoing(&mut self) -> Vec<RawMessage> {
        mem::take(&mut self.outgoing)
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Forget a channel, purging members left in no other tracked channel.
    /// The bot's own user is never purged.
    pub fn remove_channel(&mut self, name: &str) -> Option<Channel> {
        let channel = self.registry.remove_channel(name)?;
        debug!(channel = %channel.name, "channel removed by caller");
        Some(channel)
    }

    pub fn server(&self) -> &ServerState {
        &self.server
    }

    pub fn isupport(&self) -> &slirc_wire::Isupport {
        &self.server.isupport
    }

    /// Capabilities currently enabled, including changes after registration.
    pub fn enabled_caps(&self) -> &BTreeSet<String> {
        &self.enabled_caps
    }

    /// Handshake bookkeeping, while negotiation is still running.
    pub fn cap_state(&self) -> Option<&CapState> {
        self.negotiator.as_ref().map(CapNegotiator::state)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}
