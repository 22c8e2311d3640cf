//! Event sinks.
//!
//! The session hands every event, in order, to one [`EventSink`]. Fan-out
//! and threading are the sink's business.

use tokio::sync::mpsc;
use tracing::trace;

use crate::event::Event;

/// Receives events in emission order.
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Forward to a dispatcher task. A closed channel drops the event.
impl EventSink for mpsc::UnboundedSender<Event> {
    fn emit(&mut self, event: Event) {
        if let Err(mpsc::error::SendError(event)) = self.send(event) {
            trace!(event = event.name(), "event receiver gone, dropping");
        }
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(Event)> EventSink for FnSink<F> {
    fn emit(&mut self, event: Event) {
        (self.0)(event);
    }
}
