// ── Host event sink ──
//
// The single outbound edge of the bridge. `emit` is only ever called
// on the loop thread, with no registry lock held, so an implementation
// may call straight back into the bridge's command surface.

use tokio::sync::mpsc;
use tracing::debug;

use crate::model::Event;

pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Collects events in order. Handy for tests and batch tools.
impl EventSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

/// Forwards events to another task. Events emitted after the receiver
/// is gone are discarded.
impl EventSink for mpsc::UnboundedSender<Event> {
    fn emit(&mut self, event: Event) {
        if let Err(mpsc::error::SendError(event)) = self.send(event) {
            debug!(event = event.name(), "event receiver dropped");
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: Event) {
        (**self).emit(event);
    }
}
