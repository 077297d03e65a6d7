#![forbid(unsafe_code)]

//! Native event channel.
//!
//! The hosting toolkit reports user interaction (a scroll, a highlight
//! change) by calling [`EventSource::emit`]. Handlers carry no payload; they
//! read whatever native property changed. Built on a unit
//! [`ObservableCell`], so handlers are isolated and snapshot the same way
//! cell subscribers are.

use std::fmt;

use super::observable::{ObservableCell, Subscription, SubscriptionToken};

/// Payload-free, multi-handler event.
#[derive(Clone)]
pub struct EventSource {
    cell: ObservableCell<()>,
}

impl EventSource {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cell: ObservableCell::new(()),
        }
    }

    /// Fire the event. Every connected handler runs before this returns.
    ///
    /// A handler that emits again starts a fresh pass over all handlers;
    /// the outer pass then ends, so no handler runs twice for one emission.
    pub fn emit(&self) {
        self.cell.write(());
    }

    pub fn connect(&self, handler: impl Fn() + 'static) -> SubscriptionToken {
        self.cell.subscribe(move |()| handler())
    }

    /// Connect with an RAII guard that disconnects on drop.
    pub fn connect_scoped(&self, handler: impl Fn() + 'static) -> Subscription {
        self.cell.subscribe_scoped(move |()| handler())
    }

    /// Idempotent; unknown tokens are ignored.
    pub fn disconnect(&self, token: SubscriptionToken) -> bool {
        self.cell.unsubscribe(token)
    }

    /// How many times the event has fired.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.cell.version()
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.cell.subscriber_count()
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("emitted", &self.emitted())
            .field("handlers", &self.handler_count())
            .finish()
    }
}
