//! Event Dispatcher Module
//!
//! The sink a builder hands its lifecycle events to, plus the stock sinks
//! shipped with the crate.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::events::{Event, EventState};

// == Dispatcher Trait ==
/// Receives every event a builder emits, in order.
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: Event);
}

impl<F> EventDispatcher for F
where
    F: Fn(Event) + Send + Sync,
{
    fn dispatch(&self, event: Event) {
        self(event)
    }
}

// == Null Dispatcher ==
/// Discards every event. Used when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDispatcher;

impl EventDispatcher for NullDispatcher {
    fn dispatch(&self, _event: Event) {}
}

// == Tracing Dispatcher ==
/// Logs every event through `tracing`.
///
/// Error states are logged at `warn`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatcher;

impl EventDispatcher for TracingDispatcher {
    fn dispatch(&self, event: Event) {
        let correlation_id = event.correlation_id().unwrap_or("-");
        let key = event.cache_key().unwrap_or("-");
        match event.error() {
            Some(error) => warn!(
                state = event.name(),
                correlation_id,
                key,
                error = %error,
                "cache builder event"
            ),
            None => debug!(
                state = event.name(),
                correlation_id,
                key,
                "cache builder event"
            ),
        }
    }
}

// == Event Recorder ==
/// Keeps every dispatched event in memory.
///
/// Clones share the same log, so one handle can be given to a builder and
/// another kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events, oldest first.
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// States of the recorded events, oldest first.
    pub fn states(&self) -> Vec<EventState> {
        self.lock().iter().map(Event::state).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Event>> {
        // a panicking listener must not hide the events recorded so far
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EventDispatcher for EventRecorder {
    fn dispatch(&self, event: Event) {
        self.lock().push(event);
    }
}
