//! Events Module
//!
//! Lifecycle events emitted by a builder and the sinks that receive them.

mod dispatcher;
mod event;
mod state;

// Re-export public types
pub use dispatcher::{EventDispatcher, EventRecorder, NullDispatcher, TracingDispatcher};
pub use event::{CapturedError, ErrorLayer, Event};
pub use state::EventState;
