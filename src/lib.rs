//! Fluent Cache - A cache-aside value builder
//!
//! Reads a value from cache, falls back to building it, validates the
//! result and writes it back, emitting a lifecycle event at every step.

pub mod builder;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod id;
pub mod logging;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use config::Config;
pub use error::{CacheError, EventError};
pub use events::{
    CapturedError, ErrorLayer, Event, EventDispatcher, EventRecorder, EventState, NullDispatcher,
    TracingDispatcher,
};
pub use id::{IdGenerator, UuidGenerator};
pub use logging::init_tracing;
