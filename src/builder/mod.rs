//! Builder Module
//!
//! Fluent cache-aside builder: cache read, build, validation and cache write
//! with lifecycle events.

mod cache_builder;
mod hooks;


// Re-export public types
pub use cache_builder::CacheBuilder;
pub use hooks::{DispatcherFactory, KeyProducer, LifespanProducer, Producer, Validator};
