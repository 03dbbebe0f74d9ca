//! Builder Hooks Module
//!
//! Shared closure types a builder is configured with, and their defaults.

use std::sync::Arc;

use crate::builder::CacheBuilder;
use crate::cache::NO_EXPIRY;
use crate::events::EventDispatcher;

/// Produces the value on a cache miss.
pub type Producer<T> = Arc<dyn Fn() -> anyhow::Result<Option<T>> + Send + Sync>;

/// Decides whether a built or cached value is usable.
pub type Validator<T> = Arc<dyn Fn(Option<&T>) -> bool + Send + Sync>;

/// Resolves the cache key, `None` disables cache interaction for the step.
pub type KeyProducer = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Computes the lifespan in seconds for a value about to be written.
pub type LifespanProducer<T> = Arc<dyn Fn(&T) -> u64 + Send + Sync>;

/// Creates the event sink on first dispatch.
pub type DispatcherFactory<T> =
    Arc<dyn Fn(&CacheBuilder<T>) -> Arc<dyn EventDispatcher> + Send + Sync>;

// == Defaults ==
fn is_present<T>(value: Option<&T>) -> bool {
    value.is_some()
}

fn no_key() -> Option<String> {
    None
}

fn no_expiry<T>(_value: &T) -> u64 {
    NO_EXPIRY
}

/// Accepts any present value.
pub(crate) fn present_validator<T: 'static>() -> Validator<T> {
    Arc::new(is_present::<T>)
}

pub(crate) fn default_key_producer() -> KeyProducer {
    Arc::new(no_key)
}

pub(crate) fn default_lifespan_producer<T: 'static>() -> LifespanProducer<T> {
    Arc::new(no_expiry::<T>)
}

pub(crate) fn fixed_lifespan_producer<T: 'static>(lifespan: u64) -> LifespanProducer<T> {
    Arc::new(move |_value: &T| lifespan)
}
