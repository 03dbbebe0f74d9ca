//! Cache Backend Module
//!
//! Defines the capability a cache store must provide to back a builder.

use std::sync::Arc;

use crate::error::Result;

// == Cache Trait ==
/// Key/value store with TTL support, consumed by `CacheBuilder`.
///
/// Implementations decide how values are encoded and where they live. A
/// read that finds nothing returns `Ok(None)`; an `Err` is reported as a
/// read fault and treated as a miss.
pub trait Cache<T>: Send + Sync {
    /// Identity tag attached to every event emitted for this store.
    fn store_tag(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Retrieves the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<T>>;

    /// Stores `value` under `key`.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Lifespan in seconds, 0 = no expiry or backend default
    ///
    /// Returns `Ok(false)` when the backend declined the write without
    /// failing.
    fn set(&self, key: &str, value: &T, ttl: u64) -> Result<bool>;
}

impl<T, C> Cache<T> for Arc<C>
where
    C: Cache<T> + ?Sized,
{
    fn store_tag(&self) -> &str {
        (**self).store_tag()
    }

    fn get(&self, key: &str) -> Result<Option<T>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &T, ttl: u64) -> Result<bool> {
        (**self).set(key, value, ttl)
    }
}
