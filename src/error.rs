//! Error types for the cache builder
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Failure raised by a cache backend while reading or writing.
///
/// The builder never propagates these to its caller; they are captured and
/// reported through `cache:get.error` / `cache:set.error` events.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backend could not be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    /// Key rejected by the backend
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Any other backend failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Event Error Enum ==
/// Errors raised while working with event values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Name is not part of the event vocabulary
    #[error("Unknown event state: {0}")]
    UnknownState(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache backends.
pub type Result<T> = std::result::Result<T, CacheError>;
