//! Cache Module
//!
//! The key/value store capability a builder reads from and writes to.

mod backend;

// Re-export public types
pub use backend::Cache;

// == Public Constants ==
/// Lifespan meaning "no expiry" (or the backend's own default)
pub const NO_EXPIRY: u64 = 0;
