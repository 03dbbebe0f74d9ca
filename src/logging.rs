//! Logging Module
//!
//! Tracing subscriber bootstrap for binaries and tests using the crate.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "fluent_cache=info";

/// Installs a global fmt subscriber with an env filter.
///
/// Defaults to `fluent_cache=info`, can be overridden with the `RUST_LOG`
/// env var. Returns false if a global subscriber was already installed, so
/// calling it more than once is harmless.
pub fn init_tracing() -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
