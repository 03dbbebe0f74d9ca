//! Configuration Module
//!
//! Loads builder defaults from environment variables.

use std::env;

/// Defaults applied by `CacheBuilder::from_config`.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Lifespan in seconds for built values written to cache, 0 = no expiry
    pub default_lifespan: u64,
    /// Attach a tracing event sink to builders that have none
    pub trace_events: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `FLUENT_CACHE_DEFAULT_LIFESPAN` - Lifespan in seconds (default: 0)
    /// - `FLUENT_CACHE_TRACE_EVENTS` - `true`/`1` to log events (default: false)
    pub fn from_env() -> Self {
        Self {
            default_lifespan: env::var("FLUENT_CACHE_DEFAULT_LIFESPAN")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            trace_events: env::var("FLUENT_CACHE_TRACE_EVENTS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_lifespan: 0,
            trace_events: false,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.default_lifespan, 0);
        assert!(!config.trace_events);
    }

    #[test]
    fn test_config_from_env() {
        // Both cases share one test so the env vars are never touched concurrently
        env::remove_var("FLUENT_CACHE_DEFAULT_LIFESPAN");
        env::remove_var("FLUENT_CACHE_TRACE_EVENTS");
        assert_eq!(Config::from_env(), Config::default());

        env::set_var("FLUENT_CACHE_DEFAULT_LIFESPAN", "120");
        env::set_var("FLUENT_CACHE_TRACE_EVENTS", "TRUE");
        let config = Config::from_env();
        assert_eq!(config.default_lifespan, 120);
        assert!(config.trace_events);

        env::set_var("FLUENT_CACHE_DEFAULT_LIFESPAN", "soon");
        env::set_var("FLUENT_CACHE_TRACE_EVENTS", "maybe");
        assert_eq!(Config::from_env(), Config::default());

        env::remove_var("FLUENT_CACHE_DEFAULT_LIFESPAN");
        env::remove_var("FLUENT_CACHE_TRACE_EVENTS");
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" off "), Some(false));
        assert_eq!(parse_flag(""), None);
    }
}
