//! Event State Module
//!
//! The closed vocabulary of lifecycle steps a builder reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

// == Event State ==
/// One step of a `CacheBuilder::get` call.
///
/// The string names are stable and form the observability contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventState {
    #[serde(rename = "cache:get.start")]
    CacheGetStart,
    #[serde(rename = "cache:get.error")]
    CacheGetError,
    #[serde(rename = "cache:get.hit")]
    CacheGetHit,
    #[serde(rename = "cache:get.miss")]
    CacheGetMiss,
    #[serde(rename = "build:start")]
    BuildStart,
    #[serde(rename = "build:error")]
    BuildError,
    #[serde(rename = "build:success")]
    BuildSuccess,
    #[serde(rename = "build:fail")]
    BuildFail,
    #[serde(rename = "cache:set.start")]
    CacheSetStart,
    #[serde(rename = "cache:set.error")]
    CacheSetError,
    #[serde(rename = "cache:set.success")]
    CacheSetSuccess,
    #[serde(rename = "cache:set.fail")]
    CacheSetFail,
}

impl EventState {
    /// Every state, cache read first, then build, then cache write.
    pub const ALL: [EventState; 12] = [
        EventState::CacheGetStart,
        EventState::CacheGetError,
        EventState::CacheGetHit,
        EventState::CacheGetMiss,
        EventState::BuildStart,
        EventState::BuildError,
        EventState::BuildSuccess,
        EventState::BuildFail,
        EventState::CacheSetStart,
        EventState::CacheSetError,
        EventState::CacheSetSuccess,
        EventState::CacheSetFail,
    ];

    // == Name ==
    /// Returns the stable wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventState::CacheGetStart => "cache:get.start",
            EventState::CacheGetError => "cache:get.error",
            EventState::CacheGetHit => "cache:get.hit",
            EventState::CacheGetMiss => "cache:get.miss",
            EventState::BuildStart => "build:start",
            EventState::BuildError => "build:error",
            EventState::BuildSuccess => "build:success",
            EventState::BuildFail => "build:fail",
            EventState::CacheSetStart => "cache:set.start",
            EventState::CacheSetError => "cache:set.error",
            EventState::CacheSetSuccess => "cache:set.success",
            EventState::CacheSetFail => "cache:set.fail",
        }
    }

    /// True for the `cache:*` states.
    pub fn is_cache_state(&self) -> bool {
        !self.is_build_state()
    }

    /// True for the `build:*` states.
    pub fn is_build_state(&self) -> bool {
        matches!(
            self,
            EventState::BuildStart
                | EventState::BuildError
                | EventState::BuildSuccess
                | EventState::BuildFail
        )
    }

    /// True for states that carry a captured error.
    pub fn is_error_state(&self) -> bool {
        matches!(
            self,
            EventState::CacheGetError | EventState::BuildError | EventState::CacheSetError
        )
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventState {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| EventError::UnknownState(s.to_string()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(EventState::CacheGetStart.as_str(), "cache:get.start");
        assert_eq!(EventState::CacheGetMiss.as_str(), "cache:get.miss");
        assert_eq!(EventState::BuildFail.as_str(), "build:fail");
        assert_eq!(EventState::CacheSetSuccess.to_string(), "cache:set.success");
    }

    #[test]
    fn test_parse_every_state() {
        for state in EventState::ALL {
            assert_eq!(state.as_str().parse::<EventState>().unwrap(), state);
        }
    }

    #[test]
    fn test_parse_unknown_state() {
        let result = "cache:get.maybe".parse::<EventState>();
        assert_eq!(
            result,
            Err(EventError::UnknownState("cache:get.maybe".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&EventState::CacheSetError).unwrap();
        assert_eq!(json, "\"cache:set.error\"");

        let state: EventState = serde_json::from_str("\"build:success\"").unwrap();
        assert_eq!(state, EventState::BuildSuccess);
    }

    #[test]
    fn test_state_groups() {
        assert!(EventState::BuildStart.is_build_state());
        assert!(!EventState::BuildStart.is_cache_state());
        assert!(EventState::CacheGetHit.is_cache_state());
        assert!(EventState::CacheGetError.is_error_state());
        assert!(EventState::BuildError.is_error_state());
        assert!(!EventState::CacheSetFail.is_error_state());
        assert_eq!(
            EventState::ALL.iter().filter(|s| s.is_error_state()).count(),
            3
        );
    }
}
