//! Event Module
//!
//! Immutable record of one orchestration step, decorated by value before it
//! is handed to a dispatcher.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::CacheError;
use crate::events::EventState;

// == Error Layer ==
/// Which collaborator a captured error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLayer {
    Cache,
    Build,
}

// == Captured Error ==
/// A collaborator failure carried by an event.
///
/// Clones share the underlying error.
#[derive(Debug, Clone)]
pub enum CapturedError {
    /// Read or write fault raised by the cache backend
    Cache(Arc<CacheError>),
    /// Fault raised by the value producer
    Build(Arc<anyhow::Error>),
}

impl CapturedError {
    pub fn cache(err: CacheError) -> Self {
        CapturedError::Cache(Arc::new(err))
    }

    pub fn build(err: anyhow::Error) -> Self {
        CapturedError::Build(Arc::new(err))
    }

    pub fn layer(&self) -> ErrorLayer {
        match self {
            CapturedError::Cache(_) => ErrorLayer::Cache,
            CapturedError::Build(_) => ErrorLayer::Build,
        }
    }

    /// Rendered message, including the cause chain for build errors.
    pub fn message(&self) -> String {
        match self {
            CapturedError::Cache(err) => err.to_string(),
            CapturedError::Build(err) => format!("{:#}", err),
        }
    }

    pub fn as_cache_error(&self) -> Option<&CacheError> {
        match self {
            CapturedError::Cache(err) => Some(err),
            CapturedError::Build(_) => None,
        }
    }

    pub fn as_build_error(&self) -> Option<&anyhow::Error> {
        match self {
            CapturedError::Build(err) => Some(err),
            CapturedError::Cache(_) => None,
        }
    }
}

impl PartialEq for CapturedError {
    fn eq(&self, other: &Self) -> bool {
        self.layer() == other.layer() && self.message() == other.message()
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.layer() {
            ErrorLayer::Cache => write!(f, "cache: {}", self.message()),
            ErrorLayer::Build => write!(f, "build: {}", self.message()),
        }
    }
}

impl From<CacheError> for CapturedError {
    fn from(err: CacheError) -> Self {
        CapturedError::cache(err)
    }
}

impl From<anyhow::Error> for CapturedError {
    fn from(err: anyhow::Error) -> Self {
        CapturedError::build(err)
    }
}

impl Serialize for CapturedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CapturedError", 2)?;
        state.serialize_field("layer", &self.layer())?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

// == Event ==
/// One step of a `get` call, as seen by an event dispatcher.
///
/// The state is fixed at construction. Every `with_*` method consumes the
/// event and returns the decorated copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    state: EventState,
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
    #[serde(rename = "cache_store", skip_serializing_if = "Option::is_none")]
    cache_store_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<CapturedError>,
    propagation_stopped: bool,
}

impl Event {
    // == Constructor ==
    pub fn new(state: EventState) -> Self {
        Self {
            state,
            correlation_id: None,
            cache_store_tag: None,
            cache_key: None,
            error: None,
            propagation_stopped: false,
        }
    }

    // == Decoration ==
    /// Attaches the cache store tag and the key in effect for this step.
    pub fn with_cache_identity(mut self, store_tag: impl Into<String>, key: Option<String>) -> Self {
        self.cache_store_tag = Some(store_tag.into());
        self.cache_key = key;
        self
    }

    pub fn with_error(mut self, error: impl Into<CapturedError>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Marks the event so a fan-out dispatcher stops handing it to further
    /// listeners. The builder itself ignores the flag.
    pub fn stop_propagation(mut self) -> Self {
        self.propagation_stopped = true;
        self
    }

    // == Accessors ==
    pub fn state(&self) -> EventState {
        self.state
    }

    /// Stable wire name of the state.
    pub fn name(&self) -> &'static str {
        self.state.as_str()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn cache_store_tag(&self) -> Option<&str> {
        self.cache_store_tag.as_deref()
    }

    pub fn cache_key(&self) -> Option<&str> {
        self.cache_key.as_deref()
    }

    pub fn error(&self) -> Option<&CapturedError> {
        self.error.as_ref()
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    // == JSON ==
    /// Flat JSON object suitable for structured log sinks.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        if let Some(key) = &self.cache_key {
            write!(f, " key={}", key)?;
        }
        if let Some(error) = &self.error {
            write!(f, " error=\"{}\"", error)?;
        }
        Ok(())
    }
}
