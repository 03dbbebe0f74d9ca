//! Cache Builder Module
//!
//! Immutable, chainable configuration of a cache-aside lookup and the `get`
//! orchestration that runs it.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::builder::hooks::{
    default_key_producer, default_lifespan_producer, fixed_lifespan_producer, present_validator,
    DispatcherFactory, KeyProducer, LifespanProducer, Producer, Validator,
};
use crate::cache::Cache;
use crate::config::Config;
use crate::events::{
    CapturedError, Event, EventDispatcher, EventState, NullDispatcher, TracingDispatcher,
};
use crate::id::{IdGenerator, UuidGenerator};

// == Session State ==
/// Values resolved lazily during `get`, scoped to one builder instance.
#[derive(Default)]
struct Session {
    /// Sink created by the lazy factory
    dispatcher: OnceCell<Arc<dyn EventDispatcher>>,
    /// Memoized key, outer `None` = stale
    cache_key: RefCell<Option<Option<String>>>,
    /// Generated when no explicit id was set
    correlation_id: OnceCell<String>,
}

/// Outcome of the cache read step.
enum Lookup<T> {
    Hit(Option<T>),
    Miss,
}

// == Cache Builder ==
/// Cache-aside lookup: read from cache, fall back to building the value,
/// write the built value back, and report every step as an [`Event`].
///
/// Every `with_*` method returns a new builder and leaves the receiver
/// untouched. Closures and handles are shared between the copies.
///
/// # Concurrency
/// `get` memoizes the cache key, the lazily created event sink and the
/// generated correlation id inside the instance without synchronization, so
/// the type is `Send` but not `Sync`. Callers that need concurrent lookups
/// derive one builder per thread (`clone` or any `with_*` call).
///
/// # Example
/// ```ignore
/// let user = CacheBuilder::new()
///     .with_cache(redis, move || Some(format!("user:{}", id)))
///     .with_producer(move || load_user(id).map(Some))
///     .with_cache_lifespan(|_| 300)
///     .with_event_dispatcher(TracingDispatcher)
///     .get();
/// ```
pub struct CacheBuilder<T> {
    producer: Option<Producer<T>>,
    build_validator: Validator<T>,
    cache_validator: Validator<T>,
    cache: Option<Arc<dyn Cache<T>>>,
    cache_key_producer: KeyProducer,
    cache_lifespan_producer: LifespanProducer<T>,
    dispatcher: Option<Arc<dyn EventDispatcher>>,
    lazy_dispatcher: Option<DispatcherFactory<T>>,
    id_generator: Arc<dyn IdGenerator>,
    correlation_id: Option<String>,
    session: Session,
}

impl<T: 'static> CacheBuilder<T> {
    // == Constructor ==
    /// Creates a builder with no cache and no producer.
    ///
    /// Both validators accept any present value, the key producer yields no
    /// key and the lifespan producer returns 0.
    pub fn new() -> Self {
        Self {
            producer: None,
            build_validator: present_validator(),
            cache_validator: present_validator(),
            cache: None,
            cache_key_producer: default_key_producer(),
            cache_lifespan_producer: default_lifespan_producer(),
            dispatcher: None,
            lazy_dispatcher: None,
            id_generator: Arc::new(UuidGenerator),
            correlation_id: None,
            session: Session::default(),
        }
    }

    /// Creates a builder seeded with the given defaults.
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new();
        builder.cache_lifespan_producer = fixed_lifespan_producer(config.default_lifespan);
        if config.trace_events {
            builder.lazy_dispatcher = Some(Arc::new(|_builder: &CacheBuilder<T>| {
                Arc::new(TracingDispatcher) as Arc<dyn EventDispatcher>
            }));
        }
        builder
    }

    // == Configuration ==
    /// Sets the function that produces the value on a cache miss.
    pub fn with_producer<F>(&self, producer: F) -> Self
    where
        F: Fn() -> anyhow::Result<Option<T>> + Send + Sync + 'static,
    {
        let mut instance = self.clone();
        instance.producer = Some(Arc::new(producer));
        instance
    }

    /// Sets the predicate deciding whether a built value may be cached.
    pub fn with_build_validator<F>(&self, validator: F) -> Self
    where
        F: Fn(Option<&T>) -> bool + Send + Sync + 'static,
    {
        let mut instance = self.clone();
        instance.build_validator = Arc::new(validator);
        instance
    }

    /// Sets the predicate deciding whether a cached value counts as a hit.
    pub fn with_cache_validator<F>(&self, validator: F) -> Self
    where
        F: Fn(Option<&T>) -> bool + Send + Sync + 'static,
    {
        let mut instance = self.clone();
        instance.cache_validator = Arc::new(validator);
        instance
    }

    /// Attaches a cache and the function resolving its key.
    ///
    /// A key producer returning `None` skips the cache for that step.
    pub fn with_cache<C, K>(&self, cache: C, cache_key_producer: K) -> Self
    where
        C: Cache<T> + 'static,
        K: Fn() -> Option<String> + Send + Sync + 'static,
    {
        let mut instance = self.clone();
        instance.cache = Some(Arc::new(cache));
        instance.cache_key_producer = Arc::new(cache_key_producer);
        instance
    }

    /// Sets the function computing the lifespan (seconds) of written values.
    pub fn with_cache_lifespan<F>(&self, lifespan_producer: F) -> Self
    where
        F: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        let mut instance = self.clone();
        instance.cache_lifespan_producer = Arc::new(lifespan_producer);
        instance
    }

    /// Attaches an event sink. Takes precedence over a lazy factory.
    pub fn with_event_dispatcher<D>(&self, dispatcher: D) -> Self
    where
        D: EventDispatcher + 'static,
    {
        let mut instance = self.clone();
        instance.dispatcher = Some(Arc::new(dispatcher));
        instance
    }

    /// Sets a factory that creates the event sink on first dispatch.
    ///
    /// The factory receives the builder and runs at most once per instance.
    /// Any previously attached sink is dropped.
    pub fn with_lazy_event_dispatcher<F>(&self, factory: F) -> Self
    where
        F: Fn(&CacheBuilder<T>) -> Arc<dyn EventDispatcher> + Send + Sync + 'static,
    {
        let mut instance = self.clone();
        instance.dispatcher = None;
        instance.lazy_dispatcher = Some(Arc::new(factory));
        instance
    }

    /// Sets the token attached to every event from this builder.
    pub fn with_correlation_id(&self, correlation_id: impl Into<String>) -> Self {
        let mut instance = self.clone();
        instance.correlation_id = Some(correlation_id.into());
        instance
    }

    /// Replaces the generator used when no correlation id was set.
    pub fn with_id_generator<G>(&self, id_generator: G) -> Self
    where
        G: IdGenerator + 'static,
    {
        let mut instance = self.clone();
        instance.id_generator = Arc::new(id_generator);
        instance
    }

    // == Accessors ==
    pub fn cache(&self) -> Option<&Arc<dyn Cache<T>>> {
        self.cache.as_ref()
    }

    pub fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    /// Returns the memoized cache key, resolving it first if stale.
    pub fn cache_key(&self) -> Option<String> {
        if let Some(key) = self.session.cache_key.borrow().as_ref() {
            return key.clone();
        }
        // resolved outside the borrow, the producer may call back into us
        let key = (self.cache_key_producer)();
        *self.session.cache_key.borrow_mut() = Some(key.clone());
        key
    }

    /// Returns the explicit correlation id, or one generated on first use.
    pub fn correlation_id(&self) -> &str {
        match &self.correlation_id {
            Some(id) => id,
            None => self
                .session
                .correlation_id
                .get_or_init(|| self.id_generator.new_id()),
        }
    }

    // == Get ==
    /// Returns the value, preferring the cache and falling back to the
    /// producer.
    ///
    /// Never fails: cache faults are reported as events and treated as a
    /// miss (read) or a skipped write (write), producer faults are reported
    /// and treated as an absent result. A built value the build validator
    /// rejects is still returned, it is only kept out of the cache.
    ///
    /// Returns `None` when nothing was cached and no producer is set.
    pub fn get(&self) -> Option<T> {
        if let Some(cache) = &self.cache {
            match self.cache_key() {
                Some(key) => {
                    if let Lookup::Hit(value) = self.read(cache.as_ref(), &key) {
                        return value;
                    }
                }
                None => debug!("No cache key resolved, skipping cache read"),
            }
        }

        let Some(producer) = &self.producer else {
            debug!("No producer configured, nothing to build");
            return None;
        };

        self.dispatch(Event::new(EventState::BuildStart));
        let result = match producer() {
            Ok(value) => value,
            Err(err) => {
                warn!(correlation_id = self.correlation_id(), "Build failed: {:#}", err);
                self.dispatch(Event::new(EventState::BuildError).with_error(err));
                None
            }
        };

        if !(self.build_validator)(result.as_ref()) {
            self.dispatch(Event::new(EventState::BuildFail));
            return result;
        }
        self.dispatch(Event::new(EventState::BuildSuccess));

        // the build may have changed the state the key is derived from
        self.invalidate_cache_key();
        if let Some(cache) = &self.cache {
            match (self.cache_key(), result.as_ref()) {
                (Some(key), Some(value)) => self.write(cache.as_ref(), &key, value),
                (None, _) => debug!("No cache key resolved after build, skipping cache write"),
                (Some(key), None) => debug!(key = %key, "Built value is absent, skipping cache write"),
            }
        }

        result
    }

    // == Cache Steps ==
    fn read(&self, cache: &dyn Cache<T>, key: &str) -> Lookup<T> {
        self.dispatch(Event::new(EventState::CacheGetStart));
        let candidate = match cache.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, correlation_id = self.correlation_id(), "Cache read failed: {}", err);
                self.dispatch(
                    Event::new(EventState::CacheGetError).with_error(CapturedError::cache(err)),
                );
                None
            }
        };

        if (self.cache_validator)(candidate.as_ref()) {
            self.dispatch(Event::new(EventState::CacheGetHit));
            return Lookup::Hit(candidate);
        }
        self.dispatch(Event::new(EventState::CacheGetMiss));
        Lookup::Miss
    }

    fn write(&self, cache: &dyn Cache<T>, key: &str, value: &T) {
        let lifespan = (self.cache_lifespan_producer)(value);
        self.dispatch(Event::new(EventState::CacheSetStart));
        match cache.set(key, value, lifespan) {
            Ok(true) => self.dispatch(Event::new(EventState::CacheSetSuccess)),
            Ok(false) => {
                debug!(key, "Cache declined write");
                self.dispatch(Event::new(EventState::CacheSetFail));
            }
            Err(err) => {
                warn!(key, correlation_id = self.correlation_id(), "Cache write failed: {}", err);
                self.dispatch(
                    Event::new(EventState::CacheSetError).with_error(CapturedError::cache(err)),
                );
            }
        }
    }

    fn invalidate_cache_key(&self) {
        *self.session.cache_key.borrow_mut() = None;
    }

    // == Dispatch ==
    fn dispatch(&self, event: Event) {
        let dispatcher = self.dispatcher();
        let mut event = event.with_correlation_id(self.correlation_id());
        if let Some(cache) = &self.cache {
            event = event.with_cache_identity(cache.store_tag(), self.cache_key());
        }
        debug!(
            state = event.name(),
            correlation_id = self.correlation_id(),
            key = event.cache_key().unwrap_or("-"),
            "Dispatching event"
        );
        dispatcher.dispatch(event);
    }

    fn dispatcher(&self) -> &dyn EventDispatcher {
        if let Some(dispatcher) = &self.dispatcher {
            return dispatcher.as_ref();
        }
        if let Some(dispatcher) = self.session.dispatcher.get() {
            return dispatcher.as_ref();
        }
        let resolved = match &self.lazy_dispatcher {
            Some(factory) => factory(self),
            None => Arc::new(NullDispatcher) as Arc<dyn EventDispatcher>,
        };
        self.session.dispatcher.get_or_init(|| resolved).as_ref()
    }
}

impl<T: 'static> Default for CacheBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies the configuration; memoized session state starts fresh.
impl<T> Clone for CacheBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            producer: self.producer.clone(),
            build_validator: self.build_validator.clone(),
            cache_validator: self.cache_validator.clone(),
            cache: self.cache.clone(),
            cache_key_producer: self.cache_key_producer.clone(),
            cache_lifespan_producer: self.cache_lifespan_producer.clone(),
            dispatcher: self.dispatcher.clone(),
            lazy_dispatcher: self.lazy_dispatcher.clone(),
            id_generator: self.id_generator.clone(),
            correlation_id: self.correlation_id.clone(),
            session: Session::default(),
        }
    }
}

impl<T> fmt::Debug for CacheBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheBuilder")
            .field("has_producer", &self.producer.is_some())
            .field("cache", &self.cache.as_ref().map(|cache| cache.store_tag()))
            .field("has_dispatcher", &self.dispatcher.is_some())
            .field("has_lazy_dispatcher", &self.lazy_dispatcher.is_some())
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}
