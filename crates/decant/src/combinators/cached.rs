//! Memoized validation
//!
//! The opt-in cache extension point. The core stays cache-oblivious: a
//! [`Cached`] wrapper calls through an injected [`ValidationCache`]
//! strategy, keyed by input value. Implementations must be safe under
//! concurrent use; a redundant recomputation on a race is acceptable, a
//! wrong result is not.

use std::borrow::Cow;
use std::hash::{BuildHasher, Hash, RandomState};
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::errors::Validated;
use crate::core::traits::{BoxValidator, Validator};
use crate::core::value::Value;

// ============================================================================
// CACHE STRATEGY
// ============================================================================

/// Get/put storage for memoized results, keyed by input value
/// identity/equality.
pub trait ValidationCache<T>: Send + Sync {
    fn get(&self, value: &Value) -> Option<Validated<T>>;

    fn put(&self, value: &Value, result: &Validated<T>);
}

/// The provided default: a bounded, thread-safe `moka` cache.
///
/// Entries are looked up by hash but verified by equality against the
/// stored input, so a hash collision can only cost a recomputation, never
/// return a result for the wrong input.
pub struct MokaCache<T> {
    entries: moka::sync::Cache<u64, (Value, Validated<T>)>,
    hasher: RandomState,
}

impl<T> MokaCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            entries: moka::sync::Cache::builder().max_capacity(capacity).build(),
            hasher: RandomState::new(),
        }
    }

    fn key_of(&self, value: &Value) -> u64 {
        let mut state = self.hasher.build_hasher();
        value.hash(&mut state);
        std::hash::Hasher::finish(&state)
    }
}

impl<T> ValidationCache<T> for MokaCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get(&self, value: &Value) -> Option<Validated<T>> {
        let (stored, result) = self.entries.get(&self.key_of(value))?;
        (stored == *value).then_some(result)
    }

    fn put(&self, value: &Value, result: &Validated<T>) {
        self.entries
            .insert(self.key_of(value), (value.clone(), result.clone()));
    }
}

// ============================================================================
// CACHED COMBINATOR
// ============================================================================

/// Wraps a validator with memoization through an injected cache.
pub struct Cached<T: Send + 'static> {
    inner: BoxValidator<T>,
    cache: Arc<dyn ValidationCache<T>>,
}

impl<T> Cached<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(inner: impl Validator<T> + 'static, cache: Arc<dyn ValidationCache<T>>) -> Self {
        Self {
            inner: Box::new(inner),
            cache,
        }
    }

    /// Convenience constructor using [`MokaCache`] with the given capacity.
    #[must_use]
    pub fn with_capacity(inner: impl Validator<T> + 'static, capacity: u64) -> Self {
        Self::new(inner, Arc::new(MokaCache::new(capacity)))
    }
}

/// Creates a [`Cached`] combinator.
pub fn cached<T>(
    inner: impl Validator<T> + 'static,
    cache: Arc<dyn ValidationCache<T>>,
) -> Cached<T>
where
    T: Clone + Send + Sync + 'static,
{
    Cached::new(inner, cache)
}

#[async_trait]
impl<T> Validator<T> for Cached<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<T> {
        if let Some(hit) = self.cache.get(value) {
            tracing::trace!("validation cache hit");
            return hit;
        }
        let result = self.inner.validate(value);
        self.cache.put(value, &result);
        result
    }

    async fn validate_async(&self, value: &Value) -> Validated<T> {
        if let Some(hit) = self.cache.get(value) {
            tracing::trace!("validation cache hit");
            return hit;
        }
        let result = self.inner.validate_async(value).await;
        self.cache.put(value, &result);
        result
    }

    fn requires_async(&self) -> bool {
        self.inner.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        self.inner.name()
    }
}

// ============================================================================
// TESTS
// ============================================================================
