//! Deferred validator construction
//!
//! The sanctioned mechanism for self-referential schemas: a validator that
//! refers to itself cannot be constructed eagerly without already existing,
//! so the cycle is broken by a factory invoked at validation time.

use std::borrow::Cow;

use async_trait::async_trait;

use crate::core::errors::Validated;
use crate::core::traits::{SharedValidator, Validator};
use crate::core::value::Value;

/// Wraps a zero-argument factory returning the validator to use.
///
/// The factory runs on every validation; nothing is memoized here. A
/// factory that wants one shared graph should return a clone of an `Arc`'d
/// singleton — that choice belongs to the caller, not the wrapper.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// // A node with an optional next node of the same shape.
/// fn node_validator() -> SharedValidator<NodeData> {
///     Arc::new(RecordValidator::new(
///         NodeData::new,
///         (
///             key("value", IntValidator::new()),
///             maybe_key("next", Lazy::new(node_validator)),
///         ),
///     ))
/// }
/// ```
pub struct Lazy<T: Send + 'static> {
    factory: Box<dyn Fn() -> SharedValidator<T> + Send + Sync>,
}

impl<T: Send + 'static> Lazy<T> {
    #[must_use]
    pub fn new(factory: impl Fn() -> SharedValidator<T> + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
        }
    }
}

/// Creates a [`Lazy`] wrapper.
pub fn lazy<T: Send + 'static>(
    factory: impl Fn() -> SharedValidator<T> + Send + Sync + 'static,
) -> Lazy<T> {
    Lazy::new(factory)
}

#[async_trait]
impl<T> Validator<T> for Lazy<T>
where
    T: Send + 'static,
{
    fn validate(&self, value: &Value) -> Validated<T> {
        (self.factory)().validate(value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<T> {
        (self.factory)().validate_async(value).await
    }

    fn requires_async(&self) -> bool {
        (self.factory)().requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("Lazy")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::scalar::IntValidator;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn factory_runs_per_validation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let validator = lazy(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            Arc::new(IntValidator::new()) as SharedValidator<i64>
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(validator.validate(&Value::Int(1)), Ok(1));
        assert_eq!(validator.validate(&Value::Int(2)), Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
