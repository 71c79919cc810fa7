//! Core capability traits
//!
//! This module defines the contracts every validator, predicate, processor,
//! and coercer implements. The design rules:
//!
//! - **Failures are returned, never thrown.** Every data-shape problem comes
//!   back as an [`Invalid`] value. The only panics in this crate are misuse
//!   guards for broken *construction* (e.g. calling the synchronous entry
//!   point on a validator that owns async-only predicates), which must be
//!   loud and must never be confused with bad input.
//! - **Dual execution paths.** Every validator has a synchronous and an
//!   asynchronous entry point with identical semantics; the async path may
//!   suspend inside [`PredicateAsync`] or async whole-object hooks. The
//!   caller picks the path per invocation.
//! - **Graphs are immutable and shareable.** Validators are `Send + Sync`
//!   and composition is ownership; `Arc`/`Box` blanket impls let one graph
//!   serve many concurrent validations.

use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::errors::{PredicateErr, Validated};
use crate::core::value::{Value, ValueType};

// ============================================================================
// VALIDATOR
// ============================================================================

/// The core capability: narrow an untyped [`Value`] into a typed `T`, or
/// explain precisely why that's impossible.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// let validator = StringValidator::new().predicate(MinLength::new(4));
/// assert_eq!(validator.validate(&Value::from("good")), Ok("good".to_owned()));
/// assert!(validator.validate(&Value::from("bad")).is_err());
/// ```
#[async_trait]
pub trait Validator<T>: Send + Sync
where
    T: Send + 'static,
{
    /// Validates synchronously.
    ///
    /// # Panics
    ///
    /// If this node owns async-only predicates or an async whole-object
    /// hook. That is a programming error, not a validation failure; use
    /// [`Validator::validate_async`].
    fn validate(&self, value: &Value) -> Validated<T>;

    /// Validates with suspension points allowed. Semantics are identical to
    /// [`Validator::validate`]; additionally runs any async predicates and
    /// hooks, awaiting each to completion in registration order so error
    /// aggregation stays deterministic.
    async fn validate_async(&self, value: &Value) -> Validated<T> {
        self.validate(value)
    }

    /// True when this node or any reachable descendant carries async-only
    /// behavior. Computed from construction-time state, not reflection.
    fn requires_async(&self) -> bool {
        false
    }

    /// The name reported in [`Invalid::validator`](crate::core::errors::Invalid).
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

#[async_trait]
impl<T, V> Validator<T> for Box<V>
where
    T: Send + 'static,
    V: Validator<T> + ?Sized,
{
    fn validate(&self, value: &Value) -> Validated<T> {
        (**self).validate(value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<T> {
        (**self).validate_async(value).await
    }

    fn requires_async(&self) -> bool {
        (**self).requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        (**self).name()
    }
}

#[async_trait]
impl<T, V> Validator<T> for Arc<V>
where
    T: Send + 'static,
    V: Validator<T> + ?Sized,
{
    fn validate(&self, value: &Value) -> Validated<T> {
        (**self).validate(value)
    }

    async fn validate_async(&self, value: &Value) -> Validated<T> {
        (**self).validate_async(value).await
    }

    fn requires_async(&self) -> bool {
        (**self).requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        (**self).name()
    }
}

/// A boxed, type-erased validator. The standard representation for child
/// validators inside containers, records, and unions.
pub type BoxValidator<T> = Box<dyn Validator<T>>;

/// A shared validator, for graphs referenced from several places (notably
/// [`Lazy`](crate::combinators::Lazy) factories returning singletons).
pub type SharedValidator<T> = Arc<dyn Validator<T>>;

// ============================================================================
// PREDICATES
// ============================================================================

/// A pure boolean refinement over an already type-correct value.
///
/// A predicate must not mutate or replace the value (that is what
/// [`Processor`] is for), and it carries enough state to render itself into
/// an error: `MinLength::new(5)` reports itself as `min_length` with its
/// threshold. When several predicates are attached to one validator, **all**
/// of them run; every failure is collected.
pub trait Predicate<T>: Send + Sync {
    fn is_valid(&self, value: &T) -> bool;

    /// The identity/state rendered into
    /// [`ErrType::Predicates`](crate::core::errors::ErrType::Predicates).
    fn err(&self) -> PredicateErr;
}

/// A refinement that needs the asynchronous path — typically because it
/// performs I/O (uniqueness lookups, remote policy checks).
///
/// Attaching one of these to a validator makes the synchronous entry point
/// panic: any I/O-requiring graph must be driven through
/// [`Validator::validate_async`].
#[async_trait]
pub trait PredicateAsync<T>: Send + Sync
where
    T: Sync,
{
    async fn is_valid_async(&self, value: &T) -> bool;

    fn err(&self) -> PredicateErr;
}

// ============================================================================
// PROCESSOR
// ============================================================================

/// A total, order-sensitive transformation applied after the type
/// check/coercion and before predicates — trimming, case-folding,
/// key-stripping. Processors registered on one validator run in
/// registration order.
pub trait Processor<T>: Send + Sync {
    fn process(&self, value: T) -> T;
}

// ============================================================================
// COERCER
// ============================================================================

/// Converts acceptable non-exact representations into the target type,
/// e.g. a string into a UUID. Carries the declared set of compatible source
/// types so coercion errors can say what would have been accepted.
pub struct Coercer<T> {
    func: Arc<dyn Fn(&Value) -> Option<T> + Send + Sync>,
    compatible: Vec<ValueType>,
}

impl<T> Coercer<T> {
    pub fn new(
        compatible: impl Into<Vec<ValueType>>,
        func: impl Fn(&Value) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            func: Arc::new(func),
            compatible: compatible.into(),
        }
    }

    /// Attempts the conversion; `None` means the content (or type) was not
    /// convertible.
    pub fn coerce(&self, value: &Value) -> Option<T> {
        (self.func)(value)
    }

    /// The source types this coercer declares it can convert from.
    #[must_use]
    pub fn compatible(&self) -> &[ValueType] {
        &self.compatible
    }
}

impl<T> Clone for Coercer<T> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
            compatible: self.compatible.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Coercer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coercer")
            .field("compatible", &self.compatible)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Invalid;

    struct IsNull;

    impl Validator<()> for IsNull {
        fn validate(&self, value: &Value) -> Validated<()> {
            if matches!(value, Value::Null) {
                Ok(())
            } else {
                Err(Invalid::type_err(ValueType::Null, value, self.name()))
            }
        }
    }

    #[test]
    fn boxed_validators_delegate() {
        let boxed: BoxValidator<()> = Box::new(IsNull);
        assert!(boxed.validate(&Value::Null).is_ok());
        assert!(boxed.validate(&Value::Int(1)).is_err());
        assert!(!boxed.requires_async());
    }

    #[test]
    fn shared_validators_delegate() {
        let shared: SharedValidator<()> = Arc::new(IsNull);
        assert!(shared.validate(&Value::Null).is_ok());
    }

    #[test]
    fn coercer_reports_compatible_types() {
        let coercer = Coercer::new([ValueType::String], |v: &Value| match v {
            Value::Str(s) => s.parse::<i64>().ok(),
            _ => None,
        });
        assert_eq!(coercer.coerce(&Value::from("42")), Some(42));
        assert_eq!(coercer.coerce(&Value::from("x")), None);
        assert_eq!(coercer.compatible(), &[ValueType::String]);
    }
}
