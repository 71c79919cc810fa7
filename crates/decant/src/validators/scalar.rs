//! Scalar validators
//!
//! One generic engine drives every scalar: exact type check, optional
//! coercion, processors in registration order, then **all** predicates
//! (sync first, then async on the async path), collecting every failure.
//!
//! The per-type aliases ([`StringValidator`], [`IntValidator`], …) differ
//! only in their [`ScalarType`] impl: how to extract the payload from a
//! [`Value`], and whether a default coercer applies (UUIDs, decimals, and
//! temporal values accept string representations out of the box).

use std::borrow::Cow;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::{ErrType, Invalid, PredicateErr, Validated};
use crate::core::traits::{Coercer, Predicate, PredicateAsync, Processor, Validator};
use crate::core::value::{Value, ValueType};

// ============================================================================
// SCALAR TYPE
// ============================================================================

/// A Rust type a scalar validator can produce from a [`Value`].
pub trait ScalarType: Sized + Clone + Send + Sync + 'static {
    /// The validator name reported in errors.
    const NAME: &'static str;

    /// The runtime type required when no coercer applies.
    const TYPE: ValueType;

    /// Exact extraction: succeeds only when `value` already has the target
    /// runtime type. Coercion is a separate, explicit step.
    fn extract(value: &Value) -> Option<Self>;

    /// The coercer installed by [`ScalarValidator::new`], when this type
    /// conventionally accepts more than one raw representation.
    fn default_coercer() -> Option<Coercer<Self>> {
        None
    }
}

impl ScalarType for String {
    const NAME: &'static str = "StringValidator";
    const TYPE: ValueType = ValueType::String;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl ScalarType for i64 {
    const NAME: &'static str = "IntValidator";
    const TYPE: ValueType = ValueType::Integer;

    // `Value::Bool` is a distinct variant, so booleans can never pass the
    // integer check here, whatever the upstream host representation did.
    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl ScalarType for f64 {
    const NAME: &'static str = "FloatValidator";
    const TYPE: ValueType = ValueType::Float;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl ScalarType for bool {
    const NAME: &'static str = "BoolValidator";
    const TYPE: ValueType = ValueType::Bool;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl ScalarType for Vec<u8> {
    const NAME: &'static str = "BytesValidator";
    const TYPE: ValueType = ValueType::Bytes;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl ScalarType for () {
    const NAME: &'static str = "NoneValidator";
    const TYPE: ValueType = ValueType::Null;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(()),
            _ => None,
        }
    }
}

impl ScalarType for Decimal {
    const NAME: &'static str = "DecimalValidator";
    const TYPE: ValueType = ValueType::Decimal;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    fn default_coercer() -> Option<Coercer<Self>> {
        Some(Coercer::new(
            [ValueType::String, ValueType::Integer, ValueType::Decimal],
            |value: &Value| match value {
                Value::Decimal(d) => Some(*d),
                Value::Int(i) => Some(Decimal::from(*i)),
                Value::Str(s) => Decimal::from_str(s).ok(),
                _ => None,
            },
        ))
    }
}

impl ScalarType for Uuid {
    const NAME: &'static str = "UuidValidator";
    const TYPE: ValueType = ValueType::Uuid;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    fn default_coercer() -> Option<Coercer<Self>> {
        Some(Coercer::new(
            [ValueType::String, ValueType::Uuid],
            |value: &Value| match value {
                Value::Uuid(u) => Some(*u),
                Value::Str(s) => Uuid::parse_str(s).ok(),
                _ => None,
            },
        ))
    }
}

impl ScalarType for NaiveDate {
    const NAME: &'static str = "DateValidator";
    const TYPE: ValueType = ValueType::Date;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Accepts ISO `yyyy-mm-dd` strings.
    fn default_coercer() -> Option<Coercer<Self>> {
        Some(Coercer::new(
            [ValueType::String, ValueType::Date],
            |value: &Value| match value {
                Value::Date(d) => Some(*d),
                Value::Str(s) => s.parse::<NaiveDate>().ok(),
                _ => None,
            },
        ))
    }
}

impl ScalarType for NaiveDateTime {
    const NAME: &'static str = "DatetimeValidator";
    const TYPE: ValueType = ValueType::DateTime;

    fn extract(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Accepts ISO 8601 strings without a timezone offset.
    fn default_coercer() -> Option<Coercer<Self>> {
        Some(Coercer::new(
            [ValueType::String, ValueType::DateTime],
            |value: &Value| match value {
                Value::DateTime(dt) => Some(*dt),
                Value::Str(s) => s.parse::<NaiveDateTime>().ok(),
                _ => None,
            },
        ))
    }
}

// ============================================================================
// SCALAR VALIDATOR
// ============================================================================

/// The generic scalar engine. Usually used through the aliases below.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// let age = IntValidator::new().predicate(Min::new(0));
/// assert_eq!(age.validate(&Value::Int(30)), Ok(30));
///
/// // Booleans never pass an integer check:
/// assert!(age.validate(&Value::Bool(true)).is_err());
/// ```
pub struct ScalarValidator<T: ScalarType> {
    predicates: Vec<Box<dyn Predicate<T>>>,
    predicates_async: Vec<Box<dyn PredicateAsync<T>>>,
    preprocessors: Vec<Box<dyn Processor<T>>>,
    coerce: Option<Coercer<T>>,
}

/// Type-checks strings.
pub type StringValidator = ScalarValidator<String>;
/// Type-checks integers; booleans are explicitly rejected.
pub type IntValidator = ScalarValidator<i64>;
/// Type-checks floats.
pub type FloatValidator = ScalarValidator<f64>;
/// Type-checks booleans.
pub type BoolValidator = ScalarValidator<bool>;
/// Type-checks byte strings.
pub type BytesValidator = ScalarValidator<Vec<u8>>;
/// Accepts only null; the validated output is `()`.
pub type NoneValidator = ScalarValidator<()>;
/// Accepts decimals, coercing from strings and integers by default.
pub type DecimalValidator = ScalarValidator<Decimal>;
/// Accepts UUIDs, coercing from strings by default.
pub type UuidValidator = ScalarValidator<Uuid>;
/// Accepts dates, coercing from ISO `yyyy-mm-dd` strings by default.
pub type DateValidator = ScalarValidator<NaiveDate>;
/// Accepts datetimes, coercing from ISO 8601 strings by default.
pub type DatetimeValidator = ScalarValidator<NaiveDateTime>;

impl<T: ScalarType> ScalarValidator<T> {
    /// Creates the validator with the type's default coercer (if any) and
    /// no predicates or processors.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            predicates_async: Vec::new(),
            preprocessors: Vec::new(),
            coerce: T::default_coercer(),
        }
    }

    /// Adds a refinement. All registered predicates run; every failure is
    /// reported, not just the first.
    #[must_use]
    pub fn predicate(mut self, predicate: impl Predicate<T> + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Adds an async-only refinement. The validator then requires the
    /// asynchronous entry point.
    #[must_use]
    pub fn predicate_async(mut self, predicate: impl PredicateAsync<T> + 'static) -> Self {
        self.predicates_async.push(Box::new(predicate));
        self
    }

    /// Adds a transformation applied after the type check/coercion and
    /// before predicates, in registration order.
    #[must_use]
    pub fn preprocess(mut self, processor: impl Processor<T> + 'static) -> Self {
        self.preprocessors.push(Box::new(processor));
        self
    }

    /// Replaces the coercer.
    #[must_use]
    pub fn coerce(mut self, coercer: Coercer<T>) -> Self {
        self.coerce = Some(coercer);
        self
    }

    /// Removes the coercer; only the exact runtime type is accepted.
    #[must_use]
    pub fn without_coercion(mut self) -> Self {
        self.coerce = None;
        self
    }

    fn check_type(&self, value: &Value) -> Validated<T> {
        if let Some(found) = T::extract(value) {
            return Ok(found);
        }
        match &self.coerce {
            Some(coercer) => coercer.coerce(value).ok_or_else(|| {
                Invalid::coercion_err(coercer.compatible().to_vec(), T::TYPE, value, T::NAME)
            }),
            None => Err(Invalid::type_err(T::TYPE, value, T::NAME)),
        }
    }

    fn apply_processors(&self, mut found: T) -> T {
        for processor in &self.preprocessors {
            found = processor.process(found);
        }
        found
    }
}

impl<T: ScalarType> Default for ScalarValidator<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: ScalarType> Validator<T> for ScalarValidator<T> {
    fn validate(&self, value: &Value) -> Validated<T> {
        assert!(
            self.predicates_async.is_empty(),
            "{} cannot run async predicates in a synchronous call; \
             await `validate_async` instead, or remove them",
            T::NAME,
        );

        let found = self.apply_processors(self.check_type(value)?);

        let failed: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(&found))
            .map(|pred| pred.err())
            .collect();

        if failed.is_empty() {
            Ok(found)
        } else {
            Err(Invalid::new(
                ErrType::Predicates { failed },
                value.clone(),
                T::NAME,
            ))
        }
    }

    async fn validate_async(&self, value: &Value) -> Validated<T> {
        let found = self.apply_processors(self.check_type(value)?);

        let mut failed: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(&found))
            .map(|pred| pred.err())
            .collect();

        for pred in &self.predicates_async {
            if !pred.is_valid_async(&found).await {
                failed.push(pred.err());
            }
        }

        if failed.is_empty() {
            Ok(found)
        } else {
            Err(Invalid::new(
                ErrType::Predicates { failed },
                value.clone(),
                T::NAME,
            ))
        }
    }

    fn requires_async(&self) -> bool {
        !self.predicates_async.is_empty()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(T::NAME)
    }
}

/// The shared null validator, handy inside unions.
#[must_use]
pub fn none_validator() -> NoneValidator {
    NoneValidator::new()
}

// ============================================================================
// TESTS
// ============================================================================
