//! Union/variant validation
//!
//! Alternatives are tried strictly in declaration order. The first success
//! wins and nothing after it runs. Total failure keeps one full error per
//! alternative, in order, with no deduplication — renderers decide how to
//! summarize.

use std::borrow::Cow;

use async_trait::async_trait;

use crate::core::errors::{ErrType, Invalid, Validated};
use crate::core::traits::{BoxValidator, Validator};
use crate::core::value::Value;

// ============================================================================
// HOMOGENEOUS UNION
// ============================================================================

/// A union whose alternatives all produce the same output type.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// // "id" may arrive as a UUID value or a UUID string.
/// let id = UnionValidator::new(UuidValidator::new().without_coercion())
///     .variant(UuidValidator::new());
/// ```
pub struct UnionValidator<T: Send + 'static> {
    variants: Vec<BoxValidator<T>>,
}

impl<T> UnionValidator<T>
where
    T: Send + Sync + 'static,
{
    /// Creates a union with its first alternative; a union of zero
    /// alternatives cannot exist.
    #[must_use]
    pub fn new(first: impl Validator<T> + 'static) -> Self {
        Self {
            variants: vec![Box::new(first)],
        }
    }

    /// Appends an alternative; declaration order is evaluation order.
    #[must_use]
    pub fn variant(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.variants.push(Box::new(validator));
        self
    }
}

#[async_trait]
impl<T> Validator<T> for UnionValidator<T>
where
    T: Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<T> {
        let mut variants = Vec::with_capacity(self.variants.len());
        for (i, validator) in self.variants.iter().enumerate() {
            match validator.validate(value) {
                Ok(out) => {
                    tracing::trace!(variant = i, "union variant matched");
                    return Ok(out);
                }
                Err(invalid) => variants.push(invalid),
            }
        }
        Err(Invalid::new(
            ErrType::VariantErrs { variants },
            value.clone(),
            self.name(),
        ))
    }

    async fn validate_async(&self, value: &Value) -> Validated<T> {
        let mut variants = Vec::with_capacity(self.variants.len());
        for (i, validator) in self.variants.iter().enumerate() {
            match validator.validate_async(value).await {
                Ok(out) => {
                    tracing::trace!(variant = i, "union variant matched");
                    return Ok(out);
                }
                Err(invalid) => variants.push(invalid),
            }
        }
        Err(Invalid::new(
            ErrType::VariantErrs { variants },
            value.clone(),
            self.name(),
        ))
    }

    fn requires_async(&self) -> bool {
        self.variants.iter().any(|v| v.requires_async())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("UnionValidator")
    }
}

// ============================================================================
// TAGGED UNIONS
// ============================================================================

/// The output of a two-alternative heterogeneous union, tagged with which
/// alternative matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneOf2<A, B> {
    First(A),
    Second(B),
}

/// The output of a three-alternative heterogeneous union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OneOf3<A, B, C> {
    First(A),
    Second(B),
    Third(C),
}

/// Tries two validators of unrelated output types in order.
pub struct OneOf2Validator<A: Send + 'static, B: Send + 'static> {
    first: BoxValidator<A>,
    second: BoxValidator<B>,
}

impl<A, B> OneOf2Validator<A, B>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(first: impl Validator<A> + 'static, second: impl Validator<B> + 'static) -> Self {
        Self {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

#[async_trait]
impl<A, B> Validator<OneOf2<A, B>> for OneOf2Validator<A, B>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<OneOf2<A, B>> {
        let first = match self.first.validate(value) {
            Ok(out) => return Ok(OneOf2::First(out)),
            Err(invalid) => invalid,
        };
        let second = match self.second.validate(value) {
            Ok(out) => return Ok(OneOf2::Second(out)),
            Err(invalid) => invalid,
        };
        Err(Invalid::new(
            ErrType::VariantErrs {
                variants: vec![first, second],
            },
            value.clone(),
            self.name(),
        ))
    }

    async fn validate_async(&self, value: &Value) -> Validated<OneOf2<A, B>> {
        let first = match self.first.validate_async(value).await {
            Ok(out) => return Ok(OneOf2::First(out)),
            Err(invalid) => invalid,
        };
        let second = match self.second.validate_async(value).await {
            Ok(out) => return Ok(OneOf2::Second(out)),
            Err(invalid) => invalid,
        };
        Err(Invalid::new(
            ErrType::VariantErrs {
                variants: vec![first, second],
            },
            value.clone(),
            self.name(),
        ))
    }

    fn requires_async(&self) -> bool {
        self.first.requires_async() || self.second.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("OneOf2Validator")
    }
}

/// Tries three validators of unrelated output types in order.
pub struct OneOf3Validator<A: Send + 'static, B: Send + 'static, C: Send + 'static> {
    first: BoxValidator<A>,
    second: BoxValidator<B>,
    third: BoxValidator<C>,
}

impl<A, B, C> OneOf3Validator<A, B, C>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(
        first: impl Validator<A> + 'static,
        second: impl Validator<B> + 'static,
        third: impl Validator<C> + 'static,
    ) -> Self {
        Self {
            first: Box::new(first),
            second: Box::new(second),
            third: Box::new(third),
        }
    }
}

#[async_trait]
impl<A, B, C> Validator<OneOf3<A, B, C>> for OneOf3Validator<A, B, C>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    C: Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<OneOf3<A, B, C>> {
        let first = match self.first.validate(value) {
            Ok(out) => return Ok(OneOf3::First(out)),
            Err(invalid) => invalid,
        };
        let second = match self.second.validate(value) {
            Ok(out) => return Ok(OneOf3::Second(out)),
            Err(invalid) => invalid,
        };
        let third = match self.third.validate(value) {
            Ok(out) => return Ok(OneOf3::Third(out)),
            Err(invalid) => invalid,
        };
        Err(Invalid::new(
            ErrType::VariantErrs {
                variants: vec![first, second, third],
            },
            value.clone(),
            self.name(),
        ))
    }

    async fn validate_async(&self, value: &Value) -> Validated<OneOf3<A, B, C>> {
        let first = match self.first.validate_async(value).await {
            Ok(out) => return Ok(OneOf3::First(out)),
            Err(invalid) => invalid,
        };
        let second = match self.second.validate_async(value).await {
            Ok(out) => return Ok(OneOf3::Second(out)),
            Err(invalid) => invalid,
        };
        let third = match self.third.validate_async(value).await {
            Ok(out) => return Ok(OneOf3::Third(out)),
            Err(invalid) => invalid,
        };
        Err(Invalid::new(
            ErrType::VariantErrs {
                variants: vec![first, second, third],
            },
            value.clone(),
            self.name(),
        ))
    }

    fn requires_async(&self) -> bool {
        self.first.requires_async() || self.second.requires_async() || self.third.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("OneOf3Validator")
    }
}

// ============================================================================
// OPTIONAL
// ============================================================================

/// Accepts null or the inner validator's type, producing `Option<T>`.
///
/// Modeled as the two-alternative union {null, inner} rather than bespoke
/// logic, so its failure shape is a regular two-entry variant error.
pub struct OptionalValidator<T: Send + 'static> {
    none: crate::validators::scalar::NoneValidator,
    inner: BoxValidator<T>,
}

impl<T> OptionalValidator<T>
where
    T: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(inner: impl Validator<T> + 'static) -> Self {
        Self {
            none: crate::validators::scalar::NoneValidator::new(),
            inner: Box::new(inner),
        }
    }
}

#[async_trait]
impl<T> Validator<Option<T>> for OptionalValidator<T>
where
    T: Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<Option<T>> {
        let none_err = match self.none.validate(value) {
            Ok(()) => return Ok(None),
            Err(invalid) => invalid,
        };
        let inner_err = match self.inner.validate(value) {
            Ok(out) => return Ok(Some(out)),
            Err(invalid) => invalid,
        };
        Err(Invalid::new(
            ErrType::VariantErrs {
                variants: vec![none_err, inner_err],
            },
            value.clone(),
            self.name(),
        ))
    }

    async fn validate_async(&self, value: &Value) -> Validated<Option<T>> {
        let none_err = match self.none.validate_async(value).await {
            Ok(()) => return Ok(None),
            Err(invalid) => invalid,
        };
        let inner_err = match self.inner.validate_async(value).await {
            Ok(out) => return Ok(Some(out)),
            Err(invalid) => invalid,
        };
        Err(Invalid::new(
            ErrType::VariantErrs {
                variants: vec![none_err, inner_err],
            },
            value.clone(),
            self.name(),
        ))
    }

    fn requires_async(&self) -> bool {
        self.inner.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("OptionalValidator")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ValueType;
    use crate::validators::scalar::{IntValidator, StringValidator};

    #[test]
    fn first_match_wins() {
        let validator = OneOf2Validator::new(StringValidator::new(), IntValidator::new());
        assert_eq!(
            validator.validate(&Value::Int(5)),
            Ok(OneOf2::Second(5))
        );
        assert_eq!(
            validator.validate(&Value::from("five")),
            Ok(OneOf2::First("five".to_owned()))
        );
    }

    #[test]
    fn all_variant_errors_kept_in_order() {
        let validator = OneOf2Validator::new(StringValidator::new(), IntValidator::new());
        let invalid = validator.validate(&Value::Float(5.5)).unwrap_err();
        let ErrType::VariantErrs { variants } = invalid.err else {
            panic!("expected variant errors");
        };
        assert_eq!(
            variants[0].err,
            ErrType::Type {
                expected: ValueType::String
            }
        );
        assert_eq!(
            variants[1].err,
            ErrType::Type {
                expected: ValueType::Integer
            }
        );
    }

    #[test]
    fn optional_accepts_null_and_inner() {
        let validator = OptionalValidator::new(IntValidator::new());
        assert_eq!(validator.validate(&Value::Null), Ok(None));
        assert_eq!(validator.validate(&Value::Int(3)), Ok(Some(3)));

        let invalid = validator.validate(&Value::from("x")).unwrap_err();
        let ErrType::VariantErrs { variants } = invalid.err else {
            panic!("expected variant errors");
        };
        assert_eq!(variants.len(), 2);
    }
}
