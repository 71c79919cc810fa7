//! The error taxonomy
//!
//! Validation failures are values, never panics. Every failure is an
//! [`Invalid`] carrying an [`ErrType`] — a closed, exhaustively matchable
//! set of variants that nest along the shape of the data, so the location
//! of a failure is reconstructible without a separate path side-channel.
//!
//! Renderers (see [`crate::serialize`]) pattern-match over `ErrType`; new
//! failure kinds must extend this enum rather than smuggling strings
//! through [`ErrType::Custom`].

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;
use thiserror::Error;

use crate::core::value::{Key, Value, ValueType};

// ============================================================================
// PREDICATE ERR
// ============================================================================

/// The rendered identity of one failed predicate.
///
/// Predicates render themselves into a stable `code`, a human-readable
/// `message`, and the parameters that define them, so `MinLength(5)` stays
/// recognizable inside an error tree.
///
/// Uses `Cow<'static, str>` for zero allocation in the common case of
/// static codes and messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateErr {
    /// Stable code for programmatic handling, e.g. `"min_length"`.
    pub code: Cow<'static, str>,
    /// Human-readable message, e.g. `"minimum allowed length is 5"`.
    pub message: Cow<'static, str>,
    /// The predicate's parameters, e.g. `[("min", "5")]`.
    pub params: SmallVec<[(Cow<'static, str>, String); 2]>,
}

impl PredicateErr {
    pub fn new(
        code: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            params: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<Cow<'static, str>>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }
}

// ============================================================================
// KEY/VALUE ERRS
// ============================================================================

/// Key and/or value errors from a single map entry, reported jointly.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValErrs {
    pub key: Option<Box<Invalid>>,
    pub val: Option<Box<Invalid>>,
}

// ============================================================================
// ERR TYPE
// ============================================================================

/// Why validation failed at one position in the input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrType {
    /// A specific runtime type was required but not found.
    #[error("expected {expected}")]
    Type { expected: ValueType },

    /// The value's type was coercion-compatible but its content could not
    /// be converted.
    #[error("could not coerce to {dest}")]
    Coercion {
        compatible: Vec<ValueType>,
        dest: ValueType,
    },

    /// A fixed-arity positional sequence had the wrong length.
    #[error("expected a sequence of length {expected}")]
    Arity { expected: usize },

    /// One or more refinement checks failed; every failure is kept.
    #[error("one or more predicates failed")]
    Predicates { failed: Vec<PredicateErr> },

    /// A required record key was absent.
    #[error("key missing")]
    MissingKey,

    /// The input carried keys not present in the declared key set.
    #[error("received unknown keys")]
    ExtraKeys { expected: BTreeSet<Key> },

    /// Per-key nested errors for a record-like map.
    #[error("one or more keys failed validation")]
    KeyErrs { keys: BTreeMap<Key, Invalid> },

    /// Container-level predicate failures plus per-position nested errors
    /// for an ordered container.
    #[error("one or more positions failed validation")]
    IndexErrs {
        container: Vec<PredicateErr>,
        indexes: BTreeMap<usize, Invalid>,
    },

    /// Container-level predicate failures plus member errors for a set;
    /// member errors carry no positions.
    #[error("one or more members failed validation")]
    SetErrs {
        container: Vec<PredicateErr>,
        items: Vec<Invalid>,
    },

    /// Container-level predicate failures plus per-entry key/value errors
    /// for a map-like container.
    #[error("one or more entries failed validation")]
    MapErrs {
        container: Vec<PredicateErr>,
        entries: BTreeMap<Key, KeyValErrs>,
    },

    /// No alternative of a union matched; one error per alternative, in
    /// declaration order.
    #[error("no variant matched")]
    VariantErrs { variants: Vec<Invalid> },

    /// An application-supplied refusal, typically from a whole-object hook.
    #[error("{message}")]
    Custom { message: Cow<'static, str> },
}

// ============================================================================
// INVALID / VALIDATED
// ============================================================================

/// A failed validation: the reason, the input that failed at this node, and
/// the name of the validator that rejected it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{err}")]
pub struct Invalid {
    /// Why this position failed.
    pub err: ErrType,
    /// The (pre-validation) value at this position.
    pub value: Value,
    /// The producing validator's name; see
    /// [`Validator::name`](crate::core::traits::Validator::name).
    pub validator: Cow<'static, str>,
}

impl Invalid {
    pub fn new(err: ErrType, value: Value, validator: impl Into<Cow<'static, str>>) -> Self {
        Self {
            err,
            value,
            validator: validator.into(),
        }
    }

    /// Wrong runtime type at this position.
    pub fn type_err(
        expected: ValueType,
        value: &Value,
        validator: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrType::Type { expected }, value.clone(), validator)
    }

    /// Content could not be coerced to the destination type.
    pub fn coercion_err(
        compatible: Vec<ValueType>,
        dest: ValueType,
        value: &Value,
        validator: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(ErrType::Coercion { compatible, dest }, value.clone(), validator)
    }

    /// An application-supplied refusal.
    pub fn custom(
        message: impl Into<Cow<'static, str>>,
        value: &Value,
        validator: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(
            ErrType::Custom {
                message: message.into(),
            },
            value.clone(),
            validator,
        )
    }
}

/// The single outcome of a validation call: a typed success or one
/// [`Invalid`] tree. `Result` supplies the monadic combinators.
pub type Validated<T> = Result<T, Invalid>;

// ============================================================================
// TESTS
// ============================================================================
