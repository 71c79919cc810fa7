//! Built-in validators
//!
//! # Categories
//!
//! - **Scalars**: type-check + coerce + refine for primitives
//!   ([`StringValidator`], [`IntValidator`], [`UuidValidator`], …)
//! - **Containers**: [`ListValidator`], [`SetValidator`], [`MapValidator`],
//!   [`UniformTupleValidator`] — iterate and validate each element,
//!   aggregating every error
//! - **Records**: [`RecordValidator`] and [`DictValidatorAny`] — closed key
//!   sets into typed products or validated maps
//! - **Positional products**: [`TupleValidator`] — fixed arity,
//!   heterogeneous positions
//! - **Unions**: [`UnionValidator`], [`OneOf2Validator`],
//!   [`OneOf3Validator`], [`OptionalValidator`] — ordered alternatives,
//!   first success wins
//! - **Predicates/processors**: refinements and transformations attached to
//!   the above ([`string`], [`generic`])

pub mod generic;
pub mod list;
pub mod map;
pub mod record;
pub mod scalar;
pub mod set;
pub mod string;
pub mod tuple;
pub mod union;

pub use generic::{
    Choices, EqualTo, ExactItemCount, Max, MaxItems, MaxKeys, Min, MinItems, MinKeys, MultipleOf,
    UniqueItems,
};
pub use list::ListValidator;
pub use map::MapValidator;
pub use record::{
    DictValidatorAny, Erased, FieldSpec, FieldTuple, OptionalKey, RecordValidator, RequiredKey,
    erased, key, maybe_key,
};
pub use scalar::{
    BoolValidator, BytesValidator, DateValidator, DatetimeValidator, DecimalValidator,
    FloatValidator, IntValidator, NoneValidator, ScalarType, ScalarValidator, StringValidator,
    UuidValidator, none_validator,
};
pub use set::SetValidator;
pub use string::{
    EmailPredicate, EndsWith, ExactLength, LowerCase, MaxLength, MinLength, NotBlank,
    RegexPredicate, StartsWith, Strip, UpperCase,
};
pub use tuple::{IntoSlots, TupleValidator, UniformTupleValidator};
pub use union::{
    OneOf2, OneOf2Validator, OneOf3, OneOf3Validator, OptionalValidator, UnionValidator,
};
