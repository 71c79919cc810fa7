//! Prelude for convenient imports.
//!
//! `use decant::prelude::*;` brings in the core types, every built-in
//! validator, the common predicates and processors, and the combinators.

// ============================================================================
// CORE: values, results, errors, capability traits
// ============================================================================

pub use crate::core::{
    BoxValidator, Coercer, ErrType, Invalid, Key, KeyValErrs, Predicate, PredicateAsync,
    PredicateErr, Presence, Processor, SharedValidator, Validated, Validator, Value, ValueType,
};

// ============================================================================
// VALIDATORS: all built-ins, predicates, and processors
// ============================================================================

pub use crate::validators::*;

// ============================================================================
// COMBINATORS
// ============================================================================

pub use crate::combinators::{Cached, Lazy, MokaCache, ValidationCache, cached, lazy};

// ============================================================================
// ERROR RENDERING
// ============================================================================

pub use crate::serialize::to_serializable_errs;
