//! # decant
//!
//! A composable validation engine for untyped, JSON-like data: type-check,
//! coerce, refine, and transform a [`Value`](core::Value) into a typed Rust
//! value, accumulating structured, nested error information when validation
//! fails. A foundation for request/response validators, form validators,
//! and config loaders.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use decant::prelude::*;
//!
//! struct Person { name: String, age: i64 }
//!
//! let validator = RecordValidator::new(
//!     |name, age| Person { name, age },
//!     (
//!         key("name", StringValidator::new().predicate(MinLength::new(1))),
//!         key("age", IntValidator::new().predicate(Min::new(0))),
//!     ),
//! );
//!
//! let input = Value::from(serde_json::json!({"name": "Bob", "age": 30}));
//! let person = validator.validate(&input)?;
//! ```
//!
//! ## Design
//!
//! - Validation failures are **returned values** ([`Invalid`](core::Invalid)
//!   trees), never panics. Every failing predicate, every bad field, and
//!   every failed union alternative is kept — one pass reports everything.
//! - Every validator has a synchronous and an asynchronous entry point with
//!   identical semantics; async-only predicates and hooks make the
//!   synchronous entry point panic, loudly separating "broken validator
//!   setup" from "bad input".
//! - Record validation is **closed-world**: keys not in the declared set
//!   are rejected before any field runs.
//! - Validator graphs are immutable after construction and shareable across
//!   concurrent validations.

// `Invalid` carries the failed value and a nested error tree inline —
// boxing it would add indirection to every validation call for no
// practical benefit.
#![allow(clippy::result_large_err)]

pub mod combinators;
pub mod core;
pub mod prelude;
pub mod serialize;
pub mod validators;
