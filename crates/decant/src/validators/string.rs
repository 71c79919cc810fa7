//! String predicates and processors
//!
//! Lengths are measured in Unicode scalar values.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::PredicateErr;
use crate::core::traits::{Predicate, Processor};

// ============================================================================
// LENGTH PREDICATES
// ============================================================================

/// Requires at least `min` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLength {
    pub min: usize,
}

impl MinLength {
    #[must_use]
    pub fn new(min: usize) -> Self {
        Self { min }
    }
}

impl Predicate<String> for MinLength {
    fn is_valid(&self, value: &String) -> bool {
        value.chars().count() >= self.min
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new(
            "min_length",
            format!("minimum allowed length is {}", self.min),
        )
        .with_param("min", self.min)
    }
}

/// Requires at most `max` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLength {
    pub max: usize,
}

impl MaxLength {
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self { max }
    }
}

impl Predicate<String> for MaxLength {
    fn is_valid(&self, value: &String) -> bool {
        value.chars().count() <= self.max
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new(
            "max_length",
            format!("maximum allowed length is {}", self.max),
        )
        .with_param("max", self.max)
    }
}

/// Requires exactly `length` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactLength {
    pub length: usize,
}

impl ExactLength {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Predicate<String> for ExactLength {
    fn is_valid(&self, value: &String) -> bool {
        value.chars().count() == self.length
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new("exact_length", format!("expected length of {}", self.length))
            .with_param("length", self.length)
    }
}

// ============================================================================
// CONTENT PREDICATES
// ============================================================================

/// Rejects strings that are empty or whitespace-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotBlank;

impl Predicate<String> for NotBlank {
    fn is_valid(&self, value: &String) -> bool {
        !value.trim().is_empty()
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new("not_blank", "cannot be blank")
    }
}

/// Requires a match of the given pattern anywhere in the string. Anchor the
/// pattern (`^...$`) for full-string matching.
#[derive(Debug, Clone)]
pub struct RegexPredicate {
    pub pattern: Regex,
}

impl RegexPredicate {
    #[must_use]
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Predicate<String> for RegexPredicate {
    fn is_valid(&self, value: &String) -> bool {
        self.pattern.is_match(value)
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new(
            "pattern",
            format!("must match pattern {}", self.pattern.as_str()),
        )
        .with_param("pattern", self.pattern.as_str())
    }
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\\.[a-zA-Z0-9-.]+$").expect("email pattern compiles")
});

/// A pragmatic email shape check, not a full RFC 5322 parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailPredicate;

impl Predicate<String> for EmailPredicate {
    fn is_valid(&self, value: &String) -> bool {
        EMAIL_PATTERN.is_match(value)
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new("email", "expected a valid email address")
    }
}

/// Requires the given prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartsWith {
    pub prefix: String,
}

impl StartsWith {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Predicate<String> for StartsWith {
    fn is_valid(&self, value: &String) -> bool {
        value.starts_with(&self.prefix)
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new("starts_with", format!("must start with {:?}", self.prefix))
            .with_param("prefix", &self.prefix)
    }
}

/// Requires the given suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndsWith {
    pub suffix: String,
}

impl EndsWith {
    #[must_use]
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Predicate<String> for EndsWith {
    fn is_valid(&self, value: &String) -> bool {
        value.ends_with(&self.suffix)
    }

    fn err(&self) -> PredicateErr {
        PredicateErr::new("ends_with", format!("must end with {:?}", self.suffix))
            .with_param("suffix", &self.suffix)
    }
}

// ============================================================================
// PROCESSORS
// ============================================================================

/// Trims surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strip;

impl Processor<String> for Strip {
    fn process(&self, value: String) -> String {
        value.trim().to_owned()
    }
}

/// Uppercases the whole string.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperCase;

impl Processor<String> for UpperCase {
    fn process(&self, value: String) -> String {
        value.to_uppercase()
    }
}

/// Lowercases the whole string.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCase;

impl Processor<String> for LowerCase {
    fn process(&self, value: String) -> String {
        value.to_lowercase()
    }
}

// ============================================================================
// TESTS
// ============================================================================
