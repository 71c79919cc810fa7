//! Set validation
//!
//! Same container policy as lists (see [`crate::validators::list`]), but
//! members are unordered: member errors carry no positions and are
//! collected as a multiset keyed only by content.

use std::borrow::Cow;
use std::collections::HashSet;
use std::hash::Hash;

use async_trait::async_trait;

use crate::core::errors::{ErrType, Invalid, PredicateErr, Validated};
use crate::core::traits::{BoxValidator, Predicate, PredicateAsync, Validator};
use crate::core::value::{Value, ValueType};

/// Validates a set by validating every member with one item validator,
/// producing a `HashSet<T>`.
pub struct SetValidator<T: Send + 'static> {
    item: BoxValidator<T>,
    predicates: Vec<Box<dyn Predicate<Vec<Value>>>>,
    predicates_async: Vec<Box<dyn PredicateAsync<Vec<Value>>>>,
}

impl<T> SetValidator<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(item: impl Validator<T> + 'static) -> Self {
        Self {
            item: Box::new(item),
            predicates: Vec::new(),
            predicates_async: Vec::new(),
        }
    }

    /// Adds a container-level refinement over the raw members.
    #[must_use]
    pub fn predicate(mut self, predicate: impl Predicate<Vec<Value>> + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn predicate_async(
        mut self,
        predicate: impl PredicateAsync<Vec<Value>> + 'static,
    ) -> Self {
        self.predicates_async.push(Box::new(predicate));
        self
    }

    fn finish(
        &self,
        value: &Value,
        container: Vec<PredicateErr>,
        items: Vec<Invalid>,
        validated: HashSet<T>,
    ) -> Validated<HashSet<T>> {
        match (container.is_empty(), items.is_empty()) {
            (true, true) => Ok(validated),
            (false, true) => Err(Invalid::new(
                ErrType::Predicates { failed: container },
                value.clone(),
                self.name(),
            )),
            _ => Err(Invalid::new(
                ErrType::SetErrs { container, items },
                value.clone(),
                self.name(),
            )),
        }
    }
}

#[async_trait]
impl<T> Validator<HashSet<T>> for SetValidator<T>
where
    T: Eq + Hash + Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<HashSet<T>> {
        assert!(
            self.predicates_async.is_empty(),
            "{} cannot run async predicates in a synchronous call; \
             await `validate_async` instead, or remove them",
            self.name(),
        );

        let Value::Set(members) = value else {
            return Err(Invalid::type_err(ValueType::Set, value, self.name()));
        };

        let container: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(members))
            .map(|pred| pred.err())
            .collect();

        let mut validated = HashSet::with_capacity(members.len());
        let mut items = Vec::new();
        for member in members {
            match self.item.validate(member) {
                Ok(out) => {
                    validated.insert(out);
                }
                Err(invalid) => items.push(invalid),
            }
        }

        self.finish(value, container, items, validated)
    }

    async fn validate_async(&self, value: &Value) -> Validated<HashSet<T>> {
        let Value::Set(members) = value else {
            return Err(Invalid::type_err(ValueType::Set, value, self.name()));
        };

        let mut container: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(members))
            .map(|pred| pred.err())
            .collect();
        for pred in &self.predicates_async {
            if !pred.is_valid_async(members).await {
                container.push(pred.err());
            }
        }

        let mut validated = HashSet::with_capacity(members.len());
        let mut items = Vec::new();
        for member in members {
            match self.item.validate_async(member).await {
                Ok(out) => {
                    validated.insert(out);
                }
                Err(invalid) => items.push(invalid),
            }
        }

        self.finish(value, container, items, validated)
    }

    fn requires_async(&self) -> bool {
        !self.predicates_async.is_empty() || self.item.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("SetValidator")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::scalar::IntValidator;

    fn set_of(values: Vec<Value>) -> Value {
        Value::Set(values)
    }

    #[test]
    fn valid_sets_produce_hash_sets() {
        let validator = SetValidator::new(IntValidator::new());
        let result = validator.validate(&set_of(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(result, Ok(HashSet::from([1, 2])));
    }

    #[test]
    fn member_errors_carry_no_positions() {
        let validator = SetValidator::new(IntValidator::new());
        let invalid = validator
            .validate(&set_of(vec![
                Value::Int(1),
                Value::from("x"),
                Value::from("y"),
            ]))
            .unwrap_err();
        let ErrType::SetErrs { container, items } = invalid.err else {
            panic!("expected set errors");
        };
        assert!(container.is_empty());
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn lists_are_not_sets() {
        let validator = SetValidator::new(IntValidator::new());
        let invalid = validator.validate(&Value::List(vec![])).unwrap_err();
        assert_eq!(
            invalid.err,
            ErrType::Type {
                expected: ValueType::Set
            }
        );
    }
}
