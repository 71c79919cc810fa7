//! Homogeneous list validation
//!
//! Container policy (shared with sets and maps): a wrong outer type fails
//! immediately; otherwise container-level predicates are all evaluated
//! against the raw contents AND every item is validated, and the two error
//! classes are merged into one node. When only container predicates failed,
//! the result is a plain predicate-failure error.

use std::borrow::Cow;
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::core::errors::{ErrType, Invalid, PredicateErr, Validated};
use crate::core::traits::{BoxValidator, Predicate, PredicateAsync, Processor, Validator};
use crate::core::value::{Value, ValueType};

/// Validates a list by validating every item with one item validator,
/// producing a `Vec<T>`. Index order in the error map matches input order.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// let numbers = ListValidator::new(IntValidator::new()).predicate(MinItems::new(1));
/// assert_eq!(
///     numbers.validate(&Value::from(serde_json::json!([1, 2, 3]))),
///     Ok(vec![1, 2, 3]),
/// );
/// ```
pub struct ListValidator<T: Send + 'static> {
    item: BoxValidator<T>,
    predicates: Vec<Box<dyn Predicate<Vec<Value>>>>,
    predicates_async: Vec<Box<dyn PredicateAsync<Vec<Value>>>>,
    preprocessors: Vec<Box<dyn Processor<Vec<Value>>>>,
}

impl<T> ListValidator<T>
where
    T: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(item: impl Validator<T> + 'static) -> Self {
        Self {
            item: Box::new(item),
            predicates: Vec::new(),
            predicates_async: Vec::new(),
            preprocessors: Vec::new(),
        }
    }

    /// Adds a container-level refinement (size bounds, uniqueness). Runs
    /// against the raw contents, independently of item outcomes.
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

    /// Adds a whole-container transformation applied before any checking.
    #[must_use]
    pub fn preprocess(mut self, processor: impl Processor<Vec<Value>> + 'static) -> Self {
        self.preprocessors.push(Box::new(processor));
        self
    }

    fn prepare(&self, value: &Value) -> Validated<Vec<Value>> {
        let Value::List(items) = value else {
            return Err(Invalid::type_err(ValueType::List, value, self.name()));
        };
        let mut items = items.clone();
        for processor in &self.preprocessors {
            items = processor.process(items);
        }
        Ok(items)
    }

    fn finish(
        &self,
        value: &Value,
        container: Vec<PredicateErr>,
        indexes: BTreeMap<usize, Invalid>,
        validated: Vec<T>,
    ) -> Validated<Vec<T>> {
        match (container.is_empty(), indexes.is_empty()) {
            (true, true) => Ok(validated),
            (false, true) => Err(Invalid::new(
                ErrType::Predicates { failed: container },
                value.clone(),
                self.name(),
            )),
            _ => Err(Invalid::new(
                ErrType::IndexErrs { container, indexes },
                value.clone(),
                self.name(),
            )),
        }
    }
}

#[async_trait]
impl<T> Validator<Vec<T>> for ListValidator<T>
where
    T: Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<Vec<T>> {
        assert!(
            self.predicates_async.is_empty(),
            "{} cannot run async predicates in a synchronous call; \
             await `validate_async` instead, or remove them",
            self.name(),
        );

        let items = self.prepare(value)?;

        let container: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(&items))
            .map(|pred| pred.err())
            .collect();

        let mut validated = Vec::with_capacity(items.len());
        let mut indexes = BTreeMap::new();
        for (i, item) in items.iter().enumerate() {
            match self.item.validate(item) {
                Ok(out) => validated.push(out),
                Err(invalid) => {
                    indexes.insert(i, invalid);
                }
            }
        }

        self.finish(value, container, indexes, validated)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Vec<T>> {
        let items = self.prepare(value)?;

        let mut container: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(&items))
            .map(|pred| pred.err())
            .collect();
        for pred in &self.predicates_async {
            if !pred.is_valid_async(&items).await {
                container.push(pred.err());
            }
        }

        let mut validated = Vec::with_capacity(items.len());
        let mut indexes = BTreeMap::new();
        for (i, item) in items.iter().enumerate() {
            match self.item.validate_async(item).await {
                Ok(out) => validated.push(out),
                Err(invalid) => {
                    indexes.insert(i, invalid);
                }
            }
        }

        self.finish(value, container, indexes, validated)
    }

    fn requires_async(&self) -> bool {
        !self.predicates_async.is_empty() || self.item.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("ListValidator")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::generic::{MinItems, UniqueItems};
    use crate::validators::scalar::IntValidator;
    use serde_json::json;

    #[test]
    fn bad_indexes_only_are_reported() {
        let validator = ListValidator::new(IntValidator::new());
        let invalid = validator
            .validate(&Value::from(json!([1, "x", 2, "y"])))
            .unwrap_err();
        let ErrType::IndexErrs { container, indexes } = invalid.err else {
            panic!("expected index errors");
        };
        assert!(container.is_empty());
        assert_eq!(indexes.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn container_only_failures_are_predicate_errors() {
        let validator = ListValidator::new(IntValidator::new()).predicate(MinItems::new(3));
        let invalid = validator.validate(&Value::from(json!([1]))).unwrap_err();
        assert!(matches!(invalid.err, ErrType::Predicates { .. }));
    }

    #[test]
    fn container_and_item_failures_merge() {
        let validator = ListValidator::new(IntValidator::new())
            .predicate(MinItems::new(3))
            .predicate(UniqueItems);
        let invalid = validator
            .validate(&Value::from(json!([1, "x"])))
            .unwrap_err();
        let ErrType::IndexErrs { container, indexes } = invalid.err else {
            panic!("expected merged index errors");
        };
        assert_eq!(container.len(), 1);
        assert_eq!(indexes.len(), 1);
    }

    #[test]
    fn valid_lists_produce_typed_vectors() {
        let validator = ListValidator::new(IntValidator::new());
        assert_eq!(
            validator.validate(&Value::from(json!([1, 2, 3]))),
            Ok(vec![1, 2, 3])
        );
    }
}
