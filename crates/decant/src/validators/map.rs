//! Homogeneous map validation
//!
//! Validates *keys* through a key validator and values through a value
//! validator; key and value errors for the same entry are reported jointly
//! rather than first-come-first-kept. Container policy as in
//! [`crate::validators::list`].

use std::borrow::Cow;
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::core::errors::{ErrType, Invalid, KeyValErrs, PredicateErr, Validated};
use crate::core::traits::{BoxValidator, Predicate, PredicateAsync, Processor, Validator};
use crate::core::value::{Key, Value, ValueType};

/// Validates a map of homogeneous entries into a `BTreeMap<K, V>`.
///
/// Input keys are presented to the key validator as [`Value`]s (a string
/// key arrives as `Value::Str`, a tuple key as a list), so keys can be
/// coerced and refined like any other value — e.g. a map keyed by dates.
pub struct MapValidator<K: Send + 'static, V: Send + 'static> {
    key: BoxValidator<K>,
    value: BoxValidator<V>,
    predicates: Vec<Box<dyn Predicate<BTreeMap<Key, Value>>>>,
    predicates_async: Vec<Box<dyn PredicateAsync<BTreeMap<Key, Value>>>>,
    preprocessors: Vec<Box<dyn Processor<BTreeMap<Key, Value>>>>,
}

impl<K, V> MapValidator<K, V>
where
    K: Ord + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    #[must_use]
    pub fn new(key: impl Validator<K> + 'static, value: impl Validator<V> + 'static) -> Self {
        Self {
            key: Box::new(key),
            value: Box::new(value),
            predicates: Vec::new(),
            predicates_async: Vec::new(),
            preprocessors: Vec::new(),
        }
    }

    /// Adds a container-level refinement (entry-count bounds and the like);
    /// these see the raw entries, not the validated ones.
    #[must_use]
    pub fn predicate(
        mut self,
        predicate: impl Predicate<BTreeMap<Key, Value>> + 'static,
    ) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    #[must_use]
    pub fn predicate_async(
        mut self,
        predicate: impl PredicateAsync<BTreeMap<Key, Value>> + 'static,
    ) -> Self {
        self.predicates_async.push(Box::new(predicate));
        self
    }

    /// Adds a whole-map transformation applied before any checking.
    #[must_use]
    pub fn preprocess(
        mut self,
        processor: impl Processor<BTreeMap<Key, Value>> + 'static,
    ) -> Self {
        self.preprocessors.push(Box::new(processor));
        self
    }

    fn prepare(&self, value: &Value) -> Validated<BTreeMap<Key, Value>> {
        let Value::Map(entries) = value else {
            return Err(Invalid::type_err(ValueType::Map, value, self.name()));
        };
        let mut entries = entries.clone();
        for processor in &self.preprocessors {
            entries = processor.process(entries);
        }
        Ok(entries)
    }

    fn finish(
        &self,
        value: &Value,
        container: Vec<PredicateErr>,
        entries: BTreeMap<Key, KeyValErrs>,
        validated: BTreeMap<K, V>,
    ) -> Validated<BTreeMap<K, V>> {
        match (container.is_empty(), entries.is_empty()) {
            (true, true) => Ok(validated),
            (false, true) => Err(Invalid::new(
                ErrType::Predicates { failed: container },
                value.clone(),
                self.name(),
            )),
            _ => Err(Invalid::new(
                ErrType::MapErrs { container, entries },
                value.clone(),
                self.name(),
            )),
        }
    }
}

#[async_trait]
impl<K, V> Validator<BTreeMap<K, V>> for MapValidator<K, V>
where
    K: Ord + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn validate(&self, value: &Value) -> Validated<BTreeMap<K, V>> {
        assert!(
            self.predicates_async.is_empty(),
            "{} cannot run async predicates in a synchronous call; \
             await `validate_async` instead, or remove them",
            self.name(),
        );

        let raw = self.prepare(value)?;

        let container: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(&raw))
            .map(|pred| pred.err())
            .collect();

        let mut validated = BTreeMap::new();
        let mut entries = BTreeMap::new();
        for (raw_key, raw_val) in &raw {
            let key_result = self.key.validate(&Value::from(raw_key.clone()));
            let val_result = self.value.validate(raw_val);
            match (key_result, val_result) {
                (Ok(k), Ok(v)) => {
                    validated.insert(k, v);
                }
                (key_result, val_result) => {
                    entries.insert(
                        raw_key.clone(),
                        KeyValErrs {
                            key: key_result.err().map(Box::new),
                            val: val_result.err().map(Box::new),
                        },
                    );
                }
            }
        }

        self.finish(value, container, entries, validated)
    }

    async fn validate_async(&self, value: &Value) -> Validated<BTreeMap<K, V>> {
        let raw = self.prepare(value)?;

        let mut container: Vec<PredicateErr> = self
            .predicates
            .iter()
            .filter(|pred| !pred.is_valid(&raw))
            .map(|pred| pred.err())
            .collect();
        for pred in &self.predicates_async {
            if !pred.is_valid_async(&raw).await {
                container.push(pred.err());
            }
        }

        let mut validated = BTreeMap::new();
        let mut entries = BTreeMap::new();
        for (raw_key, raw_val) in &raw {
            let key_result = self.key.validate_async(&Value::from(raw_key.clone())).await;
            let val_result = self.value.validate_async(raw_val).await;
            match (key_result, val_result) {
                (Ok(k), Ok(v)) => {
                    validated.insert(k, v);
                }
                (key_result, val_result) => {
                    entries.insert(
                        raw_key.clone(),
                        KeyValErrs {
                            key: key_result.err().map(Box::new),
                            val: val_result.err().map(Box::new),
                        },
                    );
                }
            }
        }

        self.finish(value, container, entries, validated)
    }

    fn requires_async(&self) -> bool {
        !self.predicates_async.is_empty()
            || self.key.requires_async()
            || self.value.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("MapValidator")
    }
}

// ============================================================================
// TESTS
// ============================================================================
