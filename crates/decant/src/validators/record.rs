//! Record validation: closed key sets into typed products
//!
//! A record validator declares a fixed set of keys, each with its own
//! validator, and a constructor that assembles the typed product. Keys not
//! in the declared set are rejected unconditionally, before any field
//! validation, by an O(input-size) membership pre-pass: these validators
//! model *closed* records (config objects, strict API payloads) where a
//! silently ignored typo in a key is a correctness risk.
//!
//! Field validation never stops at the first failure: a record with three
//! bad fields reports three errors. The constructor (and any whole-object
//! hook) runs only when every field validated.
//!
//! Arity over field tuples is expanded by a local macro — one generics
//! instantiation per field count, the same contract at each arity.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::core::errors::{ErrType, Invalid, Validated};
use crate::core::presence::Presence;
use crate::core::traits::{BoxValidator, Processor, Validator};
use crate::core::value::{Key, Value, ValueType};

// ============================================================================
// FIELD SPECS
// ============================================================================

/// One declared record field: where to look and how to validate what's
/// found (or not found) there.
#[async_trait]
pub trait FieldSpec: Send + Sync {
    type Output: Send + 'static;

    fn key(&self) -> &Key;

    fn requires_async(&self) -> bool;

    /// Validates the looked-up value; `None` means the key was absent.
    fn run(&self, found: Option<&Value>) -> Validated<Self::Output>;

    async fn run_async(&self, found: Option<&Value>) -> Validated<Self::Output>;
}

/// A field whose key must be present.
pub struct RequiredKey<T: Send + 'static> {
    key: Key,
    validator: BoxValidator<T>,
}

/// Declares a required field.
pub fn key<T>(key: impl Into<Key>, validator: impl Validator<T> + 'static) -> RequiredKey<T>
where
    T: Send + 'static,
{
    RequiredKey {
        key: key.into(),
        validator: Box::new(validator),
    }
}

#[async_trait]
impl<T> FieldSpec for RequiredKey<T>
where
    T: Send + 'static,
{
    type Output = T;

    fn key(&self) -> &Key {
        &self.key
    }

    fn requires_async(&self) -> bool {
        self.validator.requires_async()
    }

    fn run(&self, found: Option<&Value>) -> Validated<T> {
        match found {
            Some(value) => self.validator.validate(value),
            None => Err(Invalid::new(
                ErrType::MissingKey,
                Value::Null,
                self.validator.name(),
            )),
        }
    }

    async fn run_async(&self, found: Option<&Value>) -> Validated<T> {
        match found {
            Some(value) => self.validator.validate_async(value).await,
            None => Err(Invalid::new(
                ErrType::MissingKey,
                Value::Null,
                self.validator.name(),
            )),
        }
    }
}

/// A field whose key may be absent; absence yields [`Presence::Absent`],
/// which is not an error and not null.
pub struct OptionalKey<T: Send + 'static> {
    key: Key,
    validator: BoxValidator<T>,
}

/// Declares an optional field.
pub fn maybe_key<T>(key: impl Into<Key>, validator: impl Validator<T> + 'static) -> OptionalKey<T>
where
    T: Send + 'static,
{
    OptionalKey {
        key: key.into(),
        validator: Box::new(validator),
    }
}

#[async_trait]
impl<T> FieldSpec for OptionalKey<T>
where
    T: Send + 'static,
{
    type Output = Presence<T>;

    fn key(&self) -> &Key {
        &self.key
    }

    fn requires_async(&self) -> bool {
        self.validator.requires_async()
    }

    fn run(&self, found: Option<&Value>) -> Validated<Presence<T>> {
        match found {
            Some(value) => self.validator.validate(value).map(Presence::Present),
            None => Ok(Presence::Absent),
        }
    }

    async fn run_async(&self, found: Option<&Value>) -> Validated<Presence<T>> {
        match found {
            Some(value) => self
                .validator
                .validate_async(value)
                .await
                .map(Presence::Present),
            None => Ok(Presence::Absent),
        }
    }
}

// ============================================================================
// RECORD VALIDATOR
// ============================================================================

type ObjectHook<Out> = Box<dyn Fn(Out) -> Validated<Out> + Send + Sync>;
type ObjectHookAsync<Out> = Box<dyn Fn(Out) -> BoxFuture<'static, Validated<Out>> + Send + Sync>;

/// Validates a map-like input against a fixed, closed set of declared keys
/// into a typed product.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// struct Person { name: String, age: i64 }
///
/// let validator = RecordValidator::new(
///     |name, age| Person { name, age },
///     (
///         key("name", StringValidator::new()),
///         key("age", IntValidator::new().predicate(Min::new(0))),
///     ),
/// );
/// ```
pub struct RecordValidator<Out, Func, Fields> {
    into: Func,
    fields: Fields,
    expected_keys: BTreeSet<Key>,
    preprocessors: Vec<Box<dyn Processor<BTreeMap<Key, Value>>>>,
    validate_object: Option<ObjectHook<Out>>,
    validate_object_async: Option<ObjectHookAsync<Out>>,
}

impl<Out, Func, Fields> RecordValidator<Out, Func, Fields> {
    /// Adds a whole-map transformation applied before the unknown-key check
    /// (e.g. stripping keys that must be tolerated but never validated).
    #[must_use]
    pub fn preprocess(mut self, processor: impl Processor<BTreeMap<Key, Value>> + 'static) -> Self {
        self.preprocessors.push(Box::new(processor));
        self
    }

    /// Installs a synchronous whole-object refinement, run only after every
    /// field validated and the product was constructed.
    ///
    /// # Panics
    ///
    /// If an async whole-object hook is already installed; the two are
    /// mutually exclusive, and holding both is a construction bug.
    #[must_use]
    pub fn validate_object(
        mut self,
        hook: impl Fn(Out) -> Validated<Out> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.validate_object_async.is_none(),
            "RecordValidator cannot hold both sync and async whole-object hooks",
        );
        self.validate_object = Some(Box::new(hook));
        self
    }

    /// Installs an asynchronous whole-object refinement; the validator then
    /// requires the asynchronous entry point.
    ///
    /// # Panics
    ///
    /// If a sync whole-object hook is already installed.
    #[must_use]
    pub fn validate_object_async(
        mut self,
        hook: impl Fn(Out) -> BoxFuture<'static, Validated<Out>> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.validate_object.is_none(),
            "RecordValidator cannot hold both sync and async whole-object hooks",
        );
        self.validate_object_async = Some(Box::new(hook));
        self
    }

    /// Type check, preprocessing, and the unconditional unknown-key
    /// pre-pass. Set membership keeps the pass O(size of input) no matter
    /// how many keys the schema declares.
    fn prepare(&self, value: &Value) -> Validated<BTreeMap<Key, Value>> {
        let Value::Map(entries) = value else {
            return Err(Invalid::type_err(ValueType::Map, value, "RecordValidator"));
        };
        let mut entries = entries.clone();
        for processor in &self.preprocessors {
            entries = processor.process(entries);
        }
        for input_key in entries.keys() {
            if !self.expected_keys.contains(input_key) {
                tracing::trace!(key = %input_key, "rejecting unknown key");
                return Err(Invalid::new(
                    ErrType::ExtraKeys {
                        expected: self.expected_keys.clone(),
                    },
                    value.clone(),
                    "RecordValidator",
                ));
            }
        }
        Ok(entries)
    }
}

/// A tuple of [`FieldSpec`]s, one per declared key. Implemented for tuples
/// of arity 1 through 12 by the macro below; this indirection keeps
/// [`RecordValidator::new`] a single generic constructor.
pub trait FieldTuple: Send + Sync {
    fn expected_keys(&self) -> BTreeSet<Key>;

    fn requires_async(&self) -> bool;
}

impl<Out, Func, Fields> RecordValidator<Out, Func, Fields>
where
    Fields: FieldTuple,
{
    /// Creates a record validator from a constructor and its field
    /// declarations. Declaration order is both validation order and the
    /// constructor's argument order.
    #[must_use]
    pub fn new(into: Func, fields: Fields) -> Self {
        let expected_keys = fields.expected_keys();
        Self {
            into,
            fields,
            expected_keys,
            preprocessors: Vec::new(),
            validate_object: None,
            validate_object_async: None,
        }
    }
}

macro_rules! impl_record {
    ($( $field:ident $binding:ident => $idx:tt ),+ $(,)?) => {
        impl<$($field,)+> FieldTuple for ($($field,)+)
        where
            $($field: FieldSpec,)+
        {
            fn expected_keys(&self) -> BTreeSet<Key> {
                BTreeSet::from([$(self.$idx.key().clone(),)+])
            }

            fn requires_async(&self) -> bool {
                false $(|| self.$idx.requires_async())+
            }
        }

        #[async_trait]
        impl<Out, Func, $($field,)+> Validator<Out> for RecordValidator<Out, Func, ($($field,)+)>
        where
            Out: Send + Sync + 'static,
            Func: Fn($($field::Output,)+) -> Out + Send + Sync,
            $($field: FieldSpec,)+
        {
            fn validate(&self, value: &Value) -> Validated<Out> {
                assert!(
                    self.validate_object_async.is_none(),
                    "RecordValidator cannot run an async whole-object hook in a \
                     synchronous call; await `validate_async` instead",
                );

                let input = self.prepare(value)?;

                $( let $binding = self.fields.$idx.run(input.get(self.fields.$idx.key())); )+

                match ($($binding,)+) {
                    ($(Ok($binding),)+) => {
                        let constructed = (self.into)($($binding,)+);
                        match &self.validate_object {
                            Some(hook) => hook(constructed),
                            None => Ok(constructed),
                        }
                    }
                    ($($binding,)+) => {
                        let mut keys = BTreeMap::new();
                        $(
                            if let Err(invalid) = $binding {
                                keys.insert(self.fields.$idx.key().clone(), invalid);
                            }
                        )+
                        Err(Invalid::new(
                            ErrType::KeyErrs { keys },
                            value.clone(),
                            self.name(),
                        ))
                    }
                }
            }

            async fn validate_async(&self, value: &Value) -> Validated<Out> {
                let input = self.prepare(value)?;

                $( let $binding = self.fields.$idx.run_async(input.get(self.fields.$idx.key())).await; )+

                match ($($binding,)+) {
                    ($(Ok($binding),)+) => {
                        let constructed = (self.into)($($binding,)+);
                        match (&self.validate_object_async, &self.validate_object) {
                            (Some(hook), _) => hook(constructed).await,
                            (None, Some(hook)) => hook(constructed),
                            (None, None) => Ok(constructed),
                        }
                    }
                    ($($binding,)+) => {
                        let mut keys = BTreeMap::new();
                        $(
                            if let Err(invalid) = $binding {
                                keys.insert(self.fields.$idx.key().clone(), invalid);
                            }
                        )+
                        Err(Invalid::new(
                            ErrType::KeyErrs { keys },
                            value.clone(),
                            self.name(),
                        ))
                    }
                }
            }

            fn requires_async(&self) -> bool {
                self.validate_object_async.is_some() || FieldTuple::requires_async(&self.fields)
            }

            fn name(&self) -> Cow<'static, str> {
                Cow::Borrowed("RecordValidator")
            }
        }
    };
}

impl_record!(F1 f1 => 0);
impl_record!(F1 f1 => 0, F2 f2 => 1);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5, F7 f7 => 6);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5, F7 f7 => 6, F8 f8 => 7);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5, F7 f7 => 6, F8 f8 => 7, F9 f9 => 8);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5, F7 f7 => 6, F8 f8 => 7, F9 f9 => 8, F10 f10 => 9);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5, F7 f7 => 6, F8 f8 => 7, F9 f9 => 8, F10 f10 => 9, F11 f11 => 10);
impl_record!(F1 f1 => 0, F2 f2 => 1, F3 f3 => 2, F4 f4 => 3, F5 f5 => 4, F6 f6 => 5, F7 f7 => 6, F8 f8 => 7, F9 f9 => 8, F10 f10 => 9, F11 f11 => 10, F12 f12 => 11);

// ============================================================================
// ERASED
// ============================================================================

/// Re-erases a typed validator's output back into a [`Value`]. Used by
/// [`DictValidatorAny`] so heterogeneous field validators can share one
/// output representation.
pub struct Erased<T: Send + 'static> {
    inner: BoxValidator<T>,
}

/// Wraps a typed validator into a `Validator<Value>`.
pub fn erased<T>(inner: impl Validator<T> + 'static) -> Erased<T>
where
    T: Into<Value> + Send + 'static,
{
    Erased {
        inner: Box::new(inner),
    }
}

#[async_trait]
impl<T> Validator<Value> for Erased<T>
where
    T: Into<Value> + Send + 'static,
{
    fn validate(&self, value: &Value) -> Validated<Value> {
        self.inner.validate(value).map(Into::into)
    }

    async fn validate_async(&self, value: &Value) -> Validated<Value> {
        self.inner.validate_async(value).await.map(Into::into)
    }

    fn requires_async(&self) -> bool {
        self.inner.requires_async()
    }

    fn name(&self) -> Cow<'static, str> {
        self.inner.name()
    }
}

// ============================================================================
// DICT VALIDATOR ANY
// ============================================================================

struct AnyField {
    key: Key,
    validator: BoxValidator<Value>,
    required: bool,
}

/// The record validator's untyped sibling: the same key declarations and
/// closed-world key check, but the output is a `BTreeMap<Key, Value>` of
/// validated values instead of a typed product. Absent optional keys are
/// omitted from the output.
#[derive(Default)]
pub struct DictValidatorAny {
    fields: Vec<AnyField>,
    expected_keys: BTreeSet<Key>,
    preprocessors: Vec<Box<dyn Processor<BTreeMap<Key, Value>>>>,
    validate_object: Option<ObjectHook<BTreeMap<Key, Value>>>,
    validate_object_async: Option<ObjectHookAsync<BTreeMap<Key, Value>>>,
}

impl DictValidatorAny {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a required key.
    #[must_use]
    pub fn field<T>(mut self, key: impl Into<Key>, validator: impl Validator<T> + 'static) -> Self
    where
        T: Into<Value> + Send + 'static,
    {
        let key = key.into();
        self.expected_keys.insert(key.clone());
        self.fields.push(AnyField {
            key,
            validator: Box::new(erased(validator)),
            required: true,
        });
        self
    }

    /// Declares an optional key.
    #[must_use]
    pub fn optional_field<T>(
        mut self,
        key: impl Into<Key>,
        validator: impl Validator<T> + 'static,
    ) -> Self
    where
        T: Into<Value> + Send + 'static,
    {
        let key = key.into();
        self.expected_keys.insert(key.clone());
        self.fields.push(AnyField {
            key,
            validator: Box::new(erased(validator)),
            required: false,
        });
        self
    }

    /// See [`RecordValidator::preprocess`].
    #[must_use]
    pub fn preprocess(mut self, processor: impl Processor<BTreeMap<Key, Value>> + 'static) -> Self {
        self.preprocessors.push(Box::new(processor));
        self
    }

    /// See [`RecordValidator::validate_object`].
    #[must_use]
    pub fn validate_object(
        mut self,
        hook: impl Fn(BTreeMap<Key, Value>) -> Validated<BTreeMap<Key, Value>> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.validate_object_async.is_none(),
            "DictValidatorAny cannot hold both sync and async whole-object hooks",
        );
        self.validate_object = Some(Box::new(hook));
        self
    }

    /// See [`RecordValidator::validate_object_async`].
    #[must_use]
    pub fn validate_object_async(
        mut self,
        hook: impl Fn(BTreeMap<Key, Value>) -> BoxFuture<'static, Validated<BTreeMap<Key, Value>>>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        assert!(
            self.validate_object.is_none(),
            "DictValidatorAny cannot hold both sync and async whole-object hooks",
        );
        self.validate_object_async = Some(Box::new(hook));
        self
    }

    fn prepare(&self, value: &Value) -> Validated<BTreeMap<Key, Value>> {
        let Value::Map(entries) = value else {
            return Err(Invalid::type_err(ValueType::Map, value, "DictValidatorAny"));
        };
        let mut entries = entries.clone();
        for processor in &self.preprocessors {
            entries = processor.process(entries);
        }
        for input_key in entries.keys() {
            if !self.expected_keys.contains(input_key) {
                tracing::trace!(key = %input_key, "rejecting unknown key");
                return Err(Invalid::new(
                    ErrType::ExtraKeys {
                        expected: self.expected_keys.clone(),
                    },
                    value.clone(),
                    "DictValidatorAny",
                ));
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl Validator<BTreeMap<Key, Value>> for DictValidatorAny {
    fn validate(&self, value: &Value) -> Validated<BTreeMap<Key, Value>> {
        assert!(
            self.validate_object_async.is_none(),
            "DictValidatorAny cannot run an async whole-object hook in a \
             synchronous call; await `validate_async` instead",
        );

        let input = self.prepare(value)?;

        let mut validated = BTreeMap::new();
        let mut keys = BTreeMap::new();
        for field in &self.fields {
            match (input.get(&field.key), field.required) {
                (Some(found), _) => match field.validator.validate(found) {
                    Ok(out) => {
                        validated.insert(field.key.clone(), out);
                    }
                    Err(invalid) => {
                        keys.insert(field.key.clone(), invalid);
                    }
                },
                (None, true) => {
                    keys.insert(
                        field.key.clone(),
                        Invalid::new(ErrType::MissingKey, Value::Null, field.validator.name()),
                    );
                }
                (None, false) => {}
            }
        }

        if !keys.is_empty() {
            return Err(Invalid::new(
                ErrType::KeyErrs { keys },
                value.clone(),
                self.name(),
            ));
        }
        match &self.validate_object {
            Some(hook) => hook(validated),
            None => Ok(validated),
        }
    }

    async fn validate_async(&self, value: &Value) -> Validated<BTreeMap<Key, Value>> {
        let input = self.prepare(value)?;

        let mut validated = BTreeMap::new();
        let mut keys = BTreeMap::new();
        for field in &self.fields {
            match (input.get(&field.key), field.required) {
                (Some(found), _) => match field.validator.validate_async(found).await {
                    Ok(out) => {
                        validated.insert(field.key.clone(), out);
                    }
                    Err(invalid) => {
                        keys.insert(field.key.clone(), invalid);
                    }
                },
                (None, true) => {
                    keys.insert(
                        field.key.clone(),
                        Invalid::new(ErrType::MissingKey, Value::Null, field.validator.name()),
                    );
                }
                (None, false) => {}
            }
        }

        if !keys.is_empty() {
            return Err(Invalid::new(
                ErrType::KeyErrs { keys },
                value.clone(),
                self.name(),
            ));
        }
        match (&self.validate_object_async, &self.validate_object) {
            (Some(hook), _) => hook(validated).await,
            (None, Some(hook)) => hook(validated),
            (None, None) => Ok(validated),
        }
    }

    fn requires_async(&self) -> bool {
        self.validate_object_async.is_some()
            || self.fields.iter().any(|f| f.validator.requires_async())
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("DictValidatorAny")
    }
}

// ============================================================================
// TESTS
// ============================================================================
