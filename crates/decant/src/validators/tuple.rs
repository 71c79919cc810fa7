//! Positional (tuple) validation
//!
//! Two shapes: [`UniformTupleValidator`] validates every position with one
//! item validator, and [`TupleValidator`] validates a sequence of *exactly*
//! the declared arity with one validator per position, into a typed product.
//! Both accept list input — positional sequences arrive as lists from
//! JSON-like decoders.

use std::borrow::Cow;
use std::collections::BTreeMap;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::core::errors::{ErrType, Invalid, PredicateErr, Validated};
use crate::core::traits::{BoxValidator, Predicate, PredicateAsync, Processor, Validator};
use crate::core::value::{Value, ValueType};

// ============================================================================
// UNIFORM TUPLE
// ============================================================================

/// Validates a positional sequence of any length, one item validator for
/// every position. Shares the list container policy
/// (see [`crate::validators::list`]).
pub struct UniformTupleValidator<T: Send + 'static> {
    item: BoxValidator<T>,
    predicates: Vec<Box<dyn Predicate<Vec<Value>>>>,
    predicates_async: Vec<Box<dyn PredicateAsync<Vec<Value>>>>,
    preprocessors: Vec<Box<dyn Processor<Vec<Value>>>>,
}

impl<T> UniformTupleValidator<T>
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
impl<T> Validator<Vec<T>> for UniformTupleValidator<T>
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
        Cow::Borrowed("UniformTupleValidator")
    }
}

// ============================================================================
// FIXED-ARITY TUPLE
// ============================================================================

type TupleHook<Out> = Box<dyn Fn(Out) -> Validated<Out> + Send + Sync>;
type TupleHookAsync<Out> = Box<dyn Fn(Out) -> BoxFuture<'static, Validated<Out>> + Send + Sync>;

/// Validates a positional sequence of exactly the declared arity,
/// heterogeneous validators per position, into a typed product.
///
/// Input of the wrong length fails with an arity error naming the declared
/// length — not a generic type error. Positional errors aggregate (no
/// short-circuit) into per-index errors.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
///
/// let point = TupleValidator::new(
///     |x, y| (x, y),
///     (FloatValidator::new(), FloatValidator::new()),
/// );
/// ```
pub struct TupleValidator<Out, Func, Slots> {
    into: Func,
    slots: Slots,
    arity: usize,
    validate_tuple: Option<TupleHook<Out>>,
    validate_tuple_async: Option<TupleHookAsync<Out>>,
}

impl<Out, Func, Slots> TupleValidator<Out, Func, Slots> {
    /// Installs a synchronous whole-tuple refinement, run only after every
    /// position validated.
    ///
    /// # Panics
    ///
    /// If an async whole-tuple hook is already installed.
    #[must_use]
    pub fn validate_tuple(
        mut self,
        hook: impl Fn(Out) -> Validated<Out> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.validate_tuple_async.is_none(),
            "TupleValidator cannot hold both sync and async whole-tuple hooks",
        );
        self.validate_tuple = Some(Box::new(hook));
        self
    }

    /// Installs an asynchronous whole-tuple refinement.
    ///
    /// # Panics
    ///
    /// If a sync whole-tuple hook is already installed.
    #[must_use]
    pub fn validate_tuple_async(
        mut self,
        hook: impl Fn(Out) -> BoxFuture<'static, Validated<Out>> + Send + Sync + 'static,
    ) -> Self {
        assert!(
            self.validate_tuple.is_none(),
            "TupleValidator cannot hold both sync and async whole-tuple hooks",
        );
        self.validate_tuple_async = Some(Box::new(hook));
        self
    }

    fn prepare<'v>(&self, value: &'v Value) -> Validated<&'v [Value]> {
        let Value::List(items) = value else {
            return Err(Invalid::type_err(ValueType::List, value, "TupleValidator"));
        };
        if items.len() == self.arity {
            Ok(items)
        } else {
            Err(Invalid::new(
                ErrType::Arity {
                    expected: self.arity,
                },
                value.clone(),
                "TupleValidator",
            ))
        }
    }
}

/// Converts a tuple of concrete positional validators into the boxed slot
/// representation the validator stores. Implemented for arities 1 through 8
/// by the macro below; this indirection keeps [`TupleValidator::new`] a
/// single generic constructor.
pub trait IntoSlots<Slots>: Sized {
    const ARITY: usize;

    fn into_slots(self) -> Slots;
}

impl<Out, Func, Slots> TupleValidator<Out, Func, Slots> {
    /// Creates a tuple validator from a constructor and one validator per
    /// position.
    #[must_use]
    pub fn new<Raw>(into: Func, slots: Raw) -> Self
    where
        Raw: IntoSlots<Slots>,
    {
        Self {
            into,
            slots: slots.into_slots(),
            arity: Raw::ARITY,
            validate_tuple: None,
            validate_tuple_async: None,
        }
    }
}

macro_rules! impl_tuple {
    ($arity:literal; $( $slot:ident $vparam:ident $binding:ident => $idx:tt ),+ $(,)?) => {
        impl<$($slot, $vparam,)+> IntoSlots<($(BoxValidator<$slot>,)+)> for ($($vparam,)+)
        where
            $($slot: Send + 'static,)+
            $($vparam: Validator<$slot> + 'static,)+
        {
            const ARITY: usize = $arity;

            fn into_slots(self) -> ($(BoxValidator<$slot>,)+) {
                ($(Box::new(self.$idx) as BoxValidator<$slot>,)+)
            }
        }

        #[async_trait]
        impl<Out, Func, $($slot,)+> Validator<Out>
            for TupleValidator<Out, Func, ($(BoxValidator<$slot>,)+)>
        where
            Out: Send + Sync + 'static,
            Func: Fn($($slot,)+) -> Out + Send + Sync,
            $($slot: Send + Sync + 'static,)+
        {
            fn validate(&self, value: &Value) -> Validated<Out> {
                assert!(
                    self.validate_tuple_async.is_none(),
                    "TupleValidator cannot run an async whole-tuple hook in a \
                     synchronous call; await `validate_async` instead",
                );

                let items = self.prepare(value)?;

                $( let $binding = self.slots.$idx.validate(&items[$idx]); )+

                match ($($binding,)+) {
                    ($(Ok($binding),)+) => {
                        let constructed = (self.into)($($binding,)+);
                        match &self.validate_tuple {
                            Some(hook) => hook(constructed),
                            None => Ok(constructed),
                        }
                    }
                    ($($binding,)+) => {
                        let mut indexes = BTreeMap::new();
                        $(
                            if let Err(invalid) = $binding {
                                indexes.insert($idx, invalid);
                            }
                        )+
                        Err(Invalid::new(
                            ErrType::IndexErrs {
                                container: Vec::new(),
                                indexes,
                            },
                            value.clone(),
                            self.name(),
                        ))
                    }
                }
            }

            async fn validate_async(&self, value: &Value) -> Validated<Out> {
                let items = self.prepare(value)?;

                $( let $binding = self.slots.$idx.validate_async(&items[$idx]).await; )+

                match ($($binding,)+) {
                    ($(Ok($binding),)+) => {
                        let constructed = (self.into)($($binding,)+);
                        match (&self.validate_tuple_async, &self.validate_tuple) {
                            (Some(hook), _) => hook(constructed).await,
                            (None, Some(hook)) => hook(constructed),
                            (None, None) => Ok(constructed),
                        }
                    }
                    ($($binding,)+) => {
                        let mut indexes = BTreeMap::new();
                        $(
                            if let Err(invalid) = $binding {
                                indexes.insert($idx, invalid);
                            }
                        )+
                        Err(Invalid::new(
                            ErrType::IndexErrs {
                                container: Vec::new(),
                                indexes,
                            },
                            value.clone(),
                            self.name(),
                        ))
                    }
                }
            }

            fn requires_async(&self) -> bool {
                self.validate_tuple_async.is_some() $(|| self.slots.$idx.requires_async())+
            }

            fn name(&self) -> Cow<'static, str> {
                Cow::Borrowed("TupleValidator")
            }
        }
    };
}

impl_tuple!(1; T1 V1 s1 => 0);
impl_tuple!(2; T1 V1 s1 => 0, T2 V2 s2 => 1);
impl_tuple!(3; T1 V1 s1 => 0, T2 V2 s2 => 1, T3 V3 s3 => 2);
impl_tuple!(4; T1 V1 s1 => 0, T2 V2 s2 => 1, T3 V3 s3 => 2, T4 V4 s4 => 3);
impl_tuple!(5; T1 V1 s1 => 0, T2 V2 s2 => 1, T3 V3 s3 => 2, T4 V4 s4 => 3, T5 V5 s5 => 4);
impl_tuple!(6; T1 V1 s1 => 0, T2 V2 s2 => 1, T3 V3 s3 => 2, T4 V4 s4 => 3, T5 V5 s5 => 4, T6 V6 s6 => 5);
impl_tuple!(7; T1 V1 s1 => 0, T2 V2 s2 => 1, T3 V3 s3 => 2, T4 V4 s4 => 3, T5 V5 s5 => 4, T6 V6 s6 => 5, T7 V7 s7 => 6);
impl_tuple!(8; T1 V1 s1 => 0, T2 V2 s2 => 1, T3 V3 s3 => 2, T4 V4 s4 => 3, T5 V5 s5 => 4, T6 V6 s6 => 5, T7 V7 s7 => 6, T8 V8 s8 => 7);

// ============================================================================
// TESTS
// ============================================================================
