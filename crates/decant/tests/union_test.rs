use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use decant::prelude::*;
use serde_json::json;

/// Counts invocations so tests can prove an alternative was never tried.
struct CountingInt(Arc<AtomicUsize>);

impl Validator<i64> for CountingInt {
    fn validate(&self, value: &Value) -> Validated<i64> {
        self.0.fetch_add(1, Ordering::SeqCst);
        IntValidator::new().validate(value)
    }

    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed("CountingInt")
    }
}

#[test]
fn first_success_wins_and_later_variants_never_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let validator = UnionValidator::new(IntValidator::new()).variant(CountingInt(calls.clone()));

    assert_eq!(validator.validate(&Value::Int(5)), Ok(5));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "second variant must not run");
}

#[test]
fn heterogeneous_union_tags_the_winner() {
    let validator = OneOf2Validator::new(StringValidator::new(), IntValidator::new());
    assert_eq!(validator.validate(&Value::Int(5)), Ok(OneOf2::Second(5)));
    assert_eq!(
        validator.validate(&Value::from("5")),
        Ok(OneOf2::First("5".to_owned()))
    );
}

#[test]
fn total_failure_keeps_every_variant_error_in_declared_order() {
    let validator = OneOf2Validator::new(StringValidator::new(), IntValidator::new());
    let invalid = validator.validate(&Value::Float(5.5)).unwrap_err();

    let ErrType::VariantErrs { variants } = invalid.err else {
        panic!("expected variant errors");
    };
    assert_eq!(
        variants
            .iter()
            .map(|v| v.err.clone())
            .collect::<Vec<_>>(),
        vec![
            ErrType::Type {
                expected: ValueType::String
            },
            ErrType::Type {
                expected: ValueType::Integer
            },
        ]
    );
}

#[test]
fn three_way_unions_follow_the_same_contract() {
    let validator = OneOf3Validator::new(
        StringValidator::new(),
        IntValidator::new(),
        BoolValidator::new(),
    );
    assert_eq!(validator.validate(&Value::Bool(true)), Ok(OneOf3::Third(true)));

    let invalid = validator.validate(&Value::Null).unwrap_err();
    let ErrType::VariantErrs { variants } = invalid.err else {
        panic!("expected variant errors");
    };
    assert_eq!(variants.len(), 3);
}

#[test]
fn optional_is_a_two_alternative_union() {
    let validator = OptionalValidator::new(StringValidator::new());

    assert_eq!(validator.validate(&Value::Null), Ok(None));
    assert_eq!(
        validator.validate(&Value::from("x")),
        Ok(Some("x".to_owned()))
    );

    let invalid = validator.validate(&Value::Int(1)).unwrap_err();
    let ErrType::VariantErrs { variants } = invalid.err else {
        panic!("expected variant errors");
    };
    assert_eq!(
        variants[0].err,
        ErrType::Type {
            expected: ValueType::Null
        }
    );
    assert_eq!(
        variants[1].err,
        ErrType::Type {
            expected: ValueType::String
        }
    );
}

#[test]
fn union_inside_a_record_field() {
    let validator = RecordValidator::new(
        |id| id,
        (key("id", OneOf2Validator::new(StringValidator::new(), IntValidator::new())),),
    );
    assert_eq!(
        validator.validate(&Value::from(json!({"id": 7}))),
        Ok(OneOf2::Second(7))
    );
}
