use decant::prelude::*;
use serde_json::json;

fn person_validator() -> impl Validator<(String, i64)> {
    RecordValidator::new(
        |name: String, age: i64| (name, age),
        (
            key("name", StringValidator::new().predicate(MinLength::new(2))),
            key("age", IntValidator::new()),
        ),
    )
}

#[test]
fn success_produces_no_error_representation() {
    // Round-trip property: a Valid outcome carries no Invalid at all, so
    // there is nothing to render.
    let result = person_validator().validate(&Value::from(json!({"name": "Bo", "age": 1})));
    assert!(result.is_ok());
}

#[test]
fn record_errors_render_along_the_data_shape() {
    let invalid = person_validator()
        .validate(&Value::from(json!({"name": "B", "age": "x"})))
        .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!({
            "name": ["minimum allowed length is 2"],
            "age": ["expected an integer"],
        })
    );
}

#[test]
fn extra_keys_render_the_allowed_set() {
    let invalid = person_validator()
        .validate(&Value::from(json!({"name": "Bo", "age": 1, "extra": true})))
        .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!({"__unknown_keys__": "only expected 'age', 'name'"})
    );
}

#[test]
fn index_errors_render_as_position_pairs() {
    let invalid = ListValidator::new(IntValidator::new())
        .validate(&Value::from(json!([1, "x", 2, "y"])))
        .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!([[1, ["expected an integer"]], [3, ["expected an integer"]]])
    );
}

#[test]
fn coercion_errors_name_the_compatible_types() {
    let invalid = UuidValidator::new()
        .validate(&Value::from("not-a-uuid"))
        .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!(["could not coerce to uuid (compatible with string, uuid)"])
    );
}

#[test]
fn arity_errors_name_the_expected_length() {
    let validator = TupleValidator::new(
        |a: i64, b: i64| (a, b),
        (IntValidator::new(), IntValidator::new()),
    );
    let invalid = validator.validate(&Value::from(json!([1]))).unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!(["expected an array of length 2"])
    );
}

#[test]
fn variant_errors_render_each_alternative() {
    let invalid = OneOf2Validator::new(StringValidator::new(), IntValidator::new())
        .validate(&Value::Null)
        .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!({"variants": [["expected a string"], ["expected an integer"]]})
    );
}

#[test]
fn map_errors_render_key_and_value_sides() {
    let invalid = MapValidator::new(
        StringValidator::new().predicate(MaxLength::new(1)),
        IntValidator::new(),
    )
    .validate(&Value::from(json!({"ab": "x"})))
    .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!({
            "ab": {
                "key_error": ["maximum allowed length is 1"],
                "value_error": ["expected an integer"],
            }
        })
    );
}

#[test]
fn merged_container_errors_render_both_parts() {
    let invalid = ListValidator::new(IntValidator::new())
        .predicate(MinItems::new(3))
        .validate(&Value::from(json!([1, "x"])))
        .unwrap_err();
    assert_eq!(
        to_serializable_errs(&invalid),
        json!({
            "__container__": ["minimum allowed length is 3"],
            "items": [[1, ["expected an integer"]]],
        })
    );
}

#[test]
fn custom_errors_render_their_message() {
    let validator = RecordValidator::new(
        |name: String, age: i64| (name, age),
        (
            key("name", StringValidator::new()),
            key("age", IntValidator::new()),
        ),
    )
    .validate_object(|_pair: (String, i64)| {
        Err(Invalid::custom("refused by policy", &Value::Null, "test"))
    });
    let invalid = validator
        .validate(&Value::from(json!({"name": "Bo", "age": 1})))
        .unwrap_err();
    assert_eq!(to_serializable_errs(&invalid), json!(["refused by policy"]));
}
