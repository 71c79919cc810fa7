use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use decant::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
struct Person {
    name: String,
    age: i64,
}

fn person_validator() -> impl Validator<Person> {
    RecordValidator::new(
        |name, age| Person { name, age },
        (
            key("name", StringValidator::new()),
            key("age", IntValidator::new()),
        ),
    )
}

#[test]
fn well_formed_input_constructs_the_product() {
    let result = person_validator().validate(&Value::from(json!({"name": "Bob", "age": 30})));
    assert_eq!(
        result,
        Ok(Person {
            name: "Bob".to_owned(),
            age: 30
        })
    );
}

#[test]
fn closed_world_rejects_unknown_keys() {
    let invalid = person_validator()
        .validate(&Value::from(json!({"name": "Bob", "age": 30, "extra": 1})))
        .unwrap_err();
    assert_eq!(
        invalid.err,
        ErrType::ExtraKeys {
            expected: BTreeSet::from([Key::from("name"), Key::from("age")]),
        }
    );
}

#[test]
fn empty_input_reports_every_missing_key() {
    let invalid = person_validator().validate(&Value::from(json!({}))).unwrap_err();
    let ErrType::KeyErrs { keys } = invalid.err else {
        panic!("expected key errors");
    };
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[&Key::from("name")].err, ErrType::MissingKey);
    assert_eq!(keys[&Key::from("age")].err, ErrType::MissingKey);
}

#[test]
fn all_field_failures_report_in_one_pass() {
    let validator = RecordValidator::new(
        |a: String, b: i64, c: bool| (a, b, c),
        (
            key("a", StringValidator::new()),
            key("b", IntValidator::new()),
            key("c", BoolValidator::new()),
        ),
    );
    let invalid = validator
        .validate(&Value::from(json!({"a": 1, "b": "x", "c": 0})))
        .unwrap_err();
    let ErrType::KeyErrs { keys } = invalid.err else {
        panic!("expected key errors");
    };
    assert_eq!(keys.len(), 3);
}

#[test]
fn optional_keys_distinguish_absent_from_present() {
    #[derive(Debug, PartialEq)]
    struct Profile {
        name: String,
        age: Presence<i64>,
    }

    let validator = RecordValidator::new(
        |name, age| Profile { name, age },
        (
            key("name", StringValidator::new()),
            maybe_key("age", IntValidator::new()),
        ),
    );

    assert_eq!(
        validator.validate(&Value::from(json!({"name": "Bob"}))),
        Ok(Profile {
            name: "Bob".to_owned(),
            age: Presence::Absent
        })
    );
    assert_eq!(
        validator.validate(&Value::from(json!({"name": "Bob", "age": 5}))),
        Ok(Profile {
            name: "Bob".to_owned(),
            age: Presence::Present(5)
        })
    );

    // Present-but-invalid is still an error; absence is not a pass-through
    // for bad data.
    assert!(
        validator
            .validate(&Value::from(json!({"name": "Bob", "age": "old"})))
            .is_err()
    );
}

#[test]
fn non_string_keys_are_first_class() {
    let mut input = BTreeMap::new();
    input.insert(Key::from(5i64), Value::from("five"));
    input.insert(Key::from((1i64, "a")), Value::Int(1));

    let validator = RecordValidator::new(
        |label: String, count: i64| (label, count),
        (
            key(5i64, StringValidator::new()),
            key((1i64, "a"), IntValidator::new()),
        ),
    );
    assert_eq!(
        validator.validate(&Value::Map(input)),
        Ok(("five".to_owned(), 1))
    );
}

#[test]
fn whole_object_hook_can_override_success() {
    let validator = RecordValidator::new(
        |name, age| Person { name, age },
        (
            key("name", StringValidator::new()),
            key("age", IntValidator::new()),
        ),
    )
    .validate_object(|person: Person| {
        if person.age > 150 {
            Err(Invalid::custom(
                "age out of plausible range",
                &Value::Int(person.age),
                "RecordValidator",
            ))
        } else {
            Ok(person)
        }
    });

    assert!(validator.validate(&Value::from(json!({"name": "Bob", "age": 30}))).is_ok());

    let invalid = validator
        .validate(&Value::from(json!({"name": "Bob", "age": 500})))
        .unwrap_err();
    assert_eq!(
        invalid.err,
        ErrType::Custom {
            message: "age out of plausible range".into()
        }
    );
}

#[test]
fn whole_object_hook_never_runs_on_field_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = calls.clone();
    let validator = RecordValidator::new(
        |name, age| Person { name, age },
        (
            key("name", StringValidator::new()),
            key("age", IntValidator::new()),
        ),
    )
    .validate_object(move |person: Person| {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(person)
    });

    let _ = validator.validate(&Value::from(json!({"name": "Bob", "age": "x"})));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn preprocessors_run_before_the_unknown_key_check() {
    struct DropUnderscored;
    impl Processor<BTreeMap<Key, Value>> for DropUnderscored {
        fn process(&self, mut value: BTreeMap<Key, Value>) -> BTreeMap<Key, Value> {
            value.retain(|k, _| !matches!(k, Key::Str(s) if s.starts_with('_')));
            value
        }
    }

    let validator = RecordValidator::new(
        |name, age| Person { name, age },
        (
            key("name", StringValidator::new()),
            key("age", IntValidator::new()),
        ),
    )
    .preprocess(DropUnderscored);

    let result =
        validator.validate(&Value::from(json!({"name": "Bob", "age": 30, "_meta": "x"})));
    assert!(result.is_ok());
}

#[test]
fn nested_records_nest_their_errors() {
    #[derive(Debug, Clone, PartialEq)]
    struct Team {
        title: String,
        lead: Person,
    }

    let validator = RecordValidator::new(
        |title, lead| Team { title, lead },
        (
            key("title", StringValidator::new()),
            key("lead", person_validator()),
        ),
    );

    let invalid = validator
        .validate(&Value::from(json!({"title": "core", "lead": {"name": "Bob", "age": "x"}})))
        .unwrap_err();
    let ErrType::KeyErrs { keys } = invalid.err else {
        panic!("expected key errors");
    };
    let ErrType::KeyErrs { keys: nested } = &keys[&Key::from("lead")].err else {
        panic!("expected nested key errors");
    };
    assert_eq!(
        nested[&Key::from("age")].err,
        ErrType::Type {
            expected: ValueType::Integer
        }
    );
}

#[test]
fn twelve_field_records_validate() {
    #[allow(clippy::too_many_arguments)]
    fn build(
        a: i64,
        b: i64,
        c: i64,
        d: i64,
        e: i64,
        f: i64,
        g: i64,
        h: i64,
        i: i64,
        j: i64,
        k: i64,
        l: i64,
    ) -> i64 {
        a + b + c + d + e + f + g + h + i + j + k + l
    }

    let validator = RecordValidator::new(
        build,
        (
            key("f01", IntValidator::new()),
            key("f02", IntValidator::new()),
            key("f03", IntValidator::new()),
            key("f04", IntValidator::new()),
            key("f05", IntValidator::new()),
            key("f06", IntValidator::new()),
            key("f07", IntValidator::new()),
            key("f08", IntValidator::new()),
            key("f09", IntValidator::new()),
            key("f10", IntValidator::new()),
            key("f11", IntValidator::new()),
            key("f12", IntValidator::new()),
        ),
    );

    let input = Value::from(json!({
        "f01": 1, "f02": 1, "f03": 1, "f04": 1, "f05": 1, "f06": 1,
        "f07": 1, "f08": 1, "f09": 1, "f10": 1, "f11": 1, "f12": 1,
    }));
    assert_eq!(validator.validate(&input), Ok(12));
}

#[test]
fn dict_any_keeps_the_closed_world_check() {
    let validator = DictValidatorAny::new()
        .field("name", StringValidator::new())
        .optional_field("age", IntValidator::new());

    let result = validator
        .validate(&Value::from(json!({"name": "Bob", "age": 30})))
        .expect("valid");
    assert_eq!(
        result,
        BTreeMap::from([
            (Key::from("name"), Value::from("Bob")),
            (Key::from("age"), Value::Int(30)),
        ])
    );

    let invalid = validator
        .validate(&Value::from(json!({"name": "Bob", "extra": 1})))
        .unwrap_err();
    assert!(matches!(invalid.err, ErrType::ExtraKeys { .. }));
}
