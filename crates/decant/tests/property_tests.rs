//! Property-based checks: every validator is total — for any input it
//! terminates with exactly one of Ok/Err and never panics — and the basic
//! type-narrowing contracts hold for arbitrary inputs.

use std::collections::BTreeMap;

use decant::prelude::*;
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(Key::Str),
        any::<i64>().prop_map(Key::Int),
        any::<bool>().prop_map(Key::Bool),
    ]
}

fn input_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        // Finite floats only: NaN is never equal to itself, which would
        // poison result-equality assertions below.
        (-1.0e12..1.0e12f64).prop_map(Value::Float),
        "[ -~]{0,12}".prop_map(Value::Str),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::Bytes),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Set),
            proptest::collection::btree_map(key_strategy(), inner, 0..4)
                .prop_map(|m| Value::Map(m.into_iter().collect::<BTreeMap<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn scalar_validators_accept_exactly_their_type(input in input_strategy()) {
        prop_assert_eq!(
            StringValidator::new().validate(&input).is_ok(),
            matches!(input, Value::Str(_))
        );
        prop_assert_eq!(
            IntValidator::new().validate(&input).is_ok(),
            matches!(input, Value::Int(_))
        );
        prop_assert_eq!(
            BoolValidator::new().validate(&input).is_ok(),
            matches!(input, Value::Bool(_))
        );
    }

    #[test]
    fn containers_are_total(input in input_strategy()) {
        // Returning at all (no panic, no hang) is the property; the match
        // below double-checks each outcome is one of the two variants.
        let list = ListValidator::new(IntValidator::new()).validate(&input);
        prop_assert!(matches!(list, Ok(_) | Err(_)));

        let map = MapValidator::new(StringValidator::new(), IntValidator::new())
            .validate(&input);
        prop_assert!(matches!(map, Ok(_) | Err(_)));

        let union = OneOf2Validator::new(StringValidator::new(), IntValidator::new())
            .validate(&input);
        prop_assert!(matches!(union, Ok(_) | Err(_)));
    }

    #[test]
    fn record_validation_is_total_and_closed(input in input_strategy()) {
        let validator = RecordValidator::new(
            |name: String, age: Presence<i64>| (name, age),
            (
                key("name", StringValidator::new()),
                maybe_key("age", IntValidator::new()),
            ),
        );
        let result = validator.validate(&input);
        if let Value::Map(entries) = &input {
            let allowed = [Key::from("name"), Key::from("age")];
            let has_unknown = entries.keys().any(|k| !allowed.contains(k));
            if has_unknown {
                let invalid = result.unwrap_err();
                let is_extra_keys = matches!(invalid.err, ErrType::ExtraKeys { .. });
                prop_assert!(is_extra_keys);
            }
        } else {
            let invalid = result.unwrap_err();
            let is_type_err = matches!(invalid.err, ErrType::Type { .. });
            prop_assert!(is_type_err);
        }
    }

    #[test]
    fn noop_preprocessing_is_identity(input in input_strategy()) {
        struct Noop;
        impl Processor<String> for Noop {
            fn process(&self, value: String) -> String {
                value
            }
        }
        let plain = StringValidator::new().predicate(MinLength::new(3));
        let processed = StringValidator::new().preprocess(Noop).predicate(MinLength::new(3));
        prop_assert_eq!(plain.validate(&input), processed.validate(&input));
    }

    #[test]
    fn rendering_never_panics(input in input_strategy()) {
        let validator = RecordValidator::new(
            |items: Vec<i64>, label: String| (items, label),
            (
                key("items", ListValidator::new(IntValidator::new())),
                key("label", StringValidator::new()),
            ),
        );
        if let Err(invalid) = validator.validate(&input) {
            let rendered = to_serializable_errs(&invalid);
            prop_assert!(rendered.is_array() || rendered.is_object());
        }
    }
}
