use std::sync::Arc;

use decant::prelude::*;
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
struct Node {
    value: i64,
    next: Option<Box<Node>>,
}

/// A self-referential schema: a node has an optional next node of the same
/// shape. The cycle is broken by deferring construction through `Lazy`.
fn node_validator() -> SharedValidator<Node> {
    Arc::new(RecordValidator::new(
        |value, next: Option<Node>| Node {
            value,
            next: next.map(Box::new),
        },
        (
            key("value", IntValidator::new()),
            key("next", OptionalValidator::new(Lazy::new(node_validator))),
        ),
    ))
}

#[test]
fn recursive_schemas_validate_to_recursive_values() {
    let input = Value::from(json!({
        "value": 1,
        "next": {"value": 2, "next": {"value": 3, "next": null}},
    }));

    let node = node_validator().validate(&input).expect("valid chain");
    assert_eq!(node.value, 1);
    let second = node.next.expect("second node");
    assert_eq!(second.value, 2);
    let third = second.next.expect("third node");
    assert_eq!(third.value, 3);
    assert!(third.next.is_none());
}

#[test]
fn errors_surface_from_the_depth_they_occur_at() {
    let input = Value::from(json!({
        "value": 1,
        "next": {"value": "two", "next": null},
    }));

    let invalid = node_validator().validate(&input).unwrap_err();
    let ErrType::KeyErrs { keys } = invalid.err else {
        panic!("expected key errors");
    };
    // The nested failure is a union error: neither null nor a valid node.
    let ErrType::VariantErrs { variants } = &keys[&Key::from("next")].err else {
        panic!("expected variant errors");
    };
    assert!(matches!(variants[1].err, ErrType::KeyErrs { .. }));
}

#[tokio::test]
async fn lazy_follows_the_async_path() {
    let input = Value::from(json!({"value": 9, "next": null}));
    let node = node_validator()
        .validate_async(&input)
        .await
        .expect("valid node");
    assert_eq!(node.value, 9);
    assert!(node.next.is_none());
}
