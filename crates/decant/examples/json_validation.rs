//! Validating a decoded JSON document end to end: containers, unions,
//! coercion, and rendered error output.
//!
//! Run with: `cargo run --example json_validation`

use decant::prelude::*;
use serde_json::json;

#[derive(Debug)]
#[allow(dead_code)]
struct Order {
    id: uuid::Uuid,
    placed: chrono::NaiveDate,
    quantities: Vec<i64>,
    note: OneOf2<String, i64>,
}

fn order_validator() -> impl Validator<Order> {
    RecordValidator::new(
        |id, placed, quantities, note| Order {
            id,
            placed,
            quantities,
            note,
        },
        (
            key("id", UuidValidator::new()),
            key("placed", DateValidator::new()),
            key(
                "quantities",
                ListValidator::new(IntValidator::new().predicate(Min::new(1)))
                    .predicate(MinItems::new(1))
                    .predicate(UniqueItems),
            ),
            key(
                "note",
                OneOf2Validator::new(StringValidator::new(), IntValidator::new()),
            ),
        ),
    )
}

fn main() {
    let validator = order_validator();

    let ok = Value::from(json!({
        "id": "c63940d9-b5f7-4ea9-9c6d-b4b6a9fd0cf0",
        "placed": "2024-01-15",
        "quantities": [1, 2, 3],
        "note": 42,
    }));
    println!("ok: {:?}", validator.validate(&ok));

    let bad = Value::from(json!({
        "id": "not-a-uuid",
        "placed": "2024-99-99",
        "quantities": [0, "two", 3],
        "note": 4.5,
    }));
    if let Err(invalid) = validator.validate(&bad) {
        println!(
            "errors: {}",
            serde_json::to_string_pretty(&to_serializable_errs(&invalid))
                .expect("rendered errors are valid JSON")
        );
    }
}
