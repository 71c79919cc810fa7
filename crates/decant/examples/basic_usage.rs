//! Basic usage: scalars, records, and error trees.
//!
//! Run with: `cargo run --example basic_usage`

use decant::prelude::*;
use serde_json::json;

#[derive(Debug)]
#[allow(dead_code)]
struct Person {
    name: String,
    age: Presence<i64>,
    email: Option<String>,
}

fn main() {
    let validator = RecordValidator::new(
        |name, age, email| Person { name, age, email },
        (
            key(
                "name",
                StringValidator::new().preprocess(Strip).predicate(NotBlank),
            ),
            maybe_key("age", IntValidator::new().predicate(Min::new(0))),
            key(
                "email",
                OptionalValidator::new(StringValidator::new().predicate(EmailPredicate)),
            ),
        ),
    );

    // A well-formed payload; "age" is absent, which is fine for an
    // optional key, and "email" is explicitly null.
    let ok = Value::from(json!({"name": "  Ada  ", "email": null}));
    println!("ok: {:?}", validator.validate(&ok));

    // Three problems, one pass: blank name, negative age, bad email.
    let bad = Value::from(json!({"name": "   ", "age": -3, "email": "nope"}));
    match validator.validate(&bad) {
        Ok(person) => println!("unexpected: {person:?}"),
        Err(invalid) => {
            println!(
                "errors: {}",
                serde_json::to_string_pretty(&to_serializable_errs(&invalid))
                    .expect("rendered errors are valid JSON")
            );
        }
    }

    // Unknown keys are rejected before any field validation runs.
    let extra = Value::from(json!({"name": "Ada", "email": null, "admin": true}));
    println!("extra key: {:?}", validator.validate(&extra).unwrap_err().err);
}
