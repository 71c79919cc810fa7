//! Rendering error trees into JSON-compatible output
//!
//! One supplied collaborator over the pattern-matchable [`ErrType`] tree;
//! applications with different wire conventions write their own walk. The
//! shapes here mirror the data: key errors become objects, index errors
//! become `[index, errors]` pairs, predicate failures become message lists.

use serde_json::{Value as Serializable, json};

use crate::core::errors::{ErrType, Invalid, KeyValErrs, PredicateErr};

const CONTAINER_FIELD: &str = "__container__";

fn predicate_messages(failed: &[PredicateErr]) -> Serializable {
    Serializable::Array(
        failed
            .iter()
            .map(|pred| Serializable::String(pred.message.clone().into_owned()))
            .collect(),
    )
}

fn key_val_errs(errs: &KeyValErrs) -> Serializable {
    let mut entry = serde_json::Map::new();
    if let Some(key_err) = &errs.key {
        entry.insert("key_error".to_owned(), to_serializable_errs(key_err));
    }
    if let Some(val_err) = &errs.val {
        entry.insert("value_error".to_owned(), to_serializable_errs(val_err));
    }
    Serializable::Object(entry)
}

/// Renders an [`Invalid`] tree as JSON-compatible, human-readable output.
///
/// # Examples
///
/// ```rust,ignore
/// use decant::prelude::*;
/// use decant::serialize::to_serializable_errs;
///
/// let invalid = IntValidator::new().validate(&Value::from("nope")).unwrap_err();
/// assert_eq!(to_serializable_errs(&invalid), serde_json::json!(["expected an integer"]));
/// ```
#[must_use]
pub fn to_serializable_errs(invalid: &Invalid) -> Serializable {
    match &invalid.err {
        ErrType::Type { expected } => json!([format!("expected {}", expected.with_article())]),

        ErrType::Coercion { compatible, dest } => {
            let names: Vec<String> = compatible.iter().map(ToString::to_string).collect();
            json!([format!(
                "could not coerce to {dest} (compatible with {})",
                names.join(", ")
            )])
        }

        ErrType::Arity { expected } => {
            json!([format!("expected an array of length {expected}")])
        }

        ErrType::Predicates { failed } => predicate_messages(failed),

        ErrType::MissingKey => json!(["key missing"]),

        ErrType::ExtraKeys { expected } => {
            let message = if expected.is_empty() {
                "expected an empty object".to_owned()
            } else {
                let names: Vec<String> = expected.iter().map(|k| format!("'{k}'")).collect();
                format!("only expected {}", names.join(", "))
            };
            json!({ "__unknown_keys__": message })
        }

        ErrType::KeyErrs { keys } => Serializable::Object(
            keys.iter()
                .map(|(key, err)| (key.to_string(), to_serializable_errs(err)))
                .collect(),
        ),

        ErrType::IndexErrs { container, indexes } => {
            let items: Vec<Serializable> = indexes
                .iter()
                .map(|(i, err)| json!([i, to_serializable_errs(err)]))
                .collect();
            if container.is_empty() {
                Serializable::Array(items)
            } else {
                json!({
                    CONTAINER_FIELD: predicate_messages(container),
                    "items": items,
                })
            }
        }

        ErrType::SetErrs { container, items } => {
            let members: Vec<Serializable> = items.iter().map(to_serializable_errs).collect();
            if container.is_empty() {
                json!({ "member_errors": members })
            } else {
                json!({
                    CONTAINER_FIELD: predicate_messages(container),
                    "member_errors": members,
                })
            }
        }

        ErrType::MapErrs { container, entries } => {
            let mut rendered = serde_json::Map::new();
            if !container.is_empty() {
                rendered.insert(CONTAINER_FIELD.to_owned(), predicate_messages(container));
            }
            for (key, errs) in entries {
                rendered.insert(key.to_string(), key_val_errs(errs));
            }
            Serializable::Object(rendered)
        }

        ErrType::VariantErrs { variants } => json!({
            "variants": variants.iter().map(to_serializable_errs).collect::<Vec<_>>(),
        }),

        ErrType::Custom { message } => json!([message]),
    }
}

// ============================================================================
// TESTS
// ============================================================================
