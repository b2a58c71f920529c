//! Shape validation for JSON values ahead of document encoding.
//!
//! A value is "plain JSON" when it is built only from nulls, booleans,
//! numbers, strings, sequences, and mappings, and nests no deeper than
//! [`MAX_JSON_DEPTH`] levels. The `serde_json::Value` union cannot hold
//! dates, patterns, callables, symbols, or reference cycles, so depth is
//! the one structural property left to check before a value reaches the
//! engine. The check is a pure predicate: no side effects, never panics.

use serde_json::Value;

use crate::constants::MAX_JSON_DEPTH;

// ── Errors ────────────────────────────────────────────────────────────────

/// Rejection produced by [`validate`], naming the offending shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Nesting deeper than the supported maximum.
    #[error("value must be a plain JSON tree: nesting exceeds {0} levels")]
    TooDeep(usize),
}

// ── Validation ────────────────────────────────────────────────────────────

/// Check that `value` is a plain JSON tree the engine can represent.
///
/// Leaves are always valid; sequences and mappings are valid iff every
/// element is, recursively.
pub fn validate(value: &Value) -> Result<(), ShapeError> {
    validate_at(value, 0)
}

/// Boolean projection of [`validate`].
pub fn is_valid_json(value: &Value) -> bool {
    validate(value).is_ok()
}

fn validate_at(value: &Value, depth: usize) -> Result<(), ShapeError> {
    if depth > MAX_JSON_DEPTH {
        return Err(ShapeError::TooDeep(MAX_JSON_DEPTH));
    }
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(()),
        Value::Array(items) => {
            for item in items {
                validate_at(item, depth + 1)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            for value in map.values() {
                validate_at(value, depth + 1)?;
            }
            Ok(())
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_arrays(depth: usize) -> Value {
        let mut value = json!(null);
        for _ in 0..depth {
            value = json!([value]);
        }
        value
    }

    #[test]
    fn leaves_are_valid() {
        assert!(is_valid_json(&json!(null)));
        assert!(is_valid_json(&json!(true)));
        assert!(is_valid_json(&json!(42)));
        assert!(is_valid_json(&json!(-1.5)));
        assert!(is_valid_json(&json!("hello")));
    }

    #[test]
    fn empty_containers_are_valid() {
        assert!(is_valid_json(&json!({})));
        assert!(is_valid_json(&json!({ "items": [] })));
    }

    #[test]
    fn nested_containers_are_valid() {
        let value = json!({
            "a": [1, 2, {"b": ["c", null]}],
            "d": {"e": {"f": false}},
        });
        assert!(is_valid_json(&value));
        assert_eq!(validate(&value), Ok(()));
    }

    #[test]
    fn deep_plain_nesting_is_valid() {
        assert!(is_valid_json(&nested_arrays(100)));
        assert!(is_valid_json(&nested_arrays(MAX_JSON_DEPTH)));
    }

    #[test]
    fn over_limit_nesting_is_rejected() {
        let value = nested_arrays(MAX_JSON_DEPTH + 3);
        assert!(!is_valid_json(&value));
        assert_eq!(validate(&value), Err(ShapeError::TooDeep(MAX_JSON_DEPTH)));
    }

    #[test]
    fn rejection_names_the_shape() {
        let err = validate(&nested_arrays(MAX_JSON_DEPTH + 1)).unwrap_err();
        assert!(err.to_string().contains("plain JSON"));
    }
}
