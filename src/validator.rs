//! Keyword and type-conformance validation
//!
//! Three keyword values must be validated against the type of the property
//! they are registered for: `default`, `enum` (element-wise), and `const`.
//! Validation runs at registration time so that a bad enhancement fails at
//! its declaration, never during generation.

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::model::ColumnType;

/// The schema keywords accepted in an options bag, in declared order:
/// generic, object, string/array bounds, value constraints, numeric bounds,
/// logical composition, and the internal `virtual` marker.
pub const ALLOWED_KEYWORDS: &[&str] = &[
    "type",
    "title",
    "description",
    "maxLength",
    "minLength",
    "pattern",
    "maxItems",
    "minItems",
    "maxProperties",
    "minProperties",
    "properties",
    "additionalProperties",
    "dependencies",
    "enum",
    "format",
    "multipleOf",
    "maximum",
    "exclusiveMaximum",
    "minimum",
    "exclusiveMinimum",
    "const",
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "default",
    "items",
    "uniqueItems",
    "virtual",
];

/// Decide whether `value` is a valid instance of the symbolic type.
///
/// Conformance is closed-world: column types outside the supported schema
/// primitive set (`json`, `binary`) are an [`SchemaError::UnknownType`]
/// error, not a soft `false`. Checks are strict, so `"true"` does not
/// conform to `boolean` and `"42"` does not conform to `integer`.
pub fn check(column_type: ColumnType, value: &Value) -> Result<bool> {
    let ok = match column_type {
        ColumnType::String | ColumnType::Text => value.is_string(),
        ColumnType::Integer => value.is_i64() || value.is_u64(),
        ColumnType::Float | ColumnType::Decimal | ColumnType::Number => value.is_number(),
        ColumnType::Boolean => value.is_boolean(),
        ColumnType::Array => value.is_array(),
        ColumnType::Object => value.is_object(),
        ColumnType::Null => value.is_null(),
        ColumnType::Date => matches_date(value),
        ColumnType::DateTime => matches_datetime(value),
        ColumnType::Time => matches_time(value),
        ColumnType::Json | ColumnType::Binary => {
            return Err(SchemaError::UnknownType(column_type.to_string()))
        }
    };
    Ok(ok)
}

fn matches_date(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
}

fn matches_datetime(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok())
}

fn matches_time(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok())
}

/// Validate a full options bag against the allow-list and the resolved type
/// of the property it is registered for.
pub fn validate(field: &str, column_type: ColumnType, options: &Map<String, Value>) -> Result<()> {
    for keyword in options.keys() {
        if !ALLOWED_KEYWORDS.contains(&keyword.as_str()) {
            return Err(SchemaError::InvalidOption {
                field: field.to_string(),
                keyword: keyword.clone(),
                reason: "not an allowed schema keyword".to_string(),
            });
        }
    }

    for keyword in ["minItems", "maxItems"] {
        if let Some(bound) = options.get(keyword) {
            validate_array_bound(field, column_type, keyword, bound)?;
        }
    }

    if let Some(default) = options.get("default") {
        validate_value(field, column_type, default, "default")?;
    }
    if let Some(enum_values) = options.get("enum") {
        validate_enum(field, column_type, enum_values)?;
    }
    if let Some(const_value) = options.get("const") {
        validate_value(field, column_type, const_value, "const")?;
    }

    Ok(())
}

/// Array length bounds only apply to array properties and must be
/// non-negative integers.
fn validate_array_bound(
    field: &str,
    column_type: ColumnType,
    keyword: &str,
    bound: &Value,
) -> Result<()> {
    if column_type != ColumnType::Array {
        return Err(SchemaError::InvalidOption {
            field: field.to_string(),
            keyword: keyword.to_string(),
            reason: format!("only applies to array properties, not {column_type}"),
        });
    }
    if bound.as_u64().is_none() {
        return Err(SchemaError::InvalidOption {
            field: field.to_string(),
            keyword: keyword.to_string(),
            reason: "must be a non-negative integer".to_string(),
        });
    }
    Ok(())
}

fn validate_enum(field: &str, column_type: ColumnType, enum_values: &Value) -> Result<()> {
    let values = enum_values
        .as_array()
        .ok_or_else(|| SchemaError::InvalidOption {
            field: field.to_string(),
            keyword: "enum".to_string(),
            reason: "must be an array".to_string(),
        })?;

    for value in values {
        validate_value(field, column_type, value, "enum")?;
    }
    Ok(())
}

fn validate_value(
    field: &str,
    column_type: ColumnType,
    value: &Value,
    keyword: &'static str,
) -> Result<()> {
    if check(column_type, value)? {
        Ok(())
    } else {
        Err(SchemaError::TypeMismatch {
            field: field.to_string(),
            keyword,
            expected: column_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strict_conformance() {
        assert!(check(ColumnType::Boolean, &json!(true)).unwrap());
        assert!(!check(ColumnType::Boolean, &json!("true")).unwrap());
        assert!(check(ColumnType::Integer, &json!(42)).unwrap());
        assert!(!check(ColumnType::Integer, &json!(42.5)).unwrap());
        assert!(!check(ColumnType::Integer, &json!("42")).unwrap());
        assert!(check(ColumnType::Number, &json!(42)).unwrap());
        assert!(check(ColumnType::Text, &json!("bio")).unwrap());
        assert!(check(ColumnType::Null, &Value::Null).unwrap());
    }

    #[test]
    fn test_temporal_conformance() {
        assert!(check(ColumnType::Date, &json!("2024-02-10")).unwrap());
        assert!(!check(ColumnType::Date, &json!("02/10/2024")).unwrap());
        assert!(check(ColumnType::DateTime, &json!("2024-02-10T17:47:23Z")).unwrap());
        assert!(!check(ColumnType::DateTime, &json!("2024-02-10")).unwrap());
        assert!(check(ColumnType::Time, &json!("17:47:23")).unwrap());
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        assert!(matches!(
            check(ColumnType::Json, &json!({})),
            Err(SchemaError::UnknownType(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_keyword() {
        let options = json!({"writeOnly": true});
        let err = validate("name", ColumnType::String, options.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidOption { keyword, .. } if keyword == "writeOnly"));
    }

    #[test]
    fn test_rejects_mismatched_default() {
        let options = json!({"default": 42});
        let err = validate("name", ColumnType::String, options.as_object().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeMismatch { keyword: "default", expected: ColumnType::String, .. }
        ));
    }

    #[test]
    fn test_enum_elements_checked_individually() {
        let options = json!({"enum": [1, 2, "three"]});
        let err = validate("group", ColumnType::Integer, options.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { keyword: "enum", .. }));

        let options = json!({"enum": [1, 2, 3]});
        assert!(validate("group", ColumnType::Integer, options.as_object().unwrap()).is_ok());
    }

    #[test]
    fn test_array_bounds_guard() {
        let options = json!({"maxItems": 5});
        assert!(validate("tags", ColumnType::Array, options.as_object().unwrap()).is_ok());

        let err = validate("name", ColumnType::String, options.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidOption { keyword, .. } if keyword == "maxItems"));

        let options = json!({"minItems": -1});
        let err = validate("tags", ColumnType::Array, options.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidOption { keyword, .. } if keyword == "minItems"));
    }
}
