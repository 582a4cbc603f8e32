//! Best-effort default value coercion
//!
//! Stored column defaults arrive from the storage layer as loosely typed
//! values (a boolean default is often the text "false"). [`cast`] coerces
//! them into the value domain implied by the column's symbolic type. It
//! never errors: `None` means "no default to emit", and the mapper simply
//! omits the keyword.

use serde_json::{Number, Value};

use crate::model::ColumnType;

/// Coerce a raw stored value into the domain of `column_type`.
///
/// User-declared option literals do not pass through here; they are trusted
/// as already typed because registration validated them.
pub fn cast(column_type: ColumnType, value: &Value) -> Option<Value> {
    match column_type {
        ColumnType::String | ColumnType::Text => cast_string(value),
        ColumnType::Integer => cast_integer(value),
        ColumnType::Float | ColumnType::Decimal | ColumnType::Number => cast_number(value),
        ColumnType::Boolean => cast_boolean(value),
        ColumnType::Array => cast_array(value),
        ColumnType::Object => value.is_object().then(|| value.clone()),
        // Temporal defaults are kept only when already serialized as text.
        ColumnType::Date | ColumnType::DateTime | ColumnType::Time => {
            value.is_string().then(|| value.clone())
        }
        ColumnType::Json | ColumnType::Binary | ColumnType::Null => None,
    }
}

fn cast_string(value: &Value) -> Option<Value> {
    match value {
        Value::String(_) => Some(value.clone()),
        Value::Number(n) => Some(Value::String(n.to_string())),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn cast_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        Value::Number(n) => n.as_f64().map(|f| Value::from(f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    }
}

fn cast_number(value: &Value) -> Option<Value> {
    match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number),
        _ => None,
    }
}

// Storage adapters disagree on boolean literals, so a small table covers
// the common encodings.
fn cast_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::Bool(_) => Some(value.clone()),
        Value::String(s) => match s.as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(Value::Bool(true)),
            Some(0) => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

// A scalar default for an array column is wrapped into a one-element array.
fn cast_array(value: &Value) -> Option<Value> {
    match value {
        Value::Array(_) => Some(value.clone()),
        Value::Null => None,
        other => Some(Value::Array(vec![other.clone()])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_casts() {
        assert_eq!(cast(ColumnType::String, &json!("hi")), Some(json!("hi")));
        assert_eq!(cast(ColumnType::Text, &json!(42)), Some(json!("42")));
        assert_eq!(cast(ColumnType::String, &json!([1])), None);
    }

    #[test]
    fn test_integer_casts() {
        assert_eq!(cast(ColumnType::Integer, &json!(7)), Some(json!(7)));
        assert_eq!(cast(ColumnType::Integer, &json!("42")), Some(json!(42)));
        assert_eq!(cast(ColumnType::Integer, &json!(2.9)), Some(json!(2)));
        assert_eq!(cast(ColumnType::Integer, &json!("x")), None);
    }

    #[test]
    fn test_number_casts() {
        assert_eq!(cast(ColumnType::Float, &json!("1.5")), Some(json!(1.5)));
        assert_eq!(cast(ColumnType::Decimal, &json!(3)), Some(json!(3)));
        assert_eq!(cast(ColumnType::Number, &json!(true)), None);
    }

    #[test]
    fn test_boolean_literal_table() {
        assert_eq!(cast(ColumnType::Boolean, &json!("false")), Some(json!(false)));
        assert_eq!(cast(ColumnType::Boolean, &json!("1")), Some(json!(true)));
        assert_eq!(cast(ColumnType::Boolean, &json!(0)), Some(json!(false)));
        assert_eq!(cast(ColumnType::Boolean, &json!("yes")), None);
    }

    #[test]
    fn test_array_wrapping() {
        assert_eq!(cast(ColumnType::Array, &json!([1, 2])), Some(json!([1, 2])));
        assert_eq!(cast(ColumnType::Array, &json!("tag")), Some(json!(["tag"])));
        assert_eq!(cast(ColumnType::Array, &Value::Null), None);
    }

    #[test]
    fn test_object_and_unmapped() {
        assert_eq!(cast(ColumnType::Object, &json!({"a": 1})), Some(json!({"a": 1})));
        assert_eq!(cast(ColumnType::Object, &json!("a")), None);
        assert_eq!(cast(ColumnType::Json, &json!({"a": 1})), None);
    }
}
