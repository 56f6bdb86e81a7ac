//! Value kind checks.

use serde_json::Value;

pub(crate) fn string(value: &Value, _: &[Value]) -> bool {
    value.is_string()
}

/// A string with at least one non-whitespace character.
pub(crate) fn string_ne(value: &Value, _: &[Value]) -> bool {
    value.as_str().is_some_and(|s| !s.trim().is_empty())
}

pub(crate) fn number(value: &Value, _: &[Value]) -> bool {
    value.is_number()
}

/// Integral numbers, including floats without a fractional part.
pub(crate) fn integer(value: &Value, _: &[Value]) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

pub(crate) fn boolean(value: &Value, _: &[Value]) -> bool {
    value.is_boolean()
}

pub(crate) fn is_true(value: &Value, _: &[Value]) -> bool {
    value.as_bool() == Some(true)
}

pub(crate) fn is_false(value: &Value, _: &[Value]) -> bool {
    value.as_bool() == Some(false)
}

pub(crate) fn null(value: &Value, _: &[Value]) -> bool {
    value.is_null()
}

pub(crate) fn array(value: &Value, _: &[Value]) -> bool {
    value.is_array()
}

pub(crate) fn array_ne(value: &Value, _: &[Value]) -> bool {
    value.as_array().is_some_and(|a| !a.is_empty())
}

pub(crate) fn object(value: &Value, _: &[Value]) -> bool {
    value.is_object()
}

pub(crate) fn object_ne(value: &Value, _: &[Value]) -> bool {
    value.as_object().is_some_and(|o| !o.is_empty())
}
