//! Built-in predicates.
//!
//! Every built-in is a plain `fn(&Value, &[Value]) -> bool`. Literal
//! parameters arrive as strings, so numeric built-ins coerce them through
//! [`number_param`].

mod compare;
mod format;
mod kind;

use crate::registry::SharedPredicate;
use serde_json::Value;
use std::sync::Arc;

/// Name and predicate for every built-in, in registration order.
pub(crate) fn builtins() -> Vec<(&'static str, SharedPredicate)> {
    fn entry(
        name: &'static str,
        f: fn(&Value, &[Value]) -> bool,
    ) -> (&'static str, SharedPredicate) {
        let predicate: SharedPredicate = Arc::new(f);
        (name, predicate)
    }

    vec![
        // Kinds
        entry("string", kind::string),
        entry("string_ne", kind::string_ne),
        entry("number", kind::number),
        entry("integer", kind::integer),
        entry("boolean", kind::boolean),
        entry("true", kind::is_true),
        entry("false", kind::is_false),
        entry("null", kind::null),
        entry("array", kind::array),
        entry("array_ne", kind::array_ne),
        entry("object", kind::object),
        entry("object_ne", kind::object_ne),
        // Comparisons
        entry("min", compare::min),
        entry("max", compare::max),
        entry("size", compare::size),
        entry("between", compare::between),
        entry("greater_than", compare::greater_than),
        entry("greater_than_or_equal", compare::greater_than_or_equal),
        entry("less_than", compare::less_than),
        entry("less_than_or_equal", compare::less_than_or_equal),
        entry("equal_to", compare::equal_to),
        entry("literal", compare::literal),
        entry("in", compare::one_of),
        // Formats
        entry("email", format::email),
        entry("url", format::url),
        entry("guid", format::guid),
        entry("ip", format::ip),
        entry("ip_v4", format::ip_v4),
        entry("ip_v6", format::ip_v6),
        entry("phone", format::phone),
        entry("hex", format::hex),
        entry("alpha_num_spaces", format::alpha_num_spaces),
        entry("date_string", format::date_string),
        entry("time_stamp", format::time_stamp),
        entry("geo_latitude", format::geo_latitude),
        entry("geo_longitude", format::geo_longitude),
    ]
}

/// Numeric view of a parameter: a JSON number or a numeric string.
pub(crate) fn number_param(param: Option<&Value>) -> Option<f64> {
    match param? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Size of a value for `min`/`max`/`size`/`between`: the number itself,
/// character count, element count or member count.
pub(crate) fn magnitude(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        _ => None,
    }
}

/// Render a scalar the way it would appear in a rule string.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
