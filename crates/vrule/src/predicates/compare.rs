//! Size, range and equality checks.

use super::{magnitude, number_param, scalar_text};
use serde_json::Value;

pub(crate) fn min(value: &Value, params: &[Value]) -> bool {
    bounded(value, params.first(), |m, p| m >= p)
}

pub(crate) fn max(value: &Value, params: &[Value]) -> bool {
    bounded(value, params.first(), |m, p| m <= p)
}

pub(crate) fn size(value: &Value, params: &[Value]) -> bool {
    bounded(value, params.first(), |m, p| m == p)
}

pub(crate) fn between(value: &Value, params: &[Value]) -> bool {
    match (number_param(params.first()), number_param(params.get(1))) {
        (Some(lo), Some(hi)) => magnitude(value).is_some_and(|m| lo <= m && m <= hi),
        _ => false,
    }
}

pub(crate) fn greater_than(value: &Value, params: &[Value]) -> bool {
    numeric(value, params.first(), |v, p| v > p)
}

pub(crate) fn greater_than_or_equal(value: &Value, params: &[Value]) -> bool {
    numeric(value, params.first(), |v, p| v >= p)
}

pub(crate) fn less_than(value: &Value, params: &[Value]) -> bool {
    numeric(value, params.first(), |v, p| v < p)
}

pub(crate) fn less_than_or_equal(value: &Value, params: &[Value]) -> bool {
    numeric(value, params.first(), |v, p| v <= p)
}

/// Deep equality with the first parameter, normally a `<reference>`.
pub(crate) fn equal_to(value: &Value, params: &[Value]) -> bool {
    params.first().is_some_and(|p| p == value)
}

/// The value's textual form equals the literal token.
pub(crate) fn literal(value: &Value, params: &[Value]) -> bool {
    match (scalar_text(value), params.first().and_then(scalar_text)) {
        (Some(v), Some(p)) => v == p,
        _ => false,
    }
}

/// Membership in a referenced array, or in the literal parameter list.
pub(crate) fn one_of(value: &Value, params: &[Value]) -> bool {
    if let [Value::Array(options)] = params {
        return options.contains(value);
    }
    let Some(text) = scalar_text(value) else {
        return false;
    };
    params
        .iter()
        .any(|p| p == value || scalar_text(p).is_some_and(|p| p == text))
}

fn bounded(value: &Value, param: Option<&Value>, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (magnitude(value), number_param(param)) {
        (Some(m), Some(p)) => cmp(m, p),
        _ => false,
    }
}

fn numeric(value: &Value, param: Option<&Value>, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (value.as_f64(), number_param(param)) {
        (Some(v), Some(p)) => cmp(v, p),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bounds_apply_to_every_kind() {
        assert!(min(&json!(5), &[json!("5")]));
        assert!(!min(&json!(4), &[json!("5")]));
        assert!(max(&json!("abc"), &[json!("3")]));
        assert!(!max(&json!([1, 2, 3, 4]), &[json!("3")]));
        assert!(size(&json!({"a": 1, "b": 2}), &[json!(2)]));
        assert!(between(&json!(7), &[json!("1"), json!("10")]));
        assert!(!between(&json!(11), &[json!("1"), json!("10")]));
    }

    #[test]
    fn missing_or_bad_params_fail() {
        assert!(!min(&json!(5), &[]));
        assert!(!min(&json!(5), &[json!("lots")]));
        assert!(!between(&json!(5), &[json!("1")]));
        assert!(!greater_than(&json!(5), &[Value::Null]));
    }

    #[test]
    fn numeric_comparisons_need_numbers() {
        assert!(greater_than(&json!(5), &[json!("4")]));
        assert!(!greater_than(&json!("5"), &[json!("4")]));
        assert!(greater_than_or_equal(&json!(4), &[json!(4)]));
        assert!(less_than(&json!(-1), &[json!("0")]));
        assert!(less_than_or_equal(&json!(0), &[json!("0")]));
    }

    #[test]
    fn equality() {
        assert!(equal_to(&json!({"a": [1]}), &[json!({"a": [1]})]));
        assert!(!equal_to(&json!("x"), &[Value::Null]));
        assert!(literal(&json!(5), &[json!("5")]));
        assert!(literal(&json!(true), &[json!("true")]));
        assert!(!literal(&json!([5]), &[json!("5")]));
    }

    #[test]
    fn membership() {
        assert!(one_of(&json!("f"), &[json!(["m", "f"])]));
        assert!(!one_of(&json!("x"), &[json!(["m", "f"])]));
        assert!(one_of(&json!("b"), &[json!("a"), json!("b")]));
        assert!(one_of(&json!(2), &[json!("1"), json!("2")]));
        assert!(!one_of(&json!({"a": 1}), &[json!("a")]));
        assert!(!one_of(&json!("a"), &[Value::Null]));
    }
}
