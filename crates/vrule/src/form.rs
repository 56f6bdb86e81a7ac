//! Form data normalization.
//!
//! Converts flat `(key, value)` pairs, as found in urlencoded bodies, into the
//! nested object the engine validates:
//!
//! - repeated keys collect into an array in arrival order
//! - `a.b` nests objects, `a[0]` and `a[]` nest arrays
//! - `"true"`/`"false"` become booleans, strictly numeric strings become numbers

use crate::error::FormError;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::sync::OnceLock;

static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();

/// Largest run of `null` holes an explicit index may open past the end of an
/// array. Indices further out append instead.
const MAX_INDEX_GAP: usize = 64;

fn numeric_regex() -> &'static Regex {
    NUMERIC_REGEX.get_or_init(|| {
        Regex::new(r"^-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?$").expect("numeric pattern compiles")
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Key(String),
    Index(usize),
    Push,
}

/// Decode an `application/x-www-form-urlencoded` body into ordered pairs.
pub fn parse_urlencoded(body: &str) -> Result<Vec<(String, String)>, FormError> {
    Ok(serde_urlencoded::from_str(body)?)
}

/// Build a nested object from form pairs.
pub fn normalize<I, K, V>(pairs: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = Value::Object(Map::new());
    for (key, value) in pairs {
        let key = key.as_ref();
        let segments = parse_key(key).unwrap_or_else(|| vec![Segment::Key(key.to_string())]);
        if !insert(&mut root, &segments, coerce(value.as_ref())) {
            trace_debug!(key, "form key conflicts with an earlier entry, skipped");
        }
    }
    root
}

/// Turn a raw form string into the JSON value it most likely denotes.
pub fn coerce(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if numeric_regex().is_match(raw) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn parse_key(key: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut buf = String::new();
    let mut chars = key.chars();

    fn flush(buf: &mut String, segments: &mut Vec<Segment>) {
        if !buf.is_empty() {
            segments.push(Segment::Key(std::mem::take(buf)));
        }
    }

    while let Some(c) = chars.next() {
        match c {
            '.' => flush(&mut buf, &mut segments),
            '[' => {
                flush(&mut buf, &mut segments);
                let mut inner = String::new();
                loop {
                    match chars.next()? {
                        ']' => break,
                        c => inner.push(c),
                    }
                }
                segments.push(if inner.is_empty() {
                    Segment::Push
                } else if let Ok(i) = inner.parse::<usize>() {
                    Segment::Index(i)
                } else {
                    Segment::Key(inner)
                });
            }
            c => buf.push(c),
        }
    }
    flush(&mut buf, &mut segments);

    match segments.first() {
        Some(Segment::Key(_)) => Some(segments),
        _ => None,
    }
}

fn container_for(next: &Segment) -> Value {
    match next {
        Segment::Key(_) => Value::Object(Map::new()),
        Segment::Index(_) | Segment::Push => Value::Array(Vec::new()),
    }
}

/// Insert `value` at `segments`. Returns false when the path collides with a
/// scalar already stored there.
fn insert(node: &mut Value, segments: &[Segment], value: Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };

    match head {
        Segment::Key(key) => {
            let Some(map) = node.as_object_mut() else {
                return false;
            };
            match rest.first() {
                None => {
                    match map.get_mut(key) {
                        None => {
                            map.insert(key.clone(), value);
                        }
                        Some(Value::Array(items)) => items.push(value),
                        Some(existing) => {
                            let first = existing.take();
                            *existing = Value::Array(vec![first, value]);
                        }
                    }
                    true
                }
                Some(next) => {
                    let child = map.entry(key.clone()).or_insert_with(|| container_for(next));
                    insert(child, rest, value)
                }
            }
        }
        Segment::Index(i) => {
            let Some(items) = node.as_array_mut() else {
                return false;
            };
            let i = bounded_index(*i, items.len());
            if items.len() <= i {
                let Some(len) = i.checked_add(1) else {
                    return false;
                };
                items.resize(len, Value::Null);
            }
            match rest.first() {
                None => {
                    items[i] = value;
                    true
                }
                Some(next) => {
                    if items[i].is_null() {
                        items[i] = container_for(next);
                    }
                    insert(&mut items[i], rest, value)
                }
            }
        }
        Segment::Push => {
            let Some(items) = node.as_array_mut() else {
                return false;
            };
            match rest.first() {
                None => {
                    items.push(value);
                    true
                }
                Some(next) => {
                    items.push(container_for(next));
                    let last = items.len() - 1;
                    insert(&mut items[last], rest, value)
                }
            }
        }
    }
}

/// Clamp an index taken from a form key so it cannot open more than
/// [`MAX_INDEX_GAP`] holes. Out-of-range indices become an append.
fn bounded_index(index: usize, len: usize) -> usize {
    if index <= len.saturating_add(MAX_INDEX_GAP) {
        index
    } else {
        trace_debug!(index, len, "form index out of range, appended");
        len
    }
}
