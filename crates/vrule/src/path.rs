//! Dotted-path lookup into JSON records.
//!
//! `a.b.0.c` walks objects by key and arrays by numeric index. Anything that
//! cannot be reached resolves to `None`, which the engine treats as absent.

use serde_json::Value;

/// Resolve a dotted path against `root`.
pub fn deep_get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(root, |node, segment| step(node, segment))
}

fn step<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    if segment.is_empty() {
        return None;
    }
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
