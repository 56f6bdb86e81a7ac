//! Schema compiler.
//!
//! Turns a user schema (a JSON object whose leaves are rule strings or arrays
//! of alternative rule strings) into a tree of compiled [`RuleNode`]s.

use crate::error::{ConfigError, Result};
use crate::rule::{self, RuleNode};
use indexmap::IndexMap;
use serde_json::Value;

/// A compiled schema entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Leaf(RuleNode),
    Nested(IndexMap<String, SchemaNode>),
}

/// A compiled schema. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: IndexMap<String, SchemaNode>,
}

impl Schema {
    /// Compile a schema object.
    pub fn compile(schema: &Value) -> Result<Self> {
        let map = schema.as_object().ok_or(ConfigError::InvalidSchema)?;
        let root = compile_map(map)?;
        let schema = Self { root };
        trace_debug!(fields = schema.leaves().len(), "schema compiled");
        Ok(schema)
    }

    /// Whether the schema declares no fields at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level entries in declaration order.
    pub fn fields(&self) -> &IndexMap<String, SchemaNode> {
        &self.root
    }

    /// Every leaf with its dotted path, depth-first in declaration order.
    pub fn leaves(&self) -> Vec<(String, &RuleNode)> {
        let mut out = Vec::new();
        collect_leaves(&self.root, "", &mut out);
        out
    }
}

fn compile_map(map: &serde_json::Map<String, Value>) -> Result<IndexMap<String, SchemaNode>> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), compile_node(value)?)))
        .collect()
}

fn compile_node(value: &Value) -> Result<SchemaNode> {
    match value {
        Value::String(rule) if !rule.is_empty() => Ok(SchemaNode::Leaf(rule::compile(rule)?)),
        Value::Array(items) if !items.is_empty() => {
            let rules = items
                .iter()
                .map(|item| match item {
                    Value::String(s) if !s.is_empty() => Ok(s.as_str()),
                    _ => Err(ConfigError::InvalidRuleValue),
                })
                .collect::<Result<Vec<&str>>>()?;
            Ok(SchemaNode::Leaf(rule::compile_alternatives(&rules)?))
        }
        Value::Object(map) => Ok(SchemaNode::Nested(compile_map(map)?)),
        _ => Err(ConfigError::InvalidRuleValue),
    }
}

/// Join a parent path and a key with `.`.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn collect_leaves<'a>(
    nodes: &'a IndexMap<String, SchemaNode>,
    prefix: &str,
    out: &mut Vec<(String, &'a RuleNode)>,
) {
    for (key, node) in nodes {
        let path = join_path(prefix, key);
        match node {
            SchemaNode::Leaf(rule) => out.push((path, rule)),
            SchemaNode::Nested(children) => collect_leaves(children, &path, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_leaves_get_dotted_paths() {
        let schema = Schema::compile(&json!({
            "name": "string_ne",
            "address": {"city": "string", "geo": {"lat": "geo_latitude"}},
            "kind": ["guid", "false"],
        }))
        .unwrap();

        let paths: Vec<String> = schema.leaves().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["name", "address.city", "address.geo.lat", "kind"]);
        assert!(schema.leaves()[3].1.is_alternation());
    }

    #[test]
    fn rejects_non_object_schema() {
        for schema in [json!("string"), json!([]), json!(null), json!(5)] {
            assert_eq!(Schema::compile(&schema), Err(ConfigError::InvalidSchema));
        }
    }

    #[test]
    fn rejects_invalid_leaves() {
        for leaf in [json!(""), json!([]), json!(["string", ""]), json!(["string", 5]), json!(5), json!(true), json!(null)] {
            assert_eq!(
                Schema::compile(&json!({"a": leaf})),
                Err(ConfigError::InvalidRuleValue),
                "leaf {leaf}"
            );
        }
    }

    #[test]
    fn rule_errors_propagate() {
        assert_eq!(
            Schema::compile(&json!({"a": {"b": "[string"}})),
            Err(ConfigError::IterableMisconfiguration("[string".into()))
        );
    }

    #[test]
    fn empty_schema_is_valid() {
        let schema = Schema::compile(&json!({})).unwrap();
        assert!(schema.is_empty());
        assert!(schema.leaves().is_empty());
    }
}
