//! Compiled rule representation.
//!
//! A schema leaf such as `'?[unique|min:1]in:<meta.strings>'` compiles into a
//! [`RuleNode`]: flags, an optional [`IterableSpec`] and one or more
//! [`Clause`]s. Clauses are alternatives (any may pass), the [`Step`]s inside a
//! clause must all pass.

mod lexer;

pub use lexer::{compile, compile_alternatives};

use crate::path::deep_get;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Container kind required by an iterable wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IterableKind {
    /// `[...]`: the value must be an array.
    Array,
    /// `{...}`: the value must be an object, evaluated per member value.
    Map,
}

/// Iterable wrapper configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IterableSpec {
    pub kind: IterableKind,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

/// A step parameter: a literal token or a `<path>` into the root record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRef {
    Literal(String),
    Reference(String),
}

impl ParamRef {
    /// Resolve against the root record. Unresolvable references become `null`.
    pub fn resolve(&self, root: Option<&Value>) -> Value {
        match self {
            ParamRef::Literal(token) => Value::String(token.clone()),
            ParamRef::Reference(path) => root
                .and_then(|r| deep_get(r, path))
                .cloned()
                .unwrap_or(Value::Null),
        }
    }
}

/// One predicate invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub negate: bool,
    pub name: String,
    pub params: Vec<ParamRef>,
}

impl Step {
    /// Error code reported when this step fails.
    pub fn failure_code(&self) -> String {
        if self.negate {
            format!("not_{}", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// An AND-sequence of steps. An empty clause always passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Clause {
    pub steps: Vec<Step>,
}

/// Compiled form of one schema leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleNode {
    pub sometimes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterable: Option<IterableSpec>,
    clauses: Vec<Clause>,
}

impl RuleNode {
    pub(crate) fn new(sometimes: bool, iterable: Option<IterableSpec>, clauses: Vec<Clause>) -> Self {
        debug_assert!(!clauses.is_empty());
        Self {
            sometimes,
            iterable,
            clauses,
        }
    }

    /// The alternatives of this node, never empty.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Whether errors for this node use the nested list-of-lists shape.
    pub fn is_alternation(&self) -> bool {
        self.clauses.len() > 1
    }

    /// Every predicate name referenced by this node.
    pub fn predicate_names(&self) -> impl Iterator<Item = &str> {
        self.clauses
            .iter()
            .flat_map(|c| c.steps.iter())
            .map(|s| s.name.as_str())
    }
}

/// Whether `name` is acceptable as a predicate name (`[A-Za-z0-9_-]+`).
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for IterableSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.unique {
            parts.push("unique".to_string());
        }
        if let Some(min) = self.min {
            parts.push(format!("min:{min}"));
        }
        if let Some(max) = self.max {
            parts.push(format!("max:{max}"));
        }
        match self.kind {
            IterableKind::Array => write!(f, "[{}]", parts.join("|")),
            IterableKind::Map => write!(f, "{{{}}}", parts.join("|")),
        }
    }
}

impl fmt::Display for ParamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamRef::Literal(token) => f.write_str(token),
            ParamRef::Reference(path) => write!(f, "<{path}>"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            f.write_str("!")?;
        }
        f.write_str(&self.name)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
            write!(f, ":{}", params.join(","))?;
        }
        Ok(())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps.iter().map(|s| s.to_string()).collect();
        f.write_str(&steps.join("|"))
    }
}

impl fmt::Display for RuleNode {
    /// Renders each alternative back to rule-string form, separated by ` || `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = format!(
            "{}{}",
            if self.sometimes { "?" } else { "" },
            self.iterable.as_ref().map(|i| i.to_string()).unwrap_or_default()
        );
        let rendered: Vec<String> = self
            .clauses
            .iter()
            .map(|c| format!("{prefix}{c}"))
            .collect();
        f.write_str(&rendered.join(" || "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reference_params_resolve_against_root() {
        let root = json!({"meta": {"options": ["m", "f"]}});
        let param = ParamRef::Reference("meta.options".to_string());
        assert_eq!(param.resolve(Some(&root)), json!(["m", "f"]));

        let missing = ParamRef::Reference("meta.nope".to_string());
        assert_eq!(missing.resolve(Some(&root)), Value::Null);
        assert_eq!(missing.resolve(None), Value::Null);
    }

    #[test]
    fn literal_params_stay_strings() {
        assert_eq!(ParamRef::Literal("5".into()).resolve(None), json!("5"));
    }

    #[test]
    fn failure_code_reflects_negation() {
        let step = Step {
            negate: true,
            name: "number".into(),
            params: vec![],
        };
        assert_eq!(step.failure_code(), "not_number");
    }

    #[test]
    fn name_charset() {
        assert!(is_valid_name("string_ne"));
        assert!(is_valid_name("ip-v4"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("bad name"));
        assert!(!is_valid_name("a.b"));
    }

    #[test]
    fn display_renders_rule_strings() {
        let node = compile("?[unique|min:1|max:10]in:<meta.strings>").unwrap();
        assert_eq!(node.to_string(), "?[unique|min:1|max:10]in:<meta.strings>");
    }
}
