//! Rule-string compiler.
//!
//! Grammar, left to right:
//!
//! ```text
//! rule      := ['?'] [iterable] [step ('|' step)*]
//! iterable  := '[' opts ']' | '{' opts '}'
//! opts      := [opt ('|' opt)*]          opt := 'unique' | 'min:' N | 'max:' N
//! step      := ['!'] name [':' param (',' param)*]
//! param     := '<' path '>' | literal
//! ```

use super::{is_valid_name, Clause, IterableKind, IterableSpec, ParamRef, RuleNode, Step};
use crate::error::{ConfigError, Result};

const BRACKETS: [char; 4] = ['[', ']', '{', '}'];

struct Alternative {
    sometimes: bool,
    iterable: Option<IterableSpec>,
    clause: Clause,
}

/// Compile a single rule string into a one-clause [`RuleNode`].
pub fn compile(rule: &str) -> Result<RuleNode> {
    let alt = parse_alternative(rule)?;
    trace_trace!(rule, "compiled rule string");
    Ok(RuleNode::new(alt.sometimes, alt.iterable, vec![alt.clause]))
}

/// Compile an array of alternative rule strings into one [`RuleNode`].
///
/// Any `?` marks the whole node optional. Every alternative must carry the
/// same iterable wrapper, or none at all.
pub fn compile_alternatives<S: AsRef<str>>(rules: &[S]) -> Result<RuleNode> {
    let alternatives = rules
        .iter()
        .map(|rule| parse_alternative(rule.as_ref()).map(|alt| (rule.as_ref(), alt)))
        .collect::<Result<Vec<_>>>()?;

    let Some((_, first)) = alternatives.first() else {
        return Err(ConfigError::InvalidRuleValue);
    };
    let iterable = first.iterable.clone();
    if let Some((rule, _)) = alternatives.iter().find(|(_, alt)| alt.iterable != iterable) {
        return Err(ConfigError::IterableMisconfiguration(rule.to_string()));
    }

    let sometimes = alternatives.iter().any(|(_, alt)| alt.sometimes);
    let clauses = alternatives.into_iter().map(|(_, alt)| alt.clause).collect();
    Ok(RuleNode::new(sometimes, iterable, clauses))
}

fn parse_alternative(raw: &str) -> Result<Alternative> {
    if raw.is_empty() {
        return Err(ConfigError::InvalidRuleValue);
    }

    let (sometimes, mut rest) = match raw.strip_prefix('?') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let iterable = match rest.chars().next() {
        Some(open @ ('[' | '{')) => {
            let (kind, close) = if open == '[' {
                (IterableKind::Array, ']')
            } else {
                (IterableKind::Map, '}')
            };
            let end = rest.find(close).ok_or_else(|| iterable_error(raw))?;
            let inner = &rest[1..end];
            if inner.contains(&BRACKETS[..]) {
                return Err(iterable_error(raw));
            }
            let spec = parse_iterable(kind, inner, raw)?;
            rest = &rest[end + 1..];
            Some(spec)
        }
        _ => None,
    };

    // Anything bracket-like left over is a stray or mismatched wrapper.
    if rest.contains(&BRACKETS[..]) {
        return Err(iterable_error(raw));
    }

    let clause = parse_clause(rest, raw)?;
    Ok(Alternative {
        sometimes,
        iterable,
        clause,
    })
}

fn parse_iterable(kind: IterableKind, inner: &str, raw: &str) -> Result<IterableSpec> {
    let mut spec = IterableSpec {
        kind,
        unique: false,
        min: None,
        max: None,
    };
    if inner.is_empty() {
        return Ok(spec);
    }

    for token in inner.split('|') {
        match token.split_once(':') {
            None if token == "unique" => spec.unique = true,
            Some(("min", n)) => spec.min = Some(parse_bound(n, raw)?),
            Some(("max", n)) => spec.max = Some(parse_bound(n, raw)?),
            _ => return Err(iterable_error(raw)),
        }
    }
    Ok(spec)
}

fn parse_bound(token: &str, raw: &str) -> Result<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(iterable_error(raw));
    }
    token.parse().map_err(|_| iterable_error(raw))
}

fn parse_clause(rest: &str, raw: &str) -> Result<Clause> {
    if rest.is_empty() {
        return Ok(Clause::default());
    }
    let steps = rest
        .split('|')
        .map(|part| parse_step(part, raw))
        .collect::<Result<Vec<_>>>()?;
    Ok(Clause { steps })
}

fn parse_step(part: &str, raw: &str) -> Result<Step> {
    let (negate, body) = match part.strip_prefix('!') {
        Some(body) => (true, body),
        None => (false, part),
    };

    let (name, params) = match body.split_once(':') {
        Some((name, params)) => (name, Some(params)),
        None => (body, None),
    };

    if !is_valid_name(name) {
        return Err(ConfigError::RuleMisconfiguration(raw.to_string()));
    }

    let params = match params {
        None => Vec::new(),
        Some(list) => list
            .split(',')
            .map(|token| parse_param(token, raw))
            .collect::<Result<Vec<_>>>()?,
    };

    Ok(Step {
        negate,
        name: name.to_string(),
        params,
    })
}

fn parse_param(token: &str, raw: &str) -> Result<ParamRef> {
    let err = || ConfigError::ParameterMisconfiguration(raw.to_string());

    if token.is_empty() {
        return Err(err());
    }

    if let Some(inner) = token.strip_prefix('<') {
        let path = inner.strip_suffix('>').ok_or_else(err)?;
        if !is_valid_path(path) {
            return Err(err());
        }
        return Ok(ParamRef::Reference(path.to_string()));
    }

    if token.contains(&['<', '>'][..]) {
        return Err(err());
    }
    Ok(ParamRef::Literal(token.to_string()))
}

fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split('.').all(is_valid_name)
}

fn iterable_error(raw: &str) -> ConfigError {
    ConfigError::IterableMisconfiguration(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(node: &RuleNode, clause: usize, idx: usize) -> &Step {
        &node.clauses()[clause].steps[idx]
    }

    #[test]
    fn compiles_flags_iterable_and_reference() {
        let node = compile("?[unique|min:1|max:10]in:<meta.strings>").unwrap();
        assert!(node.sometimes);
        assert_eq!(
            node.iterable,
            Some(IterableSpec {
                kind: IterableKind::Array,
                unique: true,
                min: Some(1),
                max: Some(10),
            })
        );
        assert_eq!(node.clauses().len(), 1);
        let s = step(&node, 0, 0);
        assert_eq!(s.name, "in");
        assert_eq!(s.params, vec![ParamRef::Reference("meta.strings".into())]);
    }

    #[test]
    fn compiles_pipe_sequence_with_negation_and_literals() {
        let node = compile("string_ne|!in:foo,bar|min:2").unwrap();
        assert!(!node.sometimes);
        assert!(node.iterable.is_none());
        assert_eq!(node.clauses()[0].steps.len(), 3);
        let negated = step(&node, 0, 1);
        assert!(negated.negate);
        assert_eq!(
            negated.params,
            vec![ParamRef::Literal("foo".into()), ParamRef::Literal("bar".into())]
        );
        assert_eq!(step(&node, 0, 2).params, vec![ParamRef::Literal("2".into())]);
    }

    #[test]
    fn map_wrapper_and_empty_options() {
        let node = compile("{}number").unwrap();
        let spec = node.iterable.unwrap();
        assert_eq!(spec.kind, IterableKind::Map);
        assert!(!spec.unique);
        assert_eq!(spec.min, None);
    }

    #[test]
    fn bare_sometimes_is_an_empty_clause() {
        let node = compile("?").unwrap();
        assert!(node.sometimes);
        assert!(node.clauses()[0].steps.is_empty());
    }

    #[test]
    fn malformed_brackets_are_rejected() {
        for rule in ["[string", "string]", "][string", "}{number", "[unique{", "[min:x]string", "[foo]string", "string[]"] {
            assert_eq!(
                compile(rule),
                Err(ConfigError::IterableMisconfiguration(rule.to_string())),
                "rule {rule}"
            );
        }
    }

    #[test]
    fn malformed_parameters_are_rejected() {
        for rule in ["equal_to:<>", "in:<meta", "in:a,,b", "min:", "in:<a..b>", "in:a>"] {
            assert_eq!(
                compile(rule),
                Err(ConfigError::ParameterMisconfiguration(rule.to_string())),
                "rule {rule}"
            );
        }
    }

    #[test]
    fn malformed_names_are_rejected() {
        for rule in ["string||number", "!", "bad name", ":5"] {
            assert_eq!(
                compile(rule),
                Err(ConfigError::RuleMisconfiguration(rule.to_string())),
                "rule {rule}"
            );
        }
    }

    #[test]
    fn alternatives_become_clauses() {
        let node = compile_alternatives(&["guid", "false"]).unwrap();
        assert!(node.is_alternation());
        assert_eq!(node.clauses()[0].steps[0].name, "guid");
        assert_eq!(node.clauses()[1].steps[0].name, "false");
    }

    #[test]
    fn alternatives_merge_flags() {
        let node = compile_alternatives(&["?[max:3]number", "[max:3]string"]).unwrap();
        assert!(node.sometimes);
        assert_eq!(node.iterable.as_ref().and_then(|i| i.max), Some(3));
        assert_eq!(node.clauses().len(), 2);
    }

    #[test]
    fn alternatives_must_agree_on_iterable() {
        assert_eq!(
            compile_alternatives(&["[max:3]string", "[max:4]number"]),
            Err(ConfigError::IterableMisconfiguration("[max:4]number".into()))
        );
        assert_eq!(
            compile_alternatives::<&str>(&[]),
            Err(ConfigError::InvalidRuleValue)
        );
    }

    #[test]
    fn wrapped_and_bare_alternatives_conflict() {
        assert_eq!(
            compile_alternatives(&["[]string", "number"]),
            Err(ConfigError::IterableMisconfiguration("number".into()))
        );
        assert_eq!(
            compile_alternatives(&["?", "{}string"]),
            Err(ConfigError::IterableMisconfiguration("{}string".into()))
        );
    }
}
