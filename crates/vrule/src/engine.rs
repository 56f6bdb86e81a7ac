//! Evaluation engine.
//!
//! Walks a compiled [`Schema`] against a record and folds every finding into a
//! [`Report`]. Nothing in here fails: unknown rules, missing fields and wrong
//! container kinds all become report entries.

use crate::path::deep_get;
use crate::registry::RuleSet;
use crate::report::{codes, ElementIndex, ErrorEntry, FieldErrors, Report};
use crate::rule::{Clause, IterableKind, IterableSpec, RuleNode};
use crate::schema::{join_path, Schema, SchemaNode};
use indexmap::IndexMap;
use serde_json::Value;

/// Per-call evaluation state.
struct Context<'a> {
    root: &'a Value,
    rules: &'a RuleSet,
}

/// Per-clause error lists for one leaf. A leaf failed if any list is non-empty.
type ClauseErrors = Vec<Vec<ErrorEntry>>;

/// Evaluate `schema` against `record` using the given rule snapshot.
pub(crate) fn evaluate(schema: &Schema, record: Option<&Value>, rules: &RuleSet) -> Report {
    let Some(root) = record else {
        if schema.is_empty() {
            return Report::from_fields(IndexMap::new());
        }
        trace_debug!("no record supplied");
        return Report::no_data();
    };

    let ctx = Context { root, rules };
    let mut fields = IndexMap::new();
    walk(schema.fields(), "", &ctx, &mut fields);

    let report = Report::from_fields(fields);
    trace_debug!(
        is_valid = report.is_valid,
        count = report.count,
        "evaluation finished"
    );
    report
}

fn walk(
    nodes: &IndexMap<String, SchemaNode>,
    prefix: &str,
    ctx: &Context<'_>,
    out: &mut IndexMap<String, FieldErrors>,
) {
    for (key, node) in nodes {
        let path = join_path(prefix, key);
        match node {
            SchemaNode::Nested(children) => walk(children, &path, ctx, out),
            SchemaNode::Leaf(rule) => {
                let value = deep_get(ctx.root, &path);
                if let Some(errors) = evaluate_leaf(rule, value, ctx) {
                    out.insert(path, errors);
                }
            }
        }
    }
}

fn evaluate_leaf(rule: &RuleNode, value: Option<&Value>, ctx: &Context<'_>) -> Option<FieldErrors> {
    let mut lists: ClauseErrors = vec![Vec::new(); rule.clauses().len()];

    match value {
        None if rule.sometimes => return None,
        None => push_all(&mut lists, ErrorEntry::new(codes::NOT_FOUND, Vec::new())),
        Some(value) => match &rule.iterable {
            None => {
                if let Err(failures) = evaluate_clauses(rule.clauses(), value, ctx) {
                    lists = failures;
                }
            }
            Some(spec) => evaluate_iterable(spec, rule.clauses(), value, ctx, &mut lists),
        },
    }

    if lists.iter().all(Vec::is_empty) {
        return None;
    }
    if rule.is_alternation() {
        Some(FieldErrors::Alternatives(lists))
    } else {
        Some(FieldErrors::Flat(lists.pop().unwrap_or_default()))
    }
}

/// Node-level findings apply to every alternative.
fn push_all(lists: &mut ClauseErrors, entry: ErrorEntry) {
    for list in lists.iter_mut() {
        list.push(entry.clone());
    }
}

fn evaluate_iterable(
    spec: &IterableSpec,
    clauses: &[Clause],
    value: &Value,
    ctx: &Context<'_>,
    lists: &mut ClauseErrors,
) {
    let elements: Vec<(ElementIndex, &Value)> = match (spec.kind, value) {
        (IterableKind::Array, Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (ElementIndex::Position(i), v))
            .collect(),
        (IterableKind::Map, Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (ElementIndex::Key(k.clone()), v))
            .collect(),
        _ => {
            push_all(lists, ErrorEntry::new(codes::ITERABLE, Vec::new()));
            return;
        }
    };

    if spec.unique && has_duplicates(&elements) {
        push_all(lists, ErrorEntry::new(codes::ITERABLE_UNIQUE, Vec::new()));
    }

    let len = elements.len();
    if let Some(min) = spec.min.filter(|min| len < *min) {
        push_all(lists, ErrorEntry::new(codes::ITERABLE_MIN, vec![Value::from(min)]));
        return;
    }
    if let Some(max) = spec.max.filter(|max| len > *max) {
        push_all(lists, ErrorEntry::new(codes::ITERABLE_MAX, vec![Value::from(max)]));
        return;
    }

    for (idx, element) in elements {
        if let Err(failures) = evaluate_clauses(clauses, element, ctx) {
            for (list, entries) in lists.iter_mut().zip(failures) {
                list.extend(entries.into_iter().map(|e| e.at(idx.clone())));
            }
        }
    }
}

fn has_duplicates(elements: &[(ElementIndex, &Value)]) -> bool {
    elements
        .iter()
        .enumerate()
        .any(|(i, (_, a))| elements[i + 1..].iter().any(|(_, b)| a == b))
}

/// OR across clauses. On failure returns every clause's failing entries.
fn evaluate_clauses(clauses: &[Clause], value: &Value, ctx: &Context<'_>) -> Result<(), ClauseErrors> {
    let mut failures = Vec::with_capacity(clauses.len());
    for clause in clauses {
        let errors = evaluate_clause(clause, value, ctx);
        if errors.is_empty() {
            return Ok(());
        }
        failures.push(errors);
    }
    Err(failures)
}

/// AND within a clause. Every step runs unless a rule name is unknown.
fn evaluate_clause(clause: &Clause, value: &Value, ctx: &Context<'_>) -> Vec<ErrorEntry> {
    let mut errors = Vec::new();
    for step in &clause.steps {
        let Some(predicate) = ctx.rules.get(&step.name) else {
            errors.push(ErrorEntry::new(
                codes::RULE_NOT_FOUND,
                vec![Value::String(step.name.clone())],
            ));
            break;
        };

        let params: Vec<Value> = step
            .params
            .iter()
            .map(|p| p.resolve(Some(ctx.root)))
            .collect();
        if predicate.test(value, &params) == step.negate {
            errors.push(ErrorEntry::new(step.failure_code(), params));
        }
    }
    errors
}
