//! The validator facade.

use crate::engine;
use crate::error::Result;
use crate::form;
use crate::registry::{Predicate, Registry, RuleSet};
use crate::report::Report;
use crate::schema::Schema;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

/// A compiled schema bound to a predicate registry.
///
/// The schema is compiled once, at construction. Rule names are looked up in
/// the registry on every call, so predicates registered or replaced later are
/// picked up by existing validators.
///
/// ## Example
///
/// ```rust
/// use serde_json::json;
/// use vrule::Validator;
///
/// let validator = Validator::new(&json!({
///     "name": "string_ne",
///     "age": "?integer|min:18",
///     "tags": "[unique|max:5]string",
/// }))
/// .unwrap();
///
/// let report = validator.validate(&json!({"name": "Ada", "tags": ["a", "a"]}));
/// assert!(!report.is_valid);
/// assert_eq!(report.count, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<Schema>,
    registry: Arc<Registry>,
}

impl Validator {
    /// Compile `schema` against the process-wide registry.
    pub fn new(schema: &Value) -> Result<Self> {
        Self::with_registry(schema, Arc::clone(Registry::global()))
    }

    /// Compile `schema` against a specific registry.
    pub fn with_registry(schema: &Value, registry: Arc<Registry>) -> Result<Self> {
        let schema = Schema::compile(schema)?;
        Ok(Self {
            schema: Arc::new(schema),
            registry,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Whether `record` passes. Always equal to `validate(record).is_valid`.
    pub fn check<'a>(&self, record: impl Into<Option<&'a Value>>) -> bool {
        self.validate(record).is_valid
    }

    /// Validate `record` and report every failing field.
    ///
    /// Passing `None` with a non-empty schema yields the `NO_DATA` report.
    pub fn validate<'a>(&self, record: impl Into<Option<&'a Value>>) -> Report {
        engine::evaluate(&self.schema, record.into(), &self.registry.rules())
    }

    /// Normalize form pairs and check them.
    ///
    /// Returns the normalized object when it passes.
    pub fn check_form<I, K, V>(&self, pairs: I) -> Option<Value>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let record = form::normalize(pairs);
        self.check(&record).then_some(record)
    }

    /// Register or replace a predicate in the process-wide registry.
    pub fn extend<P>(name: &str, predicate: P) -> Result<()>
    where
        P: Predicate + 'static,
    {
        Registry::global().extend(name, predicate)
    }

    /// Register regex-backed predicates in the process-wide registry.
    pub fn extend_regex<I, K>(entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Regex)>,
        K: Into<String>,
    {
        Registry::global().extend_regex(entries)
    }

    /// Register enum-backed predicates in the process-wide registry.
    pub fn extend_enum<I, K>(entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Vec<Value>)>,
        K: Into<String>,
    {
        Registry::global().extend_enum(entries)
    }

    /// Register nested-schema predicates in the process-wide registry.
    pub fn extend_schema<I, K>(entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Registry::global().extend_schema(entries)
    }

    /// Frozen snapshot of the process-wide registry.
    pub fn rules() -> RuleSet {
        Registry::global().rules()
    }
}
