//! Predicate registry.
//!
//! Maps rule names to predicates. Writers copy the current map, modify the
//! copy and swap it in under a lock; readers take a [`RuleSet`] snapshot, which
//! is an `Arc` clone and never changes after it is taken.

use crate::engine;
use crate::error::{ConfigError, Result};
use crate::predicates;
use crate::rule::is_valid_name;
use crate::schema::Schema;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// A named, pure check over a value and its resolved parameters.
///
/// Closures of the shape `Fn(&Value, &[Value]) -> bool` implement this
/// automatically.
///
/// ```rust,ignore
/// use vrule::{Registry, Predicate};
///
/// Registry::global().extend("even", |v: &serde_json::Value, _: &[serde_json::Value]| {
///     v.as_i64().is_some_and(|n| n % 2 == 0)
/// })?;
/// ```
pub trait Predicate: Send + Sync {
    fn test(&self, value: &Value, params: &[Value]) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&Value, &[Value]) -> bool + Send + Sync,
{
    fn test(&self, value: &Value, params: &[Value]) -> bool {
        self(value, params)
    }
}

/// Shared handle to a registered predicate.
pub type SharedPredicate = Arc<dyn Predicate>;

type RuleMap = IndexMap<String, SharedPredicate>;

/// Read-only snapshot of the registry.
#[derive(Clone)]
pub struct RuleSet {
    inner: Arc<RuleMap>,
}

impl RuleSet {
    pub fn get(&self, name: &str) -> Option<&SharedPredicate> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.keys()).finish()
    }
}

/// Process-wide or injectable predicate registry.
pub struct Registry {
    rules: RwLock<Arc<RuleMap>>,
}

static GLOBAL: OnceLock<Arc<Registry>> = OnceLock::new();

impl Registry {
    /// A registry with no predicates at all.
    pub fn empty() -> Self {
        Self {
            rules: RwLock::new(Arc::new(RuleMap::new())),
        }
    }

    /// A registry seeded with the built-in predicates.
    pub fn with_builtins() -> Self {
        let map: RuleMap = predicates::builtins()
            .into_iter()
            .map(|(name, predicate)| (name.to_string(), predicate))
            .collect();
        Self {
            rules: RwLock::new(Arc::new(map)),
        }
    }

    /// The process-wide registry used by [`Validator::new`](crate::Validator::new).
    pub fn global() -> &'static Arc<Registry> {
        GLOBAL.get_or_init(|| Arc::new(Registry::with_builtins()))
    }

    /// Snapshot of the current rules.
    pub fn rules(&self) -> RuleSet {
        let guard = self.rules.read().unwrap_or_else(PoisonError::into_inner);
        RuleSet {
            inner: Arc::clone(&guard),
        }
    }

    pub fn get(&self, name: &str) -> Option<SharedPredicate> {
        self.rules().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules().contains(name)
    }

    /// Register or replace a single predicate.
    pub fn extend<P>(&self, name: &str, predicate: P) -> Result<()>
    where
        P: Predicate + 'static,
    {
        self.extend_many([(name.to_string(), Arc::new(predicate) as SharedPredicate)])
    }

    /// Register or replace a batch of predicates.
    ///
    /// Nothing is registered if any name in the batch is invalid.
    pub fn extend_many<I, K>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, SharedPredicate)>,
        K: Into<String>,
    {
        let entries: Vec<(String, SharedPredicate)> = entries
            .into_iter()
            .map(|(name, predicate)| (name.into(), predicate))
            .collect();
        if let Some((name, _)) = entries.iter().find(|(name, _)| !is_valid_name(name)) {
            trace_warn!(name = %name, "rejected extension batch");
            return Err(ConfigError::InvalidExtension(name.clone()));
        }
        self.apply(entries);
        Ok(())
    }

    /// Register predicates that pass when the value is a string matching the regex.
    pub fn extend_regex<I, K>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Regex)>,
        K: Into<String>,
    {
        let wrapped = entries.into_iter().map(|(name, regex)| {
            let predicate: SharedPredicate = Arc::new(move |value: &Value, _: &[Value]| {
                value.as_str().is_some_and(|s| regex.is_match(s))
            });
            (name, predicate)
        });
        self.extend_many(wrapped)
    }

    /// Register predicates that pass when the value is one of the listed primitives.
    ///
    /// Lists must be non-empty and hold only strings and numbers.
    pub fn extend_enum<I, K>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Vec<Value>)>,
        K: Into<String>,
    {
        let mut wrapped = Vec::new();
        for (name, options) in entries {
            let name = name.into();
            let primitive = |v: &Value| v.is_string() || v.is_number();
            if options.is_empty() || !options.iter().all(primitive) {
                trace_warn!(name = %name, "rejected enum extension");
                return Err(ConfigError::InvalidExtension(name));
            }
            let predicate: SharedPredicate =
                Arc::new(move |value: &Value, _: &[Value]| options.contains(value));
            wrapped.push((name, predicate));
        }
        self.extend_many(wrapped)
    }

    /// Register predicates that pass when the value satisfies a nested schema.
    ///
    /// Nested schemas resolve their own rule names against this registry at
    /// evaluation time.
    pub fn extend_schema<I, K>(self: &Arc<Self>, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut wrapped = Vec::new();
        for (name, definition) in entries {
            let name = name.into();
            let schema = match Schema::compile(&definition) {
                Ok(schema) => schema,
                Err(_) => {
                    trace_warn!(name = %name, "rejected schema extension");
                    return Err(ConfigError::InvalidExtension(name));
                }
            };
            let registry = Arc::downgrade(self);
            let predicate: SharedPredicate =
                Arc::new(move |value: &Value, _: &[Value]| match registry.upgrade() {
                    Some(registry) => engine::evaluate(&schema, Some(value), &registry.rules()).is_valid,
                    None => false,
                });
            wrapped.push((name, predicate));
        }
        self.extend_many(wrapped)
    }

    /// Remove a predicate. Validators referencing it report `rule_not_found`.
    pub fn remove(&self, name: &str) -> Option<SharedPredicate> {
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.contains_key(name) {
            return None;
        }
        let mut next = RuleMap::clone(&guard);
        let removed = next.shift_remove(name);
        *guard = Arc::new(next);
        trace_debug!(name, "predicate removed");
        removed
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn apply(&self, entries: Vec<(String, SharedPredicate)>) {
        let mut guard = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = RuleMap::clone(&guard);
        for (name, predicate) in entries {
            let replaced = next.insert(name.clone(), predicate).is_some();
            trace_debug!(name = %name, replaced, "predicate registered");
        }
        *guard = Arc::new(next);
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.rules())
            .finish()
    }
}
