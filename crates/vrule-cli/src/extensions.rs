//! Extensions file loading.
//!
//! ```json
//! {
//!   "regex":  {"slug": "^[a-z0-9-]+$"},
//!   "enum":   {"size": ["S", "M", "L"]},
//!   "schema": {"address": {"street": "string_ne", "zip": "?integer"}}
//! }
//! ```
//!
//! Sections are applied in the order regex, enum, schema, so schema
//! extensions may use the predicates registered before them.

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use vrule::Registry;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Extensions {
    pub regex: BTreeMap<String, String>,
    #[serde(rename = "enum")]
    pub enums: BTreeMap<String, Vec<Value>>,
    pub schema: BTreeMap<String, Value>,
}

impl Extensions {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read extensions file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("invalid extensions file {}", path.display()))
    }

    /// Register every extension. Each section is one atomic batch.
    pub fn apply(self, registry: &Arc<Registry>) -> Result<()> {
        let regexes = self
            .regex
            .into_iter()
            .map(|(name, pattern)| {
                let regex = Regex::new(&pattern)
                    .with_context(|| format!("invalid pattern for regex extension `{name}`"))?;
                Ok((name, regex))
            })
            .collect::<Result<Vec<_>>>()?;

        registry.extend_regex(regexes)?;
        registry.extend_enum(self.enums)?;
        registry.extend_schema(self.schema)?;
        tracing::debug!("extensions applied");
        Ok(())
    }
}

/// Load and apply an optional extensions file to `registry`.
pub fn register(path: Option<&Path>, registry: &Arc<Registry>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    Extensions::load(path)?
        .apply(registry)
        .with_context(|| format!("failed to register extensions from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use vrule::Predicate;

    #[test]
    fn applies_all_sections() {
        let registry = Arc::new(Registry::with_builtins());
        let extensions: Extensions = serde_json::from_value(json!({
            "regex": {"slug": "^[a-z-]+$"},
            "enum": {"size": ["S", "M"]},
            "schema": {"sized": {"size": "size", "name": "slug"}},
        }))
        .unwrap();
        extensions.apply(&registry).unwrap();

        let sized = registry.get("sized").unwrap();
        assert!(sized.test(&json!({"size": "S", "name": "a-b"}), &[]));
        assert!(!sized.test(&json!({"size": "XL", "name": "a-b"}), &[]));
    }

    #[test]
    fn rejects_unknown_sections() {
        let result: serde_json::Result<Extensions> = serde_json::from_value(json!({"regexes": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn bad_pattern_names_the_extension() {
        let registry = Arc::new(Registry::with_builtins());
        let extensions = Extensions {
            regex: BTreeMap::from([("broken".to_string(), "(".to_string())]),
            ..Default::default()
        };
        let err = extensions.apply(&registry).unwrap_err();
        assert!(err.to_string().contains("broken"));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"enum": {{"flag": ["on", "off"]}}}}"#).unwrap();
        let registry = Arc::new(Registry::with_builtins());
        register(Some(file.path()), &registry).unwrap();
        assert!(registry.contains("flag"));

        register(None, &registry).unwrap();
    }
}
