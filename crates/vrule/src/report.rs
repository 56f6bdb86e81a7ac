//! Evaluation report types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Error codes produced by the engine itself rather than by a predicate.
pub mod codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const RULE_NOT_FOUND: &str = "rule_not_found";
    pub const ITERABLE: &str = "iterable";
    pub const ITERABLE_UNIQUE: &str = "iterable_unique";
    pub const ITERABLE_MIN: &str = "iterable_min";
    pub const ITERABLE_MAX: &str = "iterable_max";
    pub const NO_DATA: &str = "NO_DATA";
}

/// Position of an element inside an iterable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementIndex {
    /// Index into an array (`[...]` wrapper).
    Position(usize),
    /// Member key of an object (`{...}` wrapper).
    Key(String),
}

/// A single finding for a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Failing predicate name, `not_<name>`, or one of [`codes`].
    pub msg: String,
    /// Parameters the step was evaluated with.
    pub params: Vec<Value>,
    /// Set only for errors raised on an iterable element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<ElementIndex>,
}

impl ErrorEntry {
    pub fn new(msg: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            msg: msg.into(),
            params,
            idx: None,
        }
    }

    /// Attach the element position this error belongs to.
    pub fn at(mut self, idx: ElementIndex) -> Self {
        self.idx = Some(idx);
        self
    }
}

/// Errors recorded for one dotted path.
///
/// Single-clause rules report a flat list. Alternation rules report one inner
/// list per clause, in clause order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldErrors {
    Flat(Vec<ErrorEntry>),
    Alternatives(Vec<Vec<ErrorEntry>>),
}

impl FieldErrors {
    /// The flat list, if this is a single-clause result.
    pub fn as_flat(&self) -> Option<&[ErrorEntry]> {
        match self {
            FieldErrors::Flat(entries) => Some(entries),
            FieldErrors::Alternatives(_) => None,
        }
    }

    /// The per-clause lists, if this is an alternation result.
    pub fn as_alternatives(&self) -> Option<&[Vec<ErrorEntry>]> {
        match self {
            FieldErrors::Flat(_) => None,
            FieldErrors::Alternatives(lists) => Some(lists),
        }
    }

    /// Iterate every entry regardless of shape.
    pub fn entries(&self) -> Box<dyn Iterator<Item = &ErrorEntry> + '_> {
        match self {
            FieldErrors::Flat(entries) => Box::new(entries.iter()),
            FieldErrors::Alternatives(lists) => Box::new(lists.iter().flatten()),
        }
    }
}

/// The `errors` member of a [`Report`].
#[derive(Debug, Clone, PartialEq)]
pub enum Errors {
    /// No record was supplied for a non-empty schema.
    NoData,
    /// Failing dotted paths in schema declaration order.
    Fields(IndexMap<String, FieldErrors>),
}

impl Errors {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Errors::NoData)
    }

    /// Errors for one dotted path, if it failed.
    pub fn get(&self, path: &str) -> Option<&FieldErrors> {
        match self {
            Errors::NoData => None,
            Errors::Fields(fields) => fields.get(path),
        }
    }

    /// Failing dotted paths.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            Errors::NoData => Vec::new(),
            Errors::Fields(fields) => fields.keys().map(|s| s.as_str()).collect(),
        }
    }
}

impl Serialize for Errors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Errors::NoData => serializer.serialize_str(codes::NO_DATA),
            Errors::Fields(fields) => fields.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Errors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Sentinel(String),
            Fields(IndexMap<String, FieldErrors>),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Sentinel(s) if s == codes::NO_DATA => Ok(Errors::NoData),
            Wire::Sentinel(s) => Err(serde::de::Error::custom(format!(
                "unexpected errors sentinel: {s}"
            ))),
            Wire::Fields(fields) => Ok(Errors::Fields(fields)),
        }
    }
}

/// Result of validating one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub is_valid: bool,
    /// Number of failing fields, not of individual entries.
    pub count: usize,
    pub errors: Errors,
}

impl Report {
    pub(crate) fn no_data() -> Self {
        Self {
            is_valid: false,
            count: 1,
            errors: Errors::NoData,
        }
    }

    pub(crate) fn from_fields(fields: IndexMap<String, FieldErrors>) -> Self {
        Self {
            is_valid: fields.is_empty(),
            count: fields.len(),
            errors: Errors::Fields(fields),
        }
    }

    /// Convert to `Result`, keeping the report on failure.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.errors {
            Errors::NoData => write!(f, "Validation failed: no data"),
            Errors::Fields(_) if self.is_valid => write!(f, "Validation passed"),
            Errors::Fields(_) => write!(f, "Validation failed: {} field(s)", self.count),
        }
    }
}

impl std::error::Error for Report {}
