//! # vrule
//!
//! Declarative validation of JSON records and form data. A schema maps field
//! paths to compact rule strings; the schema is compiled once and then
//! evaluated against any number of records.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use vrule::prelude::*;
//!
//! let validator = Validator::new(&json!({
//!     "email": "email",
//!     "profile": {"age": "integer|between:18,120"},
//!     "gender": "?in:<meta.genders>",
//!     "meta": {"genders": "[unique|min:1]string_ne"},
//! }))
//! .unwrap();
//!
//! let report = validator.validate(&json!({
//!     "email": "ada@example.com",
//!     "profile": {"age": 17},
//!     "meta": {"genders": ["f", "m", "x"]},
//! }));
//! assert_eq!(report.count, 1);
//! assert!(report.errors.get("profile.age").is_some());
//! ```
//!
//! ## Rule strings
//!
//! - `?` - the field may be absent
//! - `[unique|min:N|max:N]` / `{...}` - the value is an array / object whose
//!   elements are each checked against the rest of the rule
//! - `a|b|c` - every step must pass
//! - `!a` - negates a step
//! - `name:p1,p2` - literal parameters; `<path.to.field>` reads a parameter
//!   from the root record
//! - `["a", "b"]` as a schema leaf - any alternative may pass
//!
//! ## Report format
//!
//! ```json
//! {
//!   "is_valid": false,
//!   "count": 1,
//!   "errors": {
//!     "profile.age": [{"msg": "between", "params": ["18", "120"]}]
//!   }
//! }
//! ```

#[macro_use]
mod tracing_macros;

mod engine;
mod error;
mod path;
mod predicates;
mod registry;
mod report;
mod rule;
mod schema;
mod validator;

pub mod form;

#[cfg(test)]
mod tests;

pub use error::{ConfigError, FormError, Result};
pub use path::deep_get;
pub use registry::{Predicate, Registry, RuleSet, SharedPredicate};
pub use report::{codes, ElementIndex, ErrorEntry, Errors, FieldErrors, Report};
pub use rule::{
    compile, compile_alternatives, Clause, IterableKind, IterableSpec, ParamRef, RuleNode, Step,
};
pub use schema::{Schema, SchemaNode};
pub use validator::Validator;

/// Prelude module for validation
pub mod prelude {
    pub use crate::error::ConfigError;
    pub use crate::registry::{Predicate, Registry};
    pub use crate::report::{ErrorEntry, Errors, FieldErrors, Report};
    pub use crate::validator::Validator;
}
