//! Configuration error types.
//!
//! Everything in here is raised while a [`Validator`](crate::Validator) is
//! being built or while the predicate registry is being extended. Problems
//! found while evaluating a record are never errors, they end up in the
//! [`Report`](crate::Report).

use thiserror::Error;

/// Error raised when a schema, a rule string or an extension is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The schema handed to the validator is not an object.
    #[error("Provide an object to define the rules of this validator")]
    InvalidSchema,

    /// A schema leaf is neither a non-empty string, a non-empty array of
    /// non-empty strings, nor a nested object.
    #[error("Invalid rule value")]
    InvalidRuleValue,

    /// Bracket nesting or the options inside an iterable wrapper are wrong.
    #[error("Iterable misconfiguration, verify rule config for {0}")]
    IterableMisconfiguration(String),

    /// A `name:params` step has an empty or unbalanced parameter.
    #[error("Parameterization misconfiguration, verify rule config for {0}")]
    ParameterMisconfiguration(String),

    /// A step has an empty or malformed predicate name.
    #[error("Rule misconfiguration, verify rule config for {0}")]
    RuleMisconfiguration(String),

    /// An extension name or value was rejected by the registry.
    #[error("Invalid extension: {0}")]
    InvalidExtension(String),
}

/// Error raised when a form body cannot be decoded.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Form decoding error: {0}")]
    Decode(#[from] serde_urlencoded::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
