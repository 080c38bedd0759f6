//! Library error types.
//!
//! Configuration mistakes fail loudly; validation outcomes are never errors.

/// Errors raised by binding, lookup, and rule-definition code paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rule-set names a validation rule the registry does not know.
    #[error("unknown validation rule '{0}'")]
    UnknownRule(String),

    /// check/has_errors/reset was called for a container that was never bound.
    #[error("no validator binding for container selector '{0}'")]
    NotBound(String),

    /// A selector string could not be parsed.
    #[error("invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    /// A declarative rule definition could not be compiled.
    #[error("invalid rule definition '{name}': {reason}")]
    RuleDef { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
