//! Validation Rules
//!
//! The name → predicate registry and the declarative TOML schema that
//! feeds it.

pub mod registry;
pub mod schema;

pub use registry::RuleRegistry;
pub use schema::{RuleDef, RuleKind, RuleSetDef, RulesFile};
