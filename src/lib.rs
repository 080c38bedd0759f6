//! Form Validator
//!
//! A declarative validation engine for groups of input fields.
//!
//! This library provides:
//! - Rule-set binding over container elements
//! - Trigger-driven and on-demand validation (`check`, `has_errors`, `reset`)
//! - A name/predicate rule registry with inline custom rules
//! - Error rendering through highlight classes and tooltips
//! - A small in-memory document model with selector queries

pub mod dom;
pub mod engine;
pub mod error;
pub mod render;
pub mod rules;
pub mod ruleset;

// Re-exports for clean public API
pub use dom::{Document, NodeId, Selector};
pub use engine::Validator;
pub use error::{Error, Result};
pub use rules::RuleRegistry;
pub use ruleset::{RuleRef, RuleSet, RuleSetPatch};
