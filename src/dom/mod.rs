//! In-Memory Document Model
//!
//! A minimal element tree with the query surface the validation engine
//! needs: scoped ordered selection, ancestor lookup, class and value
//! access, data tagging, and tooltip state.

pub mod document;
pub mod selector;

pub use document::{Document, NodeId, TooltipState};
pub use selector::Selector;
