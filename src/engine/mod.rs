//! Validation Engine
//!
//! Binding setup, trigger dispatch, and on-demand checks, backed by an
//! instance-owned configuration store and identity allocator.

pub mod store;
pub mod validator;

pub use store::{BindingId, BindingKey, ConfigStore, IdAllocator};
pub use validator::Validator;
