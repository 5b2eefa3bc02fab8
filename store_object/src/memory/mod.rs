//! In-memory document store
//!
//! Reference backend used by tests and embedded deployments.

pub mod aggregation;
pub mod matcher;
pub mod store;
pub mod update;

pub use store::MemoryStore;
pub use update::{UpdateOperation, UpdateSet};
