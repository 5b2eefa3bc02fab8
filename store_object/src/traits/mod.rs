//! Traits for document operations
//!
//! This module contains the traits that define the store contract, typed
//! soft-delete entities and the soft-delete surface of a model.

pub mod document_store;
pub mod soft_deletable;
pub mod soft_document;

// Re-export all public items for convenience
pub use document_store::{DocumentStore, FindOptions, UpdateOptions, UpdateResult};
pub use soft_deletable::SoftDeletable;
pub use soft_document::SoftDocument;
