//! Store Object - Soft-delete engine for document stores
//!
//! This crate provides the document store abstraction, the filter/query
//! builder, schema augmentation with deletion markers, and the soft-delete
//! model that rewrites reads, updates and aggregations so deleted documents
//! stay hidden unless explicitly requested.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod args;
pub mod errors;
pub mod memory;
pub mod model;
pub mod operations;
pub mod options;
pub mod prelude;
pub mod query_builder;
pub mod schema;
pub mod traits;
pub mod visibility;

pub use args::{normalize, Arg, Completion, MutationOutcome, NormalizedArgs, UpdateCall};
pub use errors::{SoftDeleteError, StoreError};
pub use memory::MemoryStore;
pub use model::{Count, Many, One, Query, ReadKind, SoftDeleteModel};
pub use operations::{BaseOperation, Handler, OperationFamily, OperationRegistry, Variant};
pub use options::{IndexFields, SoftDeleteOptions};
pub use query_builder::{QueryBuilder, QueryFilter, QueryOperator, SortOrder};
pub use schema::{FieldDef, Schema, ValidationError};
pub use traits::*;

pub use hook_system::{HookManager, Pipeline};
pub use type_mapping::{Document, FieldType, ID_FIELD};

// Re-exported for code generated by the model macros
pub use chrono;
pub use serde_json;
