//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{DocumentStore, SoftDeletable, SoftDocument};

// Store options and results
pub use crate::traits::{FindOptions, UpdateOptions, UpdateResult};

// Error types
pub use crate::errors::{SoftDeleteError, StoreError};

// Model and its queries
pub use crate::model::{Count, Many, One, Query, SoftDeleteModel, MANDATORY_ID_MESSAGE};

// Pipeline stages
pub use crate::visibility::{not_deleted_stage, show_all_documents_stage};

// Call shapes
pub use crate::args::{Arg, MutationOutcome, UpdateCall};

// Operations and options
pub use crate::operations::{BaseOperation, Variant};
pub use crate::options::{IndexFields, SoftDeleteOptions};

// Schema
pub use crate::schema::{FieldDef, Schema, ValidationError};

// Query building
pub use crate::query_builder::{FilterChain, QueryBuilder, QueryFilter, SortOrder};

// Reference backend
pub use crate::memory::MemoryStore;

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use serde_json::{json, Value};
pub use type_mapping::{Document, FieldType};
