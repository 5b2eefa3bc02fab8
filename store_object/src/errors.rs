//! Error types for store and soft-delete operations

use crate::schema::ValidationError;
use thiserror::Error;

/// Errors raised by a document store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Unsupported filter operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid update document: {0}")]
    InvalidUpdate(String),

    #[error("Unsupported pipeline stage: {0}")]
    UnsupportedStage(String),

    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors raised by the soft-delete layer.
///
/// Store failures pass through unchanged in [`SoftDeleteError::Store`].
#[derive(Error, Debug)]
pub enum SoftDeleteError {
    #[error("Mandatory argument error: {0}")]
    MandatoryArgument(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Operation variant not available: {0}")]
    VariantUnavailable(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Hook error: {0}")]
    Hook(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SoftDeleteError {
    pub fn hook(error: anyhow::Error) -> Self {
        SoftDeleteError::Hook(format!("{:#}", error))
    }

    /// Whether this error came from the caller misusing an entry point
    pub fn is_caller_misuse(&self) -> bool {
        matches!(
            self,
            SoftDeleteError::MandatoryArgument(_)
                | SoftDeleteError::InvalidArgument(_)
                | SoftDeleteError::VariantUnavailable(_)
        )
    }
}
