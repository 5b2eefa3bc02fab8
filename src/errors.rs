//! Error types for the SoftHaus crate
//!
//! This module contains all error types that can be returned by SoftHaus operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SoftHausError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model already registered: {0}")]
    ModelAlreadyRegistered(String),

    #[error(transparent)]
    SoftDelete(#[from] store_object::SoftDeleteError),

    #[error("Store error: {0}")]
    Store(#[from] store_object::StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
