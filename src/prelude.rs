//! Convenience re-exports for common SoftHaus usage
//!
//! This prelude module re-exports the most commonly used items from the SoftHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use softhaus::prelude::*;
//!
//! // Now you have access to all the common SoftHaus types and traits
//! ```

// Core SoftHaus components
pub use crate::core::SoftHaus;
pub use crate::errors::SoftHausError;
pub use crate::migration;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, Selection, SoftDeleteConfig};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export store_object module for macro-generated code
pub use store_object;

// Re-export hook system for lifecycle hooks
pub use hook_system::prelude::*;

// Re-export model derive for entity creation
pub use model_derive::{soft_model, SoftDocument};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use tokio;
