//! # SoftHaus
//!
//! A soft-delete layer for document stores: deleted documents are marked
//! instead of removed, and reads, updates and aggregations hide them unless
//! a `with_deleted` variant is asked for.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use softhaus::prelude::*;
//! use std::sync::Arc;
//!
//! #[soft_model]
//! #[collection(name = "articles")]
//! pub struct Article {
//!     #[primary_key]
//!     pub id: String,
//!
//!     #[index]
//!     pub title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_toml_str(
//!         r#"
//!         [soft_delete]
//!         overrideMethods = "all"
//!         indexFields = "all"
//!         "#,
//!     )?;
//!
//!     let mut softhaus = SoftHaus::new(Arc::new(MemoryStore::new()), config);
//!     let articles = softhaus.register::<Article>().await?;
//!
//!     let mut article = articles
//!         .save_entity(&Article {
//!             id: "a1".to_string(),
//!             title: "Hello".to_string(),
//!             deleted: None,
//!             deleted_at: None,
//!         })
//!         .await?;
//!
//!     articles.delete_entity(&mut article).await?;
//!
//!     let visible: Vec<Article> = articles.find(Document::new()).exec_as().await?;
//!     let all: Vec<Article> = articles.find_with_deleted(Document::new())?.exec_as().await?;
//!     println!("{} visible, {} stored", visible.len(), all.len());
//!
//!     Ok(())
//! }
//! ```

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

pub mod core;
pub mod errors;
pub mod migration;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::SoftHaus;
pub use errors::SoftHausError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, Selection, SoftDeleteConfig, Toggle};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use store_object;
pub use model_derive;
pub use hook_system;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
