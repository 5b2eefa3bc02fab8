//! Soft-delete model
//!
//! [`SoftDeleteModel`] exposes the generated read, mutation and aggregate
//! variants of one collection together with the soft-delete mutator.

pub mod aggregate;
pub mod core;
pub mod mutations;
pub mod reads;
pub mod soft_deletable;


pub use self::core::SoftDeleteModel;
pub use reads::{Count, Many, One, Query, ReadKind};
pub use soft_deletable::MANDATORY_ID_MESSAGE;
