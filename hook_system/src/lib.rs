//! Lifecycle hooks for soft-delete models
//!
//! This crate provides the "before save" and "before aggregate" hook chains
//! that schema augmentation registers. Hooks are collected once through a
//! [`HookManagerBuilder`] and are read-only afterwards.

pub mod event;
pub mod manager;
pub mod prelude;
pub mod types;

pub use event::{HookContext, HookPoint};
pub use manager::{HookManager, HookManagerBuilder};
pub use types::{AggregateHook, Pipeline, SaveHook};
