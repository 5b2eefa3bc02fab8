//! Convenience re-exports for common hook-system usage

pub use crate::event::{HookContext, HookPoint};
pub use crate::manager::{HookManager, HookManagerBuilder};
pub use crate::types::{AggregateHook, Pipeline, SaveHook};
