//! Hook points and invocation context
//!
//! This module defines where in an operation's lifecycle a hook runs and
//! what it is told about the call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle point a hook is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookPoint {
    BeforeSave,
    BeforeAggregate,
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPoint::BeforeSave => f.write_str("before_save"),
            HookPoint::BeforeAggregate => f.write_str("before_aggregate"),
        }
    }
}

/// Information passed to every hook invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookContext {
    /// Collection the operation targets
    pub collection: String,
    /// Lifecycle point being run
    pub point: HookPoint,
    /// Invocation timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HookContext {
    pub fn new(collection: impl Into<String>, point: HookPoint) -> Self {
        Self {
            collection: collection.into(),
            point,
            timestamp: chrono::Utc::now(),
        }
    }
}
