//! Type definitions for the hook system
//!
//! This module contains the hook callback types.

use crate::event::HookContext;
use std::sync::Arc;
use type_mapping::Document;

/// Aggregation pipeline: an ordered list of stage documents
pub type Pipeline = Vec<serde_json::Value>;

/// Hook run against the document about to be saved.
///
/// The document is passed explicitly so the hook always operates on the
/// instance being saved.
pub type SaveHook = Arc<dyn Fn(&HookContext, &mut Document) -> anyhow::Result<()> + Send + Sync>;

/// Hook run against a pipeline before it reaches the store
pub type AggregateHook =
    Arc<dyn Fn(&HookContext, &mut Pipeline) -> anyhow::Result<()> + Send + Sync>;
