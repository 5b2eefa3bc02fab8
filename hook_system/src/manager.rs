use crate::event::{HookContext, HookPoint};
use crate::types::{AggregateHook, Pipeline, SaveHook};
use std::sync::Arc;
use type_mapping::Document;

/// Collects hooks while a schema is being augmented
#[derive(Default)]
pub struct HookManagerBuilder {
    before_save: Vec<SaveHook>,
    before_aggregate: Vec<AggregateHook>,
}

impl HookManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook run before each save
    pub fn before_save<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HookContext, &mut Document) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before_save.push(Arc::new(hook));
        self
    }

    /// Register a hook run before each aggregation
    pub fn before_aggregate<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HookContext, &mut Pipeline) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before_aggregate.push(Arc::new(hook));
        self
    }

    /// Freeze the registered hooks
    pub fn build(self) -> HookManager {
        HookManager {
            before_save: self.before_save,
            before_aggregate: self.before_aggregate,
        }
    }
}

/// Immutable, ordered hook chains for one model
#[derive(Clone, Default)]
pub struct HookManager {
    before_save: Vec<SaveHook>,
    before_aggregate: Vec<AggregateHook>,
}

impl std::fmt::Debug for HookManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookManager")
            .field("before_save", &self.before_save.len())
            .field("before_aggregate", &self.before_aggregate.len())
            .finish()
    }
}

impl HookManager {
    pub fn builder() -> HookManagerBuilder {
        HookManagerBuilder::new()
    }

    /// Run every before-save hook in registration order, stopping at the first error
    pub fn run_before_save(&self, collection: &str, document: &mut Document) -> anyhow::Result<()> {
        let context = HookContext::new(collection, HookPoint::BeforeSave);
        for hook in &self.before_save {
            hook(&context, document)?;
        }
        Ok(())
    }

    /// Run every before-aggregate hook in registration order, stopping at the first error
    pub fn run_before_aggregate(
        &self,
        collection: &str,
        pipeline: &mut Pipeline,
    ) -> anyhow::Result<()> {
        let context = HookContext::new(collection, HookPoint::BeforeAggregate);
        for hook in &self.before_aggregate {
            hook(&context, pipeline)?;
        }
        tracing::trace!(
            collection = %context.collection,
            stages = pipeline.len(),
            "before_aggregate hooks applied"
        );
        Ok(())
    }

    /// Number of hooks registered at `point`
    pub fn hook_count(&self, point: HookPoint) -> usize {
        match point {
            HookPoint::BeforeSave => self.before_save.len(),
            HookPoint::BeforeAggregate => self.before_aggregate.len(),
        }
    }
}
