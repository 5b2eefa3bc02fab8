//! Aggregation
//!
//! Every aggregate call passes through the model's before-aggregate hooks,
//! which prepend the not-deleted stage unless the pipeline opts out with the
//! bypass sentinel. The suffixed variants only shape the pipeline head.

use crate::errors::SoftDeleteError;
use crate::model::core::SoftDeleteModel;
use crate::operations::{BaseOperation, Handler, Variant};
use crate::traits::DocumentStore;
use crate::visibility::{ensure_not_deleted_stage, mark_show_all};
use hook_system::Pipeline;
use type_mapping::Document;

impl<S: DocumentStore + ?Sized> SoftDeleteModel<S> {
    /// Run `pipeline` through the hooks and then the store
    pub async fn aggregate(&self, pipeline: Pipeline) -> Result<Vec<Document>, SoftDeleteError> {
        self.aggregate_variant(Variant::Default, pipeline).await
    }

    /// Pipeline with the not-deleted stage at its head, added at most once
    pub async fn aggregate_deleted(
        &self,
        pipeline: Pipeline,
    ) -> Result<Vec<Document>, SoftDeleteError> {
        self.aggregate_variant(Variant::Deleted, pipeline).await
    }

    /// Pipeline over every document, deleted ones included
    pub async fn aggregate_with_deleted(
        &self,
        pipeline: Pipeline,
    ) -> Result<Vec<Document>, SoftDeleteError> {
        self.aggregate_variant(Variant::WithDeleted, pipeline).await
    }

    async fn aggregate_variant(
        &self,
        variant: Variant,
        mut pipeline: Pipeline,
    ) -> Result<Vec<Document>, SoftDeleteError> {
        match self.registry.handler(BaseOperation::Aggregate, variant) {
            None => return Err(self.variant_unavailable(BaseOperation::Aggregate, variant)),
            Some(Handler::PrependNotDeleted) => ensure_not_deleted_stage(&mut pipeline),
            Some(Handler::ShowAllDocuments) => mark_show_all(&mut pipeline),
            Some(_) => {}
        }

        self.hooks
            .run_before_aggregate(&self.collection, &mut pipeline)
            .map_err(SoftDeleteError::hook)?;

        Ok(self.store.aggregate(&self.collection, &pipeline).await?)
    }
}
