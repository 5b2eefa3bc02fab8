//! Soft-delete surface of a model

use crate::errors::SoftDeleteError;
use crate::traits::document_store::UpdateResult;
use async_trait::async_trait;
use serde_json::Value;
use type_mapping::Document;

/// Operations that mark documents deleted instead of removing them
#[async_trait]
pub trait SoftDeletable {
    /// Mark one document deleted (`deleted` = its own id, `deleted_at` = now) and save it.
    ///
    /// The document is updated in place with what the store persisted.
    async fn delete_document(&self, document: &mut Document) -> Result<Document, SoftDeleteError>;

    /// Mark every document matching `conditions` deleted.
    ///
    /// The `deleted` marker is set to `conditions._id` for all matches.
    async fn delete(&self, conditions: Document) -> Result<UpdateResult, SoftDeleteError>;

    /// Mark the document with the given id deleted. A null id is rejected.
    async fn delete_by_id(&self, id: Value) -> Result<UpdateResult, SoftDeleteError>;
}
