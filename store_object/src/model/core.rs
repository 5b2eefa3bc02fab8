//! Soft-delete model core
//!
//! A model binds one collection of a [`DocumentStore`] to an augmented schema,
//! its resolved options, the operation registry and the lifecycle hooks.
//! Everything but the store handle is immutable after construction.

use crate::errors::SoftDeleteError;
use crate::operations::{BaseOperation, OperationRegistry, Variant};
use crate::options::SoftDeleteOptions;
use crate::schema::{augment, Schema};
use crate::traits::{DocumentStore, SoftDocument};
use hook_system::HookManager;
use std::fmt;
use std::sync::Arc;
use type_mapping::{deserialize_document, serialize_to_document, Document};

/// Soft-delete view over one collection
pub struct SoftDeleteModel<S: DocumentStore + ?Sized> {
    pub(crate) store: Arc<S>,
    pub(crate) collection: Arc<str>,
    pub(crate) schema: Arc<Schema>,
    pub(crate) options: Arc<SoftDeleteOptions>,
    pub(crate) registry: Arc<OperationRegistry>,
    pub(crate) hooks: Arc<HookManager>,
}

impl<S: DocumentStore + ?Sized> SoftDeleteModel<S> {
    /// Augment `schema` with the deletion markers and bind it to `collection`
    pub fn new(
        store: Arc<S>,
        collection: impl Into<String>,
        schema: Schema,
        options: SoftDeleteOptions,
    ) -> Self {
        let augmented = augment(schema, &options);
        Self {
            store,
            collection: Arc::from(collection.into()),
            schema: Arc::new(augmented.schema),
            options: Arc::new(options),
            registry: Arc::new(augmented.registry),
            hooks: Arc::new(augmented.hooks),
        }
    }

    /// Model for a typed entity, using its derived collection name and schema
    pub fn for_entity<T: SoftDocument>(store: Arc<S>, options: SoftDeleteOptions) -> Self {
        Self::new(store, T::collection_name(), T::schema(), options)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn options(&self) -> &SoftDeleteOptions {
        &self.options
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookManager {
        &self.hooks
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Save a document with validation
    pub async fn save(&self, document: Document) -> Result<Document, SoftDeleteError> {
        self.save_with(document, true).await
    }

    /// Save a document: defaults, before-save hooks, optional validation, store write
    pub async fn save_with(
        &self,
        mut document: Document,
        validate: bool,
    ) -> Result<Document, SoftDeleteError> {
        self.schema.apply_defaults(&mut document);
        self.hooks
            .run_before_save(&self.collection, &mut document)
            .map_err(SoftDeleteError::hook)?;

        if validate {
            self.schema.validate(&document)?;
        }

        Ok(self.store.save(&self.collection, document).await?)
    }

    /// Save a typed entity and return what the store persisted
    pub async fn save_entity<T: SoftDocument>(&self, entity: &T) -> Result<T, SoftDeleteError> {
        let document = serialize_to_document(entity)?;
        let saved = self.save(document).await?;
        Ok(deserialize_document(&saved)?)
    }

    pub(crate) fn variant_unavailable(
        &self,
        operation: BaseOperation,
        variant: Variant,
    ) -> SoftDeleteError {
        SoftDeleteError::VariantUnavailable(format!(
            "{} is not enabled for collection '{}'",
            variant.method_name(operation),
            self.collection
        ))
    }
}

impl<S: DocumentStore + ?Sized> Clone for SoftDeleteModel<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: Arc::clone(&self.collection),
            schema: Arc::clone(&self.schema),
            options: Arc::clone(&self.options),
            registry: Arc::clone(&self.registry),
            hooks: Arc::clone(&self.hooks),
        }
    }
}

impl<S: DocumentStore + ?Sized> fmt::Debug for SoftDeleteModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftDeleteModel")
            .field("collection", &self.collection)
            .field("schema", &self.schema)
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .finish()
    }
}
