//! Core SoftHaus functionality
//!
//! This module contains the main SoftHaus struct and its implementation,
//! providing centralized coordination of soft-delete models over one store.

use std::collections::HashMap;
use std::sync::Arc;
use store_object::{DocumentStore, Schema, SoftDeleteModel, SoftDeleteOptions, SoftDocument};

use crate::errors::SoftHausError;
use crate::migration::sync_indexes;
use config::AppConfig;

/// Main SoftHaus coordinator that owns the store and the registered models
pub struct SoftHaus<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    config: AppConfig,
    models: HashMap<String, SoftDeleteModel<S>>,
}

impl<S: DocumentStore + ?Sized> SoftHaus<S> {
    /// Create new SoftHaus over a store
    pub fn new(store: Arc<S>, config: AppConfig) -> Self {
        Self {
            store,
            config,
            models: HashMap::new(),
        }
    }

    /// Get the store handle
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register a model for a collection and create its indexes.
    ///
    /// The collection's own configuration block wins over the default one.
    pub async fn register_model(
        &mut self,
        collection: &str,
        schema: Schema,
    ) -> Result<&SoftDeleteModel<S>, SoftHausError> {
        if self.models.contains_key(collection) {
            return Err(SoftHausError::ModelAlreadyRegistered(collection.to_string()));
        }

        let options = SoftDeleteOptions::resolve(self.config.for_collection(collection));
        let model = SoftDeleteModel::new(Arc::clone(&self.store), collection, schema, options);

        sync_indexes(self.store.as_ref(), collection, model.schema()).await?;
        crate::debug_log!(
            "registered model '{}' with {} indexed field(s)",
            collection,
            model.schema().indexed_fields().len()
        );

        Ok(self.models.entry(collection.to_string()).or_insert(model))
    }

    /// Register the model of a typed entity under its collection name
    pub async fn register<T: SoftDocument>(
        &mut self,
    ) -> Result<&SoftDeleteModel<S>, SoftHausError> {
        self.register_model(T::collection_name(), T::schema()).await
    }

    /// Get a registered model by collection name
    pub fn model(&self, collection: &str) -> Result<&SoftDeleteModel<S>, SoftHausError> {
        self.models
            .get(collection)
            .ok_or_else(|| SoftHausError::ModelNotFound(collection.to_string()))
    }

    /// Get the registered model of a typed entity
    pub fn model_for<T: SoftDocument>(&self) -> Result<&SoftDeleteModel<S>, SoftHausError> {
        self.model(T::collection_name())
    }

    /// List all registered collection names
    pub fn list_models(&self) -> Vec<&String> {
        self.models.keys().collect()
    }

    /// Remove a model by collection name. Stored documents are left untouched.
    pub fn unregister(&mut self, collection: &str) -> Result<(), SoftHausError> {
        self.models
            .remove(collection)
            .map(|_| ())
            .ok_or_else(|| SoftHausError::ModelNotFound(collection.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Selection, SoftDeleteConfig};
    use store_object::{BaseOperation, FieldDef, FieldType, MemoryStore};

    fn schema() -> Schema {
        Schema::new().field(FieldDef::new("title", FieldType::String))
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let mut softhaus = SoftHaus::new(Arc::new(MemoryStore::new()), AppConfig::default());
        softhaus.register_model("articles", schema()).await.unwrap();

        assert_eq!(softhaus.model("articles").unwrap().collection(), "articles");
        assert_eq!(softhaus.list_models(), vec!["articles"]);
        assert!(matches!(
            softhaus.model("missing"),
            Err(SoftHausError::ModelNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_register_twice_fails() {
        let mut softhaus = SoftHaus::new(Arc::new(MemoryStore::new()), AppConfig::default());
        softhaus.register_model("articles", schema()).await.unwrap();

        let err = softhaus.register_model("articles", schema()).await.unwrap_err();
        assert!(matches!(err, SoftHausError::ModelAlreadyRegistered(name) if name == "articles"));
    }

    #[tokio::test]
    async fn test_collection_block_wins_over_default() {
        let mut config = AppConfig::default();
        config.soft_delete = SoftDeleteConfig::new()
            .with_override_methods(Selection::All)
            .with_index_fields(Selection::All);
        config.collections.insert(
            "logs".to_string(),
            SoftDeleteConfig::new().with_override_methods(Selection::list(["find"])),
        );

        let store = Arc::new(MemoryStore::new());
        let mut softhaus = SoftHaus::new(Arc::clone(&store), config);
        softhaus.register_model("articles", schema()).await.unwrap();
        softhaus.register_model("logs", schema()).await.unwrap();

        let logs = softhaus.model("logs").unwrap();
        assert!(logs.registry().is_overridden(BaseOperation::Find));
        assert!(!logs.registry().is_overridden(BaseOperation::Count));

        let articles = softhaus.model("articles").unwrap();
        assert!(articles.registry().is_overridden(BaseOperation::Count));

        let mut indexes = store.indexes("articles").await.unwrap();
        indexes.sort();
        assert_eq!(indexes, vec!["deleted".to_string(), "deleted_at".to_string()]);
        assert!(store.indexes("logs").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unregister() {
        let mut softhaus = SoftHaus::new(Arc::new(MemoryStore::new()), AppConfig::default());
        softhaus.register_model("articles", schema()).await.unwrap();
        softhaus.unregister("articles").unwrap();

        assert!(softhaus.list_models().is_empty());
        assert!(softhaus.unregister("articles").is_err());
    }
}
