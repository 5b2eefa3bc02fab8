//! Document store contract
//!
//! This module defines the collection-level operations the soft-delete layer
//! delegates to. Implementations own storage, indexing and identity; the
//! soft-delete layer only rewrites the filters and pipelines it passes in.

use crate::errors::StoreError;
use crate::query_builder::SortOrder;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use type_mapping::Document;

/// Sorting and paging for read operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Vec<(String, SortOrder)>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Options accepted by update operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Generic `update` touches every match instead of the first
    #[serde(default)]
    pub multi: bool,
    /// Insert a document when nothing matches
    #[serde(default)]
    pub upsert: bool,
    /// `find_one_and_update` returns the document after the update
    #[serde(default, rename = "new")]
    pub return_new: bool,
}

impl UpdateOptions {
    pub fn multi() -> Self {
        Self {
            multi: true,
            ..Self::default()
        }
    }

    pub fn upsert(mut self) -> Self {
        self.upsert = true;
        self
    }

    pub fn return_new(mut self) -> Self {
        self.return_new = true;
        self
    }

    /// Read options from a loosely-typed options document; unknown keys and
    /// non-boolean values are ignored
    pub fn from_document(document: &Document) -> Self {
        let flag = |key: &str| document.get(key).and_then(Value::as_bool).unwrap_or(false);
        Self {
            multi: flag("multi"),
            upsert: flag("upsert"),
            return_new: flag("new"),
        }
    }
}

/// Outcome of an update operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Value>,
}

/// Collection-level operations of the underlying document store
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Find every document matching `filter`
    async fn find(
        &self,
        collection: &str,
        filter: &Document,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Find the first document matching `filter`
    async fn find_one(
        &self,
        collection: &str,
        filter: &Document,
        options: &FindOptions,
    ) -> Result<Option<Document>, StoreError> {
        let options = FindOptions {
            limit: Some(1),
            ..options.clone()
        };
        Ok(self
            .find(collection, filter, &options)
            .await?
            .into_iter()
            .next())
    }

    /// Count documents matching `filter`
    async fn count_documents(&self, collection: &str, filter: &Document) -> Result<u64, StoreError>;

    /// Update the first document matching `filter`
    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> Result<UpdateResult, StoreError>;

    /// Update every document matching `filter`
    async fn update_many(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> Result<UpdateResult, StoreError>;

    /// Update the first match and return it (before or after the update, per `options`)
    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> Result<Option<Document>, StoreError>;

    /// Run an aggregation pipeline
    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Value],
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert or replace a document by `_id`, assigning an id when missing
    async fn save(&self, collection: &str, document: Document) -> Result<Document, StoreError>;

    /// Create a secondary index on `field`; creating an existing index is a no-op
    async fn create_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;

    /// Names of indexed fields in `collection`
    async fn indexes(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}
