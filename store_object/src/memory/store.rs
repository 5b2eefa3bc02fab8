//! In-process document store
//!
//! Collections live in a `tokio::sync::RwLock`; every operation takes the lock
//! once, so each call is atomic with respect to the others.

use crate::errors::StoreError;
use crate::memory::aggregation::{run_pipeline, sort_documents};
use crate::memory::matcher::matches;
use crate::memory::update::UpdateSet;
use crate::traits::{DocumentStore, FindOptions, UpdateOptions, UpdateResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use type_mapping::{new_object_id, Document, ID_FIELD};

#[derive(Debug, Default, Clone)]
struct Collection {
    documents: Vec<Document>,
    indexes: BTreeSet<String>,
}

/// Document store backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert documents as-is, assigning ids where missing
    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut inserted = Vec::with_capacity(documents.len());
        for document in documents {
            inserted.push(self.save(collection, document).await?);
        }
        Ok(inserted)
    }

    /// Every stored document in insertion order, ignoring any filter
    pub async fn all_documents(&self, collection: &str) -> Vec<Document> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|c| c.documents.clone())
            .unwrap_or_default()
    }

    async fn update_matching(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
        multi: bool,
    ) -> Result<(UpdateResult, Option<(Document, Document)>), StoreError> {
        let changes = UpdateSet::parse(update)?;
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();

        let mut result = UpdateResult::default();
        let mut first: Option<(Document, Document)> = None;

        for document in target.documents.iter_mut() {
            if !matches(document, filter)? {
                continue;
            }
            let before = document.clone();
            result.matched_count += 1;
            if changes.apply(document)? {
                result.modified_count += 1;
            }
            if first.is_none() {
                first = Some((before, document.clone()));
            }
            if !multi {
                break;
            }
        }

        if result.matched_count == 0 && options.upsert {
            let mut document = equality_fields(filter);
            changes.apply(&mut document)?;
            let id = document
                .entry(ID_FIELD.to_string())
                .or_insert_with(new_object_id)
                .clone();
            result.upserted_id = Some(id);
            target.documents.push(document.clone());
            first = Some((Document::new(), document));
        }

        crate::trace_log!(
            "update on '{}' matched {} modified {}",
            collection,
            result.matched_count,
            result.modified_count
        );

        Ok((result, first))
    }
}

/// Top-level equality conditions of a filter, used to seed upserted documents
fn equality_fields(filter: &Document) -> Document {
    let mut seeded = Document::new();
    for (key, condition) in filter {
        if key.starts_with('$') {
            continue;
        }
        match condition {
            Value::Object(operators) if operators.keys().any(|k| k.starts_with('$')) => {
                if let Some(value) = operators.get("$eq") {
                    seeded.insert(key.clone(), value.clone());
                }
            }
            value => {
                seeded.insert(key.clone(), value.clone());
            }
        }
    }
    seeded
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Document,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(source) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for document in &source.documents {
            if matches(document, filter)? {
                found.push(document.clone());
            }
        }

        if !options.sort.is_empty() {
            sort_documents(&mut found, &options.sort);
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let limit = options.limit.map(|limit| limit as usize).unwrap_or(usize::MAX);
        Ok(found.into_iter().skip(skip).take(limit).collect())
    }

    async fn count_documents(
        &self,
        collection: &str,
        filter: &Document,
    ) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        let Some(source) = collections.get(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for document in &source.documents {
            if matches(document, filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> Result<UpdateResult, StoreError> {
        let (result, _) = self
            .update_matching(collection, filter, update, options, false)
            .await?;
        Ok(result)
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> Result<UpdateResult, StoreError> {
        let (result, _) = self
            .update_matching(collection, filter, update, options, true)
            .await?;
        Ok(result)
    }

    async fn find_one_and_update(
        &self,
        collection: &str,
        filter: &Document,
        update: &Document,
        options: &UpdateOptions,
    ) -> Result<Option<Document>, StoreError> {
        let (result, first) = self
            .update_matching(collection, filter, update, options, false)
            .await?;

        Ok(first.and_then(|(before, after)| {
            if options.return_new {
                Some(after)
            } else if result.upserted_id.is_some() {
                None
            } else {
                Some(before)
            }
        }))
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &[Value],
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.all_documents(collection).await;
        run_pipeline(documents, pipeline)
    }

    async fn save(&self, collection: &str, mut document: Document) -> Result<Document, StoreError> {
        let id = match document.get(ID_FIELD) {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                let id = new_object_id();
                document.insert(ID_FIELD.to_string(), id.clone());
                id
            }
        };

        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();

        match target
            .documents
            .iter_mut()
            .find(|existing| existing.get(ID_FIELD) == Some(&id))
        {
            Some(existing) => *existing = document.clone(),
            None => target.documents.push(document.clone()),
        }

        crate::trace_log!("saved document {} in '{}'", id, collection);
        Ok(document)
    }

    async fn create_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        if field.is_empty() {
            return Err(StoreError::Backend("index field name must not be empty".to_string()));
        }
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_string()).or_default();
        if target.indexes.insert(field.to_string()) {
            crate::debug_log!("created index on '{}.{}'", collection, field);
        }
        Ok(())
    }

    async fn indexes(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.indexes.iter().cloned().collect())
            .unwrap_or_default())
    }
}
