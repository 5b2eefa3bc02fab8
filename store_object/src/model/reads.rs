//! Read-style operations
//!
//! `find`, `find_one`, `count` and `count_documents` return a chainable
//! [`Query`]. Filtered variants have the not-deleted predicate AND-ed onto the
//! caller's filter when the query is created; further conditions chain after it.

use crate::errors::{SoftDeleteError, StoreError};
use crate::model::core::SoftDeleteModel;
use crate::operations::{BaseOperation, Handler, Variant};
use crate::query_builder::{FilterChain, QueryBuilder, QueryFilter, SortOrder};
use crate::traits::{DocumentStore, FindOptions};
use crate::visibility::restrict_query;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use type_mapping::{deserialize_document, Document};

/// What a query returns and which store call produces it
#[async_trait]
pub trait ReadKind: Send + Sync + 'static {
    type Output: Send;

    async fn run<S: DocumentStore + ?Sized>(
        store: &S,
        collection: &str,
        filter: &Document,
        options: &FindOptions,
    ) -> Result<Self::Output, StoreError>;
}

/// Every matching document
#[derive(Debug)]
pub struct Many;

/// The first matching document
#[derive(Debug)]
pub struct One;

/// Number of matching documents; sort and paging are ignored
#[derive(Debug)]
pub struct Count;

#[async_trait]
impl ReadKind for Many {
    type Output = Vec<Document>;

    async fn run<S: DocumentStore + ?Sized>(
        store: &S,
        collection: &str,
        filter: &Document,
        options: &FindOptions,
    ) -> Result<Self::Output, StoreError> {
        store.find(collection, filter, options).await
    }
}

#[async_trait]
impl ReadKind for One {
    type Output = Option<Document>;

    async fn run<S: DocumentStore + ?Sized>(
        store: &S,
        collection: &str,
        filter: &Document,
        options: &FindOptions,
    ) -> Result<Self::Output, StoreError> {
        store.find_one(collection, filter, options).await
    }
}

#[async_trait]
impl ReadKind for Count {
    type Output = u64;

    async fn run<S: DocumentStore + ?Sized>(
        store: &S,
        collection: &str,
        filter: &Document,
        _options: &FindOptions,
    ) -> Result<Self::Output, StoreError> {
        store.count_documents(collection, filter).await
    }
}

/// A pending read against one collection
pub struct Query<'a, S: DocumentStore + ?Sized, K: ReadKind> {
    model: &'a SoftDeleteModel<S>,
    builder: QueryBuilder,
    kind: PhantomData<K>,
}

impl<'a, S: DocumentStore + ?Sized, K: ReadKind> Query<'a, S, K> {
    fn new(model: &'a SoftDeleteModel<S>, filter: Document) -> Self {
        Self {
            model,
            builder: QueryBuilder::from_document(filter),
            kind: PhantomData,
        }
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.builder = self.builder.order_by(field, order);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.builder = self.builder.skip(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.builder = self.builder.limit(limit);
        self
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }

    /// Filter document the store will receive
    pub fn build_filter(&self) -> Document {
        self.builder.build_filter()
    }

    pub async fn exec(self) -> Result<K::Output, SoftDeleteError> {
        let filter = self.builder.build_filter();
        let options = self.builder.find_options();
        crate::trace_log!("read on '{}' with filter {:?}", self.model.collection(), filter);

        Ok(K::run(
            self.model.store.as_ref(),
            self.model.collection(),
            &filter,
            &options,
        )
        .await?)
    }
}

impl<S: DocumentStore + ?Sized> Query<'_, S, Many> {
    /// Run the query and deserialize every document
    pub async fn exec_as<T: DeserializeOwned>(self) -> Result<Vec<T>, SoftDeleteError> {
        let documents = self.exec().await?;
        documents
            .iter()
            .map(|document| deserialize_document(document).map_err(SoftDeleteError::from))
            .collect()
    }
}

impl<S: DocumentStore + ?Sized> Query<'_, S, One> {
    /// Run the query and deserialize the document, if any
    pub async fn exec_as<T: DeserializeOwned>(self) -> Result<Option<T>, SoftDeleteError> {
        match self.exec().await? {
            Some(document) => Ok(Some(deserialize_document(&document)?)),
            None => Ok(None),
        }
    }
}

impl<S: DocumentStore + ?Sized, K: ReadKind> FilterChain for Query<'_, S, K> {
    fn filter(mut self, filter: QueryFilter) -> Self {
        self.builder = self.builder.filter(filter);
        self
    }
}

impl<S: DocumentStore + ?Sized, K: ReadKind> fmt::Debug for Query<'_, S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("collection", &self.model.collection())
            .field("builder", &self.builder)
            .finish()
    }
}

impl<S: DocumentStore + ?Sized> SoftDeleteModel<S> {
    fn default_read<K: ReadKind>(
        &self,
        operation: BaseOperation,
        filter: Document,
    ) -> Query<'_, S, K> {
        let query = Query::new(self, filter);
        match self.registry.handler(operation, Variant::Default) {
            Some(Handler::FilteredRead) => restrict_query(query, self.options.use_ne_operator),
            _ => query,
        }
    }

    fn variant_read<K: ReadKind>(
        &self,
        operation: BaseOperation,
        variant: Variant,
        filter: Document,
    ) -> Result<Query<'_, S, K>, SoftDeleteError> {
        let query = Query::new(self, filter);
        match self.registry.handler(operation, variant) {
            Some(Handler::FilteredRead) => Ok(restrict_query(query, self.options.use_ne_operator)),
            Some(_) => Ok(query),
            None => Err(self.variant_unavailable(operation, variant)),
        }
    }

    pub fn find(&self, filter: Document) -> Query<'_, S, Many> {
        self.default_read(BaseOperation::Find, filter)
    }

    /// Same result set as [`SoftDeleteModel::find`]
    pub fn find_deleted(&self, filter: Document) -> Result<Query<'_, S, Many>, SoftDeleteError> {
        self.variant_read(BaseOperation::Find, Variant::Deleted, filter)
    }

    pub fn find_with_deleted(
        &self,
        filter: Document,
    ) -> Result<Query<'_, S, Many>, SoftDeleteError> {
        self.variant_read(BaseOperation::Find, Variant::WithDeleted, filter)
    }

    pub fn find_one(&self, filter: Document) -> Query<'_, S, One> {
        self.default_read(BaseOperation::FindOne, filter)
    }

    pub fn find_one_deleted(&self, filter: Document) -> Result<Query<'_, S, One>, SoftDeleteError> {
        self.variant_read(BaseOperation::FindOne, Variant::Deleted, filter)
    }

    pub fn find_one_with_deleted(
        &self,
        filter: Document,
    ) -> Result<Query<'_, S, One>, SoftDeleteError> {
        self.variant_read(BaseOperation::FindOne, Variant::WithDeleted, filter)
    }

    pub fn count(&self, filter: Document) -> Query<'_, S, Count> {
        self.default_read(BaseOperation::Count, filter)
    }

    pub fn count_deleted(&self, filter: Document) -> Result<Query<'_, S, Count>, SoftDeleteError> {
        self.variant_read(BaseOperation::Count, Variant::Deleted, filter)
    }

    pub fn count_with_deleted(
        &self,
        filter: Document,
    ) -> Result<Query<'_, S, Count>, SoftDeleteError> {
        self.variant_read(BaseOperation::Count, Variant::WithDeleted, filter)
    }

    pub fn count_documents(&self, filter: Document) -> Query<'_, S, Count> {
        self.default_read(BaseOperation::CountDocuments, filter)
    }

    pub fn count_documents_deleted(
        &self,
        filter: Document,
    ) -> Result<Query<'_, S, Count>, SoftDeleteError> {
        self.variant_read(BaseOperation::CountDocuments, Variant::Deleted, filter)
    }

    pub fn count_documents_with_deleted(
        &self,
        filter: Document,
    ) -> Result<Query<'_, S, Count>, SoftDeleteError> {
        self.variant_read(BaseOperation::CountDocuments, Variant::WithDeleted, filter)
    }
}
