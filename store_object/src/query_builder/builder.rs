//! Query builder utilities
//!
//! This module provides the chainable query builder.

use crate::query_builder::filter::QueryFilter;
use crate::query_builder::filter_generation::FilterGenerator;
use crate::query_builder::ordering::SortOrder;
use crate::traits::FindOptions;
use serde_json::Value;
use type_mapping::Document;

/// Anything that accepts additional AND-ed filter conditions
pub trait FilterChain: Sized {
    /// Add a filter condition
    fn filter(self, filter: QueryFilter) -> Self;

    /// Start a condition on `field`, e.g. `.where_field("deleted_at").eq(Value::Null)`
    fn where_field(self, field: &str) -> FieldPredicate<Self> {
        FieldPredicate {
            target: self,
            field: field.to_string(),
        }
    }

    /// Add a raw filter document
    fn filter_document(self, document: Document) -> Self {
        self.filter(QueryFilter::document(document))
    }
}

/// A pending condition on one field
#[derive(Debug)]
pub struct FieldPredicate<T> {
    target: T,
    field: String,
}

impl<T: FilterChain> FieldPredicate<T> {
    pub fn eq(self, value: Value) -> T {
        self.target.filter(QueryFilter::eq(&self.field, value))
    }

    pub fn ne(self, value: Value) -> T {
        self.target.filter(QueryFilter::ne(&self.field, value))
    }

    pub fn gt(self, value: Value) -> T {
        self.target.filter(QueryFilter::gt(&self.field, value))
    }

    pub fn gte(self, value: Value) -> T {
        self.target.filter(QueryFilter::gte(&self.field, value))
    }

    pub fn lt(self, value: Value) -> T {
        self.target.filter(QueryFilter::lt(&self.field, value))
    }

    pub fn lte(self, value: Value) -> T {
        self.target.filter(QueryFilter::lte(&self.field, value))
    }

    pub fn in_values(self, values: Vec<Value>) -> T {
        self.target.filter(QueryFilter::in_values(&self.field, values))
    }

    pub fn exists(self, exists: bool) -> T {
        self.target.filter(QueryFilter::exists(&self.field, exists))
    }
}

/// Query builder for read operations
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    pub(crate) conditions: Vec<QueryFilter>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) limit: Option<u64>,
    pub(crate) skip: Option<u64>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded with a caller-supplied filter document
    pub fn from_document(document: Document) -> Self {
        Self::new().filter_document(document)
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    /// Add ordering
    pub fn order_by(mut self, field: &str, order: SortOrder) -> Self {
        self.order_by.push((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Conditions added so far, in order
    pub fn conditions(&self) -> &[QueryFilter] {
        &self.conditions
    }

    /// Build the filter document sent to the store
    pub fn build_filter(&self) -> Document {
        FilterGenerator::build_filter(&self.conditions)
    }

    /// Build sort/skip/limit options
    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: self.order_by.clone(),
            skip: self.skip,
            limit: self.limit,
        }
    }
}

impl FilterChain for QueryBuilder {
    fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }
}
