//! Query builder utilities
//!
//! This module provides the filter condition tree.

use serde_json::Value;
use type_mapping::Document;

/// Query condition operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,     // $eq
    Ne,     // $ne
    Gt,     // $gt
    Gte,    // $gte
    Lt,     // $lt
    Lte,    // $lte
    In,     // $in
    NotIn,  // $nin
    Exists, // $exists
}

impl QueryOperator {
    /// Filter-document spelling of this operator
    pub fn as_operator(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "$eq",
            QueryOperator::Ne => "$ne",
            QueryOperator::Gt => "$gt",
            QueryOperator::Gte => "$gte",
            QueryOperator::Lt => "$lt",
            QueryOperator::Lte => "$lte",
            QueryOperator::In => "$in",
            QueryOperator::NotIn => "$nin",
            QueryOperator::Exists => "$exists",
        }
    }
}

/// Single field condition
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub field: String,
    pub operator: QueryOperator,
    pub value: Value,
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
    /// A caller-supplied filter document, used as-is
    Document(Document),
}

impl QueryFilter {
    /// Create a simple condition
    pub fn condition(field: &str, operator: QueryOperator, value: Value) -> Self {
        Self::Condition(QueryCondition {
            field: field.to_string(),
            operator,
            value,
        })
    }

    /// Wrap a raw filter document
    pub fn document(document: Document) -> Self {
        Self::Document(document)
    }

    /// Create AND group
    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::And,
            filters,
        }
    }

    /// Create OR group
    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    pub fn eq(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Eq, value)
    }

    pub fn ne(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Ne, value)
    }

    pub fn gt(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gt, value)
    }

    pub fn gte(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Gte, value)
    }

    pub fn lt(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lt, value)
    }

    pub fn lte(field: &str, value: Value) -> Self {
        Self::condition(field, QueryOperator::Lte, value)
    }

    pub fn in_values(field: &str, values: Vec<Value>) -> Self {
        Self::condition(field, QueryOperator::In, Value::Array(values))
    }

    pub fn not_in_values(field: &str, values: Vec<Value>) -> Self {
        Self::condition(field, QueryOperator::NotIn, Value::Array(values))
    }

    /// Field is null or missing
    pub fn is_null(field: &str) -> Self {
        Self::eq(field, Value::Null)
    }

    pub fn exists(field: &str, exists: bool) -> Self {
        Self::condition(field, QueryOperator::Exists, Value::Bool(exists))
    }

    /// Whether this filter constrains nothing
    pub fn is_empty(&self) -> bool {
        match self {
            QueryFilter::Condition(_) => false,
            QueryFilter::Group { operator, filters } => {
                *operator == LogicalOperator::And && filters.iter().all(QueryFilter::is_empty)
            }
            QueryFilter::Document(document) => document.is_empty(),
        }
    }
}
