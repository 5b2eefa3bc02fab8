//! Query builder utilities
//!
//! This module compiles condition trees into filter documents.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter};
use serde_json::{Map, Value};
use type_mapping::Document;

pub struct FilterGenerator;

impl FilterGenerator {
    /// Build the filter document for AND-ed conditions.
    ///
    /// Empty conditions are dropped; a single remaining condition is used
    /// directly, several are wrapped in `$and` so no predicate replaces another.
    pub fn build_filter(conditions: &[QueryFilter]) -> Document {
        let mut parts: Vec<Document> = conditions
            .iter()
            .filter(|condition| !condition.is_empty())
            .map(Self::build_condition)
            .collect();

        match parts.len() {
            0 => Document::new(),
            1 => parts.remove(0),
            _ => Self::wrap("$and", parts),
        }
    }

    fn build_condition(filter: &QueryFilter) -> Document {
        match filter {
            QueryFilter::Condition(condition) => Self::build_single_condition(condition),
            QueryFilter::Group { operator, filters } => match operator {
                LogicalOperator::And => Self::build_filter(filters),
                LogicalOperator::Or => {
                    Self::wrap("$or", filters.iter().map(Self::build_condition).collect())
                }
            },
            QueryFilter::Document(document) => document.clone(),
        }
    }

    fn build_single_condition(condition: &QueryCondition) -> Document {
        let mut operator = Map::new();
        operator.insert(
            condition.operator.as_operator().to_string(),
            condition.value.clone(),
        );

        let mut document = Document::new();
        document.insert(condition.field.clone(), Value::Object(operator));
        document
    }

    fn wrap(operator: &str, parts: Vec<Document>) -> Document {
        let mut document = Document::new();
        document.insert(
            operator.to_string(),
            Value::Array(parts.into_iter().map(Value::Object).collect()),
        );
        document
    }
}
