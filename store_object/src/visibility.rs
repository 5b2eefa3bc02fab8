//! Visibility filter injection
//!
//! Read operations get a `deleted_at == null` predicate AND-ed onto the
//! caller's query, mutations get it merged into their filter document and
//! aggregations get a `$match` stage at the head of the pipeline.
//!
//! Pipeline heads are compared by their serialized text, so only the exact
//! canonical stage suppresses injection.

use crate::query_builder::FilterChain;
use serde_json::{json, Value};
use type_mapping::Document;

/// Marker holding the id of the deleted document
pub const DELETED_FIELD: &str = "deleted";

/// Marker holding the deletion time
pub const DELETED_AT_FIELD: &str = "deleted_at";

/// Serialized form of the stage injected at the head of a pipeline
pub const NOT_DELETED_STAGE: &str = r#"{"$match":{"deleted_at":{"$eq":null}}}"#;

/// Serialized form of the stage that disables injection for one pipeline
pub const SHOW_ALL_DOCUMENTS_STAGE: &str = r#"{"$match":{"showAllDocuments":"true"}}"#;

/// Outcome of the global pipeline check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineAction {
    /// The bypass sentinel was removed
    SentinelRemoved,
    /// The pipeline already starts with the not-deleted stage
    AlreadyFiltered,
    /// The not-deleted stage was prepended
    Prepended,
}

pub fn not_deleted_stage() -> Value {
    json!({"$match": {DELETED_AT_FIELD: {"$eq": null}}})
}

pub fn show_all_documents_stage() -> Value {
    json!({"$match": {"showAllDocuments": "true"}})
}

/// `{"deleted_at": {"$eq": null}}`
pub fn not_deleted_predicate() -> Document {
    let mut predicate = Document::new();
    predicate.insert(DELETED_AT_FIELD.to_string(), json!({"$eq": null}));
    predicate
}

/// AND the not-deleted predicate onto a read query.
///
/// `use_ne_operator` selects the operator form over the `{"deleted_at": null}`
/// shorthand; both match the same documents.
pub fn restrict_query<Q: FilterChain>(query: Q, use_ne_operator: bool) -> Q {
    if use_ne_operator {
        query.where_field(DELETED_AT_FIELD).eq(Value::Null)
    } else {
        let mut shorthand = Document::new();
        shorthand.insert(DELETED_AT_FIELD.to_string(), Value::Null);
        query.filter_document(shorthand)
    }
}

/// Merge `deleted_at: {$eq: null}` into a mutation filter, replacing any
/// caller condition on that key. An unspecified filter becomes the bare predicate.
pub fn restrict_filter(filter: Option<Document>) -> Document {
    let mut filter = filter.unwrap_or_default();
    filter.insert(DELETED_AT_FIELD.to_string(), json!({"$eq": null}));
    filter
}

fn first_stage_text(pipeline: &[Value]) -> Option<String> {
    pipeline
        .first()
        .and_then(|stage| serde_json::to_string(stage).ok())
}

/// The global before-aggregate rule
pub fn apply_aggregate_visibility(pipeline: &mut Vec<Value>) -> PipelineAction {
    match first_stage_text(pipeline).as_deref() {
        Some(NOT_DELETED_STAGE) => PipelineAction::AlreadyFiltered,
        Some(SHOW_ALL_DOCUMENTS_STAGE) => {
            pipeline.remove(0);
            PipelineAction::SentinelRemoved
        }
        _ => {
            pipeline.insert(0, not_deleted_stage());
            PipelineAction::Prepended
        }
    }
}

/// Prepend the not-deleted stage unless the pipeline already starts with it
pub fn ensure_not_deleted_stage(pipeline: &mut Vec<Value>) {
    if first_stage_text(pipeline).as_deref() != Some(NOT_DELETED_STAGE) {
        pipeline.insert(0, not_deleted_stage());
    }
}

/// Prepend the bypass sentinel
pub fn mark_show_all(pipeline: &mut Vec<Value>) {
    pipeline.insert(0, show_all_documents_stage());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::QueryBuilder;

    #[test]
    fn test_stage_constants_match_serialization() {
        assert_eq!(serde_json::to_string(&not_deleted_stage()).unwrap(), NOT_DELETED_STAGE);
        assert_eq!(
            serde_json::to_string(&show_all_documents_stage()).unwrap(),
            SHOW_ALL_DOCUMENTS_STAGE
        );
    }

    #[test]
    fn test_restrict_query_forms() {
        let caller = json!({"deleted_at": {"$exists": true}}).as_object().cloned().unwrap();

        let operator =
            restrict_query(QueryBuilder::from_document(caller.clone()), true).build_filter();
        assert_eq!(
            Value::Object(operator),
            json!({"$and": [{"deleted_at": {"$exists": true}}, {"deleted_at": {"$eq": null}}]})
        );

        let shorthand = restrict_query(QueryBuilder::from_document(caller), false).build_filter();
        assert_eq!(
            Value::Object(shorthand),
            json!({"$and": [{"deleted_at": {"$exists": true}}, {"deleted_at": null}]})
        );
    }

    #[test]
    fn test_restrict_filter_overwrites_marker_key() {
        let caller = json!({"title": "x", "deleted_at": "2024-01-01T00:00:00Z"});
        let filter = restrict_filter(caller.as_object().cloned());
        assert_eq!(Value::Object(filter), json!({"title": "x", "deleted_at": {"$eq": null}}));

        assert_eq!(Value::Object(restrict_filter(None)), json!({"deleted_at": {"$eq": null}}));
    }

    #[test]
    fn test_global_rule_prepends_once() {
        let mut pipeline = vec![json!({"$limit": 1})];
        assert_eq!(apply_aggregate_visibility(&mut pipeline), PipelineAction::Prepended);
        assert_eq!(apply_aggregate_visibility(&mut pipeline), PipelineAction::AlreadyFiltered);
        assert_eq!(pipeline, vec![not_deleted_stage(), json!({"$limit": 1})]);

        let mut empty = Vec::new();
        apply_aggregate_visibility(&mut empty);
        assert_eq!(empty, vec![not_deleted_stage()]);
    }

    #[test]
    fn test_global_rule_removes_sentinel() {
        let mut pipeline = Vec::new();
        mark_show_all(&mut pipeline);
        pipeline.push(json!({"$count": "n"}));
        assert_eq!(apply_aggregate_visibility(&mut pipeline), PipelineAction::SentinelRemoved);
        assert_eq!(pipeline, vec![json!({"$count": "n"})]);
    }

    #[test]
    fn test_match_is_textual() {
        // same meaning, different shape: still prepended
        let mut pipeline = vec![json!({"$match": {"deleted_at": null}})];
        assert_eq!(apply_aggregate_visibility(&mut pipeline), PipelineAction::Prepended);
        assert_eq!(pipeline.len(), 2);

        let mut filtered = vec![not_deleted_stage()];
        ensure_not_deleted_stage(&mut filtered);
        assert_eq!(filtered.len(), 1);
    }
}
