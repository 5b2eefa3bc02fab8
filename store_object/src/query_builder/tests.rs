//! Query builder tests

use crate::query_builder::{FilterChain, QueryBuilder, QueryFilter, SortOrder};
use serde_json::{json, Value};
use type_mapping::Document;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

// ========================================
// Filter generation
// ========================================

#[test]
fn test_empty_builder_matches_everything() {
    assert!(QueryBuilder::new().build_filter().is_empty());
    assert!(QueryBuilder::from_document(Document::new()).build_filter().is_empty());
}

#[test]
fn test_single_document_is_used_directly() {
    let filter = QueryBuilder::from_document(doc(json!({"title": "draft"}))).build_filter();
    assert_eq!(Value::Object(filter), json!({"title": "draft"}));
}

#[test]
fn test_where_field_uses_operator_form() {
    let filter = QueryBuilder::new()
        .where_field("deleted_at")
        .eq(Value::Null)
        .build_filter();
    assert_eq!(Value::Object(filter), json!({"deleted_at": {"$eq": null}}));
}

#[test]
fn test_conditions_on_the_same_field_are_and_ed() {
    let filter = QueryBuilder::from_document(doc(json!({"deleted_at": {"$exists": true}})))
        .where_field("deleted_at")
        .eq(Value::Null)
        .build_filter();

    assert_eq!(
        Value::Object(filter),
        json!({"$and": [
            {"deleted_at": {"$exists": true}},
            {"deleted_at": {"$eq": null}}
        ]})
    );
}

#[test]
fn test_empty_caller_filter_is_dropped_from_and() {
    let filter = QueryBuilder::from_document(Document::new())
        .filter_document(doc(json!({"deleted_at": null})))
        .build_filter();
    assert_eq!(Value::Object(filter), json!({"deleted_at": null}));
}

#[test]
fn test_or_group() {
    let filter = QueryBuilder::new()
        .filter(QueryFilter::or(vec![
            QueryFilter::eq("status", json!("active")),
            QueryFilter::gt("score", json!(10)),
        ]))
        .build_filter();

    assert_eq!(
        Value::Object(filter),
        json!({"$or": [{"status": {"$eq": "active"}}, {"score": {"$gt": 10}}]})
    );
}

#[test]
fn test_nested_and_groups_flatten() {
    let filter = QueryBuilder::new()
        .filter(QueryFilter::and(vec![
            QueryFilter::eq("a", json!(1)),
            QueryFilter::and(vec![]),
        ]))
        .build_filter();
    assert_eq!(Value::Object(filter), json!({"a": {"$eq": 1}}));
}

#[test]
fn test_in_and_exists_conditions() {
    let filter = QueryBuilder::new()
        .where_field("tag")
        .in_values(vec![json!("x"), json!("y")])
        .where_field("owner")
        .exists(false)
        .build_filter();

    assert_eq!(
        Value::Object(filter),
        json!({"$and": [{"tag": {"$in": ["x", "y"]}}, {"owner": {"$exists": false}}]})
    );
}

// ========================================
// Options
// ========================================

#[test]
fn test_find_options() {
    let options = QueryBuilder::new()
        .order_by("created", SortOrder::Desc)
        .skip(5)
        .limit(10)
        .find_options();

    assert_eq!(options.sort, vec![("created".to_string(), SortOrder::Desc)]);
    assert_eq!(options.skip, Some(5));
    assert_eq!(options.limit, Some(10));
}

#[test]
fn test_sort_direction_round_trip() {
    assert_eq!(SortOrder::from_direction(&json!(-1)), Some(SortOrder::Desc));
    assert_eq!(SortOrder::from_direction(&json!(2)), None);
    assert_eq!(SortOrder::Asc.to_direction(), 1);
}
