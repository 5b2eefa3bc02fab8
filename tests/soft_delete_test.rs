//! Integration tests for the soft-delete layer
//!
//! Exercises the `#[soft_model]` macro, the SoftHaus coordinator with TOML
//! configuration, and the visibility rules of reads, updates, aggregations
//! and deletes against the in-memory store.

use serde_json::json;
use softhaus::prelude::*;
use std::sync::Arc;

#[soft_model]
#[collection(name = "articles")]
pub struct Article {
    #[primary_key]
    pub id: String,

    #[index]
    pub title: String,

    pub views: i64,

    pub summary: Option<String>,
}

const CONFIG: &str = r#"
[soft_delete]
indexFields = "all"
overrideMethods = "all"

[collections.audit_logs]
overrideMethods = ["find"]
"use$neOperator" = false
validateBeforeDelete = false
"#;

fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        _ => panic!("fixture must be an object"),
    }
}

fn article(id: &str, title: &str, views: i64) -> Article {
    Article {
        id: id.to_string(),
        title: title.to_string(),
        views,
        summary: None,
        deleted: None,
        deleted_at: None,
    }
}

async fn setup() -> (Arc<MemoryStore>, SoftHaus<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let config = AppConfig::from_toml_str(CONFIG).unwrap();
    let mut softhaus = SoftHaus::new(Arc::clone(&store), config);

    softhaus.register::<Article>().await.unwrap();
    softhaus
        .register_model(
            "audit_logs",
            Schema::new().field(FieldDef::new("action", FieldType::String).required()),
        )
        .await
        .unwrap();

    let articles = softhaus.model_for::<Article>().unwrap();
    for (id, title, views) in [("a1", "first", 10), ("a2", "second", 20), ("a3", "third", 30)] {
        articles.save_entity(&article(id, title, views)).await.unwrap();
    }

    (store, softhaus)
}

#[test]
fn test_macro_derives_collection_and_schema() {
    assert_eq!(Article::collection_name(), "articles");

    let schema = Article::schema();
    assert_eq!(schema.path("_id").unwrap().field_type, FieldType::Id);
    assert!(!schema.path("_id").unwrap().required);

    let title = schema.path("title").unwrap();
    assert!(title.required);
    assert!(title.index);

    assert_eq!(schema.path("views").unwrap().field_type, FieldType::Number);
    assert!(!schema.path("summary").unwrap().required);

    // Markers come from augmentation, not from the entity
    assert!(schema.path("deleted").is_none());
    assert!(schema.path("deleted_at").is_none());
}

#[tokio::test]
async fn test_registration_augments_schema_and_creates_indexes() {
    let (store, softhaus) = setup().await;

    let articles = softhaus.model("articles").unwrap();
    assert_eq!(articles.schema().path("deleted").unwrap().field_type, FieldType::Id);
    assert_eq!(articles.schema().path("deleted_at").unwrap().field_type, FieldType::Date);

    let mut indexes = store.indexes("articles").await.unwrap();
    indexes.sort();
    assert_eq!(indexes, vec!["deleted", "deleted_at", "title"]);

    // The audit block names no index fields
    assert!(store.indexes("audit_logs").await.unwrap().is_empty());

    let mut names = softhaus.list_models();
    names.sort();
    assert_eq!(names, vec!["articles", "audit_logs"]);
}

#[tokio::test]
async fn test_saved_entities_carry_null_markers() {
    let (store, _softhaus) = setup().await;

    for stored in store.all_documents("articles").await {
        assert_eq!(stored.get("deleted"), Some(&Value::Null));
        assert_eq!(stored.get("deleted_at"), Some(&Value::Null));
        assert!(stored.contains_key("_id"));
    }
}

#[tokio::test]
async fn test_deleted_entity_is_hidden_from_default_reads() {
    let (_store, softhaus) = setup().await;
    let articles = softhaus.model_for::<Article>().unwrap();

    let mut second = articles
        .find_one(doc(json!({"_id": "a2"})))
        .exec_as::<Article>()
        .await
        .unwrap()
        .unwrap();
    articles.delete_entity(&mut second).await.unwrap();

    assert_eq!(second.deleted, Some(json!("a2")));
    assert!(second.deleted_at.is_some());

    let visible: Vec<Article> = articles.find(Document::new()).exec_as().await.unwrap();
    let mut ids: Vec<_> = visible.iter().map(|a| a.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a1", "a3"]);

    assert_eq!(articles.count(Document::new()).exec().await.unwrap(), 2);
    assert_eq!(articles.count_documents(Document::new()).exec().await.unwrap(), 2);
    assert_eq!(
        articles.count_deleted(Document::new()).unwrap().exec().await.unwrap(),
        2
    );
    assert_eq!(
        articles.count_with_deleted(Document::new()).unwrap().exec().await.unwrap(),
        3
    );

    let found = articles
        .find_one_with_deleted(doc(json!({"_id": "a2"})))
        .unwrap()
        .exec_as::<Article>()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.deleted, Some(json!("a2")));

    assert!(articles
        .find_one(doc(json!({"_id": "a2"})))
        .exec()
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_queries_chain_on_top_of_the_visibility_predicate() {
    let (_store, softhaus) = setup().await;
    let articles = softhaus.model_for::<Article>().unwrap();
    articles.delete_by_id(json!("a3")).await.unwrap();

    let top: Vec<Article> = articles
        .find(Document::new())
        .where_field("views")
        .gte(json!(10))
        .sort("views", SortOrder::Desc)
        .limit(1)
        .exec_as()
        .await
        .unwrap();

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, "a2");
}

#[tokio::test]
async fn test_collection_delete_marks_every_match() {
    let (store, softhaus) = setup().await;
    let articles = softhaus.model_for::<Article>().unwrap();

    let result = articles
        .delete(doc(json!({"views": {"$gte": 20}})))
        .await
        .unwrap();
    assert_eq!(result.matched_count, 2);

    for stored in store.all_documents("articles").await {
        let views = stored.get("views").and_then(Value::as_i64).unwrap();
        if views >= 20 {
            // No `_id` in the conditions: the marker is null, the timestamp is set
            assert_eq!(stored.get("deleted"), Some(&Value::Null));
            assert!(stored.get("deleted_at").unwrap().is_string());
        } else {
            assert_eq!(stored.get("deleted_at"), Some(&Value::Null));
        }
    }

    assert_eq!(articles.count(Document::new()).exec().await.unwrap(), 1);

    // Deleting again still reaches the already-deleted documents
    let again = articles
        .delete(doc(json!({"views": {"$gte": 20}})))
        .await
        .unwrap();
    assert_eq!(again.matched_count, 2);
}

#[tokio::test]
async fn test_updates_skip_deleted_unless_asked() {
    let (store, softhaus) = setup().await;
    let articles = softhaus.model_for::<Article>().unwrap();
    articles.delete_by_id(json!("a1")).await.unwrap();

    let filtered = articles
        .update_many(UpdateCall::by_filter(
            Document::new(),
            doc(json!({"$inc": {"views": 1}})),
        ))
        .await
        .unwrap();
    assert_eq!(filtered.matched_count, 2);

    let raw = articles
        .update_one_with_deleted(UpdateCall::by_id("a1", doc(json!({"summary": "archived"}))))
        .await
        .unwrap();
    assert_eq!(raw.modified_count, 1);

    let stored = store.all_documents("articles").await;
    let a1 = stored.iter().find(|d| d.get("_id") == Some(&json!("a1"))).unwrap();
    assert_eq!(a1.get("views"), Some(&json!(10)));
    assert_eq!(a1.get("summary"), Some(&json!("archived")));
    assert_eq!(a1.get("deleted"), Some(&json!("a1")));

    let before = articles
        .find_one_and_update(UpdateCall::by_id("a1", doc(json!({"title": "revived?"}))))
        .await
        .unwrap();
    assert!(before.is_none());
}

#[tokio::test]
async fn test_aggregate_variants() {
    let (_store, softhaus) = setup().await;
    let articles = softhaus.model_for::<Article>().unwrap();
    articles.delete_by_id(json!("a1")).await.unwrap();

    let count_stage = vec![json!({"$count": "total"})];

    let visible = articles.aggregate(count_stage.clone()).await.unwrap();
    assert_eq!(visible[0].get("total"), Some(&json!(2)));

    let deleted_variant = articles.aggregate_deleted(count_stage.clone()).await.unwrap();
    assert_eq!(deleted_variant[0].get("total"), Some(&json!(2)));

    let everything = articles.aggregate_with_deleted(count_stage.clone()).await.unwrap();
    assert_eq!(everything[0].get("total"), Some(&json!(3)));

    // Explicit opt-out through the sentinel stage
    let mut opted_out = vec![show_all_documents_stage()];
    opted_out.extend(count_stage);
    let all = articles.aggregate(opted_out).await.unwrap();
    assert_eq!(all[0].get("total"), Some(&json!(3)));
}

#[tokio::test]
async fn test_collection_block_limits_generated_variants() {
    let (store, softhaus) = setup().await;
    let logs = softhaus.model("audit_logs").unwrap();
    assert!(!logs.options().use_ne_operator);
    assert!(!logs.options().validate_before_delete);

    for action in ["login", "logout"] {
        logs.save(doc(json!({"_id": action, "action": action}))).await.unwrap();
    }
    logs.delete_by_id(json!("logout")).await.unwrap();

    // find is overridden, in the shorthand form
    let visible = logs.find(Document::new()).exec().await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].get("_id"), Some(&json!("login")));
    assert!(logs.find_with_deleted(Document::new()).is_ok());

    // count is not: the default passes through and the suffixed forms are absent
    assert_eq!(logs.count(Document::new()).exec().await.unwrap(), 2);
    let err = logs.count_with_deleted(Document::new()).unwrap_err();
    assert!(matches!(err, SoftDeleteError::VariantUnavailable(_)));

    // Any override installs the aggregate hook
    let pipeline = vec![json!({"$count": "total"})];
    let result = logs.aggregate(pipeline).await.unwrap();
    assert_eq!(result[0].get("total"), Some(&json!(1)));

    let stored = store.all_documents("audit_logs").await;
    let logout = stored.iter().find(|d| d.get("_id") == Some(&json!("logout"))).unwrap();
    assert_eq!(logout.get("deleted"), Some(&json!("logout")));
}

#[tokio::test]
async fn test_delete_by_id_requires_an_id() {
    let (_store, softhaus) = setup().await;
    let articles = softhaus.model_for::<Article>().unwrap();

    let err = articles.delete_by_id_args(Vec::new()).err().unwrap();
    assert_eq!(
        err.to_string(),
        format!("Mandatory argument error: {}", MANDATORY_ID_MESSAGE)
    );
    assert!(articles
        .delete_by_id_args(vec![Arg::callback(|_| {})])
        .is_err());

    assert_eq!(articles.count(Document::new()).exec().await.unwrap(), 3);
}

#[tokio::test]
async fn test_unknown_model_lookup_fails() {
    let (_store, softhaus) = setup().await;
    assert!(matches!(
        softhaus.model("missing"),
        Err(SoftHausError::ModelNotFound(name)) if name == "missing"
    ));
}
