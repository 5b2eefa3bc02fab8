//! Serialization utilities
//!
//! This module converts between typed Rust values and stored documents.

use crate::types::{Document, ID_FIELD};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Serialize a value into a document.
///
/// Values that do not serialize to a JSON object are rejected.
pub fn serialize_to_document<T: Serialize>(data: &T) -> Result<Document, serde_json::Error> {
    match serde_json::to_value(data)? {
        Value::Object(map) => Ok(map),
        other => Err(serde::ser::Error::custom(format!(
            "expected a struct or map, got {}",
            json_kind(&other)
        ))),
    }
}

/// Deserialize a document back into a typed value
pub fn deserialize_document<T: DeserializeOwned>(
    document: &Document,
) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(document.clone()))
}

/// The document's identity value, if it has one
pub fn document_id(document: &Document) -> Option<&Value> {
    document.get(ID_FIELD).filter(|id| !id.is_null())
}

/// Generate a fresh document identifier
pub fn new_object_id() -> Value {
    Value::String(uuid::Uuid::new_v4().simple().to_string())
}

/// Timestamp in the same representation chrono's serde support produces
pub fn timestamp_value(at: chrono::DateTime<chrono::Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
