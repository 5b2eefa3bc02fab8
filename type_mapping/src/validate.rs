//! Validation utilities for type mapping
//!
//! This module checks stored values against declared field types.

use crate::types::FieldType;
use serde_json::Value;

/// Check whether `value` is acceptable for a field of type `field_type`.
///
/// `null` is accepted for every type; whether a field may be null is a
/// schema concern (required fields), not a type concern.
pub fn value_matches_type(field_type: FieldType, value: &Value) -> bool {
    if value.is_null() {
        return true;
    }

    match field_type {
        FieldType::Id => value.is_string() || value.is_i64() || value.is_u64(),
        FieldType::Date => value
            .as_str()
            .map(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok())
            .unwrap_or(false),
        FieldType::String => value.is_string(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Array => value.is_array(),
        FieldType::Object => value.is_object(),
        FieldType::Any => true,
    }
}
