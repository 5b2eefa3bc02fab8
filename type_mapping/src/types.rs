//! Type mapping definitions
//!
//! This module defines the document representation and the field types
//! a schema can declare.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored document: field name to JSON value
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Name of the identity field every document carries
pub const ID_FIELD: &str = "_id";

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    /// Document identifier (string or integer)
    Id,
    /// RFC 3339 timestamp
    Date,
    String,
    Number,
    Boolean,
    Array,
    Object,
    /// Any JSON value
    Any,
}

impl FieldType {
    /// Parse a field type from its name, as used in generated code
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Id" => Some(FieldType::Id),
            "Date" => Some(FieldType::Date),
            "String" => Some(FieldType::String),
            "Number" => Some(FieldType::Number),
            "Boolean" => Some(FieldType::Boolean),
            "Array" => Some(FieldType::Array),
            "Object" => Some(FieldType::Object),
            "Any" => Some(FieldType::Any),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Id => "Id",
            FieldType::Date => "Date",
            FieldType::String => "String",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Array => "Array",
            FieldType::Object => "Object",
            FieldType::Any => "Any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
