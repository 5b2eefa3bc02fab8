//! Unified type mapping between Rust types and stored documents
//! This crate provides the document value model shared across the softhaus ecosystem

pub mod rust_types;
pub mod serialize;
pub mod types;
pub mod validate;

pub use rust_types::{is_optional_type, rust_type_to_field_type};
pub use serialize::{
    deserialize_document, document_id, new_object_id, serialize_to_document, timestamp_value,
};
pub use types::{Document, FieldType, ID_FIELD};
pub use validate::value_matches_type;
