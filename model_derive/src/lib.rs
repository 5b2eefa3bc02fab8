//! Procedural macros for soft-delete entities
//!
//! This crate provides the `#[soft_model]` macro and `SoftDocument` derive for
//! generating the collection name and schema of a struct and adding the
//! deletion marker fields.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod generation;
mod model_macro;
mod parsing;

use generation::generate_soft_document_impl;
use model_macro::soft_model_attribute;
use parsing::{parse_collection_attributes, parse_field_attributes};

/// Derive macro for the SoftDocument trait
///
/// Note: It's recommended to use the `#[soft_model]` attribute macro instead,
/// which automatically includes this derive along with the marker fields and
/// the other necessary derives.
///
/// Manual usage (not recommended):
/// ```ignore
/// #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, SoftDocument)]
/// #[collection(name = "articles")]
/// pub struct Article {
///     #[primary_key]
///     #[serde(rename = "_id")]
///     pub id: String,
///
///     #[index]
///     pub title: String,
///
///     pub deleted: Option<serde_json::Value>,
///     pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
/// }
/// ```
///
/// Recommended usage:
/// ```ignore
/// use softhaus::prelude::*;
///
/// #[soft_model]
/// #[collection(name = "articles")]
/// pub struct Article {
///     #[primary_key]
///     pub id: String,
///
///     #[index]
///     pub title: String,
/// }
/// ```
#[proc_macro_derive(SoftDocument, attributes(collection, primary_key, index))]
pub fn derive_soft_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    // Parse collection attributes - handle errors properly
    let collection_info = match parse_collection_attributes(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    // Parse field attributes - handle errors properly
    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_soft_document_impl(
        name,
        &collection_info,
        &field_info,
    ))
}

/// Convenience attribute macro that adds all necessary derives for a soft-delete entity
///
/// Fields named `deleted` and `deleted_at` are added when the struct does not
/// declare them, and the `#[primary_key]` field is stored as `_id`.
///
/// Usage:
/// ```ignore
/// use softhaus::prelude::*;
///
/// #[soft_model]
/// #[collection(name = "articles")]
/// pub struct Article {
///     #[primary_key]
///     pub id: String,
///     pub title: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn soft_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    soft_model_attribute(attr, item)
}
