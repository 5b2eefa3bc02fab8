use crate::parsing::has_attribute;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Error, Field, Fields};

/// Convenience attribute macro that adds all necessary derives for a soft-delete entity
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
pub fn soft_model_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as DeriveInput);

    let fields = match &mut input.data {
        Data::Struct(data) => match &mut data.fields {
            Fields::Named(named) => &mut named.named,
            _ => {
                return Error::new_spanned(&input.ident, "soft_model requires named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return Error::new_spanned(&input.ident, "soft_model can only be used on structs")
                .to_compile_error()
                .into()
        }
    };

    // The primary key is stored under `_id`
    for field in fields.iter_mut() {
        if has_attribute(&field.attrs, "primary_key") && !has_serde_rename(field) {
            field.attrs.push(parse_quote!(#[serde(rename = "_id")]));
        }
    }

    if !has_field(fields.iter(), "deleted") {
        fields.push(parse_quote! {
            #[serde(default)]
            pub deleted: Option<store_object::serde_json::Value>
        });
    }

    if !has_field(fields.iter(), "deleted_at") {
        fields.push(parse_quote! {
            #[serde(default)]
            pub deleted_at: Option<store_object::chrono::DateTime<store_object::chrono::Utc>>
        });
    }

    // Add all the necessary derives to the struct
    let expanded = quote! {
        #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, SoftDocument)]
        #input
    };

    TokenStream::from(expanded)
}

fn has_field<'a>(mut fields: impl Iterator<Item = &'a Field>, name: &str) -> bool {
    fields.any(|field| field.ident.as_ref().is_some_and(|ident| ident == name))
}

fn has_serde_rename(field: &Field) -> bool {
    field.attrs.iter().any(|attr| {
        attr.path().is_ident("serde")
            && attr
                .meta
                .require_list()
                .is_ok_and(|list| list.tokens.to_string().contains("rename"))
    })
}
