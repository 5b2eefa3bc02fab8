//! Code generation for the `SoftDocument` implementation

use crate::parsing::{CollectionInfo, FieldInfo, FieldSpec};
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::Ident;

/// Marker fields are declared by schema augmentation, not by the entity
const MARKER_FIELDS: [&str; 2] = ["deleted", "deleted_at"];

pub fn generate_soft_document_impl(
    name: &Ident,
    collection_info: &CollectionInfo,
    field_info: &FieldInfo,
) -> TokenStream2 {
    let collection_name = &collection_info.name;

    let field_defs = field_info
        .fields
        .iter()
        .filter(|field| !MARKER_FIELDS.contains(&field.stored_name.as_str()))
        .map(generate_field_def);

    quote! {
        impl store_object::SoftDocument for #name {
            fn collection_name() -> &'static str {
                #collection_name
            }

            fn schema() -> store_object::Schema {
                store_object::Schema::new()
                    #(.field(#field_defs))*
            }
        }
    }
}

fn generate_field_def(field: &FieldSpec) -> TokenStream2 {
    let stored_name = &field.stored_name;
    let variant = format_ident!("{}", field.field_type);

    let required = if field.primary_key || field.optional {
        quote! {}
    } else {
        quote! { .required() }
    };

    let indexed = if field.index {
        quote! { .indexed(true) }
    } else {
        quote! {}
    };

    quote! {
        store_object::FieldDef::new(#stored_name, store_object::FieldType::#variant)
            #required
            #indexed
    }
}
