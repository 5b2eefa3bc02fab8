//! Parsing utilities for collection and field attributes
//!
//! This module handles the parsing of `#[collection]`, `#[primary_key]` and
//! `#[index]` attributes and validation of collection names.

use quote::quote;
use syn::{Attribute, Data, Error, Fields, Meta, Result};
use type_mapping::{is_optional_type, rust_type_to_field_type, ID_FIELD};

/// Validate collection name and return syn::Error for better proc macro error handling
pub fn validate_collection_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_collection_name(name)
        .map_err(|e| Error::new(span, format!("Invalid collection name '{}': {}", name, e)))
}

fn validate_collection_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    if name.contains('$') {
        return Err("Name must not contain '$'".to_string());
    }

    if name.contains('\0') {
        return Err("Name must not contain the null character".to_string());
    }

    if name.starts_with("system.") {
        return Err("Names starting with 'system.' are reserved".to_string());
    }

    Ok(())
}

#[derive(Debug)]
pub struct CollectionInfo {
    pub name: String,
}

/// One field as the schema sees it
#[derive(Debug)]
pub struct FieldSpec {
    /// Stored name; the primary key is stored as `_id`
    pub stored_name: String,
    /// Name of the `FieldType` variant
    pub field_type: &'static str,
    pub primary_key: bool,
    pub index: bool,
    pub optional: bool,
}

#[derive(Debug)]
pub struct FieldInfo {
    pub fields: Vec<FieldSpec>,
}

pub fn parse_collection_attributes(attrs: &[Attribute]) -> Result<CollectionInfo> {
    let mut collection_name = None;

    for attr in attrs {
        if attr.path().is_ident("collection") {
            if let Meta::List(meta_list) = &attr.meta {
                // Parse nested tokens manually: name = "..."
                let mut tokens = meta_list.tokens.clone().into_iter().peekable();

                while let Some(token) = tokens.next() {
                    if let proc_macro2::TokenTree::Ident(key) = token {
                        if let Some(proc_macro2::TokenTree::Punct(punct)) = tokens.peek() {
                            if punct.as_char() == '=' {
                                tokens.next(); // consume '='

                                if let Some(proc_macro2::TokenTree::Literal(lit)) = tokens.next() {
                                    let value = lit.to_string().trim_matches('"').to_string();
                                    if key == "name" {
                                        collection_name = Some(value);
                                    }
                                }
                            }
                        }
                    }

                    // Skip comma if present
                    if let Some(proc_macro2::TokenTree::Punct(punct)) = tokens.peek() {
                        if punct.as_char() == ',' {
                            tokens.next();
                        }
                    }
                }
            }
        }
    }

    let name = collection_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "collection attribute is required: add #[collection(name = \"collection_name\")] to your struct",
        )
    })?;

    validate_collection_name_syn(&name, proc_macro2::Span::call_site())?;

    Ok(CollectionInfo { name })
}

pub fn parse_field_attributes(data: &Data) -> Result<FieldInfo> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "SoftDocument can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "SoftDocument can only be derived for structs with named fields",
        ));
    };

    let mut fields = Vec::new();
    let mut seen_primary_key = false;

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let ty = &field.ty;
        let type_string = quote!(#ty).to_string();
        let primary_key = has_attribute(&field.attrs, "primary_key");

        if primary_key {
            if seen_primary_key {
                return Err(Error::new_spanned(
                    field,
                    "only one field can be marked #[primary_key]",
                ));
            }
            seen_primary_key = true;
        }

        let stored_name = if primary_key {
            ID_FIELD.to_string()
        } else {
            serde_rename(&field.attrs).unwrap_or_else(|| ident.to_string())
        };

        fields.push(FieldSpec {
            stored_name,
            field_type: if primary_key {
                "Id"
            } else {
                rust_type_to_field_type(&type_string)
            },
            primary_key,
            index: has_attribute(&field.attrs, "index"),
            optional: is_optional_type(&type_string),
        });
    }

    Ok(FieldInfo { fields })
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// `#[serde(rename = "...")]` on a field, if present
fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    let mut renamed = None;
    for attr in attrs {
        if attr.path().is_ident("serde") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    renamed = Some(lit.value());
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            });
        }
    }
    renamed
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::DeriveInput;

    fn parse(input: proc_macro2::TokenStream) -> DeriveInput {
        syn::parse2(input).unwrap()
    }

    #[test]
    fn test_collection_name() {
        let input = parse(quote! {
            #[collection(name = "articles")]
            struct Article { title: String }
        });
        assert_eq!(parse_collection_attributes(&input.attrs).unwrap().name, "articles");
    }

    #[test]
    fn test_missing_collection_attribute() {
        let input = parse(quote! { struct Article { title: String } });
        assert!(parse_collection_attributes(&input.attrs).is_err());
    }

    #[test]
    fn test_invalid_collection_names() {
        for name in ["", "bad$name", "system.users"] {
            assert!(validate_collection_name(name).is_err(), "{} should be rejected", name);
        }
        assert!(validate_collection_name("blog.posts").is_ok());
    }

    #[test]
    fn test_field_specs() {
        let input = parse(quote! {
            struct Article {
                #[primary_key]
                id: String,
                #[index]
                title: String,
                #[serde(rename = "body_text")]
                body: Option<String>,
                published_at: chrono::DateTime<chrono::Utc>,
            }
        });
        let info = parse_field_attributes(&input.data).unwrap();

        let pk = info.fields.iter().find(|field| field.primary_key).unwrap();
        assert_eq!(pk.stored_name, "_id");
        assert_eq!(pk.field_type, "Id");

        assert!(info.fields[1].index);
        assert_eq!(info.fields[2].stored_name, "body_text");
        assert!(info.fields[2].optional);
        assert_eq!(info.fields[3].field_type, "Date");
    }

    #[test]
    fn test_two_primary_keys_are_rejected() {
        let input = parse(quote! {
            struct Article {
                #[primary_key]
                id: String,
                #[primary_key]
                other: String,
            }
        });
        assert!(parse_field_attributes(&input.data).is_err());
    }

    #[test]
    fn test_tuple_structs_are_rejected() {
        let input = parse(quote! { struct Article(String); });
        assert!(parse_field_attributes(&input.data).is_err());
    }
}
