//! Rust type conversion utilities
//!
//! This module maps Rust type names (as written in struct definitions) to
//! document field types. Used by the model macros at expansion time.

/// Map a Rust type name to the name of its `FieldType` variant.
///
/// Path prefixes are ignored, so `chrono::DateTime<chrono::Utc>` and
/// `DateTime<Utc>` map alike.
pub fn rust_type_to_field_type(rust_type: &str) -> &'static str {
    // Normalize type string by removing all whitespace for consistent matching
    let normalized = rust_type.replace(' ', "");
    let inner = strip_option(&normalized);
    let head = inner.split('<').next().unwrap_or(inner);
    let base = head.rsplit("::").next().unwrap_or(head);

    match base {
        "String" | "&str" | "str" => "String",
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "f32" | "f64"
        | "isize" | "usize" => "Number",
        "bool" => "Boolean",
        "Uuid" => "Id",
        "DateTime" | "NaiveDateTime" => "Date",
        "Value" => "Any",
        "Vec" => "Array",
        "Map" | "HashMap" | "BTreeMap" | "Document" => "Object",
        _ => "Any",
    }
}

/// Check if a Rust type is `Option<...>`
pub fn is_optional_type(rust_type: &str) -> bool {
    let normalized = rust_type.replace(' ', "");
    strip_option(&normalized) != normalized
}

fn strip_option(normalized: &str) -> &str {
    normalized
        .strip_prefix("Option<")
        .or_else(|| normalized.strip_prefix("std::option::Option<"))
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(normalized)
}
