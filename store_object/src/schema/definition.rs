//! Schema definitions
//!
//! A schema is an ordered list of typed fields with defaults, index flags and
//! required markers. Fields not declared in the schema are stored untouched.

use crate::schema::validation::ValidationError;
use serde_json::Value;
use type_mapping::{value_matches_type, Document, FieldType};

/// One declared field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: FieldType,
    /// Value applied on save when the field is absent
    pub default: Option<Value>,
    /// Whether the store should keep a secondary index on this field
    pub index: bool,
    pub required: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            default: None,
            index: false,
            required: false,
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn indexed(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Ordered field declarations of a collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Schema::add`]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.add(field);
        self
    }

    /// Add a field; a field with the same name is replaced in place
    pub fn add(&mut self, field: FieldDef) {
        match self.fields.iter_mut().find(|existing| existing.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    /// Look up a declared field by name
    pub fn path(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Names of fields flagged for indexing, in declaration order
    pub fn indexed_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.index)
            .map(|field| field.name.as_str())
            .collect()
    }

    /// Fill absent fields that declare a default
    pub fn apply_defaults(&self, document: &mut Document) {
        for field in &self.fields {
            if let Some(default) = &field.default {
                if !document.contains_key(&field.name) {
                    document.insert(field.name.clone(), default.clone());
                }
            }
        }
    }

    /// Check required fields and declared types
    pub fn validate(&self, document: &Document) -> Result<(), ValidationError> {
        for field in &self.fields {
            match document.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(ValidationError::MissingRequired(field.name.clone()));
                }
                Some(value) if !value_matches_type(field.field_type, value) => {
                    return Err(ValidationError::TypeMismatch {
                        field: field.name.clone(),
                        expected: field.field_type,
                        found: value.to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
