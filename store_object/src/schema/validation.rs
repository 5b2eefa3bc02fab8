//! Validation module
//!
//! This module provides document validation against a schema.

use std::fmt;
use type_mapping::FieldType;

/// Validation errors raised before a document is saved
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or null
    MissingRequired(String),
    /// A field holds a value of the wrong type
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequired(field) => {
                write!(f, "Path '{}' is required", field)
            }
            ValidationError::TypeMismatch {
                field,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Cast to {} failed for value {} at path '{}'",
                    expected, found, field
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::MissingRequired("title".to_string()).to_string(),
            "Path 'title' is required"
        );
        assert_eq!(
            ValidationError::TypeMismatch {
                field: "deleted_at".to_string(),
                expected: FieldType::Date,
                found: "\"yesterday\"".to_string(),
            }
            .to_string(),
            "Cast to Date failed for value \"yesterday\" at path 'deleted_at'"
        );
    }
}
