//! Update documents for the in-memory store
//!
//! An update is either an operator document (`$set`, `$unset`, `$inc`) or a
//! plain document, which is treated as `$set` of every key except `_id`.

use crate::errors::StoreError;
use serde_json::{Map, Value};
use type_mapping::{Document, ID_FIELD};

/// Type of update operation to perform on a field
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOperation {
    /// Set field to a specific value
    Set(Value),

    /// Remove the field
    Unset,

    /// Increment field by a value; a missing field counts as zero
    Increment(Value),
}

/// Container for update operations, applied in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSet {
    pub operations: Vec<(String, UpdateOperation)>,
}

impl UpdateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a specific value
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.operations.push((field.into(), UpdateOperation::Set(value)));
        self
    }

    /// Remove a field
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.operations.push((field.into(), UpdateOperation::Unset));
        self
    }

    /// Increment a field by a value
    pub fn increment(mut self, field: impl Into<String>, value: Value) -> Self {
        self.operations
            .push((field.into(), UpdateOperation::Increment(value)));
        self
    }

    /// Parse an update document
    pub fn parse(update: &Document) -> Result<Self, StoreError> {
        let operator_keys = update.keys().filter(|key| key.starts_with('$')).count();
        if operator_keys != 0 && operator_keys != update.len() {
            return Err(StoreError::InvalidUpdate(
                "cannot mix update operators and plain fields".to_string(),
            ));
        }

        if operator_keys == 0 {
            let set = update
                .iter()
                .filter(|(key, _)| key.as_str() != ID_FIELD)
                .fold(Self::new(), |set, (key, value)| set.set(key.clone(), value.clone()));
            return Ok(set);
        }

        let mut set = Self::new();
        for (operator, fields) in update {
            let fields = fields.as_object().ok_or_else(|| {
                StoreError::InvalidUpdate(format!("{} expects an object", operator))
            })?;

            for (field, value) in fields {
                set = match operator.as_str() {
                    "$set" => set.set(field.clone(), value.clone()),
                    "$unset" => set.unset(field.clone()),
                    "$inc" => {
                        if !value.is_number() {
                            return Err(StoreError::InvalidUpdate(format!(
                                "$inc on '{}' expects a number",
                                field
                            )));
                        }
                        set.increment(field.clone(), value.clone())
                    }
                    other => return Err(StoreError::UnsupportedOperator(other.to_string())),
                };
            }
        }
        Ok(set)
    }

    /// Apply every operation to `document`; returns whether anything changed.
    ///
    /// All or nothing: on error `document` is left as it was.
    pub fn apply(&self, document: &mut Document) -> Result<bool, StoreError> {
        let mut staged = document.clone();

        for (field, operation) in &self.operations {
            match operation {
                UpdateOperation::Set(value) => set_path(&mut staged, field, value.clone())?,
                UpdateOperation::Unset => unset_path(&mut staged, field),
                UpdateOperation::Increment(delta) => {
                    let current = crate::memory::matcher::lookup(&staged, field).cloned();
                    let next = add_numbers(field, current.as_ref(), delta)?;
                    set_path(&mut staged, field, next)?;
                }
            }
        }

        let changed = staged != *document;
        *document = staged;
        Ok(changed)
    }

    /// Check if there are any operations
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }
}

fn set_path(document: &mut Document, path: &str, value: Value) -> Result<(), StoreError> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return Ok(());
    };

    let mut current = document;
    for segment in segments {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = entry.as_object_mut().ok_or_else(|| {
            StoreError::InvalidUpdate(format!(
                "cannot set '{}': '{}' is not an object",
                path, segment
            ))
        })?;
    }

    current.insert(last.to_string(), value);
    Ok(())
}

fn unset_path(document: &mut Document, path: &str) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = document;
    for segment in segments {
        match current.get_mut(segment).and_then(Value::as_object_mut) {
            Some(next) => current = next,
            None => return,
        }
    }
    current.remove(last);
}

fn add_numbers(field: &str, current: Option<&Value>, delta: &Value) -> Result<Value, StoreError> {
    let base = match current {
        None | Some(Value::Null) => return Ok(delta.clone()),
        Some(value) => value,
    };

    if let (Some(a), Some(b)) = (base.as_i64(), delta.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Ok(Value::from(sum));
        }
    }

    match (base.as_f64(), delta.as_f64()) {
        (Some(a), Some(b)) => Ok(Value::from(a + b)),
        _ => Err(StoreError::InvalidUpdate(format!(
            "cannot increment non-numeric field '{}'",
            field
        ))),
    }
}
