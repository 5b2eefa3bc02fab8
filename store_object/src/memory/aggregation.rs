//! Aggregation pipeline evaluation for the in-memory store
//!
//! Supported stages: `$match`, `$sort`, `$skip`, `$limit`, `$count` and
//! inclusion/exclusion `$project`.

use crate::errors::StoreError;
use crate::memory::matcher::{compare_values, lookup, matches};
use crate::query_builder::SortOrder;
use serde_json::Value;
use std::cmp::Ordering;
use type_mapping::{Document, ID_FIELD};

/// Run `pipeline` over `documents`
pub fn run_pipeline(
    mut documents: Vec<Document>,
    pipeline: &[Value],
) -> Result<Vec<Document>, StoreError> {
    for stage in pipeline {
        let (name, spec) = single_key(stage)?;
        documents = match name {
            "$match" => {
                let filter = expect_object(name, spec)?;
                let mut kept = Vec::with_capacity(documents.len());
                for document in documents {
                    if matches(&document, filter)? {
                        kept.push(document);
                    }
                }
                kept
            }
            "$sort" => {
                let keys = sort_keys(expect_object(name, spec)?)?;
                sort_documents(&mut documents, &keys);
                documents
            }
            "$skip" => {
                let count = expect_count(name, spec)?;
                documents.into_iter().skip(count).collect()
            }
            "$limit" => {
                let count = expect_count(name, spec)?;
                documents.into_iter().take(count).collect()
            }
            "$count" => {
                let field = spec.as_str().filter(|field| !field.is_empty()).ok_or_else(|| {
                    StoreError::InvalidPipeline("$count expects a field name".to_string())
                })?;
                let mut result = Document::new();
                result.insert(field.to_string(), Value::from(documents.len() as u64));
                vec![result]
            }
            "$project" => {
                let projection = expect_object(name, spec)?;
                documents
                    .into_iter()
                    .map(|document| project(document, projection))
                    .collect::<Result<_, _>>()?
            }
            other => return Err(StoreError::UnsupportedStage(other.to_string())),
        };
    }

    Ok(documents)
}

/// Sort documents by `(field, order)` keys; missing fields sort first
pub fn sort_documents(documents: &mut [Document], keys: &[(String, SortOrder)]) {
    documents.sort_by(|a, b| {
        for (field, order) in keys {
            let ordering = match (lookup(a, field), lookup(b, field)) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(left), Some(right)) => compare_values(left, right).unwrap_or(Ordering::Equal),
            };
            let ordering = match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn single_key(stage: &Value) -> Result<(&str, &Value), StoreError> {
    match stage.as_object() {
        Some(map) if map.len() == 1 => map
            .iter()
            .next()
            .map(|(name, spec)| (name.as_str(), spec))
            .ok_or_else(|| StoreError::InvalidPipeline("empty stage".to_string())),
        _ => Err(StoreError::InvalidPipeline(format!(
            "stage must be an object with exactly one key: {}",
            stage
        ))),
    }
}

fn expect_object<'a>(name: &str, spec: &'a Value) -> Result<&'a Document, StoreError> {
    spec.as_object()
        .ok_or_else(|| StoreError::InvalidPipeline(format!("{} expects an object", name)))
}

fn expect_count(name: &str, spec: &Value) -> Result<usize, StoreError> {
    spec.as_u64()
        .map(|count| count as usize)
        .ok_or_else(|| {
            StoreError::InvalidPipeline(format!("{} expects a non-negative integer", name))
        })
}

fn sort_keys(spec: &Document) -> Result<Vec<(String, SortOrder)>, StoreError> {
    spec.iter()
        .map(|(field, direction)| {
            SortOrder::from_direction(direction)
                .map(|order| (field.clone(), order))
                .ok_or_else(|| {
                    StoreError::InvalidPipeline(format!("invalid sort direction for '{}'", field))
                })
        })
        .collect()
}

fn project(document: Document, projection: &Document) -> Result<Document, StoreError> {
    let include_id = projection.get(ID_FIELD).map(is_included).unwrap_or(true);
    let fields: Vec<(&String, bool)> = projection
        .iter()
        .filter(|(field, _)| field.as_str() != ID_FIELD)
        .map(|(field, flag)| (field, is_included(flag)))
        .collect();

    let inclusive = fields.iter().any(|(_, included)| *included);
    if inclusive && fields.iter().any(|(_, included)| !included) {
        return Err(StoreError::InvalidPipeline(
            "$project cannot mix inclusion and exclusion".to_string(),
        ));
    }

    let mut result = Document::new();
    if inclusive {
        if include_id {
            if let Some(id) = document.get(ID_FIELD) {
                result.insert(ID_FIELD.to_string(), id.clone());
            }
        }
        for (field, _) in fields {
            if let Some(value) = document.get(field.as_str()) {
                result.insert(field.clone(), value.clone());
            }
        }
    } else {
        result = document;
        for (field, _) in fields {
            result.remove(field.as_str());
        }
        if !include_id {
            result.remove(ID_FIELD);
        }
    }
    Ok(result)
}

fn is_included(flag: &Value) -> bool {
    match flag {
        Value::Bool(included) => *included,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        _ => false,
    }
}
