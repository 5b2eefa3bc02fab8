//! Filter evaluation for the in-memory store
//!
//! Supports implicit equality, `$eq $ne $gt $gte $lt $lte $in $nin $exists $not`
//! on fields (dotted paths allowed) and `$and $or $nor` at any level. A null
//! comparison value matches missing fields.

use crate::errors::StoreError;
use serde_json::Value;
use std::cmp::Ordering;
use type_mapping::Document;

/// Check whether `document` satisfies `filter`
pub fn matches(document: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (key, condition) in filter {
        let satisfied = match key.as_str() {
            "$and" => {
                let mut all = true;
                for sub in sub_filters(key, condition)? {
                    if !matches(document, sub)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => any_matches(document, key, condition)?,
            "$nor" => !any_matches(document, key, condition)?,
            operator if operator.starts_with('$') => {
                return Err(StoreError::UnsupportedOperator(operator.to_string()))
            }
            field => field_matches(lookup(document, field), condition)?,
        };

        if !satisfied {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Resolve a possibly dotted path inside a document
pub fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Order two values of the same kind; values of different kinds are unordered
pub fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn any_matches(document: &Document, key: &str, condition: &Value) -> Result<bool, StoreError> {
    for sub in sub_filters(key, condition)? {
        if matches(document, sub)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn sub_filters<'a>(key: &str, condition: &'a Value) -> Result<Vec<&'a Document>, StoreError> {
    let items = condition
        .as_array()
        .ok_or_else(|| StoreError::InvalidFilter(format!("{} expects an array", key)))?;

    items
        .iter()
        .map(|item| {
            item.as_object()
                .ok_or_else(|| {
                    StoreError::InvalidFilter(format!("{} entries must be objects", key))
                })
        })
        .collect()
}

fn is_operator_object(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty() && map.keys().all(|key| key.starts_with('$')),
        _ => false,
    }
}

fn field_matches(actual: Option<&Value>, condition: &Value) -> Result<bool, StoreError> {
    let Some(operators) = condition.as_object().filter(|_| is_operator_object(condition)) else {
        return Ok(values_equal(actual, condition));
    };

    for (operator, operand) in operators {
        if !apply_operator(actual, operator, operand)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn apply_operator(
    actual: Option<&Value>,
    operator: &str,
    operand: &Value,
) -> Result<bool, StoreError> {
    let outcome = match operator {
        "$eq" => values_equal(actual, operand),
        "$ne" => !values_equal(actual, operand),
        "$gt" => ordered(actual, operand, |ord| ord == Ordering::Greater),
        "$gte" => ordered(actual, operand, |ord| ord != Ordering::Less),
        "$lt" => ordered(actual, operand, |ord| ord == Ordering::Less),
        "$lte" => ordered(actual, operand, |ord| ord != Ordering::Greater),
        "$in" => in_list(actual, operator, operand)?,
        "$nin" => !in_list(actual, operator, operand)?,
        "$exists" => is_truthy(operand) == actual.is_some(),
        "$not" => {
            if !is_operator_object(operand) {
                return Err(StoreError::InvalidFilter(
                    "$not expects an operator object".to_string(),
                ));
            }
            !field_matches(actual, operand)?
        }
        other => return Err(StoreError::UnsupportedOperator(other.to_string())),
    };
    Ok(outcome)
}

fn values_equal(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(Value::Array(items)) if !expected.is_array() => {
            items.iter().any(|item| scalar_equal(item, expected))
        }
        Some(value) => scalar_equal(value, expected),
    }
}

fn scalar_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => {
            compare_values(left, right) == Some(Ordering::Equal)
        }
        _ => left == right,
    }
}

fn ordered(actual: Option<&Value>, operand: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    actual
        .and_then(|value| compare_values(value, operand))
        .map(accept)
        .unwrap_or(false)
}

fn in_list(actual: Option<&Value>, operator: &str, operand: &Value) -> Result<bool, StoreError> {
    let candidates = operand
        .as_array()
        .ok_or_else(|| StoreError::InvalidFilter(format!("{} expects an array", operator)))?;
    Ok(candidates.iter().any(|candidate| values_equal(actual, candidate)))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        _ => true,
    }
}
