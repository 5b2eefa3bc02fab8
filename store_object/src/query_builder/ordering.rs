//! Query builder utilities
//!
//! This module provides sort direction handling.

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Numeric direction as used in `$sort` stages
    pub fn to_direction(&self) -> i64 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }

    /// Parse a `$sort` direction (`1` / `-1`)
    pub fn from_direction(value: &Value) -> Option<Self> {
        match value.as_i64() {
            Some(1) => Some(SortOrder::Asc),
            Some(-1) => Some(SortOrder::Desc),
            _ => None,
        }
    }
}
