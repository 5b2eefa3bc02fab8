//! Query builder utilities
//!
//! This module provides filter document construction for read operations.

pub mod builder;
pub mod filter;
pub mod filter_generation;
pub mod ordering;

#[cfg(test)]
mod tests;

pub use builder::{FieldPredicate, FilterChain, QueryBuilder};
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use filter_generation::FilterGenerator;
pub use ordering::SortOrder;
