//! Comparison predicates for query execution.
//!
//! This module provides:
//! - The six comparison operators shared by filters, joins and selectivity estimation
//! - Column-vs-constant predicates for filtering
//! - Column-vs-column predicates for joins

pub mod operator;
pub mod predicate;

pub use operator::ComparisonOp;
pub use predicate::{JoinPredicate, Predicate};
