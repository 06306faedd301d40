//! Column statistics for cost-based planning.
//!
//! - **IntHistogram**: fixed-width bucketed summary of an integer column,
//!   answering selectivity queries for the six comparison operators
//! - **ColumnStatistics**: two-pass collection of row counts and a histogram
//!   from any executor

pub mod column;
pub mod error;
pub mod histogram;

pub use column::ColumnStatistics;
pub use error::{StatisticsError, StatisticsResult};
pub use histogram::IntHistogram;
