//! Statistics error types.

use crate::access::DataType;
use thiserror::Error;

/// Errors that can occur while building or querying statistics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("Histogram needs at least one bucket")]
    NoBuckets,

    #[error("Invalid histogram range: min {min} is greater than max {max}")]
    InvalidRange { min: i32, max: i32 },

    #[error("Value {value} is outside the histogram range [{min}, {max}]")]
    ValueOutOfRange { value: i32, min: i32, max: i32 },

    #[error("Column {index} has type {actual:?}; only Int32 columns can be histogrammed")]
    UnsupportedType { index: usize, actual: DataType },

    #[error("Column {index} out of bounds for schema with {columns} columns")]
    ColumnOutOfBounds { index: usize, columns: usize },
}

/// Result type for statistics operations.
pub type StatisticsResult<T> = Result<T, StatisticsError>;
