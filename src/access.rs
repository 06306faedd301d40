//! Access layer for tuple-oriented data.
//!
//! This module provides the data model shared by executors and statistics:
//!
//! - **Value**: Type-safe representation of field values
//! - **DataType**: Supported data types
//! - **Schema**: Ordered field name/type descriptors, mergeable by concatenation
//! - **Tuple**: Individual rows as ordered sequences of values

pub mod schema;
pub mod tuple;
pub mod value;

pub use schema::{ColumnInfo, Schema};
pub use tuple::Tuple;
pub use value::{DataType, Value};
