//! Executor usage errors.
//!
//! These mark programming mistakes on the caller's side. Failures raised by a
//! child executor are passed through untouched, so callers can tell the two
//! apart with `anyhow::Error::downcast_ref::<ExecutorError>()`.

use thiserror::Error;

/// Errors raised when an executor is driven outside of its contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("{executor} is not open: call open() first")]
    NotOpen { executor: &'static str },

    #[error("{executor} has no more tuples")]
    NoMoreTuples { executor: &'static str },

    #[error("{executor} is open: {action} requires a closed executor")]
    StillOpen {
        executor: &'static str,
        action: &'static str,
    },

    #[error("Join field {index} out of bounds for {side} input with {columns} columns")]
    FieldIndexOutOfBounds {
        side: &'static str,
        index: usize,
        columns: usize,
    },

    #[error("Value {value} does not match column {index} of type {expected}")]
    TypeMismatch {
        index: usize,
        expected: String,
        value: String,
    },

    #[error("Row has {actual} values but schema has {expected} columns")]
    ArityMismatch { expected: usize, actual: usize },
}
