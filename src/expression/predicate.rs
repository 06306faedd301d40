//! Predicates over tuples.
//!
//! A [`Predicate`] compares one field of a tuple against a constant; a
//! [`JoinPredicate`] compares a field of one tuple against a field of another.

use crate::access::{Tuple, Value};
use crate::expression::ComparisonOp;
use anyhow::Result;
use std::fmt;

/// `tuple[field] op operand`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    field: usize,
    op: ComparisonOp,
    operand: Value,
}

impl Predicate {
    pub fn new(field: usize, op: ComparisonOp, operand: Value) -> Self {
        Self { field, op, operand }
    }

    pub fn field(&self) -> usize {
        self.field
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn operand(&self) -> &Value {
        &self.operand
    }

    /// Whether the tuple satisfies this predicate
    pub fn filter(&self, tuple: &Tuple) -> Result<bool> {
        Ok(tuple.value(self.field)?.compare(self.op, &self.operand))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} {} {}", self.field, self.op, self.operand)
    }
}

/// `left[field1] op right[field2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPredicate {
    field1: usize,
    op: ComparisonOp,
    field2: usize,
}

impl JoinPredicate {
    pub fn new(field1: usize, op: ComparisonOp, field2: usize) -> Self {
        Self { field1, op, field2 }
    }

    /// Equality between `left[field1]` and `right[field2]`
    pub fn equals(field1: usize, field2: usize) -> Self {
        Self::new(field1, ComparisonOp::Eq, field2)
    }

    pub fn field1(&self) -> usize {
        self.field1
    }

    pub fn field2(&self) -> usize {
        self.field2
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    /// Whether the pair `(left, right)` satisfies this predicate
    pub fn filter(&self, left: &Tuple, right: &Tuple) -> Result<bool> {
        let lhs = left.value(self.field1)?;
        let rhs = right.value(self.field2)?;
        Ok(lhs.compare(self.op, rhs))
    }
}

impl fmt::Display for JoinPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "left.${} {} right.${}", self.field1, self.op, self.field2)
    }
}
