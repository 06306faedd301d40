//! Filter executor implementation.
//!
//! This executor filters tuples from a child executor based on a predicate.
//! It produces one matching tuple at a time.

use crate::access::{Schema, Tuple};
use crate::executor::{Executor, ExecutorError, Operator};
use crate::expression::Predicate;
use anyhow::Result;

/// Executor that filters tuples based on a predicate
pub struct FilterExecutor {
    /// Child executor that produces tuples
    child: Box<dyn Executor>,
    /// Predicate each returned tuple satisfies
    predicate: Predicate,
}

impl FilterExecutor {
    /// Create a new filter executor
    ///
    /// # Arguments
    /// * `child` - The child executor that produces tuples
    /// * `predicate` - The predicate tuples must satisfy
    pub fn new(child: Box<dyn Executor>, predicate: Predicate) -> Result<Self> {
        let columns = child.output_schema().len();
        if predicate.field() >= columns {
            return Err(ExecutorError::FieldIndexOutOfBounds {
                side: "filter",
                index: predicate.field(),
                columns,
            }
            .into());
        }
        Ok(Self { child, predicate })
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn child(&self) -> &dyn Executor {
        self.child.as_ref()
    }
}

impl Operator for FilterExecutor {
    const NAME: &'static str = "FilterExecutor";

    fn open(&mut self) -> Result<()> {
        self.child.open()
    }

    fn close(&mut self) {
        self.child.close();
    }

    fn rewind(&mut self) -> Result<()> {
        self.child.rewind()
    }

    fn fetch_next(&mut self) -> Result<Option<Tuple>> {
        while self.child.has_next()? {
            let tuple = self.child.next()?;
            if self.predicate.filter(&tuple)? {
                return Ok(Some(tuple));
            }
        }
        Ok(None)
    }

    fn output_schema(&self) -> &Schema {
        self.child.output_schema()
    }
}
