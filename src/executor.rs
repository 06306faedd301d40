//! Executor layer for query execution.
//!
//! This module implements the Volcano-style iterator model. Every executor
//! exposes the same pull contract (`open`, `has_next`, `next`, `rewind`,
//! `close`) so executors compose into plan trees without knowing what their
//! children are.
//!
//! Executors that compute their results, rather than read them from
//! somewhere, implement the smaller [`Operator`] trait instead: they only
//! have to say how to produce the next result or signal the end.
//! [`OperatorExecutor`] turns such an operator into a full [`Executor`] by
//! keeping a one-tuple look-ahead and the open/closed bookkeeping.

use crate::access::{Schema, Tuple};
use anyhow::Result;

pub mod error;
pub mod filter;
pub mod hash_join;
pub mod values;

pub use error::ExecutorError;
pub use filter::FilterExecutor;
pub use hash_join::HashJoinExecutor;
pub use values::ValuesExecutor;

/// Pull-based tuple source.
///
/// `rewind` must reproduce the exact tuple sequence of the previous pass, and
/// `output_schema` must be available before `open`.
pub trait Executor: Send {
    /// Prepare the executor for iteration. Must be called before `has_next()`.
    fn open(&mut self) -> Result<()>;

    /// Release resources; the executor is unusable until reopened.
    fn close(&mut self);

    /// Restart iteration from the first tuple.
    fn rewind(&mut self) -> Result<()>;

    /// Whether another tuple is available. Repeated calls without an
    /// intervening `next()` give the same answer and consume nothing.
    fn has_next(&mut self) -> Result<bool>;

    /// Return the next tuple. Fails with [`ExecutorError::NoMoreTuples`] when
    /// `has_next()` would return false.
    fn next(&mut self) -> Result<Tuple>;

    /// Get the output schema of this executor
    fn output_schema(&self) -> &Schema;
}

/// An executor body that produces results one at a time.
pub trait Operator: Send {
    /// Short name used in error messages
    const NAME: &'static str;

    fn open(&mut self) -> Result<()>;

    fn close(&mut self);

    fn rewind(&mut self) -> Result<()>;

    /// Produce the next result, or `None` once exhausted. Called again after
    /// exhaustion it must keep returning `None`.
    fn fetch_next(&mut self) -> Result<Option<Tuple>>;

    fn output_schema(&self) -> &Schema;

    /// Wrap this operator into a pull executor
    fn into_executor(self) -> OperatorExecutor<Self>
    where
        Self: Sized,
    {
        OperatorExecutor::new(self)
    }
}

/// Adapts an [`Operator`] to the [`Executor`] contract.
pub struct OperatorExecutor<O: Operator> {
    operator: O,
    /// Result fetched by `has_next()` but not yet returned by `next()`
    lookahead: Option<Tuple>,
    /// Whether the operator reported the end of its results
    exhausted: bool,
    is_open: bool,
}

impl<O: Operator> OperatorExecutor<O> {
    pub fn new(operator: O) -> Self {
        Self {
            operator,
            lookahead: None,
            exhausted: false,
            is_open: false,
        }
    }

    /// The wrapped operator, for plan introspection
    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn operator_mut(&mut self) -> &mut O {
        &mut self.operator
    }

    pub fn into_operator(self) -> O {
        self.operator
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.is_open {
            return Err(ExecutorError::NotOpen { executor: O::NAME }.into());
        }
        Ok(())
    }

    fn fill_lookahead(&mut self) -> Result<()> {
        if self.lookahead.is_none() && !self.exhausted {
            match self.operator.fetch_next()? {
                Some(tuple) => self.lookahead = Some(tuple),
                None => self.exhausted = true,
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.lookahead = None;
        self.exhausted = false;
    }
}

impl<O: Operator> Executor for OperatorExecutor<O> {
    fn open(&mut self) -> Result<()> {
        self.reset();
        self.operator.open()?;
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.operator.close();
        self.reset();
        self.is_open = false;
    }

    fn rewind(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.reset();
        self.operator.rewind()
    }

    fn has_next(&mut self) -> Result<bool> {
        self.ensure_open()?;
        self.fill_lookahead()?;
        Ok(self.lookahead.is_some())
    }

    fn next(&mut self) -> Result<Tuple> {
        self.ensure_open()?;
        self.fill_lookahead()?;
        self.lookahead
            .take()
            .ok_or_else(|| ExecutorError::NoMoreTuples { executor: O::NAME }.into())
    }

    fn output_schema(&self) -> &Schema {
        self.operator.output_schema()
    }
}

/// Drain an open executor into a vector
pub fn collect_tuples(executor: &mut dyn Executor) -> Result<Vec<Tuple>> {
    let mut tuples = Vec::new();
    while executor.has_next()? {
        tuples.push(executor.next()?);
    }
    Ok(tuples)
}
