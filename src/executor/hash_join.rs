//! Hash Join executor implementation.
//!
//! This executor performs an equi-join between two relations using an
//! in-memory hash table.
//!
//! Algorithm:
//! 1. Build phase: drain the left (build) child, grouping its tuples by the
//!    value of the left join field, then rewind it.
//! 2. Probe phase: for each tuple of the right (probe) child, look up its join
//!    field in the table and emit every bucket entry that satisfies the join
//!    predicate, concatenated as `left ++ right`.
//!
//! Results come out probe-major: all matches for one right tuple, in the left
//! child's order, before the next right tuple is pulled.

use crate::access::{Schema, Tuple, Value};
use crate::executor::{Executor, ExecutorError, Operator};
use crate::expression::JoinPredicate;
use anyhow::Result;
use log::{debug, trace};
use std::collections::HashMap;
use std::mem;

/// Build-side tuples grouped by join key, each bucket in build order
type JoinIndex = HashMap<Value, Vec<Tuple>>;

/// Probe progress carried from one `fetch_next` call to the next
#[derive(Debug, Default)]
struct ProbeCursor {
    /// Right tuple whose bucket is being scanned
    probe: Option<Tuple>,
    /// Next bucket entry to examine for `probe`
    position: usize,
}

impl ProbeCursor {
    fn start(&mut self, probe: Tuple) {
        self.probe = Some(probe);
        self.position = 0;
    }

    fn clear(&mut self) {
        self.probe = None;
        self.position = 0;
    }
}

/// Hash join executor that performs equi-joins
pub struct HashJoinExecutor {
    predicate: JoinPredicate,
    /// Build side
    left_child: Box<dyn Executor>,
    /// Probe side
    right_child: Box<dyn Executor>,
    /// Output schema (left schema + right schema)
    output_schema: Schema,
    /// Present exactly while the executor is open
    index: Option<JoinIndex>,
    cursor: ProbeCursor,
}

impl HashJoinExecutor {
    /// Create a new hash join executor
    ///
    /// # Arguments
    /// * `predicate` - Join predicate; `field1` indexes the left child, `field2` the right
    /// * `left_child` - The build side; must be rewindable
    /// * `right_child` - The probe side
    pub fn new(
        predicate: JoinPredicate,
        left_child: Box<dyn Executor>,
        right_child: Box<dyn Executor>,
    ) -> Result<Self> {
        Self::check_fields(&predicate, left_child.as_ref(), right_child.as_ref())?;
        let output_schema =
            Schema::merge(left_child.output_schema(), right_child.output_schema());

        Ok(Self {
            predicate,
            left_child,
            right_child,
            output_schema,
            index: None,
            cursor: ProbeCursor::default(),
        })
    }

    fn check_fields(
        predicate: &JoinPredicate,
        left: &dyn Executor,
        right: &dyn Executor,
    ) -> Result<()> {
        for (side, index, schema) in [
            ("left", predicate.field1(), left.output_schema()),
            ("right", predicate.field2(), right.output_schema()),
        ] {
            if index >= schema.len() {
                return Err(ExecutorError::FieldIndexOutOfBounds {
                    side,
                    index,
                    columns: schema.len(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn join_predicate(&self) -> &JoinPredicate {
        &self.predicate
    }

    /// Name of the left join column, if the column has one
    pub fn join_field1_name(&self) -> Option<&str> {
        self.left_child
            .output_schema()
            .column(self.predicate.field1())
            .and_then(|col| col.name())
    }

    /// Name of the right join column, if the column has one
    pub fn join_field2_name(&self) -> Option<&str> {
        self.right_child
            .output_schema()
            .column(self.predicate.field2())
            .and_then(|col| col.name())
    }

    pub fn children(&self) -> (&dyn Executor, &dyn Executor) {
        (self.left_child.as_ref(), self.right_child.as_ref())
    }

    /// Replace both children, returning the previous ones.
    ///
    /// Only allowed while closed; the output schema is recomputed.
    pub fn set_children(
        &mut self,
        left_child: Box<dyn Executor>,
        right_child: Box<dyn Executor>,
    ) -> Result<(Box<dyn Executor>, Box<dyn Executor>)> {
        if self.index.is_some() {
            return Err(ExecutorError::StillOpen {
                executor: Self::NAME,
                action: "set_children",
            }
            .into());
        }
        Self::check_fields(&self.predicate, left_child.as_ref(), right_child.as_ref())?;

        self.output_schema =
            Schema::merge(left_child.output_schema(), right_child.output_schema());
        let old_left = mem::replace(&mut self.left_child, left_child);
        let old_right = mem::replace(&mut self.right_child, right_child);
        Ok((old_left, old_right))
    }

    /// Number of build tuples held in the index, if open
    pub fn indexed_tuples(&self) -> Option<usize> {
        self.index
            .as_ref()
            .map(|index| index.values().map(Vec::len).sum())
    }

    /// Drain the left child into a fresh index, then rewind it
    fn build_index(&mut self) -> Result<JoinIndex> {
        let field = self.predicate.field1();
        let mut index = JoinIndex::new();
        let mut rows = 0usize;

        while self.left_child.has_next()? {
            let tuple = self.left_child.next()?;
            let key = tuple.value(field)?;
            // NULL never joins
            if key.is_null() {
                continue;
            }
            index.entry(key.clone()).or_default().push(tuple);
            rows += 1;
        }
        self.left_child.rewind()?;

        debug!(
            "hash join built index on left.${}: {} tuples in {} buckets",
            field,
            rows,
            index.len()
        );
        Ok(index)
    }
}

impl Operator for HashJoinExecutor {
    const NAME: &'static str = "HashJoinExecutor";

    fn open(&mut self) -> Result<()> {
        self.left_child.open()?;
        if let Err(e) = self.right_child.open() {
            self.left_child.close();
            return Err(e);
        }

        self.cursor.clear();
        match self.build_index() {
            Ok(index) => {
                self.index = Some(index);
                Ok(())
            }
            Err(e) => {
                self.left_child.close();
                self.right_child.close();
                Err(e)
            }
        }
    }

    fn close(&mut self) {
        self.left_child.close();
        self.right_child.close();
        self.index = None;
        self.cursor.clear();
    }

    fn rewind(&mut self) -> Result<()> {
        if self.index.is_none() {
            return Err(ExecutorError::NotOpen {
                executor: Self::NAME,
            }
            .into());
        }

        self.left_child.rewind()?;
        self.right_child.rewind()?;

        self.cursor.clear();
        self.index = None;
        self.index = Some(self.build_index()?);
        debug!("hash join rewound");
        Ok(())
    }

    fn fetch_next(&mut self) -> Result<Option<Tuple>> {
        let Self {
            predicate,
            right_child,
            index,
            cursor,
            ..
        } = self;
        let index = index.as_ref().ok_or(ExecutorError::NotOpen {
            executor: Self::NAME,
        })?;

        loop {
            // Continue the pending bucket scan
            if let Some(probe) = &cursor.probe {
                if let Some(bucket) = index.get(probe.value(predicate.field2())?) {
                    while let Some(candidate) = bucket.get(cursor.position) {
                        cursor.position += 1;
                        if predicate.filter(candidate, probe)? {
                            return Ok(Some(Tuple::merge(candidate, probe)));
                        }
                    }
                }
                cursor.clear();
            }

            // Advance the probe side to the next tuple with a bucket
            loop {
                if !right_child.has_next()? {
                    return Ok(None);
                }
                let probe = right_child.next()?;
                let key = probe.value(predicate.field2())?;
                if index.contains_key(key) {
                    cursor.start(probe);
                    break;
                }
                trace!("hash join probe miss for key {}", key);
            }
        }
    }

    fn output_schema(&self) -> &Schema {
        &self.output_schema
    }
}
