//! In-memory relation executor.
//!
//! Serves a fixed list of rows in insertion order. Rewinding replays the same
//! rows, which makes it a valid build side for the hash join and a handy leaf
//! for tests and the CLI.

use crate::access::{ColumnInfo, DataType, Schema, Tuple, Value};
use crate::executor::{Executor, ExecutorError};
use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, Trim};

const NAME: &str = "ValuesExecutor";

/// Executor over rows held in memory
#[derive(Debug)]
pub struct ValuesExecutor {
    schema: Schema,
    tuples: Vec<Tuple>,
    current: usize,
    is_open: bool,
}

impl ValuesExecutor {
    /// Create an executor over `rows`, checking each row against `schema`
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut tuples = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() != schema.len() {
                return Err(ExecutorError::ArityMismatch {
                    expected: schema.len(),
                    actual: row.len(),
                }
                .into());
            }
            for (index, (value, col)) in row.iter().zip(schema.columns()).enumerate() {
                if !value.is_compatible_with(col.data_type) {
                    return Err(ExecutorError::TypeMismatch {
                        index,
                        expected: format!("{:?}", col.data_type),
                        value: format!("{:?}", value),
                    }
                    .into());
                }
            }
            tuples.push(Tuple::new(row));
        }

        Ok(Self {
            schema,
            tuples,
            current: 0,
            is_open: false,
        })
    }

    /// Parse a relation from CSV text.
    ///
    /// The header record holds one `name:type` entry per column (`int`,
    /// `text` or `bool`; an empty name gives an unnamed column). Every
    /// following record is a row. Fields may be quoted to contain commas.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let header = reader.headers().context("Failed to read header")?.clone();
        if header.is_empty() {
            bail!("Relation has no header line");
        }
        let mut columns = Vec::with_capacity(header.len());
        for entry in header.iter() {
            let Some((name, type_name)) = entry.split_once(':') else {
                bail!("Header entry '{}' is not of the form name:type", entry);
            };
            let data_type: DataType = type_name.parse()?;
            let name = name.trim();
            columns.push(if name.is_empty() {
                ColumnInfo::unnamed(data_type)
            } else {
                ColumnInfo::new(name, data_type)
            });
        }
        let schema = Schema::new(columns);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |pos| pos.line());
            if record.len() != schema.len() {
                return Err(ExecutorError::ArityMismatch {
                    expected: schema.len(),
                    actual: record.len(),
                })
                .with_context(|| format!("line {}", line));
            }
            let row = record
                .iter()
                .zip(schema.columns())
                .map(|(field, col)| Value::parse(field, col.data_type))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("line {}", line))?;
            rows.push(row);
        }

        Self::new(schema, rows)
    }

    /// Prefix the column names with a table alias (`alias.column`).
    /// A missing alias or column name shows up as `null` in the label.
    pub fn with_alias(mut self, alias: Option<&str>) -> Self {
        self.schema = self.schema.qualify(alias);
        self
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.is_open {
            return Err(ExecutorError::NotOpen { executor: NAME }.into());
        }
        Ok(())
    }
}

impl Executor for ValuesExecutor {
    fn open(&mut self) -> Result<()> {
        self.current = 0;
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.is_open = false;
    }

    fn rewind(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.current = 0;
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.current < self.tuples.len())
    }

    fn next(&mut self) -> Result<Tuple> {
        self.ensure_open()?;
        let tuple = self
            .tuples
            .get(self.current)
            .cloned()
            .ok_or(ExecutorError::NoMoreTuples { executor: NAME })?;
        self.current += 1;
        Ok(tuple)
    }

    fn output_schema(&self) -> &Schema {
        &self.schema
    }
}
