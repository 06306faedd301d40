//! Field name/type descriptors for tuples.

use crate::access::DataType;
use anyhow::{bail, Result};
use std::fmt;

/// Label used in place of a missing alias or field name when qualifying
/// column names.
pub const MISSING_LABEL: &str = "null";

/// Information about a column in a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: Option<String>,
    pub data_type: DataType,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: Some(name.into()),
            data_type,
        }
    }

    /// A column without a name
    pub fn unnamed(data_type: DataType) -> Self {
        Self {
            name: None,
            data_type,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Ordered sequence of columns describing the shape of a tuple
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    columns: Vec<ColumnInfo>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    /// Concatenate two schemas: all of `left`'s columns followed by all of
    /// `right`'s. Duplicate names are kept.
    pub fn merge(left: &Schema, right: &Schema) -> Schema {
        Schema {
            columns: left
                .columns
                .iter()
                .cloned()
                .chain(right.columns.iter().cloned())
                .collect(),
        }
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnInfo> {
        self.columns.get(index)
    }

    /// Name of the column at `index`; `Ok(None)` for an unnamed column
    pub fn field_name(&self, index: usize) -> Result<Option<&str>> {
        match self.columns.get(index) {
            Some(col) => Ok(col.name()),
            None => bail!(
                "Field index {} out of bounds for schema with {} columns",
                index,
                self.columns.len()
            ),
        }
    }

    pub fn field_type(&self, index: usize) -> Result<DataType> {
        match self.columns.get(index) {
            Some(col) => Ok(col.data_type),
            None => bail!(
                "Field index {} out of bounds for schema with {} columns",
                index,
                self.columns.len()
            ),
        }
    }

    /// Index of the first column with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name() == Some(name))
    }

    pub fn data_types(&self) -> Vec<DataType> {
        self.columns.iter().map(|col| col.data_type).collect()
    }

    /// Prefix every column name with `alias.`.
    ///
    /// A missing alias or column name is rendered as `null` instead of
    /// failing, so the result may contain labels like `null.id` or `t.null`.
    pub fn qualify(&self, alias: Option<&str>) -> Schema {
        let alias = alias.unwrap_or(MISSING_LABEL);
        Schema {
            columns: self
                .columns
                .iter()
                .map(|col| {
                    let name = col.name().unwrap_or(MISSING_LABEL);
                    ColumnInfo::new(format!("{}.{}", alias, name), col.data_type)
                })
                .collect(),
        }
    }
}

impl From<Vec<ColumnInfo>> for Schema {
    fn from(columns: Vec<ColumnInfo>) -> Self {
        Self::new(columns)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(
                f,
                "{}({:?})",
                col.name().unwrap_or(MISSING_LABEL),
                col.data_type
            )?;
        }
        Ok(())
    }
}
