//! Statistics collection for a single integer column.

use crate::access::DataType;
use crate::executor::Executor;
use crate::expression::ComparisonOp;
use crate::statistics::{IntHistogram, StatisticsError};
use anyhow::Result;
use log::debug;

/// Row counts and value histogram of one Int32 column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    field: usize,
    row_count: u64,
    null_count: u64,
    /// `None` when the column holds no non-NULL value
    histogram: Option<IntHistogram>,
}

impl ColumnStatistics {
    /// Gather statistics for column `field` of `source`.
    ///
    /// The source is opened, scanned once for the value range, rewound,
    /// scanned again to fill a histogram with `buckets` buckets, and closed.
    pub fn collect(source: &mut dyn Executor, field: usize, buckets: usize) -> Result<Self> {
        let schema = source.output_schema();
        let data_type = schema
            .column(field)
            .ok_or(StatisticsError::ColumnOutOfBounds {
                index: field,
                columns: schema.len(),
            })?
            .data_type;
        if data_type != DataType::Int32 {
            return Err(StatisticsError::UnsupportedType {
                index: field,
                actual: data_type,
            }
            .into());
        }
        if buckets == 0 {
            return Err(StatisticsError::NoBuckets.into());
        }

        source.open()?;
        let stats = Self::scan(source, field, buckets);
        source.close();
        stats
    }

    fn scan(source: &mut dyn Executor, field: usize, buckets: usize) -> Result<Self> {
        let mut row_count = 0u64;
        let mut null_count = 0u64;
        let mut range: Option<(i32, i32)> = None;

        while source.has_next()? {
            let tuple = source.next()?;
            row_count += 1;
            match tuple.value(field)?.as_i32() {
                Some(v) => {
                    let (lo, hi) = range.unwrap_or((v, v));
                    range = Some((lo.min(v), hi.max(v)));
                }
                None => null_count += 1,
            }
        }

        let histogram = match range {
            Some((min, max)) => {
                source.rewind()?;
                let mut histogram = IntHistogram::new(buckets, min, max)?;
                while source.has_next()? {
                    if let Some(v) = source.next()?.value(field)?.as_i32() {
                        histogram.add(v)?;
                    }
                }
                Some(histogram)
            }
            None => None,
        };

        debug!(
            "collected statistics for column {}: {} rows, {} nulls, range {:?}",
            field, row_count, null_count, range
        );

        Ok(Self {
            field,
            row_count,
            null_count,
            histogram,
        })
    }

    pub fn field(&self) -> usize {
        self.field
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn null_count(&self) -> u64 {
        self.null_count
    }

    pub fn histogram(&self) -> Option<&IntHistogram> {
        self.histogram.as_ref()
    }

    /// Estimated fraction of all rows (NULLs included) satisfying
    /// `column op value`. NULL rows never satisfy a comparison.
    pub fn estimate_selectivity(&self, op: ComparisonOp, value: i32) -> f64 {
        match &self.histogram {
            Some(histogram) if self.row_count > 0 => {
                let non_null = (self.row_count - self.null_count) as f64 / self.row_count as f64;
                histogram.estimate_selectivity(op, value) * non_null
            }
            _ => 0.0,
        }
    }
}
