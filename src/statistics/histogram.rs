//! Fixed-width histogram over a single integer column.
//!
//! The value range `[min, max]` is split into `buckets` buckets of equal
//! width `ceil((max - min + 1) / buckets)` (or width 1 when there are more
//! buckets than distinct values). Adding a value and answering a selectivity
//! query only touch the bucket counts, never the raw values.
//!
//! # Estimation
//! - `=`: the bucket's count spread uniformly over its width.
//! - `!=`: `1 - estimate(=)`.
//! - `<` / `>`: whole buckets strictly below/above the value, plus the part of
//!   the value's own bucket below/above it, interpolated linearly.
//! - `<=` / `>=`: whole buckets up to/from and including the value's bucket,
//!   plus the same interpolated tail as `<` / `>`. The tail never exceeds the
//!   count of the neighbouring bucket on that side, which keeps the estimate
//!   monotone in the value.

use crate::expression::ComparisonOp;
use crate::statistics::{StatisticsError, StatisticsResult};
use std::fmt;

/// Equal-width histogram of `i32` values
#[derive(Debug, Clone, PartialEq)]
pub struct IntHistogram {
    /// Occurrence count per bucket
    counts: Vec<u64>,
    min: i32,
    max: i32,
    /// Width of every bucket, in values
    width: i64,
    /// Number of values added
    total: u64,
}

impl IntHistogram {
    /// Create a histogram with `buckets` buckets over the inclusive range
    /// `[min, max]`.
    pub fn new(buckets: usize, min: i32, max: i32) -> StatisticsResult<Self> {
        if buckets == 0 {
            return Err(StatisticsError::NoBuckets);
        }
        if min > max {
            return Err(StatisticsError::InvalidRange { min, max });
        }

        let span = max as i64 - min as i64 + 1;
        let width = match i64::try_from(buckets) {
            Ok(b) if b <= span => (span + b - 1) / b,
            _ => 1,
        };

        Ok(Self {
            counts: vec![0; buckets],
            min,
            max,
            width,
            total: 0,
        })
    }

    /// Record one occurrence of `value`.
    ///
    /// The value must lie in `[min, max]`; anything else is rejected and
    /// leaves the histogram untouched.
    pub fn add(&mut self, value: i32) -> StatisticsResult<()> {
        if value < self.min || value > self.max {
            return Err(StatisticsError::ValueOutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }

        let index = self.bucket_index(value as i64);
        self.counts[index] += 1;
        self.total += 1;
        Ok(())
    }

    /// Estimated fraction of the added values `x` for which `x op value`
    /// holds, in `[0, 1]`.
    pub fn estimate_selectivity(&self, op: ComparisonOp, value: i32) -> f64 {
        let v = value as i64;
        let (min, max) = (self.min as i64, self.max as i64);

        // Exact answers at and beyond the range bounds
        match op {
            ComparisonOp::Eq if v < min || v > max => return 0.0,
            ComparisonOp::Ne => return 1.0 - self.estimate_selectivity(ComparisonOp::Eq, value),
            ComparisonOp::Lt if v <= min => return 0.0,
            ComparisonOp::Lt if v > max => return 1.0,
            ComparisonOp::Le if v < min => return 0.0,
            ComparisonOp::Le if v >= max => return 1.0,
            ComparisonOp::Gt if v < min => return 1.0,
            ComparisonOp::Gt if v >= max => return 0.0,
            ComparisonOp::Ge if v <= min => return 1.0,
            ComparisonOp::Ge if v > max => return 0.0,
            _ => {}
        }

        if self.total == 0 {
            return 0.0;
        }

        let index = self.bucket_index(v);
        let count = self.counts[index] as f64;
        let width = self.width as f64;
        let lower = min + index as i64 * self.width;
        let upper = lower + self.width - 1;
        // Share of the bucket strictly below / strictly above `v`
        let below = (v - lower) as f64 / width;
        let above = (upper - v) as f64 / width;

        let matching = match op {
            ComparisonOp::Eq => count / width,
            ComparisonOp::Lt => self.sum(..index) + count * below,
            ComparisonOp::Le => {
                let cap = self.counts.get(index + 1).copied().unwrap_or(0) as f64;
                self.sum(..=index) + (count * below).min(cap)
            }
            ComparisonOp::Gt => self.sum(index + 1..) + count * above,
            ComparisonOp::Ge => {
                let cap = match index {
                    0 => 0.0,
                    i => self.counts[i - 1] as f64,
                };
                self.sum(index..) + (count * above).min(cap)
            }
            ComparisonOp::Ne => unreachable!("handled above"),
        };

        (matching / self.total as f64).clamp(0.0, 1.0)
    }

    /// Average selectivity over all values.
    ///
    /// No finer tracking is kept, so this is the conservative `1.0`.
    pub fn avg_selectivity(&self) -> f64 {
        1.0
    }

    pub fn buckets(&self) -> usize {
        self.counts.len()
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    /// Number of values added so far
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn bucket_count(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    /// Inclusive value range covered by bucket `index`
    pub fn bucket_range(&self, index: usize) -> (i64, i64) {
        let lower = self.min as i64 + index as i64 * self.width;
        (lower, lower + self.width - 1)
    }

    fn bucket_index(&self, v: i64) -> usize {
        ((v - self.min as i64) / self.width) as usize
    }

    fn sum<R>(&self, range: R) -> f64
    where
        R: std::slice::SliceIndex<[u64], Output = [u64]>,
    {
        self.counts[range].iter().sum::<u64>() as f64
    }
}

impl fmt::Display for IntHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "IntHistogram [{}, {}] buckets={} width={} total={}",
            self.min,
            self.max,
            self.counts.len(),
            self.width,
            self.total
        )?;
        for (i, count) in self.counts.iter().enumerate() {
            let (lower, upper) = self.bucket_range(i);
            writeln!(f, "  [{}, {}]: {}", lower, upper, count)?;
        }
        Ok(())
    }
}
