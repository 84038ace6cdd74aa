//! Fixed-width histogram binning
//!
//! A domain `[lo, hi]` is split into `T` contiguous bins of equal width.
//! Each bin is half-open `[x0, x1)` except the last, which also holds values
//! equal to `hi`. Values outside the domain are dropped, not rejected.

use crate::error::{StatsError, StatsResult};
use crate::summary;
use serde::{Deserialize, Serialize};

/// Domain and bin count of a histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    lo: f64,
    hi: f64,
    count: usize,
}

impl BinSpec {
    /// Create a bin specification over `[lo, hi]`
    pub fn new(lo: f64, hi: f64, count: usize) -> StatsResult<Self> {
        if count == 0 {
            return Err(StatsError::InvalidBinCount(count));
        }
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(StatsError::InvalidDomain { lo, hi });
        }
        Ok(Self { lo, hi, count })
    }

    /// Create a bin specification spanning the extent of the values
    pub fn from_extent(values: &[f64], count: usize) -> StatsResult<Self> {
        let sorted = summary::sort_numeric(values);
        match (sorted.first(), sorted.last()) {
            (Some(&lo), Some(&hi)) => Self::new(lo, hi, count),
            _ => Err(StatsError::EmptyDataset),
        }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// Number of bins
    pub fn count(&self) -> usize {
        self.count
    }

    /// Width of every bin
    pub fn width(&self) -> f64 {
        (self.hi - self.lo) / self.count as f64
    }

    /// Left edge of bin `i`; `edge(count)` is exactly `hi`
    pub fn edge(&self, i: usize) -> f64 {
        if i >= self.count {
            self.hi
        } else {
            self.lo + i as f64 * self.width()
        }
    }

    /// Check if a value lies in the closed domain
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.lo && value <= self.hi
    }

    /// Index of the bin holding `value`, or `None` outside the domain
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !self.contains(value) {
            return None;
        }

        let last = self.count - 1;
        if value >= self.hi {
            return Some(last);
        }

        let mut idx = (((value - self.lo) / self.width()).floor() as usize).min(last);
        // Agree with the computed edges when the division lands on a boundary
        if idx < last && value >= self.edge(idx + 1) {
            idx += 1;
        } else if idx > 0 && value < self.edge(idx) {
            idx -= 1;
        }
        Some(idx)
    }
}

/// One histogram bin and its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin<T> {
    /// Inclusive lower edge
    pub x0: f64,
    /// Exclusive upper edge (inclusive for the last bin)
    pub x1: f64,
    pub members: Vec<T>,
}

impl<T> Bin<T> {
    /// Number of members
    pub fn count(&self) -> usize {
        self.members.len()
    }

    /// Check if the bin is empty
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Midpoint of the bin
    pub fn center(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    /// Mean of a value extracted from each member; `None` for an empty bin
    pub fn mean_by<F>(&self, f: F) -> Option<f64>
    where
        F: FnMut(&T) -> f64,
    {
        let values: Vec<f64> = self.members.iter().map(f).collect();
        summary::mean(&values)
    }

    /// Sum of a value extracted from each member; `None` for an empty bin
    pub fn sum_by<F>(&self, f: F) -> Option<f64>
    where
        F: FnMut(&T) -> f64,
    {
        let values: Vec<f64> = self.members.iter().map(f).collect();
        summary::sum(&values)
    }
}

/// Items partitioned into fixed-width bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram<T> {
    spec: BinSpec,
    bins: Vec<Bin<T>>,
    dropped: usize,
}

impl<T> Histogram<T> {
    /// Bin items by the value `value_fn` extracts
    ///
    /// Items without a value, or whose value falls outside the domain, are
    /// counted in [`Histogram::dropped`].
    pub fn build<I, F>(spec: BinSpec, items: I, mut value_fn: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> Option<f64>,
    {
        let mut bins: Vec<Bin<T>> = (0..spec.count())
            .map(|i| Bin {
                x0: spec.edge(i),
                x1: spec.edge(i + 1),
                members: Vec::new(),
            })
            .collect();
        let mut dropped = 0;

        for item in items {
            match value_fn(&item).and_then(|v| spec.index_of(v)) {
                Some(idx) => bins[idx].members.push(item),
                None => dropped += 1,
            }
        }

        Self {
            spec,
            bins,
            dropped,
        }
    }

    pub fn spec(&self) -> &BinSpec {
        &self.spec
    }

    pub fn bins(&self) -> &[Bin<T>] {
        &self.bins
    }

    pub fn into_bins(self) -> Vec<Bin<T>> {
        self.bins
    }

    /// Number of items left out of every bin
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Number of binned items
    pub fn total(&self) -> usize {
        self.bins.iter().map(Bin::count).sum()
    }

    /// Largest bin count
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(Bin::count).max().unwrap_or(0)
    }
}

impl Histogram<f64> {
    /// Bin plain numbers
    pub fn counts(spec: BinSpec, values: &[f64]) -> Self {
        Self::build(spec, values.iter().copied(), |v| Some(*v))
    }
}
