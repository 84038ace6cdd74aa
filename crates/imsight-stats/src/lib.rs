//! imsight-stats - Aggregation primitives for chart building
//!
//! This crate turns plain values into the statistics charts are drawn from:
//!
//! - **Grouping**: first-occurrence ordered partitions, frequency tables,
//!   weighted tables and stable top-N ranking
//! - **Summary**: mean, sum, linear-interpolation quantiles and the
//!   five-number summary used by box plots
//! - **Histogram**: deterministic fixed-width binning with member lists
//!
//! Every statistic over zero observations is reported as `None` or as
//! [`StatsError::EmptyDataset`], never as a silent `0` or `NaN`.

pub mod error;
pub mod grouping;
pub mod histogram;
pub mod summary;

pub use error::*;
pub use grouping::*;
pub use histogram::*;
pub use summary::*;
