//! Year-indexed field families
//!
//! Wide tables often spread one measurement over a column per year
//! (`Forest Area 1990`, `Forest Area 1991`, ...). A [`SeriesSpec`] names such
//! a family so records can collapse it into `(year, value)` pairs.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A family of year-suffixed columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Column name before the year, including any separator
    pub prefix: String,
    pub first_year: i32,
    pub last_year: i32,
}

impl SeriesSpec {
    /// Create a series over `first_year..=last_year`
    pub fn new(prefix: impl Into<String>, first_year: i32, last_year: i32) -> Self {
        Self {
            prefix: prefix.into(),
            first_year,
            last_year,
        }
    }

    /// Column name for a year
    pub fn field_name(&self, year: i32) -> String {
        format!("{}{}", self.prefix, year)
    }

    /// Years covered by the series, ascending
    pub fn years(&self) -> RangeInclusive<i32> {
        self.first_year..=self.last_year
    }

    /// Number of years covered
    pub fn len(&self) -> usize {
        if self.last_year < self.first_year {
            0
        } else {
            (self.last_year - self.first_year + 1) as usize
        }
    }

    /// Check if the series covers no year
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One `(year, value)` pair of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}
