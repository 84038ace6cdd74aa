//! Record filters
//!
//! A [`RecordFilter`] is a conjunction of category-membership and numeric
//! range predicates. Applying it produces a new record set; the input is
//! never modified, so re-filtering always starts from the full data.

use imsight_io::{Record, RecordSet};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Keep records whose field is one of the allowed values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPredicate {
    pub field: String,
    pub allowed: Vec<String>,
}

impl CategoryPredicate {
    pub fn matches(&self, record: &Record) -> bool {
        record
            .category(&self.field)
            .map(|value| self.allowed.iter().any(|a| *a == value))
            .unwrap_or(false)
    }
}

/// Parses `FIELD=a,b,c`
impl FromStr for CategoryPredicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, values) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE[,VALUE...], got '{}'", s))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in '{}'", s));
        }
        Ok(Self {
            field: field.to_string(),
            allowed: values.split(',').map(|v| v.trim().to_string()).collect(),
        })
    }
}

/// Keep records whose numeric field lies in an inclusive range
///
/// An open bound is unconstrained. Records whose field is missing or not a
/// number never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangePredicate {
    pub field: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RangePredicate {
    pub fn matches(&self, record: &Record) -> bool {
        let Ok(value) = record.number(&self.field) else {
            return false;
        };
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Parses `FIELD=MIN..MAX`, where either bound may be left out
impl FromStr for RangePredicate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, range) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=MIN..MAX, got '{}'", s))?;
        let (min, max) = range
            .split_once("..")
            .ok_or_else(|| format!("expected MIN..MAX, got '{}'", range))?;

        let bound = |text: &str| -> Result<Option<f64>, String> {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| format!("invalid bound '{}'", text))
        };

        let field = field.trim();
        if field.is_empty() {
            return Err(format!("missing field name in '{}'", s));
        }
        Ok(Self {
            field: field.to_string(),
            min: bound(min)?,
            max: bound(max)?,
        })
    }
}

/// Conjunction of predicates applied to every record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<CategoryPredicate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangePredicate>,
}

impl RecordFilter {
    /// Create a filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to be one of `values`
    pub fn include<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.push(CategoryPredicate {
            field: field.into(),
            allowed: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Require `field` to lie within `[min, max]`
    pub fn range(mut self, field: impl Into<String>, min: Option<f64>, max: Option<f64>) -> Self {
        self.ranges.push(RangePredicate {
            field: field.into(),
            min,
            max,
        });
        self
    }

    /// Add every predicate of another filter
    pub fn merge(mut self, other: RecordFilter) -> Self {
        self.include.extend(other.include);
        self.ranges.extend(other.ranges);
        self
    }

    /// Check if the filter keeps every record
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.ranges.is_empty()
    }

    /// Fields referenced by any predicate
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.include
            .iter()
            .map(|p| p.field.as_str())
            .chain(self.ranges.iter().map(|p| p.field.as_str()))
    }

    /// Check a single record against every predicate
    pub fn matches(&self, record: &Record) -> bool {
        self.include.iter().all(|p| p.matches(record))
            && self.ranges.iter().all(|p| p.matches(record))
    }

    /// A new record set holding the matching records
    pub fn apply(&self, records: &RecordSet) -> RecordSet {
        if self.is_empty() {
            return records.clone();
        }

        let filtered = records.filter(|r| self.matches(r));
        tracing::debug!(
            before = records.len(),
            after = filtered.len(),
            "Applied record filter"
        );
        filtered
    }
}
