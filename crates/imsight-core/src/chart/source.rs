//! Where chart values come from and how their axis domains are chosen

use imsight_io::{FieldError, Record, SeriesSpec};
use serde::{Deserialize, Serialize};

/// A numeric value read from each record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericSource {
    /// A single numeric column
    Field(String),

    /// The most recent parseable year of a year-indexed column family
    Latest(SeriesSpec),
}

impl NumericSource {
    pub fn field(name: impl Into<String>) -> Self {
        NumericSource::Field(name.into())
    }

    pub fn latest(series: SeriesSpec) -> Self {
        NumericSource::Latest(series)
    }

    /// Read the value from a record
    pub fn read(&self, record: &Record) -> Result<f64, FieldError> {
        match self {
            NumericSource::Field(name) => record.number(name),
            NumericSource::Latest(series) => record
                .latest(series)
                .map(|point| point.value)
                .ok_or_else(|| FieldError::Missing {
                    field: self.label(),
                }),
        }
    }

    /// Read the value, treating any field error as absence
    pub fn value(&self, record: &Record) -> Option<f64> {
        self.read(record).ok()
    }

    /// Human-readable name for axis titles and messages
    pub fn label(&self) -> String {
        match self {
            NumericSource::Field(name) => name.clone(),
            NumericSource::Latest(series) => format!(
                "{}{}-{} (latest)",
                series.prefix, series.first_year, series.last_year
            ),
        }
    }

    /// Header column the source requires, if it is a single column
    pub fn header_field(&self) -> Option<&str> {
        match self {
            NumericSource::Field(name) => Some(name),
            NumericSource::Latest(_) => None,
        }
    }
}

impl From<&str> for NumericSource {
    fn from(name: &str) -> Self {
        NumericSource::field(name)
    }
}

/// How a continuous axis picks its domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSpec {
    /// `[min, max]` of the plotted values
    Extent,

    /// `[0, max]` of the plotted values
    #[default]
    FromZero,

    /// A fixed interval
    Fixed([f64; 2]),
}

impl DomainSpec {
    /// Resolve against the plotted values; `None` when a data-driven domain
    /// has no finite values to span
    pub fn resolve(&self, values: &[f64]) -> Option<[f64; 2]> {
        match self {
            DomainSpec::Fixed(domain) => Some(*domain),
            DomainSpec::Extent => extent(values),
            DomainSpec::FromZero => extent(values).map(|[_, hi]| [0.0, hi]),
        }
    }
}

/// Smallest and largest finite values
pub fn extent(values: &[f64]) -> Option<[f64; 2]> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}
