//! Records and record sets

use crate::series::{SeriesPoint, SeriesSpec};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

/// A single field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Text form of the value
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Text(s) => Cow::Borrowed(s.as_str()),
            FieldValue::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    /// Numeric form of the value
    ///
    /// Text is trimmed and parsed; empty text, unparseable text and
    /// non-finite numbers yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

/// Why a field could not be read from a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Field '{field}' is missing")]
    Missing { field: String },

    #[error("Field '{field}' is not a number: '{raw}'")]
    Unparseable { field: String, raw: String },
}

impl FieldError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            FieldError::Missing { field } | FieldError::Unparseable { field, .. } => field,
        }
    }
}

/// One input row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Get a raw field value
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Check if a field is present
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in no particular order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Categorical (text) value of a field
    ///
    /// An empty string is a valid category.
    pub fn category(&self, field: &str) -> Result<Cow<'_, str>, FieldError> {
        self.fields
            .get(field)
            .map(FieldValue::as_text)
            .ok_or_else(|| FieldError::Missing {
                field: field.to_string(),
            })
    }

    /// Numeric value of a field
    pub fn number(&self, field: &str) -> Result<f64, FieldError> {
        let value = self.fields.get(field).ok_or_else(|| FieldError::Missing {
            field: field.to_string(),
        })?;

        value.as_number().ok_or_else(|| FieldError::Unparseable {
            field: field.to_string(),
            raw: value.as_text().into_owned(),
        })
    }

    /// Collapse a year-indexed field family into ordered points
    ///
    /// Years whose value is missing or fails to parse are dropped.
    pub fn series(&self, spec: &SeriesSpec) -> Vec<SeriesPoint> {
        spec.years()
            .filter_map(|year| {
                self.number(&spec.field_name(year))
                    .ok()
                    .map(|value| SeriesPoint { year, value })
            })
            .collect()
    }

    /// Most recent point of a year series
    pub fn latest(&self, spec: &SeriesSpec) -> Option<SeriesPoint> {
        spec.years()
            .rev()
            .find_map(|year| {
                self.number(&spec.field_name(year))
                    .ok()
                    .map(|value| SeriesPoint { year, value })
            })
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An ordered, immutable collection of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    header: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Create a record set with an explicit column order
    pub fn new(header: Vec<String>, records: Vec<Record>) -> Self {
        Self { header, records }
    }

    /// Create a record set whose header is the sorted union of field names
    pub fn from_records(records: Vec<Record>) -> Self {
        let names: BTreeSet<&str> = records.iter().flat_map(Record::field_names).collect();
        let header = names.into_iter().map(str::to_string).collect();
        Self { header, records }
    }

    /// Column names in file order
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Check if a column is declared
    pub fn has_field(&self, field: &str) -> bool {
        self.header.iter().any(|h| h == field)
    }

    /// A new record set holding the records that satisfy `predicate`
    pub fn filter<F>(&self, mut predicate: F) -> RecordSet
    where
        F: FnMut(&Record) -> bool,
    {
        RecordSet {
            header: self.header.clone(),
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
