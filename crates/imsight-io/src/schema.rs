//! Schema inference for record sets

use crate::reader::{IoError, IoResult};
use crate::record::RecordSet;
use serde::{Deserialize, Serialize};

/// Schema describing the structure of a record set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSchema {
    /// Column descriptors in header order
    pub columns: Vec<ColumnDescriptor>,

    /// Number of records
    pub num_records: usize,
}

impl DataSchema {
    /// Create a new schema
    pub fn new(columns: Vec<ColumnDescriptor>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
        }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check that every named column exists
    pub fn require<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> IoResult<()> {
        for field in fields {
            if self.column(field).is_none() {
                return Err(IoError::ColumnNotFound(field.to_string()));
            }
        }
        Ok(())
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Inferred data type
    pub dtype: ColumnType,

    /// Number of records with the field absent or empty
    pub missing: usize,

    /// Number of non-empty values that failed to parse as the inferred type
    pub invalid: usize,
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Float,
    Text,
    /// Every value is absent or empty
    Empty,
}

impl ColumnType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Share of non-empty values that must parse as numbers for a numeric column
const NUMERIC_THRESHOLD: f64 = 0.9;

/// Infer the schema of a record set
///
/// A column is numeric when at least 90% of its non-empty values parse as
/// numbers; the rest are reported as invalid rather than turning the whole
/// column into text.
pub fn infer_schema(records: &RecordSet) -> DataSchema {
    let columns = records
        .header()
        .iter()
        .map(|name| infer_column(records, name))
        .collect();

    DataSchema::new(columns, records.len())
}

fn infer_column(records: &RecordSet, name: &str) -> ColumnDescriptor {
    let mut missing = 0;
    let mut present = 0;
    let mut integers = 0;
    let mut numbers = 0;

    for record in records {
        let Some(value) = record.get(name) else {
            missing += 1;
            continue;
        };
        let text = value.as_text();
        let text = text.trim();
        if text.is_empty() {
            missing += 1;
            continue;
        }

        present += 1;
        if text.parse::<i64>().is_ok() {
            integers += 1;
            numbers += 1;
        } else if value.as_number().is_some() {
            numbers += 1;
        }
    }

    let (dtype, invalid) = if present == 0 {
        (ColumnType::Empty, 0)
    } else if numbers as f64 / present as f64 >= NUMERIC_THRESHOLD {
        let dtype = if integers == numbers {
            ColumnType::Integer
        } else {
            ColumnType::Float
        };
        (dtype, present - numbers)
    } else {
        (ColumnType::Text, 0)
    };

    ColumnDescriptor {
        name: name.to_string(),
        dtype,
        missing,
        invalid,
    }
}
