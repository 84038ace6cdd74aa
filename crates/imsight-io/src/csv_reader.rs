//! CSV file reader

use crate::reader::{IoError, IoResult};
use crate::record::{FieldValue, Record, RecordSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// CSV reader producing a fully materialized [`RecordSet`]
///
/// The first row is the header. Every cell is kept as text; numeric parsing
/// happens per field when a chart asks for a number. Rows shorter than the
/// header get empty text for the absent cells.
#[derive(Debug, Clone)]
pub struct CsvReader {
    delimiter: u8,
}

impl Default for CsvReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReader {
    /// Create a comma-delimited reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Open and read a comma-delimited CSV file
    pub fn open(path: impl AsRef<Path>) -> IoResult<RecordSet> {
        Self::new().read_path(path)
    }

    /// Read a CSV file
    pub fn read_path(&self, path: impl AsRef<Path>) -> IoResult<RecordSet> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let records = self.read_from(BufReader::new(file))?;

        tracing::info!(
            path = %path.display(),
            records = records.len(),
            columns = records.header().len(),
            "Loaded CSV"
        );
        Ok(records)
    }

    /// Read CSV data from any reader
    pub fn read_from<R: Read>(&self, reader: R) -> IoResult<RecordSet> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let header: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if header.is_empty() {
            return Err(IoError::InvalidFormat("CSV has no header row".to_string()));
        }

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result.map_err(csv_error)?;
            let record: Record = header
                .iter()
                .zip(row.iter().chain(std::iter::repeat("")))
                .map(|(name, value)| (name.as_str(), FieldValue::Text(value.to_string())))
                .collect();
            records.push(record);
        }

        tracing::debug!(records = records.len(), "Parsed CSV rows");
        Ok(RecordSet::new(header, records))
    }
}

fn csv_error(err: csv::Error) -> IoError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    IoError::Csv {
        line,
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_from_keeps_text_and_order() {
        let data = "gender, age ,Avenue\nMale,34,Mutual Fund\nFemale,,Equity\n";
        let set = CsvReader::new().read_from(data.as_bytes()).unwrap();

        assert_eq!(set.header(), &["gender", "age", "Avenue"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.records()[0].number("age").unwrap(), 34.0);
        assert!(set.records()[1].number("age").is_err());
        assert_eq!(set.records()[1].category("Avenue").unwrap(), "Equity");
    }

    #[test]
    fn test_short_rows_pad_trailing_fields() {
        let data = "a,b,c\n1,2\n";
        let set = CsvReader::new().read_from(data.as_bytes()).unwrap();

        assert!(set.records()[0].contains("b"));
        assert_eq!(set.records()[0].category("c").unwrap(), "");
        assert!(set.records()[0].number("c").is_err());
    }

    #[test]
    fn test_long_rows_drop_extra_cells() {
        let data = "a,b\n1,2,3\n";
        let set = CsvReader::new().read_from(data.as_bytes()).unwrap();
        assert_eq!(set.records()[0].len(), 2);
    }

    #[test]
    fn test_tab_delimited() {
        let data = "x\ty\n1\t2\n";
        let set = CsvReader::new()
            .with_delimiter(b'\t')
            .read_from(data.as_bytes())
            .unwrap();
        assert_eq!(set.records()[0].number("y").unwrap(), 2.0);
    }

    #[test]
    fn test_open_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Country Name,Forest Area 2020").unwrap();
        writeln!(file, "Suriname,97.4").unwrap();

        let set = CsvReader::open(file.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0].number("Forest Area 2020").unwrap(), 97.4);
    }
}
