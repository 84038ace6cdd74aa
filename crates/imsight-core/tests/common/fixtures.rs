//! Test fixture loading utilities

use imsight_io::{CsvReader, RecordSet};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a CSV fixture
pub fn load_csv_fixture(name: &str) -> RecordSet {
    CsvReader::open(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Investor survey sample
#[allow(dead_code)]
pub fn finance() -> RecordSet {
    load_csv_fixture("finance_sample.csv")
}

/// Country forest cover sample, 1990 to 2020
#[allow(dead_code)]
pub fn forest() -> RecordSet {
    load_csv_fixture("forest_sample.csv")
}
