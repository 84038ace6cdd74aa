//! imsight-io - Records and their loading
//!
//! This crate provides the immutable input side of the chart pipeline:
//!
//! - **Record**: one row, a mapping from field name to text or number, with
//!   typed failures for missing and unparseable fields
//! - **RecordSet**: an ordered, immutable collection of records
//! - **Series**: year-indexed field families (`Forest Area 1990` ...
//!   `Forest Area 2020`) collapsed into `(year, value)` pairs
//! - **CSV**: header-driven loading with the `csv` crate
//! - **Schema**: per-column type inference used to validate chart fields
//!
//! # Design
//!
//! Loading always completes before aggregation starts: readers hand back a
//! fully materialized `RecordSet`, never a partially read one.

pub mod csv_reader;
pub mod reader;
pub mod record;
pub mod schema;
pub mod series;

pub use csv_reader::*;
pub use reader::*;
pub use record::*;
pub use schema::*;
pub use series::*;
