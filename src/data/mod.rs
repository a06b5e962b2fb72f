//! Tabular data access
//!
//! CSV reading and writing for artifact snapshots, and the raw data source
//! the ingestion stage pulls from.

mod source;

pub use source::{CsvCollectionSource, DataSource};

use crate::error::{MindscopeError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Rows scanned to infer column types; sparse columns such as CGPA need a wide window
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Load a CSV file with a header row
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        MindscopeError::DataError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(file);

    reader
        .finish()
        .map_err(|e| MindscopeError::DataError(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write a CSV file with a header row, creating parent directories
pub fn write_csv(df: &DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    let mut df = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| MindscopeError::DataError(format!("Failed to write {}: {}", path.display(), e)))
}
