//! Raw data source

use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing::info;

use crate::error::{MindscopeError, Result};

/// Source of the raw survey records
pub trait DataSource: Send + Sync {
    /// Fetch every record of a collection as one table
    fn fetch_all(&self, collection: &str) -> Result<DataFrame>;
}

/// Collections exported as `<root>/<collection>.csv`
#[derive(Debug, Clone)]
pub struct CsvCollectionSource {
    root: PathBuf,
}

impl CsvCollectionSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.csv", collection))
    }
}

impl DataSource for CsvCollectionSource {
    fn fetch_all(&self, collection: &str) -> Result<DataFrame> {
        let path = self.collection_path(collection);
        if !path.is_file() {
            return Err(MindscopeError::DataError(format!(
                "Collection '{}' not found at {}",
                collection,
                path.display()
            )));
        }
        let df = super::read_csv(&path)?;
        info!(
            collection,
            rows = df.height(),
            columns = df.width(),
            "Fetched raw collection"
        );
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_all_reads_collection_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("raw_data.csv"), "_id,Age\na,20\nb,30\n").unwrap();

        let source = CsvCollectionSource::new(dir.path());
        let df = source.fetch_all("raw_data").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_unknown_collection() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvCollectionSource::new(dir.path());
        assert!(matches!(
            source.fetch_all("missing"),
            Err(MindscopeError::DataError(_))
        ));
    }
}
