//! Data ingestion: snapshot the raw collection and split it once

use polars::prelude::DataFrame;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::info;

use crate::artifacts::IngestionArtifact;
use crate::config::{IngestionConfig, RunLayout};
use crate::data::{self, DataSource};
use crate::error::{MindscopeError, Result};
use crate::preprocessing::{columns, frame};

/// Pulls the raw collection and writes the feature store snapshot and the
/// train/test partitions
#[derive(Debug, Clone)]
pub struct DataIngestion {
    config: IngestionConfig,
}

impl DataIngestion {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// Seeded random split; returns `(train, test)`
    pub fn split(&self, df: &DataFrame) -> Result<(DataFrame, DataFrame)> {
        let n = df.height();
        if n < 2 {
            return Err(MindscopeError::DataError(format!(
                "Need at least 2 records to split, got {}",
                n
            )));
        }

        let n_test = ((n as f64) * self.config.test_ratio).round() as usize;
        let n_test = n_test.clamp(1, n - 1);

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.config.random_seed);
        indices.shuffle(&mut rng);

        let mut is_test = vec![false; n];
        for &idx in &indices[..n_test] {
            is_test[idx] = true;
        }
        let is_train: Vec<bool> = is_test.iter().map(|t| !t).collect();

        Ok((frame::filter_rows(df, &is_train)?, frame::filter_rows(df, &is_test)?))
    }

    /// Fetch, snapshot, drop the document id and split
    pub fn run(&self, source: &dyn DataSource, layout: &RunLayout) -> Result<IngestionArtifact> {
        let raw = source.fetch_all(&self.config.collection_name)?;
        data::write_csv(&raw, &layout.feature_store_file)?;

        let records = frame::drop_if_present(&raw, &[columns::DOCUMENT_ID])?;
        let (train, test) = self.split(&records)?;
        data::write_csv(&train, &layout.train_file)?;
        data::write_csv(&test, &layout.test_file)?;

        info!(
            collection = %self.config.collection_name,
            rows = records.height(),
            train_rows = train.height(),
            test_rows = test.height(),
            "Data ingestion complete"
        );

        Ok(IngestionArtifact {
            feature_store_path: layout.feature_store_file.clone(),
            train_path: layout.train_file.clone(),
            test_path: layout.test_file.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CsvCollectionSource;
    use polars::prelude::*;

    fn ingestion() -> DataIngestion {
        DataIngestion::new(IngestionConfig::default())
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let ids: Vec<i64> = (0..10).collect();
        let df = df!("id" => ids).unwrap();

        let (train, test) = ingestion().split(&df).unwrap();
        assert_eq!(train.height(), 8);
        assert_eq!(test.height(), 2);

        let mut all: Vec<f64> = frame::numeric_values(&train, "id")
            .unwrap()
            .into_iter()
            .chain(frame::numeric_values(&test, "id").unwrap())
            .flatten()
            .collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(all, (0..10).map(|i| i as f64).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_seeded() {
        let ids: Vec<i64> = (0..50).collect();
        let df = df!("id" => ids).unwrap();

        let (_, a) = ingestion().split(&df).unwrap();
        let (_, b) = ingestion().split(&df).unwrap();
        assert!(a.equals(&b));
    }

    #[test]
    fn test_run_drops_document_id() {
        let dir = tempfile::tempdir().unwrap();
        let source_dir = dir.path().join("source");
        std::fs::create_dir_all(&source_dir).unwrap();
        let mut csv = String::from("_id,id,Age\n");
        for i in 0..10 {
            csv.push_str(&format!("doc{},{},{}\n", i, i, 20 + i));
        }
        std::fs::write(source_dir.join("raw_data.csv"), csv).unwrap();

        let layout = RunLayout::new(dir.path().join("run"));
        let artifact = ingestion()
            .run(&CsvCollectionSource::new(&source_dir), &layout)
            .unwrap();

        let snapshot = data::read_csv(&artifact.feature_store_path).unwrap();
        assert!(frame::has_column(&snapshot, "_id"));
        let train = data::read_csv(&artifact.train_path).unwrap();
        assert!(!frame::has_column(&train, "_id"));
        assert_eq!(train.height() + data::read_csv(&artifact.test_path).unwrap().height(), 10);
    }
}
