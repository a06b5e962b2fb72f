//! Feature engineer: fit on the training partition, apply everywhere else

use chrono::Utc;
use polars::prelude::DataFrame;
use std::time::Instant;
use tracing::info;

use super::encoder::ColumnEncoder;
use super::fitted::{split_target, CleaningStats, FittedTransformer};
use super::frame;
use super::matrix::FeatureMatrix;
use super::steps;
use crate::config::SchemaSpec;
use crate::error::{MindscopeError, Result};

/// Two-mode feature engineering over raw survey tables
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    schema: SchemaSpec,
}

impl FeatureEngineer {
    pub fn new(schema: SchemaSpec) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &SchemaSpec {
        &self.schema
    }

    /// Learn every statistic from `train`, then produce its engineered matrix
    /// (target last) and the transformer that reproduces it.
    pub fn fit_transform(&self, train: &DataFrame) -> Result<(FeatureMatrix, FittedTransformer)> {
        let start = Instant::now();
        let target = self.schema.target_column.as_str();

        let df = frame::normalize(train)?;
        if !frame::has_column(&df, target) {
            return Err(MindscopeError::MissingTarget(target.to_string()));
        }

        let df = steps::drop_identifiers(&df, &self.schema.drop_columns)?;
        let (df, duplicates) = steps::drop_duplicate_rows(&df)?;
        let (cleaned, stats) = CleaningStats::learn(&df)?;

        let (features, y) = split_target(&cleaned, target)?;
        let y = y.ok_or_else(|| MindscopeError::MissingTarget(target.to_string()))?;

        let mut encoder = ColumnEncoder::new();
        encoder.fit(
            &features,
            &self.schema.num_features,
            &self.schema.categorical_features,
        )?;
        let encoded = encoder.transform(&features)?;

        let fitted = FittedTransformer {
            drop_columns: self.schema.drop_columns.clone(),
            target_column: target.to_string(),
            stats,
            encoder,
            fitted_at: Utc::now(),
        };
        let matrix = FeatureMatrix::new(encoded, fitted.feature_names(), Some((target.to_string(), y)))?;

        info!(
            rows = matrix.n_rows(),
            duplicates_dropped = duplicates,
            features = matrix.n_features(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fitted feature engineer on training partition"
        );

        Ok((matrix, fitted))
    }

    /// Engineer a table with statistics from a previous fit; the target is optional
    pub fn apply(table: &DataFrame, fitted: &FittedTransformer) -> Result<FeatureMatrix> {
        let matrix = fitted.transform(table)?;
        info!(
            rows = matrix.n_rows(),
            has_target = matrix.target_name.is_some(),
            "Applied fitted transformer"
        );
        Ok(matrix)
    }
}
