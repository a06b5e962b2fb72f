//! Statistics learned on the training partition and the transformer that reuses them

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::debug;

use super::columns;
use super::encoder::ColumnEncoder;
use super::frame;
use super::matrix::FeatureMatrix;
use super::steps;
use crate::error::{MindscopeError, Result};

/// Train-derived statistics consumed by the cleaning steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningStats {
    /// Mean CGPA of students
    pub student_cgpa_mean: Option<f64>,
    /// Fill values for Financial Stress, Satisfaction and Pressure
    pub numeric_means: BTreeMap<String, f64>,
    /// City frequencies before collapsing
    pub city_counts: BTreeMap<String, usize>,
    /// Degree frequencies after the default-degree fill, before collapsing
    pub degree_counts: BTreeMap<String, usize>,
    /// Dietary Habits frequencies after synonym mapping
    pub dietary_counts: BTreeMap<String, usize>,
    pub dietary_mode: Option<String>,
    /// Most common sleep bucket
    pub sleep_mode: Option<String>,
}

impl CleaningStats {
    /// Learn the statistics step by step on a training table and return the
    /// cleaned table alongside them.
    ///
    /// Every statistic is measured on the table as it stands right before
    /// the step that consumes it, then applied through the same step
    /// functions [`CleaningStats::apply`] uses.
    pub fn learn(df: &DataFrame) -> Result<(DataFrame, Self)> {
        let mut stats = Self::default();

        let df = steps::merge_branch_columns(df)?;

        stats.student_cgpa_mean = steps::student_cgpa_mean(&df)?;
        let df = steps::fill_cgpa(&df, stats.student_cgpa_mean)?;

        stats.numeric_means = steps::column_means(&df, &columns::MEAN_FILLED)?;
        let df = steps::fill_numeric(&df, &stats.numeric_means)?;

        let df = steps::fill_profession(&df)?;

        stats.city_counts = steps::category_counts(&df, columns::CITY)?;
        let df = stats.collapse_city(&df)?;

        let df = steps::fill_string(&df, columns::DEGREE, steps::DEFAULT_DEGREE)?;
        stats.degree_counts = steps::category_counts(&df, columns::DEGREE)?;
        let df = stats.collapse_degree(&df)?;

        let df = steps::map_strings(&df, columns::DIETARY_HABITS, steps::dietary_synonym)?;
        stats.dietary_counts = steps::category_counts(&df, columns::DIETARY_HABITS)?;
        stats.dietary_mode = frame::mode(&stats.dietary_counts);
        let df = stats.collapse_dietary(&df)?;

        stats.sleep_mode = steps::sleep_mode(&df)?;
        let df = steps::bucket_sleep_duration(&df, stats.sleep_mode.as_deref())?;

        let df = frame::drop_if_present(&df, &[columns::NAME])?;

        debug!(
            student_cgpa_mean = ?stats.student_cgpa_mean,
            cities = stats.city_counts.len(),
            degrees = stats.degree_counts.len(),
            dietary_mode = ?stats.dietary_mode,
            sleep_mode = ?stats.sleep_mode,
            "Learned cleaning statistics"
        );

        Ok((df, stats))
    }

    /// Apply the cleaning steps with these statistics
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let df = steps::merge_branch_columns(df)?;
        let df = steps::fill_cgpa(&df, self.student_cgpa_mean)?;
        let df = steps::fill_numeric(&df, &self.numeric_means)?;
        let df = steps::fill_profession(&df)?;
        let df = self.collapse_city(&df)?;
        let df = steps::fill_string(&df, columns::DEGREE, steps::DEFAULT_DEGREE)?;
        let df = self.collapse_degree(&df)?;
        let df = steps::map_strings(&df, columns::DIETARY_HABITS, steps::dietary_synonym)?;
        let df = self.collapse_dietary(&df)?;
        let df = steps::bucket_sleep_duration(&df, self.sleep_mode.as_deref())?;
        frame::drop_if_present(&df, &[columns::NAME])
    }

    fn collapse_city(&self, df: &DataFrame) -> Result<DataFrame> {
        steps::collapse_rare(df, columns::CITY, &self.city_counts, steps::CITY_MIN_COUNT, steps::OTHER)
    }

    fn collapse_degree(&self, df: &DataFrame) -> Result<DataFrame> {
        steps::collapse_rare(
            df,
            columns::DEGREE,
            &self.degree_counts,
            steps::DEGREE_MIN_COUNT,
            steps::OTHER,
        )
    }

    fn collapse_dietary(&self, df: &DataFrame) -> Result<DataFrame> {
        match &self.dietary_mode {
            Some(mode) => steps::collapse_rare(
                df,
                columns::DIETARY_HABITS,
                &self.dietary_counts,
                steps::DIETARY_MIN_COUNT,
                mode,
            ),
            None => Ok(df.clone()),
        }
    }
}

/// Everything needed to reproduce the training features on new data.
///
/// Produced once by [`FeatureEngineer::fit_transform`](super::FeatureEngineer::fit_transform)
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedTransformer {
    pub(crate) drop_columns: Vec<String>,
    pub(crate) target_column: String,
    pub(crate) stats: CleaningStats,
    pub(crate) encoder: ColumnEncoder,
    pub(crate) fitted_at: DateTime<Utc>,
}

impl FittedTransformer {
    pub fn stats(&self) -> &CleaningStats {
        &self.stats
    }

    pub fn encoder(&self) -> &ColumnEncoder {
        &self.encoder
    }

    pub fn target_column(&self) -> &str {
        &self.target_column
    }

    pub fn fitted_at(&self) -> DateTime<Utc> {
        self.fitted_at
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.encoder.feature_names()
    }

    pub fn n_features(&self) -> usize {
        self.encoder.n_features()
    }

    /// Normalize, drop identifiers and apply the learned cleaning steps
    pub fn clean(&self, table: &DataFrame) -> Result<DataFrame> {
        let df = frame::normalize(table)?;
        let df = steps::drop_identifiers(&df, &self.drop_columns)?;
        self.stats.apply(&df)
    }

    /// Encode an already cleaned table; a target column, if present, is ignored
    pub fn encode(&self, cleaned: &DataFrame) -> Result<Array2<f64>> {
        self.encoder.transform(cleaned)
    }

    /// Full apply path: clean, separate the optional target, encode
    pub fn transform(&self, table: &DataFrame) -> Result<FeatureMatrix> {
        let cleaned = self.clean(table)?;
        let (features, target) = split_target(&cleaned, &self.target_column)?;
        let encoded = self.encode(&features)?;
        FeatureMatrix::new(
            encoded,
            self.feature_names(),
            target.map(|y| (self.target_column.clone(), y)),
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(bincode::deserialize_from(reader)?)
    }
}

/// Remove the target column from a cleaned table, returning its values when present
pub(crate) fn split_target(df: &DataFrame, target: &str) -> Result<(DataFrame, Option<Array1<f64>>)> {
    if !frame::has_column(df, target) {
        return Ok((df.clone(), None));
    }

    let values = frame::numeric_values(df, target)?;
    let missing = values.iter().filter(|v| v.is_none()).count();
    if missing > 0 {
        return Err(MindscopeError::DataError(format!(
            "Target column '{}' has {} missing or non-numeric values",
            target, missing
        )));
    }

    let y: Array1<f64> = values.into_iter().flatten().collect();
    let features = frame::drop_if_present(df, &[target])?;
    Ok((features, Some(y)))
}
