//! Serving-time cleaning with fixed constants
//!
//! Runs the same cleaning steps as training, but without the statistics
//! learned on the training partition. Where a constant stands in for a
//! learned value the two can disagree; [`ServingTransformer::skew_report`]
//! lists those places for a given fitted transformer.

use polars::prelude::DataFrame;
use tracing::debug;

use super::record::MentalHealthRecord;
use crate::error::Result;
use crate::preprocessing::{columns, frame, steps, FittedTransformer};

/// Dietary Habits assumed when the answer is missing
pub const DEFAULT_DIETARY: &str = "Healthy";

/// Sleep bucket assumed when the answer does not map to one
pub const DEFAULT_SLEEP: &str = steps::MEDIUM_SLEEP;

#[derive(Debug, Clone, Copy, Default)]
pub struct ServingTransformer;

impl ServingTransformer {
    pub fn new() -> Self {
        Self
    }

    /// Clean a single request into one feature row
    pub fn transform_one(&self, record: &MentalHealthRecord) -> Result<DataFrame> {
        record.validate()?;
        self.transform(&record.to_frame()?)
    }

    /// Clean a batch of raw rows.
    ///
    /// Numeric nulls are filled with the batch mean; for a single record
    /// the mean is undefined and the nulls stay for the model's imputer.
    pub fn transform(&self, table: &DataFrame) -> Result<DataFrame> {
        let df = frame::normalize(table)?;
        let df = frame::drop_if_present(&df, &[columns::NAME])?;
        let df = steps::merge_branch_columns(&df)?;
        let df = steps::fill_cgpa(&df, None)?;
        let df = steps::fill_profession(&df)?;
        let df = steps::fill_string(&df, columns::CITY, steps::OTHER)?;
        let df = steps::map_strings(&df, columns::DIETARY_HABITS, steps::dietary_synonym)?;
        let df = steps::fill_string(&df, columns::DIETARY_HABITS, DEFAULT_DIETARY)?;
        let df = steps::fill_string(&df, columns::DEGREE, steps::DEFAULT_DEGREE)?;
        let df = steps::bucket_sleep_duration(&df, Some(DEFAULT_SLEEP))?;

        let means = steps::column_means(&df, &columns::MEAN_FILLED)?;
        let df = steps::fill_numeric(&df, &means)?;

        debug!(rows = df.height(), "Serving rows cleaned");
        Ok(df)
    }

    /// Places where the serving constants diverge from what `fitted` learned
    pub fn skew_report(&self, fitted: &FittedTransformer) -> Vec<String> {
        let stats = fitted.stats();
        let mut report = Vec::new();

        if let Some(mean) = stats.student_cgpa_mean {
            report.push(format!(
                "Student CGPA nulls stay null at serving; training filled them with {:.3}",
                mean
            ));
        }

        for (name, mean) in &stats.numeric_means {
            report.push(format!(
                "{} nulls fall back to the encoder median at serving; training filled them with mean {:.3}",
                name, mean
            ));
        }

        if let Some(mode) = &stats.dietary_mode {
            if mode != DEFAULT_DIETARY {
                report.push(format!(
                    "Dietary Habits nulls become '{}' at serving; training used mode '{}'",
                    DEFAULT_DIETARY, mode
                ));
            }
        }
        let rare_dietary = rare_values(&stats.dietary_counts, steps::DIETARY_MIN_COUNT);
        if !rare_dietary.is_empty() {
            report.push(format!(
                "Dietary Habits values collapsed in training are kept at serving: {}",
                rare_dietary.join(", ")
            ));
        }

        if let Some(mode) = &stats.sleep_mode {
            if mode != DEFAULT_SLEEP {
                report.push(format!(
                    "Unmapped Sleep Duration becomes '{}' at serving; training used mode '{}'",
                    DEFAULT_SLEEP, mode
                ));
            }
        }

        let rare_cities = rare_values(&stats.city_counts, steps::CITY_MIN_COUNT);
        if !rare_cities.is_empty() {
            report.push(format!(
                "{} City values collapsed to '{}' in training are kept at serving",
                rare_cities.len(),
                steps::OTHER
            ));
        }

        let rare_degrees = rare_values(&stats.degree_counts, steps::DEGREE_MIN_COUNT);
        if !rare_degrees.is_empty() {
            report.push(format!(
                "{} Degree values collapsed to '{}' in training are kept at serving",
                rare_degrees.len(),
                steps::OTHER
            ));
        }

        report
    }
}

fn rare_values(counts: &std::collections::BTreeMap<String, usize>, min_count: usize) -> Vec<String> {
    counts
        .iter()
        .filter(|(_, &count)| count < min_count)
        .map(|(value, _)| value.clone())
        .collect()
}
