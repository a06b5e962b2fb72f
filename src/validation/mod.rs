//! Schema validation of the ingested partitions
//!
//! Validation never fails the run by itself: problems are accumulated into
//! the report message and the transformation stage refuses to start on a
//! failed report.

use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{info, warn};

use crate::artifacts::{IngestionArtifact, ValidationArtifact, ValidationReport};
use crate::config::SchemaSpec;
use crate::data;
use crate::error::Result;
use crate::preprocessing::frame;

/// Checks column count and presence of the declared columns
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: SchemaSpec,
}

impl SchemaValidator {
    pub fn new(schema: SchemaSpec) -> Self {
        Self { schema }
    }

    /// Whether the table has exactly as many columns as the schema lists
    pub fn has_expected_column_count(&self, df: &DataFrame) -> bool {
        df.width() == self.schema.columns.len()
    }

    /// Declared numerical and categorical columns absent from the table
    pub fn missing_columns(&self, df: &DataFrame) -> (Vec<String>, Vec<String>) {
        let missing = |names: &[String]| -> Vec<String> {
            names
                .iter()
                .filter(|name| !frame::has_column(df, name))
                .cloned()
                .collect()
        };
        (
            missing(&self.schema.numerical_columns),
            missing(&self.schema.categorical_columns),
        )
    }

    /// Problems found in one partition, one sentence each
    pub fn table_problems(&self, df: &DataFrame, partition: &str) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.has_expected_column_count(df) {
            problems.push(format!(
                "{} dataframe has {} columns, expected {}.",
                partition,
                df.width(),
                self.schema.columns.len()
            ));
        }

        let (numerical, categorical) = self.missing_columns(df);
        if !numerical.is_empty() {
            problems.push(format!(
                "{} dataframe is missing numerical columns: {}.",
                partition,
                numerical.join(", ")
            ));
        }
        if !categorical.is_empty() {
            problems.push(format!(
                "{} dataframe is missing categorical columns: {}.",
                partition,
                categorical.join(", ")
            ));
        }

        problems
    }

    /// Validate both partitions; the status is true iff the message is empty
    pub fn validate(&self, train: &DataFrame, test: &DataFrame) -> ValidationReport {
        let mut problems = self.table_problems(train, "Training");
        problems.extend(self.table_problems(test, "Test"));

        let message = problems.join(" ");
        ValidationReport {
            validation_status: message.is_empty(),
            message,
        }
    }

    /// Read the ingested partitions, validate them and write the YAML report
    pub fn run(&self, ingestion: &IngestionArtifact, report_path: &Path) -> Result<ValidationArtifact> {
        let train = data::read_csv(&ingestion.train_path)?;
        let test = data::read_csv(&ingestion.test_path)?;

        let report = self.validate(&train, &test);

        if let Some(parent) = report_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(report_path, serde_yaml::to_string(&report)?)?;

        if report.validation_status {
            info!(report = %report_path.display(), "Data validation passed");
        } else {
            warn!(message = %report.message, report = %report_path.display(), "Data validation failed");
        }

        Ok(ValidationArtifact {
            status: report.validation_status,
            message: report.message,
            report_path: report_path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn schema() -> SchemaSpec {
        SchemaSpec {
            columns: vec!["id".into(), "Age".into(), "City".into()],
            numerical_columns: vec!["id".into(), "Age".into()],
            categorical_columns: vec!["City".into()],
            ..SchemaSpec::default()
        }
    }

    #[test]
    fn test_valid_tables_pass() {
        let df = df!("id" => &[1i64], "Age" => &[20.0], "City" => &["Pune"]).unwrap();
        let report = SchemaValidator::new(schema()).validate(&df, &df);
        assert!(report.validation_status);
        assert!(report.message.is_empty());
    }

    #[test]
    fn test_problems_accumulate() {
        let good = df!("id" => &[1i64], "Age" => &[20.0], "City" => &["Pune"]).unwrap();
        let bad = df!("id" => &[1i64], "Age" => &[20.0]).unwrap();

        let report = SchemaValidator::new(schema()).validate(&good, &bad);
        assert!(!report.validation_status);
        assert!(report.message.contains("Test dataframe has 2 columns, expected 3."));
        assert!(report.message.contains("missing categorical columns: City"));
        assert!(!report.message.contains("Training"));
    }

    #[test]
    fn test_run_writes_yaml_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = df!("id" => &[1i64], "Age" => &[20.0], "City" => &["Pune"]).unwrap();
        let train_path = dir.path().join("train.csv");
        let test_path = dir.path().join("test.csv");
        data::write_csv(&df, &train_path).unwrap();
        df = df.drop("City").unwrap();
        data::write_csv(&df, &test_path).unwrap();

        let ingestion = IngestionArtifact {
            feature_store_path: dir.path().join("data.csv"),
            train_path,
            test_path,
        };
        let report_path = dir.path().join("data_validation").join("report.yaml");
        let artifact = SchemaValidator::new(schema()).run(&ingestion, &report_path).unwrap();

        assert!(!artifact.status);
        let written: ValidationReport =
            serde_yaml::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert!(!written.validation_status);
        assert_eq!(written.message, artifact.message);
    }
}
