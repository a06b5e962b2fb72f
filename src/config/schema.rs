//! Dataset schema document

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{MindscopeError, Result};
use crate::preprocessing::columns;

/// Declarative description of the raw survey dataset.
///
/// Loaded once per run and never mutated by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSpec {
    /// Every raw column, in dataset order; drives the column-count check
    pub columns: Vec<String>,
    /// Raw numerical columns that must be present
    pub numerical_columns: Vec<String>,
    /// Raw categorical columns that must be present
    pub categorical_columns: Vec<String>,
    /// Identifier columns removed before feature engineering
    pub drop_columns: Vec<String>,
    /// Label column
    pub target_column: String,
    /// Engineered numeric features passed through to the matrix
    pub num_features: Vec<String>,
    /// Engineered categorical features that get one-hot encoded
    pub categorical_features: Vec<String>,
}

impl Default for SchemaSpec {
    fn default() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        Self {
            columns: owned(&[
                columns::ID,
                columns::NAME,
                columns::GENDER,
                columns::AGE,
                columns::CITY,
                columns::STATUS,
                columns::PROFESSION,
                columns::ACADEMIC_PRESSURE,
                columns::WORK_PRESSURE,
                columns::CGPA,
                columns::STUDY_SATISFACTION,
                columns::JOB_SATISFACTION,
                columns::SLEEP_DURATION,
                columns::DIETARY_HABITS,
                columns::DEGREE,
                columns::SUICIDAL_THOUGHTS,
                columns::WORK_STUDY_HOURS,
                columns::FINANCIAL_STRESS,
                columns::FAMILY_HISTORY,
                columns::DEPRESSION,
            ]),
            numerical_columns: owned(&[
                columns::ID,
                columns::AGE,
                columns::ACADEMIC_PRESSURE,
                columns::WORK_PRESSURE,
                columns::CGPA,
                columns::STUDY_SATISFACTION,
                columns::JOB_SATISFACTION,
                columns::WORK_STUDY_HOURS,
                columns::FINANCIAL_STRESS,
                columns::DEPRESSION,
            ]),
            categorical_columns: owned(&[
                columns::NAME,
                columns::GENDER,
                columns::CITY,
                columns::STATUS,
                columns::PROFESSION,
                columns::SLEEP_DURATION,
                columns::DIETARY_HABITS,
                columns::DEGREE,
                columns::SUICIDAL_THOUGHTS,
                columns::FAMILY_HISTORY,
            ]),
            drop_columns: owned(&[columns::ID]),
            target_column: columns::DEPRESSION.to_string(),
            num_features: owned(&[
                columns::AGE,
                columns::CGPA,
                columns::WORK_STUDY_HOURS,
                columns::FINANCIAL_STRESS,
                columns::SATISFACTION,
                columns::PRESSURE,
            ]),
            categorical_features: owned(&[
                columns::GENDER,
                columns::CITY,
                columns::STATUS,
                columns::PROFESSION,
                columns::SLEEP_DURATION,
                columns::DIETARY_HABITS,
                columns::DEGREE,
                columns::SUICIDAL_THOUGHTS,
                columns::FAMILY_HISTORY,
            ]),
        }
    }
}

impl SchemaSpec {
    /// Load a schema document from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MindscopeError::ConfigError(format!("Failed to read schema {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a schema document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let schema: Self = serde_yaml::from_str(content)
            .map_err(|e| MindscopeError::ConfigError(format!("Invalid schema document: {}", e)))?;
        schema.check()?;
        Ok(schema)
    }

    fn check(&self) -> Result<()> {
        if self.target_column.is_empty() {
            return Err(MindscopeError::ConfigError(
                "Schema target_column must not be empty".to_string(),
            ));
        }
        if self.num_features.is_empty() && self.categorical_features.is_empty() {
            return Err(MindscopeError::ConfigError(
                "Schema declares no engineered features".to_string(),
            ));
        }
        Ok(())
    }
}
