//! Pipeline configuration
//!
//! Configuration is layered: built-in defaults, then an optional YAML file,
//! then environment variables. Required values that are still missing after
//! layering are reported as [`MindscopeError::ConfigError`] before any stage
//! runs.

mod schema;

pub use schema::SchemaSpec;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MindscopeError, Result};
use crate::training::TrainerConfig;

pub const ENV_SOURCE_DIR: &str = "MINDSCOPE_SOURCE_DIR";
pub const ENV_ARTIFACT_DIR: &str = "MINDSCOPE_ARTIFACT_DIR";
pub const ENV_STORE_DIR: &str = "MINDSCOPE_STORE_DIR";
pub const ENV_MODEL_BUCKET: &str = "MINDSCOPE_MODEL_BUCKET";
pub const ENV_MODEL_KEY: &str = "MINDSCOPE_MODEL_KEY";

/// Data ingestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Collection fetched from the raw data source
    pub collection_name: String,
    /// Fraction of rows held out as the test partition
    pub test_ratio: f64,
    /// Seed for the train/test shuffle
    pub random_seed: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            collection_name: "raw_data".to_string(),
            test_ratio: 0.2,
            random_seed: 42,
        }
    }
}

/// Production model slot in the blob store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelStoreConfig {
    pub bucket_name: String,
    pub model_key: String,
}

impl Default for ModelStoreConfig {
    fn default() -> Self {
        Self {
            bucket_name: "model-mindscope-mlops".to_string(),
            model_key: "model-registry/model.bin".to_string(),
        }
    }
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding `<collection>.csv` exports of the raw data source
    pub source_dir: Option<PathBuf>,
    /// Root under which each run creates a timestamped artifact directory
    pub artifact_root: PathBuf,
    /// Root of the local object store (one sub-directory per bucket)
    pub store_root: PathBuf,
    /// Optional schema document; the built-in survey schema is used otherwise
    pub schema_path: Option<PathBuf>,
    pub ingestion: IngestionConfig,
    pub model_store: ModelStoreConfig,
    pub trainer: TrainerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            artifact_root: PathBuf::from("artifact"),
            store_root: PathBuf::from("model-store"),
            schema_path: None,
            ingestion: IngestionConfig::default(),
            model_store: ModelStoreConfig::default(),
            trainer: TrainerConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration: YAML file (if given), then environment overrides,
    /// then validation of required values.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = Self::resolve(config_path)?;
        config.validate()?;
        Ok(config)
    }

    /// File and environment values without validation; used by the serving
    /// commands, which never read the raw data source
    pub fn resolve(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Parse a YAML configuration file without applying the environment
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MindscopeError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| MindscopeError::ConfigError(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Apply `MINDSCOPE_*` environment variables on top of the current values
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(ENV_SOURCE_DIR) {
            self.source_dir = Some(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var(ENV_ARTIFACT_DIR) {
            self.artifact_root = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var(ENV_STORE_DIR) {
            self.store_root = PathBuf::from(dir);
        }
        if let Ok(bucket) = std::env::var(ENV_MODEL_BUCKET) {
            self.model_store.bucket_name = bucket;
        }
        if let Ok(key) = std::env::var(ENV_MODEL_KEY) {
            self.model_store.model_key = key;
        }
        self
    }

    /// Check required values and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.source_dir.is_none() {
            return Err(MindscopeError::ConfigError(format!(
                "Raw data source directory not configured. Set {} or source_dir in the config file.",
                ENV_SOURCE_DIR
            )));
        }
        let ratio = self.ingestion.test_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(MindscopeError::ConfigError(format!(
                "ingestion.test_ratio must be in (0, 1), got {}",
                ratio
            )));
        }
        if self.model_store.bucket_name.is_empty() || self.model_store.model_key.is_empty() {
            return Err(MindscopeError::ConfigError(
                "model_store.bucket_name and model_store.model_key are required".to_string(),
            ));
        }
        self.trainer.validate()
    }

    /// Builder method to set the raw data source directory
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    /// Builder method to set the artifact root
    pub fn with_artifact_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_root = dir.into();
        self
    }

    /// Builder method to set the object store root
    pub fn with_store_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_root = dir.into();
        self
    }

    /// Builder method to set the trainer configuration
    pub fn with_trainer(mut self, trainer: TrainerConfig) -> Self {
        self.trainer = trainer;
        self
    }

    /// Resolve the schema: the configured document or the built-in survey schema
    pub fn schema(&self) -> Result<SchemaSpec> {
        match &self.schema_path {
            Some(path) => SchemaSpec::from_yaml_file(path),
            None => Ok(SchemaSpec::default()),
        }
    }

    /// Directory layout of one run, rooted at a timestamped directory
    pub fn run_layout(&self, started_at: DateTime<Local>) -> RunLayout {
        let stamp = started_at.format("%m_%d_%Y_%H_%M_%S").to_string();
        RunLayout::new(self.artifact_root.join(stamp))
    }
}

/// Paths of every artifact written by one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    pub run_dir: PathBuf,
    pub feature_store_file: PathBuf,
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub validation_report_file: PathBuf,
    pub transformer_file: PathBuf,
    pub train_matrix_file: PathBuf,
    pub test_matrix_file: PathBuf,
    pub model_file: PathBuf,
}

impl RunLayout {
    pub fn new(run_dir: PathBuf) -> Self {
        let ingestion = run_dir.join("data_ingestion");
        let transformation = run_dir.join("data_transformation");
        Self {
            feature_store_file: ingestion.join("feature_store").join("data.csv"),
            train_file: ingestion.join("ingested").join("train.csv"),
            test_file: ingestion.join("ingested").join("test.csv"),
            validation_report_file: run_dir.join("data_validation").join("report.yaml"),
            transformer_file: transformation.join("transformed_object").join("transformer.bin"),
            train_matrix_file: transformation.join("transformed").join("train.bin"),
            test_matrix_file: transformation.join("transformed").join("test.bin"),
            model_file: run_dir.join("model_trainer").join("trained_model").join("model.bin"),
            run_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_requires_source() {
        let config = PipelineConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MindscopeError::ConfigError(_)));
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_source_dir("/data/raw")
            .with_artifact_root("/tmp/artifacts");

        assert_eq!(config.source_dir, Some(PathBuf::from("/data/raw")));
        assert_eq!(config.artifact_root, PathBuf::from("/tmp/artifacts"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_sections() {
        let yaml = r#"
source_dir: /data/raw
ingestion:
  test_ratio: 0.25
trainer:
  expected_score: 0.7
  boosting:
    n_estimators: 50
"#;
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.ingestion.test_ratio, 0.25);
        assert_eq!(config.ingestion.collection_name, "raw_data");
        assert_eq!(config.trainer.expected_score, 0.7);
        assert_eq!(config.trainer.boosting.n_estimators, 50);
        assert_eq!(config.trainer.boosting.learning_rate, 0.1);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let mut config = PipelineConfig::new().with_source_dir("/data/raw");
        config.ingestion.test_ratio = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_run_layout_is_timestamped() {
        let config = PipelineConfig::new().with_artifact_root("artifact");
        let started = chrono::TimeZone::with_ymd_and_hms(&Local, 2026, 3, 4, 5, 6, 7).unwrap();
        let layout = config.run_layout(started);

        assert_eq!(layout.run_dir, PathBuf::from("artifact/03_04_2026_05_06_07"));
        assert!(layout.train_file.ends_with("data_ingestion/ingested/train.csv"));
        assert!(layout.validation_report_file.ends_with("data_validation/report.yaml"));
    }
}
