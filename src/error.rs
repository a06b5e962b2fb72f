//! Error types for the mindscope pipeline

use crate::pipeline::PipelineStage;
use thiserror::Error;

/// Result type alias for mindscope operations
pub type Result<T> = std::result::Result<T, MindscopeError>;

/// Main error type for the pipeline, the feature engineer and the serving path
#[derive(Error, Debug)]
pub enum MindscopeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),

    /// The schema validation report of the run marked the data as invalid
    #[error("Data validation failed: {0}")]
    ValidationFailed(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Target column '{0}' missing from training table")]
    MissingTarget(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Model accuracy {score:.4} on training data is below expected score {expected:.4}")]
    BelowExpectedScore { score: f64, expected: f64 },

    #[error("Model store error during {operation} of '{key}': {reason}")]
    StoreError {
        operation: String,
        key: String,
        reason: String,
    },

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<MindscopeError>,
    },
}

impl MindscopeError {
    /// Stage in which the error was raised, if it crossed a stage boundary
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            MindscopeError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Innermost error, with stage wrappers removed
    pub fn root_cause(&self) -> &MindscopeError {
        match self {
            MindscopeError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn store(operation: &str, key: &str, reason: impl ToString) -> Self {
        MindscopeError::StoreError {
            operation: operation.to_string(),
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Attach the originating pipeline stage to an error
pub trait StageContext<T> {
    fn in_stage(self, stage: PipelineStage) -> Result<T>;
}

impl<T> StageContext<T> for Result<T> {
    fn in_stage(self, stage: PipelineStage) -> Result<T> {
        self.map_err(|err| match err {
            already @ MindscopeError::Stage { .. } => already,
            other => MindscopeError::Stage {
                stage,
                source: Box::new(other),
            },
        })
    }
}

impl From<polars::error::PolarsError> for MindscopeError {
    fn from(err: polars::error::PolarsError) -> Self {
        MindscopeError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for MindscopeError {
    fn from(err: serde_json::Error) -> Self {
        MindscopeError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for MindscopeError {
    fn from(err: serde_yaml::Error) -> Self {
        MindscopeError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for MindscopeError {
    fn from(err: bincode::Error) -> Self {
        MindscopeError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for MindscopeError {
    fn from(err: ndarray::ShapeError) -> Self {
        MindscopeError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
