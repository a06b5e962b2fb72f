//! Stage artifacts
//!
//! Each stage produces exactly one artifact describing what it wrote; the
//! next stage reads its inputs from those paths only.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::training::ModelMetrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionArtifact {
    /// Full snapshot of the raw collection
    pub feature_store_path: PathBuf,
    pub train_path: PathBuf,
    pub test_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationArtifact {
    pub status: bool,
    pub message: String,
    pub report_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformationArtifact {
    pub transformer_path: PathBuf,
    pub train_matrix_path: PathBuf,
    pub test_matrix_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerArtifact {
    pub model_path: PathBuf,
    pub metrics: ModelMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationArtifact {
    pub accepted: bool,
    /// Whether a production model existed when the run was evaluated
    pub baseline_present: bool,
    pub baseline_score: f64,
    pub challenger_score: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PusherArtifact {
    pub bucket: String,
    pub key: String,
    pub published_path: String,
}

/// Validation report persisted as YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub validation_status: bool,
    pub message: String,
}
