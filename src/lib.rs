//! mindscope - mental-health risk pipeline
//!
//! This crate trains, evaluates, promotes and serves a depression-risk
//! classifier built on a survey dataset:
//! - Ingestion of the raw survey collection and a seeded train/test split
//! - Schema validation with a persisted YAML report
//! - Feature engineering with statistics learned on training data only
//! - Gradient-boosted classifier and the paired model unit
//! - Champion/challenger evaluation and promotion to a model store
//! - Serving-time cleaning and prediction for single records
//!
//! # Modules
//!
//! ## Pipeline
//! - [`ingestion`] - Collection snapshot and train/test split
//! - [`validation`] - Schema checks on both partitions
//! - [`preprocessing`] - Feature engineer and fitted transformer
//! - [`training`] - Boosted trees, metrics and the model unit
//! - [`evaluation`] - Champion/challenger decision and promotion
//! - [`pipeline`] - Stage orchestration and the run state machine
//!
//! ## Serving
//! - [`inference`] - Typed request records, serving transformer, predictor
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface
//!
//! ## Infrastructure
//! - [`config`] - Pipeline configuration and the dataset schema
//! - [`data`] - CSV snapshots and the raw data source
//! - [`storage`] - Model store

// Core error handling
pub mod error;

pub mod artifacts;
pub mod config;
pub mod data;
pub mod storage;

// Pipeline stages
pub mod ingestion;
pub mod validation;
pub mod preprocessing;
pub mod training;
pub mod evaluation;
pub mod pipeline;

// Serving
pub mod inference;

// Services
pub mod server;
pub mod cli;

pub use error::{MindscopeError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{MindscopeError, Result, StageContext};

    pub use crate::config::{PipelineConfig, SchemaSpec};
    pub use crate::data::{CsvCollectionSource, DataSource};
    pub use crate::storage::{LocalObjectStore, ModelStore};

    pub use crate::preprocessing::{FeatureEngineer, FeatureMatrix, FittedTransformer};
    pub use crate::training::{ModelMetrics, ModelTrainer, ModelUnit, TrainerConfig};
    pub use crate::evaluation::{ModelEvaluator, ModelPusher};
    pub use crate::pipeline::{PipelineRun, PipelineStage, PipelineState, TrainPipeline};

    pub use crate::inference::{MentalHealthRecord, Predictor, RiskPrediction, ServingTransformer};
}
