//! Training pipeline orchestration

use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use super::state::{PipelineStage, PipelineState};
use crate::artifacts::{
    EvaluationArtifact, IngestionArtifact, PusherArtifact, TrainerArtifact, TransformationArtifact,
    ValidationArtifact,
};
use crate::config::{PipelineConfig, RunLayout, SchemaSpec};
use crate::data::{self, CsvCollectionSource, DataSource};
use crate::error::{MindscopeError, Result, StageContext};
use crate::evaluation::{ModelEvaluator, ModelPusher};
use crate::ingestion::DataIngestion;
use crate::preprocessing::{FeatureEngineer, FeatureMatrix, FittedTransformer};
use crate::storage::{LocalObjectStore, ModelStore};
use crate::training::{ModelTrainer, ModelUnit};
use crate::validation::SchemaValidator;

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub run_dir: PathBuf,
    pub state: PipelineState,
    pub ingestion: IngestionArtifact,
    pub validation: ValidationArtifact,
    pub transformation: TransformationArtifact,
    pub trainer: TrainerArtifact,
    pub evaluation: EvaluationArtifact,
    /// Present only when the challenger was promoted
    pub pusher: Option<PusherArtifact>,
}

/// Sequential training pipeline.
///
/// Owns the data source and model store handles and passes them to the
/// stages that need them. Any stage error aborts the run, tagged with the
/// stage it came from.
pub struct TrainPipeline {
    config: PipelineConfig,
    schema: SchemaSpec,
    source: Box<dyn DataSource>,
    store: Box<dyn ModelStore>,
}

impl TrainPipeline {
    /// Build the pipeline with filesystem-backed handles from a validated config
    pub fn from_config(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let schema = config.schema()?;
        let source_dir = config.source_dir.clone().ok_or_else(|| {
            MindscopeError::ConfigError("Raw data source directory not configured".to_string())
        })?;
        let source = CsvCollectionSource::new(source_dir);
        let store = LocalObjectStore::new(&config.store_root, &config.model_store.bucket_name);
        Ok(Self::with_handles(config, schema, Box::new(source), Box::new(store)))
    }

    pub fn with_handles(
        config: PipelineConfig,
        schema: SchemaSpec,
        source: Box<dyn DataSource>,
        store: Box<dyn ModelStore>,
    ) -> Self {
        Self {
            config,
            schema,
            source,
            store,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn ModelStore {
        self.store.as_ref()
    }

    /// Run every stage under a fresh timestamped artifact directory
    pub fn run(&self) -> Result<PipelineRun> {
        self.run_with_layout(self.config.run_layout(Local::now()))
    }

    pub fn run_with_layout(&self, layout: RunLayout) -> Result<PipelineRun> {
        let start = Instant::now();
        info!(run_dir = %layout.run_dir.display(), "Starting training pipeline");

        let ingestion = self.start_ingestion(&layout).in_stage(PipelineStage::Ingestion)?;
        let mut state = PipelineState::Ingested;

        let validation = self
            .start_validation(&ingestion, &layout)
            .in_stage(PipelineStage::Validation)?;
        state = state.advance(PipelineState::Validated)?;

        let transformation = self
            .start_transformation(&ingestion, &validation, &layout)
            .in_stage(PipelineStage::Transformation)?;
        state = state.advance(PipelineState::Transformed)?;

        let trainer = self
            .start_training(&transformation, &layout)
            .in_stage(PipelineStage::Training)?;
        state = state.advance(PipelineState::Trained)?;

        let evaluation = self
            .start_evaluation(&ingestion, &transformation, &trainer)
            .in_stage(PipelineStage::Evaluation)?;
        state = state.advance(PipelineState::Evaluated)?;

        let pusher = if evaluation.accepted {
            let pushed = self.start_pusher(&trainer).in_stage(PipelineStage::Pusher)?;
            state = state.advance(PipelineState::Promoted)?;
            Some(pushed)
        } else {
            info!(delta = evaluation.delta, "Challenger not better than production model");
            state = state.advance(PipelineState::Rejected)?;
            None
        };

        info!(
            state = %state,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training pipeline finished"
        );

        Ok(PipelineRun {
            run_dir: layout.run_dir,
            state,
            ingestion,
            validation,
            transformation,
            trainer,
            evaluation,
            pusher,
        })
    }

    fn start_ingestion(&self, layout: &RunLayout) -> Result<IngestionArtifact> {
        DataIngestion::new(self.config.ingestion.clone()).run(self.source.as_ref(), layout)
    }

    fn start_validation(&self, ingestion: &IngestionArtifact, layout: &RunLayout) -> Result<ValidationArtifact> {
        SchemaValidator::new(self.schema.clone()).run(ingestion, &layout.validation_report_file)
    }

    fn start_transformation(
        &self,
        ingestion: &IngestionArtifact,
        validation: &ValidationArtifact,
        layout: &RunLayout,
    ) -> Result<TransformationArtifact> {
        if !validation.status {
            return Err(MindscopeError::ValidationFailed(validation.message.clone()));
        }

        let train = data::read_csv(&ingestion.train_path)?;
        let test = data::read_csv(&ingestion.test_path)?;

        let engineer = FeatureEngineer::new(self.schema.clone());
        let (train_matrix, fitted) = engineer.fit_transform(&train)?;
        let test_matrix = FeatureEngineer::apply(&test, &fitted)?;

        fitted.save(&layout.transformer_file)?;
        train_matrix.save(&layout.train_matrix_file)?;
        test_matrix.save(&layout.test_matrix_file)?;

        Ok(TransformationArtifact {
            transformer_path: layout.transformer_file.clone(),
            train_matrix_path: layout.train_matrix_file.clone(),
            test_matrix_path: layout.test_matrix_file.clone(),
        })
    }

    fn start_training(&self, transformation: &TransformationArtifact, layout: &RunLayout) -> Result<TrainerArtifact> {
        let train = FeatureMatrix::load(&transformation.train_matrix_path)?;
        let test = FeatureMatrix::load(&transformation.test_matrix_path)?;
        let fitted = FittedTransformer::load(&transformation.transformer_path)?;

        let trainer = ModelTrainer::new(self.config.trainer.clone());
        let (unit, metrics) = trainer.train(&train, &test, fitted)?;
        unit.save(&layout.model_file)?;

        info!(model_id = %unit.id, path = %layout.model_file.display(), "Saved model unit");
        Ok(TrainerArtifact {
            model_path: layout.model_file.clone(),
            metrics,
        })
    }

    fn start_evaluation(
        &self,
        ingestion: &IngestionArtifact,
        transformation: &TransformationArtifact,
        trainer: &TrainerArtifact,
    ) -> Result<EvaluationArtifact> {
        let test_matrix = FeatureMatrix::load(&transformation.test_matrix_path)?;
        let raw_test = data::read_csv(&ingestion.test_path)?;

        ModelEvaluator::new(self.config.model_store.model_key.clone()).evaluate(
            trainer.metrics.test.f1_score,
            &test_matrix,
            &raw_test,
            self.store.as_ref(),
        )
    }

    fn start_pusher(&self, trainer: &TrainerArtifact) -> Result<PusherArtifact> {
        // refuse to publish a file that is not a readable model unit
        ModelUnit::load(&trainer.model_path)?;
        ModelPusher::new(self.config.model_store.clone()).publish(&trainer.model_path, self.store.as_ref())
    }
}
