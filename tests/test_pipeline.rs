//! Integration test: training pipeline end to end on a temporary workspace

mod common;

use mindscope::config::{PipelineConfig, RunLayout};
use mindscope::pipeline::{PipelineStage, PipelineState, TrainPipeline};
use mindscope::storage::{LocalObjectStore, ModelStore};
use mindscope::training::{ModelUnit, TrainerConfig};
use mindscope::MindscopeError;
use tempfile::TempDir;

fn workspace(rows: usize) -> (TempDir, PipelineConfig) {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source");
    std::fs::create_dir_all(&source).unwrap();
    common::write_collection(&source, "raw_data", &common::survey_table(rows));

    let config = PipelineConfig::new()
        .with_source_dir(&source)
        .with_artifact_root(dir.path().join("artifact"))
        .with_store_root(dir.path().join("store"))
        .with_trainer(TrainerConfig::default().with_n_estimators(30));
    (dir, config)
}

fn layout(dir: &TempDir, name: &str) -> RunLayout {
    RunLayout::new(dir.path().join("artifact").join(name))
}

#[test]
fn test_cold_start_promotes_challenger() {
    let (dir, config) = workspace(120);
    let pipeline = TrainPipeline::from_config(config.clone()).unwrap();

    let run = pipeline.run_with_layout(layout(&dir, "run1")).unwrap();

    assert_eq!(run.state, PipelineState::Promoted);
    assert!(run.validation.status);
    assert!(!run.evaluation.baseline_present);
    assert!(run.evaluation.accepted);
    assert!(run.trainer.metrics.train.accuracy >= 0.6);
    assert_eq!(run.trainer.metrics.test.n_samples, 24);

    for path in [
        &run.ingestion.feature_store_path,
        &run.ingestion.train_path,
        &run.ingestion.test_path,
        &run.validation.report_path,
        &run.transformation.transformer_path,
        &run.transformation.train_matrix_path,
        &run.transformation.test_matrix_path,
        &run.trainer.model_path,
    ] {
        assert!(path.is_file(), "missing artifact {}", path.display());
    }

    let pushed = run.pusher.unwrap();
    assert_eq!(pushed.published_path, "model-mindscope-mlops/model-registry/model.bin");

    let store = LocalObjectStore::new(&config.store_root, &config.model_store.bucket_name);
    assert!(store.exists(&config.model_store.model_key).unwrap());
    let published = ModelUnit::from_bytes(&store.download(&config.model_store.model_key).unwrap()).unwrap();
    let local = ModelUnit::load(&run.trainer.model_path).unwrap();
    assert_eq!(published.id, local.id);
}

#[test]
fn test_identical_rerun_is_rejected() {
    let (dir, config) = workspace(120);
    let pipeline = TrainPipeline::from_config(config.clone()).unwrap();

    let first = pipeline.run_with_layout(layout(&dir, "run1")).unwrap();
    assert_eq!(first.state, PipelineState::Promoted);

    let second = pipeline.run_with_layout(layout(&dir, "run2")).unwrap();
    assert_eq!(second.state, PipelineState::Rejected);
    assert!(second.evaluation.baseline_present);
    assert!(!second.evaluation.accepted);
    assert!(second.pusher.is_none());

    // production model is still the first run's unit
    let store = LocalObjectStore::new(&config.store_root, &config.model_store.bucket_name);
    let published = ModelUnit::from_bytes(&store.download(&config.model_store.model_key).unwrap()).unwrap();
    let first_unit = ModelUnit::load(&first.trainer.model_path).unwrap();
    assert_eq!(published.id, first_unit.id);
}

#[test]
fn test_validation_failure_stops_before_transformation() {
    let (dir, config) = workspace(50);
    let source = config.source_dir.clone().unwrap();
    let table = common::survey_table(50).drop("Degree").unwrap();
    common::write_collection(&source, "raw_data", &table);

    let pipeline = TrainPipeline::from_config(config).unwrap();
    let run_layout = layout(&dir, "run1");
    let err = pipeline.run_with_layout(run_layout.clone()).unwrap_err();

    assert_eq!(err.stage(), Some(PipelineStage::Transformation));
    match err.root_cause() {
        MindscopeError::ValidationFailed(message) => assert!(message.contains("Degree")),
        other => panic!("unexpected error: {}", other),
    }
    assert!(run_layout.validation_report_file.is_file());
    assert!(!run_layout.transformer_file.exists());
}

#[test]
fn test_missing_collection_fails_in_ingestion() {
    let (dir, config) = workspace(10);
    let mut config = config;
    config.ingestion.collection_name = "absent".to_string();

    let pipeline = TrainPipeline::from_config(config).unwrap();
    let err = pipeline.run_with_layout(layout(&dir, "run1")).unwrap_err();
    assert_eq!(err.stage(), Some(PipelineStage::Ingestion));
}

#[test]
fn test_missing_source_dir_is_config_error() {
    let err = TrainPipeline::from_config(PipelineConfig::new()).err().unwrap();
    assert!(matches!(err, MindscopeError::ConfigError(_)));
}
