//! Model trainer: fit, gate on training accuracy, report held-out metrics

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use super::gradient_boosting::{GradientBoostingClassifier, GradientBoostingConfig};
use super::metrics::{ClassificationMetrics, ModelMetrics};
use super::unit::ModelUnit;
use crate::error::{MindscopeError, Result};
use crate::preprocessing::{FeatureMatrix, FittedTransformer};

/// Trainer configuration, loadable from a YAML model config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Minimum accuracy on the training data; below it the run aborts
    pub expected_score: f64,
    pub boosting: GradientBoostingConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            expected_score: 0.6,
            boosting: GradientBoostingConfig::default(),
        }
    }
}

impl TrainerConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            MindscopeError::ConfigError(format!("Failed to read model config {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| MindscopeError::ConfigError(format!("Invalid model config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.expected_score) {
            return Err(MindscopeError::ConfigError(format!(
                "trainer.expected_score must be in [0, 1], got {}",
                self.expected_score
            )));
        }
        self.boosting.validate()
    }

    /// Builder method to set the minimum training accuracy
    pub fn with_expected_score(mut self, score: f64) -> Self {
        self.expected_score = score;
        self
    }

    /// Builder method to set the number of boosting rounds
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.boosting.n_estimators = n;
        self
    }
}

/// Fits the boosted classifier and bundles it with its fitted transformer
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train on `train`, evaluate on `test`, return the model unit and its metrics
    pub fn train(
        &self,
        train: &FeatureMatrix,
        test: &FeatureMatrix,
        transformer: FittedTransformer,
    ) -> Result<(ModelUnit, ModelMetrics)> {
        if train.feature_names != test.feature_names {
            return Err(MindscopeError::ShapeError {
                expected: format!("{} features in training order", train.n_features()),
                actual: format!("{} test features", test.n_features()),
            });
        }

        let start = Instant::now();
        let x_train = train.features().to_owned();
        let y_train = train.require_target()?;

        let mut classifier = GradientBoostingClassifier::new(self.config.boosting.clone());
        classifier.fit(&x_train, &y_train)?;

        let train_metrics = ClassificationMetrics::compute(&y_train, &classifier.predict(&x_train)?);
        if train_metrics.accuracy < self.config.expected_score {
            warn!(
                accuracy = train_metrics.accuracy,
                expected = self.config.expected_score,
                "Trained model is below the expected score"
            );
            return Err(MindscopeError::BelowExpectedScore {
                score: train_metrics.accuracy,
                expected: self.config.expected_score,
            });
        }

        let y_test = test.require_target()?;
        let test_predictions = classifier.predict(&test.features().to_owned())?;
        let test_metrics = ClassificationMetrics::compute(&y_test, &test_predictions);

        let metrics = ModelMetrics {
            train: train_metrics,
            test: test_metrics,
        };

        info!(
            n_estimators = self.config.boosting.n_estimators,
            train_accuracy = train_metrics.accuracy,
            test_accuracy = test_metrics.accuracy,
            test_precision = test_metrics.precision,
            test_recall = test_metrics.recall,
            test_f1 = test_metrics.f1_score,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Model trained"
        );

        let unit = ModelUnit::new(transformer, classifier, metrics)?;
        Ok((unit, metrics))
    }
}
