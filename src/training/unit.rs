//! Model unit: fitted transformer and classifier stored and promoted together

use chrono::{DateTime, Utc};
use ndarray::Array1;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

use super::gradient_boosting::GradientBoostingClassifier;
use super::metrics::{ClassificationMetrics, ModelMetrics};
use crate::error::{MindscopeError, Result};
use crate::preprocessing::{FeatureMatrix, FittedTransformer};

/// Class probabilities and labels for a batch of rows
#[derive(Debug, Clone, PartialEq)]
pub struct Predictions {
    pub labels: Array1<f64>,
    pub probabilities: Array1<f64>,
}

/// The paired (fitted transformer, trained classifier)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUnit {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub metrics: ModelMetrics,
    transformer: FittedTransformer,
    classifier: GradientBoostingClassifier,
}

impl ModelUnit {
    pub fn new(
        transformer: FittedTransformer,
        classifier: GradientBoostingClassifier,
        metrics: ModelMetrics,
    ) -> Result<Self> {
        if transformer.n_features() != classifier.n_features() {
            return Err(MindscopeError::ShapeError {
                expected: format!("{} transformer features", transformer.n_features()),
                actual: format!("{} classifier features", classifier.n_features()),
            });
        }
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            metrics,
            transformer,
            classifier,
        })
    }

    pub fn transformer(&self) -> &FittedTransformer {
        &self.transformer
    }

    pub fn classifier(&self) -> &GradientBoostingClassifier {
        &self.classifier
    }

    pub fn feature_names(&self) -> Vec<String> {
        self.transformer.feature_names()
    }

    /// Whether a matrix was produced with the same feature layout as this unit
    pub fn accepts_layout(&self, matrix: &FeatureMatrix) -> bool {
        matrix.feature_names == self.transformer.feature_names()
    }

    /// Predict raw survey rows through the full fitted transformer
    pub fn predict(&self, table: &DataFrame) -> Result<Predictions> {
        let cleaned = self.transformer.clean(table)?;
        self.predict_cleaned(&cleaned)
    }

    /// Predict rows that already went through the cleaning steps
    pub fn predict_cleaned(&self, cleaned: &DataFrame) -> Result<Predictions> {
        let features = self.transformer.encode(cleaned)?;
        self.predict_matrix(&features)
    }

    /// Predict an encoded feature matrix
    pub fn predict_matrix(&self, features: &ndarray::Array2<f64>) -> Result<Predictions> {
        let probabilities = self.classifier.predict_proba(features)?;
        let labels = probabilities.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 });
        Ok(Predictions {
            labels,
            probabilities,
        })
    }

    /// Score a matrix that carries a target and shares this unit's feature layout
    pub fn score(&self, matrix: &FeatureMatrix) -> Result<ClassificationMetrics> {
        if !self.accepts_layout(matrix) {
            return Err(MindscopeError::ShapeError {
                expected: format!("{} features in model order", self.transformer.n_features()),
                actual: format!("{} features", matrix.n_features()),
            });
        }
        let y = matrix.require_target()?;
        let predictions = self.predict_matrix(&matrix.features().to_owned())?;
        Ok(ClassificationMetrics::compute(&y, &predictions.labels))
    }

    /// Score raw rows that include the target column
    pub fn score_table(&self, table: &DataFrame) -> Result<ClassificationMetrics> {
        let matrix = self.transformer.transform(table)?;
        self.score(&matrix)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&std::fs::read(path)?)
    }
}
