//! Challenger vs. production comparison

use polars::prelude::DataFrame;
use tracing::{info, warn};

use crate::artifacts::EvaluationArtifact;
use crate::error::Result;
use crate::preprocessing::FeatureMatrix;
use crate::storage::ModelStore;
use crate::training::ModelUnit;

/// Accept the challenger iff its F1 strictly beats the baseline; an absent
/// baseline scores 0
pub fn decide(challenger_score: f64, baseline_score: Option<f64>) -> EvaluationArtifact {
    let baseline = baseline_score.unwrap_or(0.0);
    EvaluationArtifact {
        accepted: challenger_score > baseline,
        baseline_present: baseline_score.is_some(),
        baseline_score: baseline,
        challenger_score,
        delta: challenger_score - baseline,
    }
}

/// Scores the production model on the run's test data
#[derive(Debug, Clone)]
pub struct ModelEvaluator {
    model_key: String,
}

impl ModelEvaluator {
    pub fn new(model_key: impl Into<String>) -> Self {
        Self {
            model_key: model_key.into(),
        }
    }

    /// Production model, or `None` on cold start
    pub fn load_baseline(&self, store: &dyn ModelStore) -> Result<Option<ModelUnit>> {
        if !store.exists(&self.model_key)? {
            return Ok(None);
        }
        let bytes = store.download(&self.model_key)?;
        Ok(Some(ModelUnit::from_bytes(&bytes)?))
    }

    /// F1 of `baseline` on this run's test data.
    ///
    /// Uses the engineered test matrix when the feature layouts agree;
    /// otherwise re-engineers the raw test partition through the baseline's
    /// own fitted transformer.
    pub fn score_baseline(
        &self,
        baseline: &ModelUnit,
        test_matrix: &FeatureMatrix,
        raw_test: &DataFrame,
    ) -> Result<f64> {
        if baseline.accepts_layout(test_matrix) {
            return Ok(baseline.score(test_matrix)?.f1_score);
        }

        warn!(
            baseline_id = %baseline.id,
            baseline_features = baseline.transformer().n_features(),
            challenger_features = test_matrix.n_features(),
            "Feature layout changed since the production model was trained; re-scoring raw test data"
        );
        Ok(baseline.score_table(raw_test)?.f1_score)
    }

    pub fn evaluate(
        &self,
        challenger_score: f64,
        test_matrix: &FeatureMatrix,
        raw_test: &DataFrame,
        store: &dyn ModelStore,
    ) -> Result<EvaluationArtifact> {
        let baseline_score = match self.load_baseline(store)? {
            Some(baseline) => Some(self.score_baseline(&baseline, test_matrix, raw_test)?),
            None => {
                info!(bucket = store.bucket(), key = %self.model_key, "No production model found");
                None
            }
        };

        let artifact = decide(challenger_score, baseline_score);
        info!(
            accepted = artifact.accepted,
            baseline_present = artifact.baseline_present,
            baseline_f1 = artifact.baseline_score,
            challenger_f1 = artifact.challenger_score,
            delta = artifact.delta,
            "Model evaluation complete"
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_scores_rejected() {
        let result = decide(0.70, Some(0.70));
        assert!(!result.accepted);
        assert_eq!(result.delta, 0.0);
    }

    #[test]
    fn test_better_challenger_accepted() {
        let result = decide(0.71, Some(0.70));
        assert!(result.accepted);
        assert!((result.delta - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_cold_start() {
        let result = decide(0.4, None);
        assert!(result.accepted);
        assert!(!result.baseline_present);
        assert_eq!(result.baseline_score, 0.0);

        assert!(!decide(0.0, None).accepted);
    }
}
