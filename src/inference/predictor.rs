//! Risk predictor over the production model unit

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::record::MentalHealthRecord;
use super::serving::ServingTransformer;
use crate::error::{MindscopeError, Result};
use crate::storage::ModelStore;
use crate::training::ModelUnit;

pub const HIGH_RISK: &str = "High Risk";
pub const LOW_RISK: &str = "Low Risk";

/// Outcome returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPrediction {
    pub label: u8,
    pub risk: String,
    pub probability: f64,
}

impl RiskPrediction {
    fn from_label(label: f64, probability: f64) -> Self {
        let high = label >= 0.5;
        Self {
            label: u8::from(high),
            risk: if high { HIGH_RISK } else { LOW_RISK }.to_string(),
            probability,
        }
    }
}

/// Serves predictions from one loaded model unit. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Predictor {
    model: Arc<ModelUnit>,
    transformer: ServingTransformer,
}

impl Predictor {
    pub fn new(model: ModelUnit) -> Self {
        let transformer = ServingTransformer::new();
        for line in transformer.skew_report(model.transformer()) {
            warn!(model_id = %model.id, "Serving skew: {}", line);
        }
        Self {
            model: Arc::new(model),
            transformer,
        }
    }

    /// Load the production model from the store
    pub fn from_store(store: &dyn ModelStore, key: &str) -> Result<Self> {
        if !store.exists(key)? {
            return Err(MindscopeError::store(
                "load",
                key,
                format!("no production model in bucket '{}'", store.bucket()),
            ));
        }
        let model = ModelUnit::from_bytes(&store.download(key)?)?;
        info!(model_id = %model.id, key, "Loaded production model");
        Ok(Self::new(model))
    }

    pub fn model(&self) -> &Arc<ModelUnit> {
        &self.model
    }

    pub fn predict(&self, record: &MentalHealthRecord) -> Result<RiskPrediction> {
        let start = Instant::now();
        let row = self.transformer.transform_one(record)?;
        let predictions = self.model.predict_cleaned(&row)?;

        let (label, probability) = match (predictions.labels.first(), predictions.probabilities.first()) {
            (Some(&label), Some(&probability)) => (label, probability),
            _ => {
                return Err(MindscopeError::InferenceError(
                    "Model returned no prediction".to_string(),
                ))
            }
        };

        let prediction = RiskPrediction::from_label(label, probability);
        info!(
            risk = %prediction.risk,
            probability,
            latency_us = start.elapsed().as_micros() as u64,
            "Prediction served"
        );
        Ok(prediction)
    }
}
