//! HTTP request handlers

use std::sync::Arc;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::inference::{MentalHealthRecord, Predictor, RiskPrediction};
use crate::training::ModelMetrics;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Summary of the loaded production model
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub created_at: String,
    pub fitted_at: String,
    pub n_features: usize,
    pub metrics: ModelMetrics,
    pub bucket: String,
    pub key: String,
}

impl ModelInfo {
    fn describe(predictor: &Predictor, state: &AppState) -> Self {
        let model = predictor.model();
        Self {
            id: model.id.to_string(),
            created_at: model.created_at.to_rfc3339(),
            fitted_at: model.transformer().fitted_at().to_rfc3339(),
            n_features: model.transformer().n_features(),
            metrics: model.metrics,
            bucket: state.store.bucket().to_string(),
            key: state.config.model_key.clone(),
        }
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let model_loaded = state.predictor.read().await.is_some();
    let uptime = chrono::Utc::now().signed_duration_since(state.started_at);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "model_loaded": model_loaded,
        "uptime_secs": uptime.num_seconds(),
    }))
}

/// Score one survey record
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MentalHealthRecord>, JsonRejection>,
) -> Result<Json<RiskPrediction>> {
    let Json(record) = payload?;
    let predictor = state
        .predictor()
        .await
        .ok_or_else(|| ServerError::Unavailable("No production model loaded".to_string()))?;

    let prediction = predictor.predict(&record)?;
    Ok(Json(prediction))
}

pub async fn get_model(State(state): State<Arc<AppState>>) -> Result<Json<ModelInfo>> {
    let predictor = state
        .predictor()
        .await
        .ok_or_else(|| ServerError::Unavailable("No production model loaded".to_string()))?;
    Ok(Json(ModelInfo::describe(&predictor, &state)))
}

/// Swap in the model currently published under the configured key
pub async fn reload_model(State(state): State<Arc<AppState>>) -> Result<Json<ModelInfo>> {
    let predictor = state.reload().await?;
    info!(model_id = %predictor.model().id, "Reload requested through the API");
    Ok(Json(ModelInfo::describe(&predictor, &state)))
}
