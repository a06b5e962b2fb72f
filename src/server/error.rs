//! Error types for the server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::MindscopeError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Pipeline(#[from] MindscopeError),
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ServerError::Pipeline(err) => match err.root_cause() {
                MindscopeError::InferenceError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                MindscopeError::FeatureNotFound(name) => {
                    (StatusCode::BAD_REQUEST, format!("Missing field: {}", name))
                }
                MindscopeError::StoreError { .. } => {
                    tracing::error!(error = %err, "Model store error");
                    (StatusCode::SERVICE_UNAVAILABLE, "Production model is unavailable".to_string())
                }
                _ => {
                    tracing::error!(error = %err, "Prediction failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed. Check server logs for details.".to_string())
                }
            },
        };

        let body = Json(json!({
            "error": true,
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
