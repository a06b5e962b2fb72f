//! Prediction server
//!
//! Serves the production model unit over a small REST API and reloads it
//! on request.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::ModelInfo;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::storage::{LocalObjectStore, ModelStore};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Key of the production model inside the store bucket
    pub model_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            model_key: crate::config::ModelStoreConfig::default().model_key,
        }
    }
}

impl ServerConfig {
    /// Environment defaults with the model key taken from a pipeline config
    pub fn from_pipeline(pipeline: &PipelineConfig) -> Self {
        Self {
            model_key: pipeline.model_store.model_key.clone(),
            ..Self::default()
        }
    }

    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig, pipeline: &PipelineConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    let store: Arc<dyn ModelStore> = Arc::new(LocalObjectStore::new(
        &pipeline.store_root,
        &pipeline.model_store.bucket_name,
    ));

    let state = Arc::new(AppState::new(config.clone(), store));
    if state.predictor.read().await.is_none() {
        warn!(key = %config.model_key, "Predictions return 503 until a model is published and reloaded");
    }
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        store_root = %pipeline.store_root.display(),
        bucket = %pipeline.model_store.bucket_name,
        started_at = %start_time.to_rfc3339(),
        "Prediction server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(uptime_secs = uptime.num_seconds(), "Shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
