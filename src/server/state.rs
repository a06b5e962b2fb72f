//! Application state management

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;
use crate::inference::Predictor;
use crate::storage::ModelStore;

use super::ServerConfig;

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn ModelStore>,
    /// Production predictor; `None` until a model has been published
    pub predictor: RwLock<Option<Predictor>>,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Build the state and try to load the production model once
    pub fn new(config: ServerConfig, store: Arc<dyn ModelStore>) -> Self {
        let predictor = match Predictor::from_store(store.as_ref(), &config.model_key) {
            Ok(predictor) => Some(predictor),
            Err(e) => {
                warn!(error = %e, "Starting without a production model");
                None
            }
        };
        Self::with_predictor(config, store, predictor)
    }

    pub fn with_predictor(config: ServerConfig, store: Arc<dyn ModelStore>, predictor: Option<Predictor>) -> Self {
        Self {
            config,
            store,
            predictor: RwLock::new(predictor),
            started_at: chrono::Utc::now(),
        }
    }

    /// Current predictor, cloned out of the lock
    pub async fn predictor(&self) -> Option<Predictor> {
        self.predictor.read().await.clone()
    }

    /// Download the production model again and swap it in
    pub async fn reload(&self) -> Result<Predictor> {
        let predictor = Predictor::from_store(self.store.as_ref(), &self.config.model_key)?;
        *self.predictor.write().await = Some(predictor.clone());
        info!(model_id = %predictor.model().id, "Production model reloaded");
        Ok(predictor)
    }
}
