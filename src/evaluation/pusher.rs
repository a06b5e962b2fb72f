//! Publishing an accepted model unit

use std::path::Path;
use tracing::info;

use crate::artifacts::PusherArtifact;
use crate::config::ModelStoreConfig;
use crate::error::Result;
use crate::storage::ModelStore;

/// Uploads the model unit file to the production key, overwriting the previous one
#[derive(Debug, Clone)]
pub struct ModelPusher {
    config: ModelStoreConfig,
}

impl ModelPusher {
    pub fn new(config: ModelStoreConfig) -> Self {
        Self { config }
    }

    pub fn publish(&self, model_path: &Path, store: &dyn ModelStore) -> Result<PusherArtifact> {
        store.upload(model_path, &self.config.model_key)?;

        let artifact = PusherArtifact {
            bucket: store.bucket().to_string(),
            key: self.config.model_key.clone(),
            published_path: format!("{}/{}", store.bucket(), self.config.model_key),
        };
        info!(published = %artifact.published_path, "Model promoted to production");
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalObjectStore;

    #[test]
    fn test_publish_overwrites_slot() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("model.bin");
        std::fs::write(&model, b"v1").unwrap();

        let config = ModelStoreConfig::default();
        let store = LocalObjectStore::new(dir.path().join("store"), &config.bucket_name);
        let pusher = ModelPusher::new(config.clone());

        let artifact = pusher.publish(&model, &store).unwrap();
        assert_eq!(artifact.published_path, "model-mindscope-mlops/model-registry/model.bin");

        std::fs::write(&model, b"v2").unwrap();
        pusher.publish(&model, &store).unwrap();
        assert_eq!(store.download(&config.model_key).unwrap(), b"v2");
    }
}
