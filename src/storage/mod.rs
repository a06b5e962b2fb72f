//! Blob store holding the production model unit
//!
//! Addressed by bucket + key. The local implementation maps a bucket to a
//! directory under a store root and keys to relative paths inside it.

use std::path::{Component, Path, PathBuf};
use tracing::info;

use crate::error::{MindscopeError, Result};

/// Bucket/key blob store
pub trait ModelStore: Send + Sync {
    fn bucket(&self) -> &str;

    /// Whether an object exists under `key`
    fn exists(&self, key: &str) -> Result<bool>;

    /// Upload a local file to `key`, replacing any previous object
    fn upload(&self, local_path: &Path, key: &str) -> Result<()>;

    /// Read the object stored under `key`
    fn download(&self, key: &str) -> Result<Vec<u8>>;
}

/// Object store on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    bucket: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Location of `key`; keys may not escape the bucket directory
    pub fn object_path(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(MindscopeError::store("resolve", key, "invalid object key"));
        }
        Ok(self.root.join(&self.bucket).join(relative))
    }
}

impl ModelStore for LocalObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.object_path(key)?.is_file())
    }

    fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        let target = self.object_path(key)?;
        let parent = target
            .parent()
            .ok_or_else(|| MindscopeError::store("upload", key, "object has no parent directory"))?;
        std::fs::create_dir_all(parent).map_err(|e| MindscopeError::store("upload", key, e))?;

        // Write next to the target, then rename over it
        let staging = target.with_extension("upload");
        std::fs::copy(local_path, &staging).map_err(|e| MindscopeError::store("upload", key, e))?;
        std::fs::rename(&staging, &target).map_err(|e| MindscopeError::store("upload", key, e))?;

        info!(bucket = %self.bucket, key, source = %local_path.display(), "Uploaded object");
        Ok(())
    }

    fn download(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key)?;
        std::fs::read(&path).map_err(|e| MindscopeError::store("download", key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_then_download() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("model.bin");
        std::fs::write(&local, b"first").unwrap();

        let store = LocalObjectStore::new(dir.path().join("store"), "models");
        assert!(!store.exists("registry/model.bin").unwrap());

        store.upload(&local, "registry/model.bin").unwrap();
        assert!(store.exists("registry/model.bin").unwrap());
        assert_eq!(store.download("registry/model.bin").unwrap(), b"first");

        std::fs::write(&local, b"second").unwrap();
        store.upload(&local, "registry/model.bin").unwrap();
        assert_eq!(store.download("registry/model.bin").unwrap(), b"second");
    }

    #[test]
    fn test_download_missing_is_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "models");
        let err = store.download("absent.bin").unwrap_err();
        assert!(matches!(err, MindscopeError::StoreError { .. }));
    }

    #[test]
    fn test_keys_cannot_escape_bucket() {
        let store = LocalObjectStore::new("/tmp/store", "models");
        assert!(store.object_path("../outside.bin").is_err());
        assert!(store.object_path("/etc/passwd").is_err());
        assert!(store.object_path("").is_err());
    }
}
