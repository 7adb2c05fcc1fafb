use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use super::{ArtifactStore, StorageError};
use crate::types::constant::{INPUTS_DIR, RESULTS_DIR};

const HEALTH_CHECK_FILE: &str = ".scorer-health-check";

/// Artifact store on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn ensure_parent(path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| StorageError::io(parent, e))?;
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl ArtifactStore for LocalFileStore {
    async fn put_data(&self, data: Bytes, path: &Path) -> Result<(), StorageError> {
        Self::ensure_parent(path).await?;
        tokio::fs::write(path, &data).await.map_err(|e| StorageError::io(path, e))?;
        debug!(path = %path.display(), bytes = data.len(), "Wrote artifact");
        Ok(())
    }

    async fn put_data_atomic(&self, data: Bytes, path: &Path) -> Result<(), StorageError> {
        Self::ensure_parent(path).await?;
        let tmp = temp_path(path);
        tokio::fs::write(&tmp, &data).await.map_err(|e| StorageError::io(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::io(path, e));
        }
        debug!(path = %path.display(), bytes = data.len(), "Wrote artifact atomically");
        Ok(())
    }

    async fn get_data(&self, path: &Path) -> Result<Bytes, StorageError> {
        let data = tokio::fs::read(path).await.map_err(|e| StorageError::io(path, e))?;
        Ok(Bytes::from(data))
    }

    async fn exists(&self, path: &Path) -> Result<bool, StorageError> {
        tokio::fs::try_exists(path).await.map_err(|e| StorageError::io(path, e))
    }

    async fn delete_data(&self, path: &Path) -> Result<bool, StorageError> {
        debug!(path = %path.display(), "Attempting to remove artifact");
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                info!(path = %path.display(), "Removed artifact");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "Artifact not found. Nothing to remove.");
                Ok(false)
            }
            Err(e) => Err(StorageError::io(path, e)),
        }
    }

    async fn prune_empty_dirs(&self, call_dir: &Path) -> Result<(), StorageError> {
        for dir in [call_dir.join(INPUTS_DIR), call_dir.join(RESULTS_DIR), call_dir.to_path_buf()] {
            // remove_dir refuses non-empty directories, which is what we want here
            if let Err(e) = tokio::fs::remove_dir(&dir).await {
                debug!(path = %dir.display(), error = %e, "Directory left in place");
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| StorageError::io(&self.root, e))?;

        let probe = self.root.join(HEALTH_CHECK_FILE);
        tokio::fs::write(&probe, b"ok")
            .await
            .map_err(|e| StorageError::HealthCheck(format!("{} is not writable: {}", self.root.display(), e)))?;
        tokio::fs::remove_file(&probe).await.map_err(|e| StorageError::io(&probe, e))?;

        Ok(())
    }
}
