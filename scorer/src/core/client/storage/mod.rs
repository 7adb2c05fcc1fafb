pub mod error;
pub mod local;

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
pub use error::StorageError;
pub use local::LocalFileStore;

/// Trait defining artifact storage operations
///
/// Artifacts are addressed by path; the store never decides where a call's
/// files live, `ArtifactLayout` does.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write a file, creating parent directories as needed
    async fn put_data(&self, data: Bytes, path: &Path) -> Result<(), StorageError>;

    /// Write a file so that readers never observe partial content
    async fn put_data_atomic(&self, data: Bytes, path: &Path) -> Result<(), StorageError>;

    /// Read a file, `StorageError::NotFound` when it does not exist
    async fn get_data(&self, path: &Path) -> Result<Bytes, StorageError>;

    /// Whether a file or directory exists at `path`
    async fn exists(&self, path: &Path) -> Result<bool, StorageError>;

    /// Remove a file, returns `false` when there was nothing to remove
    async fn delete_data(&self, path: &Path) -> Result<bool, StorageError>;

    /// Remove the artifact sub-directories of a call and the call directory
    /// itself, leaving any that still hold files
    async fn prune_empty_dirs(&self, call_dir: &Path) -> Result<(), StorageError>;

    /// Perform a health check on the storage
    ///
    /// # Returns
    /// * `Ok(())` - If the storage root exists and is writable
    /// * `Err(StorageError)` - If the health check fails
    async fn health_check(&self) -> Result<(), StorageError>;
}
