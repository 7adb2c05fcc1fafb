pub mod storage;

pub use storage::{ArtifactStore, StorageError};
