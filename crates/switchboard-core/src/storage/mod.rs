//! Snapshot storage for saving and reopening diagrams.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

pub use crate::scene::BoxFuture;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot storage backends.
///
/// Snapshots are the opaque strings produced by the engine's
/// `export_snapshot`; backends store them verbatim under an id.
pub trait Storage: Send + Sync {
    fn save(&self, id: &str, snapshot: &str) -> BoxFuture<'_, StorageResult<()>>;

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<String>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// List all snapshot ids.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>>;
}
