//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    snapshots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, snapshot: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let snapshot = snapshot.to_string();
        Box::pin(async move {
            let mut snapshots = self.snapshots.write().map_err(lock_error)?;
            snapshots.insert(id, snapshot);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<String>> {
        let id = id.to_string();
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(lock_error)?;
            snapshots
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut snapshots = self.snapshots.write().map_err(lock_error)?;
            snapshots.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(lock_error)?;
            let mut ids: Vec<String> = snapshots.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let snapshots = self.snapshots.read().map_err(lock_error)?;
            Ok(snapshots.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        block_on(storage.save("board", r#"{"version":1,"objects":[]}"#)).unwrap();
        let loaded = block_on(storage.load("board")).unwrap();
        assert_eq!(loaded, r#"{"version":1,"objects":[]}"#);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_delete_and_exists() {
        let storage = MemoryStorage::new();
        assert!(!block_on(storage.exists("board")).unwrap());
        block_on(storage.save("board", "{}")).unwrap();
        assert!(block_on(storage.exists("board")).unwrap());
        block_on(storage.delete("board")).unwrap();
        assert!(!block_on(storage.exists("board")).unwrap());
    }

    #[test]
    fn test_list_sorted() {
        let storage = MemoryStorage::new();
        block_on(storage.save("b", "{}")).unwrap();
        block_on(storage.save("a", "{}")).unwrap();
        assert_eq!(block_on(storage.list()).unwrap(), vec!["a", "b"]);
    }
}
