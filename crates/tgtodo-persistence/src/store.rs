//! Key-value stores.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{trace, warn};

use crate::atomic::{atomic_write_json, read_json_optional};
use crate::error::{PersistenceError, Result};

/// A string-to-string store with last-write-wins semantics.
///
/// Implementations must be usable behind a shared reference; callers hold
/// them as `Arc<dyn KeyValueStore>`.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process store. Contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| PersistenceError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Store backed by one JSON object file.
///
/// Every mutation rewrites the whole file atomically. The file is re-read on
/// each access so separate processes observe each other's last write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStore {
    /// Create a store persisting to `path`. The file is created lazily.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        Ok(read_json_optional(&self.path)?.unwrap_or_default())
    }

    fn update<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _lock = self.guard.lock().map_err(|_| PersistenceError::Poisoned)?;
        // A corrupt file is replaced on the next mutation so `remove` can heal it.
        let (mut entries, healed) = match self.load() {
            Ok(entries) => (entries, false),
            Err(PersistenceError::Malformed(e)) => {
                warn!(path = %self.path.display(), error = %e, "Overwriting malformed storage file");
                (BTreeMap::new(), true)
            }
            Err(e) => return Err(e),
        };
        if mutate(&mut entries) || healed {
            atomic_write_json(&self.path, &entries)?;
            trace!(path = %self.path.display(), keys = entries.len(), "Storage file written");
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _lock = self.guard.lock().map_err(|_| PersistenceError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_remove_absent_is_noop() {
        let store = MemoryStore::new();
        store.remove("missing").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));

        assert_eq!(store.get("anything").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state/storage.json");

        FileStore::new(&path).set("tg", "payload").unwrap();
        let reopened = FileStore::new(&path);

        assert_eq!(reopened.get("tg").unwrap().as_deref(), Some("payload"));
    }

    #[test]
    fn test_file_store_remove() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        store.remove("a").unwrap();

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_file_store_remove_absent_does_not_create_file() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("storage.json"));

        store.remove("missing").unwrap();

        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_malformed_file_errors_on_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(PersistenceError::Malformed(_))));
    }

    #[test]
    fn test_file_store_remove_heals_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);

        store.remove("missing").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "{}");
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_store_set_overwrites_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileStore::new(&path);

        store.set("k", "v").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
