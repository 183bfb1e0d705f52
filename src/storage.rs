//! Local key-value persistence.
//!
//! The saved-mailbox list and the active mailbox are stored as whole JSON
//! documents under string keys. The store is injected as a capability so the
//! UI can be exercised against an in-memory fake; the production impl keeps
//! one file per key under the state directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("poisoned store lock")]
    Poisoned,
}

/// Whole-value string store. Values are read and fully rewritten, never
/// partially updated.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key` and its value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed store: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and headless experiments.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor with a single pre-seeded entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .expect("fresh lock")
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_roundtrips_a_value() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        store.set("savedMailboxes", "[]").unwrap();
        assert_eq!(store.get("savedMailboxes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_store_missing_key_is_none() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        assert!(store.get("savedMailboxes").unwrap().is_none());
    }

    #[test]
    fn file_store_creates_state_directory_on_write() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("state").join("deep");
        let store = FileStore::new(nested.clone());

        store.set("currentMailbox", "{}").unwrap();
        assert!(nested.join("currentMailbox.json").exists());
    }

    #[test]
    fn file_store_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        store.set("savedMailboxes", "[1]").unwrap();
        store.set("savedMailboxes", "[2]").unwrap();
        assert_eq!(store.get("savedMailboxes").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn file_store_remove_tolerates_missing_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());

        store.remove("currentMailbox").unwrap();

        store.set("currentMailbox", "{}").unwrap();
        store.remove("currentMailbox").unwrap();
        assert!(store.get("currentMailbox").unwrap().is_none());
    }

    #[test]
    fn memory_store_roundtrips_a_value() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }
}
