//! Persistent key/value storage.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::fs::{read_toml_config_sync, write_toml_config_sync};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot read the storage at {}: {error}", .path.display())]
    Read { path: PathBuf, error: anyhow::Error },

    #[error("Cannot write the storage at {}: {error}", .path.display())]
    Write { path: PathBuf, error: anyhow::Error },
}

/// String map that outlives the process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// TOML file backed store. Every mutation is written through.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let entries = if path.exists() {
            read_toml_config_sync(&path).map_err(|error| StoreError::Read {
                path: path.clone(),
                error,
            })?
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = entries.len(), "Opened storage");

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        write_toml_config_sync(&self.entries, &self.path).map_err(|error| StoreError::Write {
            path: self.path.clone(),
            error,
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.entries.insert(key.to_owned(), value.to_owned());
        self.flush().inspect_err(|_| {
            match previous {
                Some(previous) => self.entries.insert(key.to_owned(), previous),
                None => self.entries.remove(key),
            };
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_persists_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(None, store.get("token"));
        store.set("token", "abc").unwrap();

        let mut reopened = FileStore::open(&path).unwrap();
        assert_eq!(Some("abc".to_owned()), reopened.get("token"));

        reopened.remove("token").unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(None, reopened.get("token"));
    }

    #[test]
    fn file_store_creates_parent_dirs_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/storage.toml");

        let mut store = FileStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_test() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        assert!(matches!(FileStore::open(&path), Err(StoreError::Read { .. })));
    }

    #[test]
    fn failed_write_is_rolled_back_test() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("storage.toml");
        std::fs::create_dir_all(&path).unwrap();

        let mut store = FileStore {
            path,
            entries: BTreeMap::new(),
        };

        assert!(store.set("token", "abc").is_err());
        assert_eq!(None, store.get("token"));
    }

    #[test]
    fn memory_store_test() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(Some("2".to_owned()), store.get("a"));
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(None, store.get("a"));
    }
}
