use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

pub const PROJECTS_KEY: &str = "projects";
pub const COLUMNS_KEY: &str = "kanbanColumns";

pub trait Store {
    /// Returns the raw document stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the document stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        // Write next to the target and rename over it so readers never see half a document.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        tracing::debug!(key, bytes = value.len(), "document written");
        Ok(())
    }
}

/// In-memory store, used by tests and as a scratch store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads a document, treating an unreadable one like a missing one.
pub(crate) fn read_document(store: &impl Store, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(key, %err, "could not read stored document");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(COLUMNS_KEY).unwrap(), None);
    }

    #[test]
    fn set_overwrites_previous_document() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        store.set(PROJECTS_KEY, "[1,2,3]").unwrap();
        store.set(PROJECTS_KEY, "[]").unwrap();

        assert_eq!(store.get(PROJECTS_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("projects.json").exists());
        assert!(!dir.path().join(".projects.json.tmp").exists());
    }

    #[test]
    fn keys_are_independent() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("nested")).unwrap();

        store.set(PROJECTS_KEY, "[\"p\"]").unwrap();
        store.set(COLUMNS_KEY, "[\"c\"]").unwrap();

        assert_eq!(store.get(PROJECTS_KEY).unwrap().as_deref(), Some("[\"p\"]"));
        assert_eq!(store.get(COLUMNS_KEY).unwrap().as_deref(), Some("[\"c\"]"));
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
