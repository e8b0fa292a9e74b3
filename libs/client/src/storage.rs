use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::error::ClientError;

/// String key/value persistence, the Rust stand-in for browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
    fn remove(&self, key: &str) -> Result<(), ClientError>;
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> Result<R, ClientError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory store lock poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}

/// Keeps every key in one JSON object on disk, rewritten on each change.
/// A file that no longer parses is moved aside and the store starts empty.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, ClientError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ClientError::Storage(format!("failed to read {}: {}", self.path.display(), e)))?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = self.path.with_extension("corrupt");
                warn!(
                    "Corrupt store file {} ({}), moving it to {}",
                    self.path.display(),
                    e,
                    aside.display()
                );
                fs::rename(&self.path, &aside)
                    .map_err(|e| ClientError::Storage(format!("failed to move {}: {}", self.path.display(), e)))?;
                Ok(HashMap::new())
            }
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(entries)?;

        let temp_file = self.path.with_extension("tmp");
        fs::write(&temp_file, raw)
            .map_err(|e| ClientError::Storage(format!("failed to write {}: {}", temp_file.display(), e)))?;
        fs::rename(&temp_file, &self.path)
            .map_err(|e| ClientError::Storage(format!("failed to replace {}: {}", self.path.display(), e)))
    }

    fn modify(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> Result<(), ClientError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("file store lock poisoned".to_string()))?;
        let mut entries = self.read_all()?;
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("file store lock poisoned".to_string()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        (**self).remove(key)
    }
}
