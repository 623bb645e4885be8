use crate::collection::WatchedCollection;
use crate::error::StorageError;
use popcorn_config::{Config, PathManager};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Durable byte store addressed by string keys.
pub trait KeyValueStore: Send + Sync {
    /// Raw bytes stored under `key`, or None when nothing was ever written
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// One JSON file per key inside a directory.
///
/// Writes go to a temp file first and are renamed into place, so a crash never
/// leaves a half-written value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding `key`. Bytes outside `[A-Za-z0-9_-]` are written as `~XX`, so
    /// distinct keys never share a file and no key leaves the directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut file_name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
                file_name.push(char::from(byte));
            } else {
                file_name.push_str(&format!("~{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key);
        match std::fs::read(&path) {
            Ok(bytes) => {
                debug!(key = %key, path = %path.display(), bytes = bytes.len(), "Storage read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, path = %path.display(), "Storage miss (file does not exist)");
                Ok(None)
            }
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                source: e,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let write = || -> std::io::Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            let temp_path = path.with_extension("tmp");
            std::fs::write(&temp_path, value)?;
            std::fs::rename(&temp_path, &path)
        };
        write().map_err(|e| StorageError::Write {
            key: key.to_string(),
            source: e,
        })?;
        debug!(key = %key, path = %path.display(), bytes = value.len(), "Storage write");
        Ok(())
    }
}

/// In-process store, for sessions that should not touch disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

/// Open the watched list configured in `config`, stored under the data directory
/// unless `storage.dir` overrides it.
pub fn open_watched(config: &Config, paths: &PathManager) -> Result<WatchedCollection, StorageError> {
    let dir = config
        .storage
        .dir
        .clone()
        .unwrap_or_else(|| paths.storage_dir());
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir));
    WatchedCollection::load(store, config.storage.key.clone())
}
