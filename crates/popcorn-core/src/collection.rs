use crate::error::StorageError;
use crate::storage::KeyValueStore;
use popcorn_models::WatchedEntry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Items with a stable identity inside a collection
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for WatchedEntry {
    fn key(&self) -> &str {
        &self.imdb_id
    }
}

pub type WatchedCollection = PersistedCollection<WatchedEntry>;

/// Ordered collection mirrored to a `KeyValueStore`.
///
/// Loaded once from storage; every mutation re-serializes the whole collection and
/// writes it back before returning. At most one item per key. The in-memory items
/// stay authoritative when a write fails.
pub struct PersistedCollection<T> {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    items: Vec<T>,
}

impl<T> PersistedCollection<T>
where
    T: Keyed + Serialize + DeserializeOwned,
{
    /// Read the initial items stored under `storage_key`.
    ///
    /// Absent (or blank) data yields an empty collection; data that does not decode
    /// is an error.
    pub fn load(store: Arc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Result<Self, StorageError> {
        let storage_key = storage_key.into();

        let items = match store.get(&storage_key)? {
            Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => {
                serde_json::from_slice::<Vec<T>>(&bytes).map_err(|e| StorageError::Decode {
                    key: storage_key.clone(),
                    source: e,
                })?
            }
            _ => {
                debug!(key = %storage_key, "No stored collection, starting empty");
                Vec::new()
            }
        };

        info!(key = %storage_key, items = items.len(), "Loaded persisted collection");
        Ok(Self {
            store,
            storage_key,
            items,
        })
    }

    /// Append `item` unless an item with the same key exists.
    ///
    /// Returns whether the collection changed. On a write error the item stays added.
    pub fn add(&mut self, item: T) -> Result<bool, StorageError> {
        if self.contains(item.key()) {
            debug!(key = %self.storage_key, id = %item.key(), "Item already present, skipping add");
            return Ok(false);
        }
        self.items.push(item);
        self.persist()?;
        Ok(true)
    }

    /// Drop every item with this key. Returns how many were removed.
    pub fn remove(&mut self, key: &str) -> Result<usize, StorageError> {
        let before = self.items.len();
        self.items.retain(|item| item.key() != key);
        let removed = before - self.items.len();
        if removed > 0 {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Current items in insertion order
    pub fn snapshot(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    fn persist(&self) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&self.items).map_err(|e| StorageError::Encode {
            key: self.storage_key.clone(),
            source: e,
        })?;

        if let Err(e) = self.store.set(&self.storage_key, &bytes) {
            warn!(
                operation = "persist_collection",
                key = %self.storage_key,
                error = %e,
                "Failed to write collection; in-memory state kept"
            );
            return Err(e);
        }

        debug!(key = %self.storage_key, items = self.items.len(), "Collection persisted");
        Ok(())
    }
}
