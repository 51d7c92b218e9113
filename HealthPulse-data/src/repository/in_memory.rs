use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;
use uuid::Uuid;

use super::errors::RepositoryError;

/// In-memory storage keyed by session id.
///
/// Reads copy a value out. Writes go through `update`, which mutates the stored value in
/// place under the lock, so two writers to the same key never overwrite each other's changes.
#[derive(Debug)]
pub struct InMemoryStorage<V> {
    entries: Arc<Mutex<HashMap<Uuid, V>>>,
}

impl<V> Clone for InMemoryStorage<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V: Clone> Default for InMemoryStorage<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> InMemoryStorage<V> {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a value, replacing any previous value under the same id
    pub fn insert(&self, id: Uuid, value: V) -> Result<(), RepositoryError> {
        let mut store = self.entries.lock()?;
        store.insert(id, value);
        debug!("Stored entry {}", id);
        Ok(())
    }

    /// Copy of the value stored under `id`
    pub fn get(&self, id: &Uuid) -> Result<V, RepositoryError> {
        let store = self.entries.lock()?;
        store
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Apply `apply` to the value stored under `id` while holding the lock
    pub fn update<R>(&self, id: &Uuid, apply: impl FnOnce(&mut V) -> R) -> Result<R, RepositoryError> {
        let mut store = self.entries.lock()?;
        let value = store
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        Ok(apply(value))
    }

    /// Remove and return the value stored under `id`
    pub fn remove(&self, id: &Uuid) -> Result<V, RepositoryError> {
        let mut store = self.entries.lock()?;
        store
            .remove(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.entries.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}
