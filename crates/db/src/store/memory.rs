//! In-process draft store.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{DraftStore, StoreError};

/// A `HashMap` behind a lock. Used for tests and for sessions where nothing
/// should outlive the process.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: RwLock<HashMap<String, String>>,
    disabled: bool,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every call, the way browser storage behaves in
    /// some private-browsing modes.
    pub fn unavailable() -> Self {
        Self {
            entries: RwLock::default(),
            disabled: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.disabled {
            Err(StoreError::Unavailable("storage is disabled".into()))
        } else {
            Ok(())
        }
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("storage lock poisoned".into())
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check()?;
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}
