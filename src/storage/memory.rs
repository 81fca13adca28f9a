use std::{collections::BTreeMap, sync::RwLock};

use crate::errors::{Result, StoreError};

use super::KeyValueStore;

/// Volatile store used by tests and previews.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, bypassing serialization. Handy for simulating corrupt data.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut guard) = self.entries.write() {
            guard.insert(key.to_string(), value.to_string());
        }
        self
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(std::io::Error::other("memory store lock poisoned"))
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.entries.read().map_err(|_| poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| poisoned())?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let guard = self.entries.read().map_err(|_| poisoned())?;
        Ok(guard.keys().cloned().collect())
    }
}
