//! In-memory session store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::{SessionStore, StoreError};

/// Session store backed by an in-memory map.
///
/// Each instance models one browsing session: values survive as long as the
/// instance does, which lets tests simulate reloads by building a new
/// controller over the same store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value to the store.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.write().unwrap().insert(key.into(), value.into());
        self
    }

    /// Snapshot of every stored key and value.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.values.read().unwrap().clone()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.read().map_err(|_| poisoned(key))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| poisoned(key))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| poisoned(key))?;
        values.remove(key);
        Ok(())
    }
}

fn poisoned(key: &str) -> StoreError {
    StoreError::unavailable(key).with_backend("Memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_empty() {
        let store = MemoryStore::new();

        assert!(store.get("missing").unwrap().is_none());
        assert!(store.entries().is_empty());
    }

    #[test]
    fn test_memory_store_set_overwrites() {
        let store = MemoryStore::new();

        store.set("sidebarScrollPos", "10").unwrap();
        store.set("sidebarScrollPos", "42").unwrap();

        assert_eq!(
            store.get("sidebarScrollPos").unwrap().as_deref(),
            Some("42")
        );
    }

    #[test]
    fn test_memory_store_with_value() {
        let store = MemoryStore::new().with_value("expandedGroups", r#"["root"]"#);

        assert_eq!(
            store.get("expandedGroups").unwrap().as_deref(),
            Some(r#"["root"]"#)
        );
    }

    #[test]
    fn test_memory_store_remove() {
        let store = MemoryStore::new().with_value("k", "v");

        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert!(store.get("k").unwrap().is_none());
    }
}
