//! File-based session store.
//!
//! [`FileStore`] keeps every key of a session in a single JSON object file:
//!
//! ```json
//! {
//!     "expandedGroups": "[\"intro\",\"guide\"]",
//!     "sidebarScrollPos": "120"
//! }
//! ```
//!
//! Values are stored as the same strings the navigation controller would put
//! into browser session storage, so the file can be inspected or seeded by hand.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{SessionStore, StoreError};

const BACKEND: &str = "File";

/// Session store persisted to a JSON file on disk.
///
/// The file is read on every `get` and rewritten on every `set`, matching the
/// synchronous write-through behavior of browser session storage.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove every stored key by deleting the backing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(e).with_backend(BACKEND)),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::io(e).with_backend(BACKEND)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| StoreError::serialization(e).with_backend(BACKEND))
    }

    /// Load the current map for modification, discarding an unreadable file.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.load() {
            Ok(values) => Ok(values),
            Err(e) if e.kind == crate::StoreErrorKind::Serialization => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt session file");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(e).with_backend(BACKEND))?;
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| StoreError::serialization(e).with_backend(BACKEND))?;
        fs::write(&self.path, content).map_err(|e| StoreError::io(e).with_backend(BACKEND))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut values = self.load().map_err(|e| e.with_key(key))?;
        Ok(values.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.load_for_write().map_err(|e| e.with_key(key))?;
        values.insert(key.to_owned(), value.to_owned());
        self.save(&values).map_err(|e| e.with_key(key))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.load_for_write().map_err(|e| e.with_key(key))?;
        if values.remove(key).is_some() {
            self.save(&values).map_err(|e| e.with_key(key))?;
        }
        Ok(())
    }
}
