//! Extension trait for [`SessionStore`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{SessionStore, StoreError};

/// Typed convenience methods for [`SessionStore`].
///
/// Implemented as default methods on an extension trait so that
/// [`SessionStore`] stays object-safe and implementors only handle strings.
pub trait SessionStoreExt: SessionStore {
    /// Retrieve a JSON-deserialized value.
    ///
    /// Returns `None` on a miss, a read error, or a value that does not
    /// deserialize as `T`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).ok()??;
        serde_json::from_str(&raw).ok()
    }

    /// Store a value as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization fails or the backend rejects the write.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StoreError::serialization(e).with_key(key))?;
        self.set(key, &raw)
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}
