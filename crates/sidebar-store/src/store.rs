//! Session store trait and error types.
//!
//! Provides the core [`SessionStore`] trait for the key-value persistence slot,
//! along with [`StoreError`] for unified error handling across backends.

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Storage is disabled or inaccessible (e.g., blocked by browser policy).
    Unavailable,
    /// Storage quota exhausted.
    QuotaExceeded,
    /// Backing data could not be encoded or decoded.
    Serialization,
    /// Underlying I/O failure.
    Io,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Key context (if applicable).
    pub key: Option<String>,
    /// Backend identifier (e.g., "File", "Null").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            key: None,
            backend: None,
            source: None,
        }
    }

    /// Attach key context.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create an unavailable error for a key.
    #[must_use]
    pub fn unavailable(key: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable).with_key(key)
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::Unavailable,
            std::io::ErrorKind::StorageFull => StoreErrorKind::QuotaExceeded,
            _ => StoreErrorKind::Io,
        };
        Self::new(kind).with_source(err)
    }

    /// Create a store error from a JSON encoding or decoding failure.
    #[must_use]
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::Serialization).with_source(err)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (key: foo)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::Unavailable => "Storage unavailable",
            StoreErrorKind::QuotaExceeded => "Quota exceeded",
            StoreErrorKind::Serialization => "Serialization error",
            StoreErrorKind::Io => "I/O error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(key) = &self.key {
            write!(f, " (key: {key})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Session-scoped key-value slot.
///
/// Values are opaque strings; callers choose the encoding (JSON arrays for the
/// expansion set, numeric strings for the scroll offset). All operations are
/// synchronous and expected to complete immediately.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Store that behaves like session storage disabled by browser policy.
///
/// Every read misses and every write fails with
/// [`StoreErrorKind::Unavailable`].
pub struct NullStore;

impl SessionStore for NullStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::unavailable(key).with_backend("Null"))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Err(StoreError::unavailable(key).with_backend("Null"))
    }
}
