use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the saved result collection is kept.
pub const SAVED_RESULTS_KEY: &str = "saved_results";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Whole-value byte store used for collection persistence.
///
/// Implementations replace the stored value on every write; there is no
/// append path.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the stored bytes.
    ///
    /// Returns `Ok(None)` when nothing has been written yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn read_all(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the stored bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write does not complete.
    async fn write_all(&self, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
///
/// Clones share the same underlying buffer, which lets tests simulate a
/// restart by building a second service over a clone.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store that already holds `bytes`.
    #[must_use]
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }
}

#[async_trait]
impl DurableStore for InMemoryStore {
    async fn read_all(&self) -> Result<Option<Vec<u8>>, StorageError> {
        let guard = self
            .bytes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn write_all(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let mut guard = self
            .bytes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(bytes.to_vec());
        Ok(())
    }
}

/// Durable stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub saved_results: Arc<dyn DurableStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let saved_results: Arc<dyn DurableStore> = Arc::new(InMemoryStore::new());
        Self { saved_results }
    }
}
