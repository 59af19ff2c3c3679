use std::sync::Arc;

use screening_core::model::{SavedCollection, ScoredResult, SubjectId};
use storage::repository::DurableStore;
use storage::{decode_collection, encode_collection};
use tokio::sync::Mutex;

use crate::error::SavedResultError;

/// Durable collection of saved results, at most one per subject.
///
/// Each mutation is applied to a copy, the copy is written in full to the
/// durable store, and only then does it replace the in-memory collection. A
/// failed write leaves memory and storage in agreement. The lock is held for
/// the whole sequence, so concurrent callers cannot both pass the duplicate
/// check for the same subject.
pub struct SavedResultStore {
    durable: Arc<dyn DurableStore>,
    collection: Mutex<SavedCollection>,
}

impl SavedResultStore {
    /// Create a store with an empty in-memory collection. Call
    /// [`SavedResultStore::reload`] to pick up persisted entries.
    #[must_use]
    pub fn new(durable: Arc<dyn DurableStore>) -> Self {
        Self {
            durable,
            collection: Mutex::new(SavedCollection::new()),
        }
    }

    /// Create a store and rehydrate it from durable storage.
    pub async fn open(durable: Arc<dyn DurableStore>) -> Self {
        let store = Self::new(durable);
        store.reload().await;
        store
    }

    /// Save a result for a subject that has none yet.
    ///
    /// # Errors
    ///
    /// Returns `SavedResultError::AlreadySaved` if the subject is present; the
    /// collection is unchanged.
    /// Returns `SavedResultError::Storage` if the durable write fails.
    pub async fn save(&self, result: ScoredResult) -> Result<(), SavedResultError> {
        let subject_id = result.subject_id().clone();
        let mut guard = self.collection.lock().await;

        let mut next = guard.clone();
        next.insert(result)?;
        self.persist(&next).await?;
        *guard = next;

        tracing::info!(%subject_id, saved = guard.len(), "result saved");
        Ok(())
    }

    /// Remove the saved result for `subject_id` and return it.
    ///
    /// # Errors
    ///
    /// Returns `SavedResultError::NotFound` if no such entry exists.
    /// Returns `SavedResultError::Storage` if the durable write fails.
    pub async fn delete_by_subject_id(
        &self,
        subject_id: &SubjectId,
    ) -> Result<ScoredResult, SavedResultError> {
        let mut guard = self.collection.lock().await;

        let mut next = guard.clone();
        let removed = next.remove(subject_id)?;
        self.persist(&next).await?;
        *guard = next;

        tracing::info!(%subject_id, saved = guard.len(), "result deleted");
        Ok(removed)
    }

    /// Replace the note on a saved result. A blank note clears it.
    ///
    /// # Errors
    ///
    /// Returns `SavedResultError::NotFound` if no such entry exists.
    /// Returns `SavedResultError::Storage` if the durable write fails.
    pub async fn set_note(&self, subject_id: &SubjectId, note: &str) -> Result<(), SavedResultError> {
        let mut guard = self.collection.lock().await;

        let mut next = guard.clone();
        next.set_note(subject_id, note)?;
        self.persist(&next).await?;
        *guard = next;

        tracing::debug!(%subject_id, "note updated");
        Ok(())
    }

    /// Current saved results in insertion order. Callers sort for display.
    pub async fn all(&self) -> Vec<ScoredResult> {
        self.collection.lock().await.entries().to_vec()
    }

    pub async fn get(&self, subject_id: &SubjectId) -> Option<ScoredResult> {
        self.collection.lock().await.get(subject_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.collection.lock().await.len()
    }

    /// Replace the in-memory collection with what durable storage holds.
    ///
    /// Absent or unreadable storage yields an empty collection; invalid
    /// records inside a readable snapshot are skipped individually. This
    /// never fails. Returns the number of entries loaded.
    pub async fn reload(&self) -> usize {
        let loaded = match self.durable.read_all().await {
            Ok(Some(bytes)) => decode_collection(&bytes).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "saved results unreadable, starting empty");
                SavedCollection::new()
            }),
            Ok(None) => SavedCollection::new(),
            Err(err) => {
                tracing::warn!(error = %err, "durable store unavailable, starting empty");
                SavedCollection::new()
            }
        };

        let count = loaded.len();
        *self.collection.lock().await = loaded;
        tracing::info!(saved = count, "saved results reloaded");
        count
    }

    async fn persist(&self, collection: &SavedCollection) -> Result<(), SavedResultError> {
        let bytes = encode_collection(collection)?;
        self.durable.write_all(&bytes).await.map_err(|err| {
            tracing::error!(error = %err, "failed to persist saved results");
            SavedResultError::from(err)
        })
    }
}
