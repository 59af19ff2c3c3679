use thiserror::Error;

use crate::model::ids::SubjectId;
use crate::model::result::ScoredResult;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("result for subject {subject_id} is already saved")]
    AlreadySaved { subject_id: SubjectId },

    #[error("no saved result for subject {subject_id}")]
    NotFound { subject_id: SubjectId },
}

/// Saved scored results, at most one per subject.
///
/// Entries keep insertion order; presentation order comes from
/// [`crate::ordering`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedCollection {
    entries: Vec<ScoredResult>,
}

impl SavedCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from rehydrated entries, keeping the first entry
    /// seen for each subject.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = ScoredResult>) -> Self {
        let mut collection = Self::new();
        for entry in entries {
            // later duplicates are dropped
            let _ = collection.insert(entry);
        }
        collection
    }

    #[must_use]
    pub fn contains(&self, subject_id: &SubjectId) -> bool {
        self.position(subject_id).is_some()
    }

    #[must_use]
    pub fn get(&self, subject_id: &SubjectId) -> Option<&ScoredResult> {
        self.position(subject_id).map(|idx| &self.entries[idx])
    }

    /// Insert a result for a subject not yet present.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::AlreadySaved` if the subject already has an entry.
    pub fn insert(&mut self, result: ScoredResult) -> Result<(), CollectionError> {
        if self.contains(result.subject_id()) {
            return Err(CollectionError::AlreadySaved {
                subject_id: result.subject_id().clone(),
            });
        }
        self.entries.push(result);
        Ok(())
    }

    /// Remove and return the entry for `subject_id`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::NotFound` if there is no such entry.
    pub fn remove(&mut self, subject_id: &SubjectId) -> Result<ScoredResult, CollectionError> {
        let idx = self
            .position(subject_id)
            .ok_or_else(|| CollectionError::NotFound {
                subject_id: subject_id.clone(),
            })?;
        Ok(self.entries.remove(idx))
    }

    /// Replace the note on an existing entry.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::NotFound` if there is no such entry.
    pub fn set_note(
        &mut self,
        subject_id: &SubjectId,
        note: impl Into<String>,
    ) -> Result<(), CollectionError> {
        let idx = self
            .position(subject_id)
            .ok_or_else(|| CollectionError::NotFound {
                subject_id: subject_id.clone(),
            })?;
        self.entries[idx].set_note(note);
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[ScoredResult] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, subject_id: &SubjectId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.subject_id() == subject_id)
    }
}
