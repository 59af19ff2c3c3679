//! Shared error types for the services crate.

use thiserror::Error;

use screening_core::model::{CollectionError, SubjectId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a single subject's events could not be retrieved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FetchFailure {
    #[error("no permission to read response events")]
    PermissionDenied,
    #[error("record store responded with status {0}")]
    Status(u16),
    #[error("failed to fetch data: {0}")]
    Transport(String),
    #[error("invalid response event payload: {0}")]
    Decode(String),
}

/// Per-subject fetch failure, reported in that subject's result slot.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("fetch for subject {subject_id} failed: {failure}")]
pub struct FetchError {
    pub subject_id: SubjectId,
    pub failure: FetchFailure,
}

impl FetchError {
    #[must_use]
    pub fn new(subject_id: SubjectId, failure: FetchFailure) -> Self {
        Self {
            subject_id,
            failure,
        }
    }

    /// Operator-facing message for this failure.
    #[must_use]
    pub fn message(&self) -> String {
        self.failure.to_string()
    }
}

/// Errors emitted by `SearchController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SearchError {
    #[error("no subject ids were given")]
    EmptyInput,
}

/// Errors emitted by `SavedResultStore` and the dashboard save paths.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SavedResultError {
    #[error("result for subject {subject_id} is already saved")]
    AlreadySaved { subject_id: SubjectId },
    #[error("no saved result for subject {subject_id}")]
    NotFound { subject_id: SubjectId },
    #[error("subject {subject_id} has no scored result in this session")]
    NotInSession { subject_id: SubjectId },
    #[error("change was not persisted: {0}")]
    Storage(#[from] StorageError),
}

impl From<CollectionError> for SavedResultError {
    fn from(err: CollectionError) -> Self {
        match err {
            CollectionError::AlreadySaved { subject_id } => Self::AlreadySaved { subject_id },
            CollectionError::NotFound { subject_id } => Self::NotFound { subject_id },
        }
    }
}

/// Errors emitted while bootstrapping the dashboard.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
