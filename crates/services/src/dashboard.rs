use std::sync::Arc;

use screening_core::model::{AnswerKey, ScoredResult, SubjectId};
use screening_core::{Scorer, sort_results};
use storage::repository::Storage;
use tokio::sync::Mutex;

use crate::error::{AppServicesError, FetchError, SavedResultError, SearchError};
use crate::fetcher::{Fetcher, HttpFetcher, HttpFetcherConfig};
use crate::saved_results::SavedResultStore;
use crate::search::{RejectedId, SearchController, SearchHit};

/// A scored subject or the failure recorded in its slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEntry {
    Scored(ScoredResult),
    Failed(FetchError),
}

impl SessionEntry {
    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        match self {
            SessionEntry::Scored(result) => result.subject_id(),
            SessionEntry::Failed(err) => &err.subject_id,
        }
    }

    #[must_use]
    pub fn as_scored(&self) -> Option<&ScoredResult> {
        match self {
            SessionEntry::Scored(result) => Some(result),
            SessionEntry::Failed(_) => None,
        }
    }
}

/// Entries produced by one dashboard search, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSearch {
    pub entries: Vec<SessionEntry>,
    pub rejected: Vec<RejectedId>,
}

struct SearchSession {
    controller: SearchController,
    /// Most recent search first; each search's entries stay in input order.
    results: Vec<SessionEntry>,
}

/// Caller-facing operations: search, save, annotate, delete and list.
///
/// Saving is always an explicit call; searching never persists anything.
pub struct Dashboard {
    scorer: Scorer,
    session: Mutex<SearchSession>,
    saved: SavedResultStore,
}

impl Dashboard {
    #[must_use]
    pub fn new(scorer: Scorer, fetcher: Arc<dyn Fetcher>, saved: SavedResultStore) -> Self {
        Self {
            scorer,
            session: Mutex::new(SearchSession {
                controller: SearchController::new(fetcher),
                results: Vec::new(),
            }),
            saved,
        }
    }

    /// Build a dashboard backed by `SQLite` storage and an HTTP fetcher, with
    /// saved results rehydrated.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or the HTTP client cannot be set up.
    pub async fn new_sqlite(
        db_url: &str,
        answer_key: AnswerKey,
        fetcher_config: HttpFetcherConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(fetcher_config)?);
        let saved = SavedResultStore::open(Arc::clone(&storage.saved_results)).await;
        Ok(Self::new(Scorer::new(Arc::new(answer_key)), fetcher, saved))
    }

    #[must_use]
    pub fn saved_results(&self) -> &SavedResultStore {
        &self.saved
    }

    /// Search subjects from comma-separated text and score what was fetched.
    ///
    /// The new entries are placed ahead of earlier session entries.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyInput` if the text holds no ids.
    pub async fn search(&self, ids_text: &str) -> Result<DashboardSearch, SearchError> {
        let mut session = self.session.lock().await;
        let outcome = session.controller.search(ids_text).await?;

        let entries: Vec<_> = outcome
            .accepted
            .into_iter()
            .map(|hit| match hit {
                SearchHit::Fetched(batch) => SessionEntry::Scored(self.scorer.score(&batch)),
                SearchHit::Failed(err) => SessionEntry::Failed(err),
            })
            .collect();

        let mut results = entries.clone();
        results.append(&mut session.results);
        session.results = results;

        Ok(DashboardSearch {
            entries,
            rejected: outcome.rejected,
        })
    }

    /// Everything searched since the last clear, most recent search first.
    pub async fn session_results(&self) -> Vec<SessionEntry> {
        self.session.lock().await.results.clone()
    }

    /// Forget searched subjects and their session results. Saved results are untouched.
    pub async fn clear_session(&self) {
        let mut session = self.session.lock().await;
        session.controller.clear();
        session.results.clear();
        tracing::info!("search session cleared");
    }

    /// Persist a scored result.
    ///
    /// # Errors
    ///
    /// See [`SavedResultStore::save`].
    pub async fn save(&self, result: ScoredResult) -> Result<(), SavedResultError> {
        self.saved.save(result).await
    }

    /// Persist the scored result this session holds for `subject_id`.
    ///
    /// # Errors
    ///
    /// Returns `SavedResultError::NotInSession` if the session has no scored
    /// result for the subject, otherwise see [`SavedResultStore::save`].
    pub async fn save_from_session(
        &self,
        subject_id: &SubjectId,
    ) -> Result<ScoredResult, SavedResultError> {
        let result = {
            let session = self.session.lock().await;
            session
                .results
                .iter()
                .filter_map(SessionEntry::as_scored)
                .find(|result| result.subject_id() == subject_id)
                .cloned()
        }
        .ok_or_else(|| SavedResultError::NotInSession {
            subject_id: subject_id.clone(),
        })?;

        self.saved.save(result.clone()).await?;
        Ok(result)
    }

    /// # Errors
    ///
    /// See [`SavedResultStore::delete_by_subject_id`].
    pub async fn delete_by_subject_id(
        &self,
        subject_id: &SubjectId,
    ) -> Result<ScoredResult, SavedResultError> {
        self.saved.delete_by_subject_id(subject_id).await
    }

    /// # Errors
    ///
    /// See [`SavedResultStore::set_note`].
    pub async fn set_note(&self, subject_id: &SubjectId, note: &str) -> Result<(), SavedResultError> {
        self.saved.set_note(subject_id, note).await
    }

    /// Saved results, best first.
    pub async fn list_saved(&self) -> Vec<ScoredResult> {
        let mut results = self.saved.all().await;
        sort_results(&mut results);
        results
    }
}
