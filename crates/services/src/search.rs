use std::collections::HashSet;
use std::sync::Arc;

use screening_core::model::{RawBatch, SubjectId};

use crate::error::{FetchError, SearchError};
use crate::fetcher::Fetcher;

/// Split free text on commas into subject ids, trimming each and dropping blanks.
///
/// Duplicates are kept; the controller rejects repeats as already searched.
///
/// # Errors
///
/// Returns `SearchError::EmptyInput` if no id remains.
pub fn parse_subject_ids(text: &str) -> Result<Vec<SubjectId>, SearchError> {
    let ids: Vec<_> = text
        .split(',')
        .filter_map(|part| SubjectId::parse(part).ok())
        .collect();
    if ids.is_empty() {
        return Err(SearchError::EmptyInput);
    }
    Ok(ids)
}

//
// ─── SESSION QUERY SET ─────────────────────────────────────────────────────────
//

/// Subject ids already requested in the current session.
///
/// Only grows until [`SessionQuerySet::clear`]. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct SessionQuerySet {
    searched: HashSet<SubjectId>,
}

impl SessionQuerySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, subject_id: &SubjectId) -> bool {
        self.searched.contains(subject_id)
    }

    pub fn mark(&mut self, subject_id: SubjectId) {
        self.searched.insert(subject_id);
    }

    pub fn clear(&mut self) {
        self.searched.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.searched.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.searched.is_empty()
    }
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Result slot for one fetched subject.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchHit {
    Fetched(RawBatch),
    Failed(FetchError),
}

impl SearchHit {
    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        match self {
            SearchHit::Fetched(batch) => &batch.subject_id,
            SearchHit::Failed(err) => &err.subject_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    AlreadySearched,
}

/// Subject id skipped without a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedId {
    pub subject_id: SubjectId,
    pub reason: RejectReason,
}

/// Per-subject outcomes of one search call, each list in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOutcome {
    pub accepted: Vec<SearchHit>,
    pub rejected: Vec<RejectedId>,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Fetches raw batches while making sure no subject is queried twice per session.
pub struct SearchController {
    fetcher: Arc<dyn Fetcher>,
    queried: SessionQuerySet,
}

impl SearchController {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_session(fetcher, SessionQuerySet::new())
    }

    #[must_use]
    pub fn with_session(fetcher: Arc<dyn Fetcher>, queried: SessionQuerySet) -> Self {
        Self { fetcher, queried }
    }

    #[must_use]
    pub fn session(&self) -> &SessionQuerySet {
        &self.queried
    }

    /// Forget every subject searched so far.
    pub fn clear(&mut self) {
        self.queried.clear();
    }

    /// Parse `ids_text` and search the resulting ids.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::EmptyInput` if the text holds no ids.
    pub async fn search(&mut self, ids_text: &str) -> Result<SearchOutcome, SearchError> {
        let ids = parse_subject_ids(ids_text)?;
        Ok(self.search_ids(ids).await)
    }

    /// Fetch each id one at a time, in order.
    ///
    /// An id counts as searched only once its fetch has settled, whether it
    /// succeeded or failed. Dropping the future mid-fetch leaves that id
    /// unmarked.
    pub async fn search_ids(&mut self, ids: Vec<SubjectId>) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for subject_id in ids {
            if self.queried.contains(&subject_id) {
                tracing::debug!(%subject_id, "subject already searched this session");
                outcome.rejected.push(RejectedId {
                    subject_id,
                    reason: RejectReason::AlreadySearched,
                });
                continue;
            }

            let hit = match self.fetcher.fetch(&subject_id).await {
                Ok(events) => SearchHit::Fetched(RawBatch::new(subject_id.clone(), events)),
                Err(failure) => {
                    tracing::warn!(%subject_id, error = %failure, "fetch failed");
                    SearchHit::Failed(FetchError::new(subject_id.clone(), failure))
                }
            };
            self.queried.mark(subject_id);
            outcome.accepted.push(hit);
        }

        tracing::info!(
            accepted = outcome.accepted.len(),
            rejected = outcome.rejected.len(),
            "search finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchFailure;
    use async_trait::async_trait;
    use screening_core::model::{OptionId, QuestionId, ResponseEvent};
    use screening_core::time::fixed_at_ms;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedFetcher {
        failures: HashMap<String, FetchFailure>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn failing(id: &str, failure: FetchFailure) -> Self {
            let mut failures = HashMap::new();
            failures.insert(id.to_owned(), failure);
            Self {
                failures,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, subject_id: &SubjectId) -> Result<Vec<ResponseEvent>, FetchFailure> {
            self.calls.lock().unwrap().push(subject_id.to_string());
            if let Some(failure) = self.failures.get(subject_id.as_str()) {
                return Err(failure.clone());
            }
            Ok(vec![ResponseEvent::new(
                QuestionId::parse("A").unwrap(),
                OptionId::parse("x").unwrap(),
                fixed_at_ms(0),
            )])
        }
    }

    /// Never answers for `slow` while `stall` is set.
    struct StallingFetcher {
        stall: AtomicBool,
    }

    #[async_trait]
    impl Fetcher for StallingFetcher {
        async fn fetch(&self, subject_id: &SubjectId) -> Result<Vec<ResponseEvent>, FetchFailure> {
            if subject_id.as_str() == "slow" && self.stall.load(AtomicOrdering::SeqCst) {
                std::future::pending::<()>().await;
            }
            Ok(Vec::new())
        }
    }

    fn ids(list: &[RejectedId]) -> Vec<&str> {
        list.iter().map(|r| r.subject_id.as_str()).collect()
    }

    #[test]
    fn parses_comma_separated_ids() {
        let parsed = parse_subject_ids(" u1, u1 ,,u2 , ").unwrap();
        let parsed: Vec<_> = parsed.iter().map(SubjectId::as_str).collect();
        assert_eq!(parsed, vec!["u1", "u1", "u2"]);
    }

    #[test]
    fn blank_text_is_empty_input() {
        assert_eq!(parse_subject_ids(""), Err(SearchError::EmptyInput));
        assert_eq!(parse_subject_ids(" , ,  "), Err(SearchError::EmptyInput));
    }

    #[tokio::test]
    async fn repeated_id_in_one_call_is_rejected() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut controller = SearchController::new(fetcher.clone());

        let outcome = controller.search("u1, u1, u2").await.unwrap();

        let accepted: Vec<_> = outcome.accepted.iter().map(|h| h.subject_id().as_str()).collect();
        assert_eq!(accepted, vec!["u1", "u2"]);
        assert_eq!(ids(&outcome.rejected), vec!["u1"]);
        assert_eq!(outcome.rejected[0].reason, RejectReason::AlreadySearched);
        assert_eq!(fetcher.calls(), vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn later_calls_skip_searched_ids() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut controller = SearchController::new(fetcher.clone());

        controller.search("u1").await.unwrap();
        let outcome = controller.search("u2,u1").await.unwrap();

        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(ids(&outcome.rejected), vec!["u1"]);
        assert_eq!(fetcher.calls(), vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn failure_is_isolated_to_its_slot() {
        let fetcher = Arc::new(ScriptedFetcher::failing(
            "u3",
            FetchFailure::Transport("connection reset".into()),
        ));
        let mut controller = SearchController::new(fetcher);

        let outcome = controller.search("u3, u4").await.unwrap();

        match &outcome.accepted[0] {
            SearchHit::Failed(err) => {
                assert_eq!(err.subject_id.as_str(), "u3");
                assert!(err.message().contains("connection reset"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(matches!(&outcome.accepted[1], SearchHit::Fetched(b) if b.subject_id.as_str() == "u4"));

        let session = controller.session();
        assert!(session.contains(&SubjectId::parse("u3").unwrap()));
        assert!(session.contains(&SubjectId::parse("u4").unwrap()));
    }

    #[tokio::test]
    async fn clear_allows_searching_again() {
        let fetcher = Arc::new(ScriptedFetcher::default());
        let mut controller = SearchController::new(fetcher.clone());

        controller.search("u1").await.unwrap();
        controller.clear();
        assert!(controller.session().is_empty());

        let outcome = controller.search("u1").await.unwrap();
        assert!(outcome.rejected.is_empty());
        assert_eq!(fetcher.calls(), vec!["u1", "u1"]);
    }

    #[tokio::test]
    async fn empty_input_leaves_session_untouched() {
        let mut controller = SearchController::new(Arc::new(ScriptedFetcher::default()));
        assert_eq!(controller.search(" ,").await, Err(SearchError::EmptyInput));
        assert!(controller.session().is_empty());
    }

    #[tokio::test]
    async fn abandoned_search_leaves_pending_id_unmarked() {
        let fetcher = Arc::new(StallingFetcher {
            stall: AtomicBool::new(true),
        });
        let mut controller = SearchController::new(fetcher.clone());

        {
            let timed_out =
                tokio::time::timeout(Duration::from_millis(50), controller.search("fast, slow")).await;
            assert!(timed_out.is_err());
        }

        let session = controller.session();
        assert!(session.contains(&SubjectId::parse("fast").unwrap()));
        assert!(!session.contains(&SubjectId::parse("slow").unwrap()));

        fetcher.stall.store(false, AtomicOrdering::SeqCst);
        let outcome = controller.search("slow").await.unwrap();
        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.accepted.len(), 1);
        assert!(controller.session().contains(&SubjectId::parse("slow").unwrap()));
    }
}
