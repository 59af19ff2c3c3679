use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use screening_core::Scorer;
use screening_core::model::{AnswerKey, OptionId, QuestionId, ResponseEvent, SubjectId};
use screening_core::time::fixed_at_ms;
use services::{
    Dashboard, FetchFailure, Fetcher, RejectReason, SavedResultError, SavedResultStore,
    SearchError, SessionEntry,
};
use storage::repository::InMemoryStore;

/// Serves canned events per subject; unknown subjects fail with a transport error.
struct CannedFetcher {
    events: HashMap<String, Vec<ResponseEvent>>,
}

#[async_trait]
impl Fetcher for CannedFetcher {
    async fn fetch(&self, subject_id: &SubjectId) -> Result<Vec<ResponseEvent>, FetchFailure> {
        self.events
            .get(subject_id.as_str())
            .cloned()
            .ok_or_else(|| FetchFailure::Transport("network unreachable".into()))
    }
}

fn event(q: &str, opt: &str, t: i64) -> ResponseEvent {
    ResponseEvent::new(
        QuestionId::parse(q).unwrap(),
        OptionId::parse(opt).unwrap(),
        fixed_at_ms(t),
    )
}

fn answer_key() -> AnswerKey {
    [("A", "x"), ("B", "y")]
        .into_iter()
        .map(|(q, o)| (QuestionId::parse(q).unwrap(), OptionId::parse(o).unwrap()))
        .collect()
}

fn fetcher() -> CannedFetcher {
    let mut events = HashMap::new();
    events.insert(
        "u1".to_owned(),
        vec![event("A", "x", 1000), event("B", "y", 1300), event("A", "wrong", 1100)],
    );
    events.insert("u2".to_owned(), vec![event("A", "x", 0), event("B", "y", 400)]);
    events.insert("u4".to_owned(), vec![event("B", "n", 0)]);
    events.insert("u5".to_owned(), vec![event("A", "x", 0), event("B", "y", 90)]);
    CannedFetcher { events }
}

fn dashboard(durable: InMemoryStore) -> Dashboard {
    Dashboard::new(
        Scorer::new(Arc::new(answer_key())),
        Arc::new(fetcher()),
        SavedResultStore::new(Arc::new(durable)),
    )
}

fn sid(id: &str) -> SubjectId {
    SubjectId::parse(id).unwrap()
}

#[tokio::test]
async fn search_scores_fetched_subjects() {
    let dash = dashboard(InMemoryStore::new());

    let found = dash.search("u1, u1, u2").await.unwrap();

    assert_eq!(found.entries.len(), 2);
    let u1 = found.entries[0].as_scored().expect("u1 scored");
    assert_eq!(u1.subject_id().as_str(), "u1");
    assert_eq!(u1.total_correct(), 2);
    assert_eq!(u1.total_incorrect(), 1);
    assert_eq!(u1.median_latency_ms(), 150.0);

    assert_eq!(found.rejected.len(), 1);
    assert_eq!(found.rejected[0].subject_id.as_str(), "u1");
    assert_eq!(found.rejected[0].reason, RejectReason::AlreadySearched);
}

#[tokio::test]
async fn partial_failure_keeps_other_results() {
    let dash = dashboard(InMemoryStore::new());

    let found = dash.search("u3,u4").await.unwrap();

    match &found.entries[0] {
        SessionEntry::Failed(err) => {
            assert_eq!(err.subject_id.as_str(), "u3");
            assert_eq!(err.message(), "failed to fetch data: network unreachable");
        }
        other => panic!("expected u3 to fail, got {other:?}"),
    }
    assert_eq!(found.entries[1].subject_id().as_str(), "u4");
    assert!(found.entries[1].as_scored().is_some());

    let again = dash.search("u3, u4").await.unwrap();
    assert!(again.entries.is_empty());
    assert_eq!(again.rejected.len(), 2);
}

#[tokio::test]
async fn empty_search_text_is_rejected() {
    let dash = dashboard(InMemoryStore::new());
    assert_eq!(dash.search("  ,, ").await, Err(SearchError::EmptyInput));
}

#[tokio::test]
async fn session_results_are_most_recent_first() {
    let dash = dashboard(InMemoryStore::new());
    dash.search("u1").await.unwrap();
    dash.search("u2, u4").await.unwrap();

    let order: Vec<_> = dash
        .session_results()
        .await
        .iter()
        .map(|e| e.subject_id().as_str().to_owned())
        .collect();
    assert_eq!(order, vec!["u2", "u4", "u1"]);

    dash.clear_session().await;
    assert!(dash.session_results().await.is_empty());
    let found = dash.search("u1").await.unwrap();
    assert!(found.rejected.is_empty());
}

#[tokio::test]
async fn saving_twice_is_rejected() {
    let dash = dashboard(InMemoryStore::new());
    dash.search("u1").await.unwrap();

    dash.save_from_session(&sid("u1")).await.unwrap();
    let err = dash.save_from_session(&sid("u1")).await.unwrap_err();
    assert!(matches!(err, SavedResultError::AlreadySaved { .. }));
    assert_eq!(dash.list_saved().await.len(), 1);
}

#[tokio::test]
async fn saving_requires_a_scored_session_entry() {
    let dash = dashboard(InMemoryStore::new());
    dash.search("u3").await.unwrap();

    assert!(matches!(
        dash.save_from_session(&sid("u3")).await,
        Err(SavedResultError::NotInSession { .. })
    ));
    assert!(matches!(
        dash.save_from_session(&sid("never")).await,
        Err(SavedResultError::NotInSession { .. })
    ));
}

#[tokio::test]
async fn saved_list_is_ordered_and_survives_restart() {
    let durable = InMemoryStore::new();
    let dash = dashboard(durable.clone());
    dash.search("u1, u2, u4, u5").await.unwrap();
    for id in ["u1", "u2", "u4", "u5"] {
        dash.save_from_session(&sid(id)).await.unwrap();
    }
    dash.set_note(&sid("u5"), "fastest").await.unwrap();
    dash.delete_by_subject_id(&sid("u4")).await.unwrap();

    let listed: Vec<_> = dash
        .list_saved()
        .await
        .iter()
        .map(|r| r.subject_id().as_str().to_owned())
        .collect();
    // all three have 2 correct, so medians decide: 90, 150, 400
    assert_eq!(listed, vec!["u5", "u1", "u2"]);

    let restarted = dashboard(durable);
    restarted.saved_results().reload().await;
    let listed = restarted.list_saved().await;
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0].note(), Some("fastest"));
    assert!(listed.iter().all(|r| r.subject_id().as_str() != "u4"));
    // session state does not persist
    assert!(restarted.session_results().await.is_empty());
}
