use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use screening_core::model::{OptionId, QuestionId, ResponseEvent, SubjectId};

use crate::error::{AppServicesError, FetchFailure};

/// Client for the remote record store holding per-subject response events.
///
/// May return an empty list for a subject that exists but has no events.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch every response event recorded for `subject_id`.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailure` if the events cannot be retrieved or decoded.
    async fn fetch(&self, subject_id: &SubjectId) -> Result<Vec<ResponseEvent>, FetchFailure>;
}

#[derive(Clone, Debug)]
pub struct HttpFetcherConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpFetcherConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:8080";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

/// Fetches events over HTTP as JSON from
/// `GET {base_url}/subjects/{subject_id}/events`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    config: HttpFetcherConfig,
}

impl HttpFetcher {
    /// Build a fetcher with a client honoring the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::HttpClient` if the client cannot be built.
    pub fn new(config: HttpFetcherConfig) -> Result<Self, AppServicesError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &HttpFetcherConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, subject_id: &SubjectId) -> Result<Vec<ResponseEvent>, FetchFailure> {
        let url = events_url(&self.config.base_url, subject_id)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchFailure::PermissionDenied);
        }
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchFailure::Transport(e.to_string()))?;
        decode_events(&body)
    }
}

/// Build the events URL for a subject, percent-encoding the id as one path segment.
pub(crate) fn events_url(base_url: &str, subject_id: &SubjectId) -> Result<Url, FetchFailure> {
    let mut url =
        Url::parse(base_url).map_err(|e| FetchFailure::Transport(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| FetchFailure::Transport(format!("{base_url}: not a base url")))?
        .pop_if_empty()
        .extend(["subjects", subject_id.as_str(), "events"]);
    Ok(url)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload {
    question_id: String,
    selected_option_id: String,
    timestamp: DateTime<Utc>,
}

pub(crate) fn decode_events(body: &[u8]) -> Result<Vec<ResponseEvent>, FetchFailure> {
    let payload: Vec<EventPayload> =
        serde_json::from_slice(body).map_err(|e| FetchFailure::Decode(e.to_string()))?;

    payload
        .into_iter()
        .map(|event| {
            let question_id = QuestionId::parse(&event.question_id)
                .map_err(|e| FetchFailure::Decode(e.to_string()))?;
            let selected_option_id = OptionId::parse(&event.selected_option_id)
                .map_err(|e| FetchFailure::Decode(e.to_string()))?;
            Ok(ResponseEvent::new(
                question_id,
                selected_option_id,
                event.timestamp,
            ))
        })
        .collect()
}
