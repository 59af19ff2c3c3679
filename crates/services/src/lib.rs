#![forbid(unsafe_code)]

pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod saved_results;
pub mod search;

pub use dashboard::{Dashboard, DashboardSearch, SessionEntry};
pub use error::{AppServicesError, FetchError, FetchFailure, SavedResultError, SearchError};
pub use fetcher::{Fetcher, HttpFetcher, HttpFetcherConfig};
pub use saved_results::SavedResultStore;
pub use search::{
    RejectReason, RejectedId, SearchController, SearchHit, SearchOutcome, SessionQuerySet,
    parse_subject_ids,
};
