#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use records::{ScoredResultRecord, decode_collection, encode_collection};
pub use repository::{DurableStore, InMemoryStore, SAVED_RESULTS_KEY, Storage, StorageError};
