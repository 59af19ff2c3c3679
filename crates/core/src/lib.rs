#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod ordering;
pub mod scoring;
pub mod time;

pub use error::Error;
pub use ordering::{compare_results, sort_results};
pub use scoring::{Scorer, latency_diffs_ms, median_ms};
