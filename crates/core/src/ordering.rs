//! Presentation order for scored results.

use std::cmp::Ordering;

use crate::model::ScoredResult;

/// More correct answers first; among equals, the faster median wins; subject
/// id breaks any remaining tie so the order is total.
#[must_use]
pub fn compare_results(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    b.total_correct()
        .cmp(&a.total_correct())
        .then_with(|| a.median_latency_ms().total_cmp(&b.median_latency_ms()))
        .then_with(|| a.subject_id().cmp(b.subject_id()))
}

pub fn sort_results(results: &mut [ScoredResult]) {
    results.sort_by(compare_results);
}
