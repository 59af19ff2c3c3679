use std::sync::Arc;

use crate::model::{AnswerKey, RawBatch, ScoredResult};
use crate::time::millis_between;

//
// ─── LATENCY ───────────────────────────────────────────────────────────────────
//

/// Gaps between consecutive events after ordering by timestamp, in
/// milliseconds at microsecond resolution.
///
/// The sort is stable, so events sharing a timestamp keep arrival order.
/// Negative gaps are dropped.
#[must_use]
pub fn latency_diffs_ms(batch: &RawBatch) -> Vec<f64> {
    let mut timestamps: Vec<_> = batch.events.iter().map(|e| e.timestamp).collect();
    timestamps.sort();

    timestamps
        .windows(2)
        .map(|pair| millis_between(pair[0], pair[1]))
        .filter(|diff| *diff >= 0.0)
        .collect()
}

/// Statistical median; `0.0` for an empty slice.
#[must_use]
pub fn median_ms(diffs: &[f64]) -> f64 {
    if diffs.is_empty() {
        return 0.0;
    }
    let mut sorted = diffs.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

//
// ─── SCORER ────────────────────────────────────────────────────────────────────
//

/// Reduces a subject's raw response events to a [`ScoredResult`].
#[derive(Debug, Clone)]
pub struct Scorer {
    answer_key: Arc<AnswerKey>,
}

impl Scorer {
    #[must_use]
    pub fn new(answer_key: Arc<AnswerKey>) -> Self {
        Self { answer_key }
    }

    #[must_use]
    pub fn answer_key(&self) -> &AnswerKey {
        &self.answer_key
    }

    /// Score a batch.
    ///
    /// The result does not depend on the arrival order of events.
    #[must_use]
    pub fn score(&self, batch: &RawBatch) -> ScoredResult {
        let mut correct = 0_u32;
        let mut incorrect = 0_u32;

        for event in &batch.events {
            let is_correct = self
                .answer_key
                .correct_option_for(&event.question_id)
                .is_some_and(|expected| *expected == event.selected_option_id);
            if is_correct {
                correct = correct.saturating_add(1);
            } else {
                incorrect = incorrect.saturating_add(1);
            }
        }

        let median = median_ms(&latency_diffs_ms(batch));
        ScoredResult::new(batch.subject_id.clone(), correct, incorrect, median)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
