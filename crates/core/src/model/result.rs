use crate::model::ids::SubjectId;

/// Correctness and latency summary for one subject.
///
/// Everything except `note` is fixed once the scorer produces it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult {
    subject_id: SubjectId,
    total_correct: u32,
    total_incorrect: u32,
    median_latency_ms: f64,
    note: Option<String>,
}

impl ScoredResult {
    #[must_use]
    pub fn new(
        subject_id: SubjectId,
        total_correct: u32,
        total_incorrect: u32,
        median_latency_ms: f64,
    ) -> Self {
        Self {
            subject_id,
            total_correct,
            total_incorrect,
            median_latency_ms,
            note: None,
        }
    }

    /// Rehydrate a result from persisted storage.
    #[must_use]
    pub fn from_persisted(
        subject_id: SubjectId,
        total_correct: u32,
        total_incorrect: u32,
        median_latency_ms: f64,
        note: Option<String>,
    ) -> Self {
        Self {
            subject_id,
            total_correct,
            total_incorrect,
            median_latency_ms,
            note,
        }
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    #[must_use]
    pub fn total_incorrect(&self) -> u32 {
        self.total_incorrect
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_correct.saturating_add(self.total_incorrect)
    }

    #[must_use]
    pub fn median_latency_ms(&self) -> f64 {
        self.median_latency_ms
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Replace the note. A blank note clears it.
    pub(crate) fn set_note(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
    }
}
