use chrono::{DateTime, Utc};

use crate::model::ids::{OptionId, QuestionId, SubjectId};

/// One recorded answer selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEvent {
    pub question_id: QuestionId,
    pub selected_option_id: OptionId,
    pub timestamp: DateTime<Utc>,
}

impl ResponseEvent {
    #[must_use]
    pub fn new(
        question_id: QuestionId,
        selected_option_id: OptionId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            question_id,
            selected_option_id,
            timestamp,
        }
    }
}

/// All response events fetched for one subject, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBatch {
    pub subject_id: SubjectId,
    pub events: Vec<ResponseEvent>,
}

impl RawBatch {
    #[must_use]
    pub fn new(subject_id: SubjectId, events: Vec<ResponseEvent>) -> Self {
        Self { subject_id, events }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
