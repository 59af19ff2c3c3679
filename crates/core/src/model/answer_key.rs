use std::collections::HashMap;

use crate::model::ids::{OptionId, QuestionId};

/// Immutable lookup from question to its correct option.
///
/// Built once at startup. A question with no entry has no known correct
/// answer, so every option submitted for it scores as incorrect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    answers: HashMap<QuestionId, OptionId>,
}

impl AnswerKey {
    #[must_use]
    pub fn new(answers: HashMap<QuestionId, OptionId>) -> Self {
        Self { answers }
    }

    /// Correct option for `question_id`, if the key knows one.
    #[must_use]
    pub fn correct_option_for(&self, question_id: &QuestionId) -> Option<&OptionId> {
        self.answers.get(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(QuestionId, OptionId)> for AnswerKey {
    fn from_iter<I: IntoIterator<Item = (QuestionId, OptionId)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> AnswerKey {
        [("A", "x"), ("B", "y")]
            .into_iter()
            .map(|(q, o)| (QuestionId::parse(q).unwrap(), OptionId::parse(o).unwrap()))
            .collect()
    }

    #[test]
    fn looks_up_known_questions() {
        let key = key();
        let a = QuestionId::parse("A").unwrap();
        assert_eq!(key.correct_option_for(&a).map(OptionId::as_str), Some("x"));
        assert_eq!(key.len(), 2);
    }

    #[test]
    fn unknown_question_is_absent() {
        let key = key();
        let z = QuestionId::parse("Z").unwrap();
        assert!(key.correct_option_for(&z).is_none());
    }
}
