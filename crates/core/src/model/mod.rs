mod answer_key;
mod collection;
mod event;
mod ids;
mod result;

pub use answer_key::AnswerKey;
pub use collection::{CollectionError, SavedCollection};
pub use event::{RawBatch, ResponseEvent};
pub use ids::{IdError, OptionId, QuestionId, SubjectId};
pub use result::ScoredResult;
