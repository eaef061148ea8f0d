mod mode;
mod question;
mod record;
mod stats;
mod status;

pub use mode::{ImportMode, TrainingMode, TrainingModeError};
pub use question::{Question, QuestionDraft, QuestionError};
pub use record::{AnswerMap, AnswerResult, RecordBook, ResultMap};
pub use stats::{
    SectionEntry, SectionGroup, UNKNOWN_PROBLEM, UNKNOWN_SECTION, WrongQuestion,
    WrongQuestionStats, group_sections,
};
pub use status::{ImportStatus, QuestionStatus, QuestionType, StatusKind};
