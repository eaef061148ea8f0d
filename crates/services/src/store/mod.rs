mod persist;
mod queries;
mod service;

// Public API of the store subsystem.
pub use service::{
    ImportSummary, LOAD_FAILED_MESSAGE, QUOTA_EXCEEDED_MESSAGE, QuestionStore,
    SAVE_FAILED_MESSAGE,
};
