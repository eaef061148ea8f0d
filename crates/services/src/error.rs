//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionError;
use storage::repository::StorageError;

/// Errors emitted by question imports. An import that fails changes nothing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("import data is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("import data must be a list of questions")]
    NotAList,

    #[error("question {position} is missing required fields")]
    MissingFields {
        position: usize,
        #[source]
        source: QuestionError,
    },

    #[error("question {position} has malformed options or answer")]
    MalformedLists {
        position: usize,
        #[source]
        source: QuestionError,
    },
}

impl ImportError {
    /// Wrap a question validation failure at 1-based `position`.
    #[must_use]
    pub fn at(position: usize, source: QuestionError) -> Self {
        match source {
            QuestionError::NotASequence(_) => Self::MalformedLists { position, source },
            _ => Self::MissingFields { position, source },
        }
    }
}

/// Errors raised while reading persisted state. Shape problems in single
/// entries are not errors; they fall back to defaults.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("entry `{key}` is not valid JSON: {message}")]
    Corrupt { key: &'static str, message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}
