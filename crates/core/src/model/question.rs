use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be a list of strings")]
    NotASequence(&'static str),
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from an import.
///
/// `options` and `answer` are optional so an import can tell a missing list
/// apart from an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub section: String,
    pub problem: String,
    pub options: Option<Vec<String>>,
    pub answer: Option<Vec<String>>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        section: impl Into<String>,
        problem: impl Into<String>,
        options: Vec<String>,
        answer: Vec<String>,
    ) -> Self {
        Self {
            section: section.into(),
            problem: problem.into(),
            options: Some(options),
            answer: Some(answer),
        }
    }

    /// Check required fields and produce a `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingField` if `section` or `problem` is empty,
    /// or if `options`/`answer` is absent.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.section.is_empty() {
            return Err(QuestionError::MissingField("section"));
        }
        if self.problem.is_empty() {
            return Err(QuestionError::MissingField("problem"));
        }
        let options = self.options.ok_or(QuestionError::MissingField("options"))?;
        let answer = self.answer.ok_or(QuestionError::MissingField("answer"))?;

        Ok(Question {
            section: self.section,
            problem: self.problem,
            options,
            answer,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz question.
///
/// Persisted as `{ section, problem, options, answer }`. Deserialization does
/// not re-run draft validation so stored collections load as they were saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    section: String,
    problem: String,
    options: Vec<String>,
    answer: Vec<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingField` if `section` or `problem` is empty.
    pub fn new(
        section: impl Into<String>,
        problem: impl Into<String>,
        options: Vec<String>,
        answer: Vec<String>,
    ) -> Result<Self, QuestionError> {
        QuestionDraft::new(section, problem, options, answer).validate()
    }

    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    #[must_use]
    pub fn problem(&self) -> &str {
        &self.problem
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Correct option labels.
    #[must_use]
    pub fn answer(&self) -> &[String] {
        &self.answer
    }

    /// True when more than one label is correct.
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.answer.len() > 1
    }

    /// Two questions are duplicates when section and problem text match.
    #[must_use]
    pub fn is_duplicate_of(&self, other: &Question) -> bool {
        self.section == other.section && self.problem == other.problem
    }
}
