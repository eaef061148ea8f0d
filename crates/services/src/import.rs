//! Parsing and validation of question imports.

use serde_json::Value;

use quiz_core::model::{Question, QuestionDraft, QuestionError};

use crate::error::ImportError;

/// Imports larger than this are accepted but logged.
pub const LARGE_IMPORT_THRESHOLD: usize = 1000;

/// Parse raw JSON text into drafts.
///
/// # Errors
///
/// Returns `ImportError::InvalidJson` for unparseable text,
/// `ImportError::NotAList` if the top level is not an array, and a
/// positioned error for the first malformed element.
pub fn parse_drafts(text: &str) -> Result<Vec<QuestionDraft>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|err| ImportError::InvalidJson(err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotAList);
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| draft_from_value(item).map_err(|err| ImportError::at(i + 1, err)))
        .collect()
}

enum ListField {
    Missing,
    Malformed,
    Present(Vec<String>),
}

fn list_field(item: &Value, name: &str) -> ListField {
    match item.get(name) {
        None | Some(Value::Null) => ListField::Missing,
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map_or(ListField::Malformed, ListField::Present),
        Some(_) => ListField::Malformed,
    }
}

fn text_field(item: &Value, name: &str) -> String {
    item.get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Missing fields are reported before malformed lists.
fn draft_from_value(item: &Value) -> Result<QuestionDraft, QuestionError> {
    let options = list_field(item, "options");
    let answer = list_field(item, "answer");
    let draft = QuestionDraft {
        section: text_field(item, "section"),
        problem: text_field(item, "problem"),
        options: match &options {
            ListField::Missing => None,
            ListField::Malformed => Some(Vec::new()),
            ListField::Present(values) => Some(values.clone()),
        },
        answer: match &answer {
            ListField::Missing => None,
            ListField::Malformed => Some(Vec::new()),
            ListField::Present(values) => Some(values.clone()),
        },
    };

    // surfaces MissingField for any absent field
    draft.clone().validate()?;

    if matches!(options, ListField::Malformed) {
        return Err(QuestionError::NotASequence("options"));
    }
    if matches!(answer, ListField::Malformed) {
        return Err(QuestionError::NotASequence("answer"));
    }
    Ok(draft)
}

/// Validate a whole batch. Nothing is returned unless every draft is valid.
///
/// # Errors
///
/// Returns the positioned error of the first invalid draft (1-based).
pub fn validate_batch(drafts: Vec<QuestionDraft>) -> Result<Vec<Question>, ImportError> {
    if drafts.len() > LARGE_IMPORT_THRESHOLD {
        tracing::warn!(
            count = drafts.len(),
            "importing a large question batch, the UI may slow down"
        );
    }
    drafts
        .into_iter()
        .enumerate()
        .map(|(i, draft)| draft.validate().map_err(|err| ImportError::at(i + 1, err)))
        .collect()
}
