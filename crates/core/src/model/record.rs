use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::QuestionStatus;

/// Submitted labels keyed by actual question index.
pub type AnswerMap = BTreeMap<usize, Vec<String>>;

/// Scored submissions keyed by actual question index.
pub type ResultMap = BTreeMap<usize, AnswerResult>;

/// Outcome of one submission. Replaced, never edited, on resubmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub user_answer: Vec<String>,
    pub correct_answer: Vec<String>,
    pub is_correct: bool,
    pub submitted_at: DateTime<Utc>,
}

/// One answer/result namespace.
///
/// The store keeps two books: one shared by normal and memorize modes and
/// one used only while training on wrong answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBook {
    answers: AnswerMap,
    results: ResultMap,
}

impl RecordBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_parts(answers: AnswerMap, results: ResultMap) -> Self {
        Self { answers, results }
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn results(&self) -> &ResultMap {
        &self.results
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.results.is_empty()
    }

    /// Store a submission for `index`, replacing any earlier one.
    pub fn record(&mut self, index: usize, result: AnswerResult) {
        self.answers.insert(index, result.user_answer.clone());
        self.results.insert(index, result);
    }

    /// Status of `index`: unanswered without an answer entry, otherwise
    /// decided by the result entry (a missing result counts as incorrect).
    #[must_use]
    pub fn status(&self, index: usize) -> QuestionStatus {
        if !self.answers.contains_key(&index) {
            return QuestionStatus::Unanswered;
        }
        match self.results.get(&index) {
            Some(result) if result.is_correct => QuestionStatus::Correct,
            _ => QuestionStatus::Incorrect,
        }
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.results.values().filter(|r| r.is_correct).count()
    }

    /// Indices whose result is incorrect, ascending.
    #[must_use]
    pub fn incorrect_indices(&self) -> Vec<usize> {
        self.results
            .iter()
            .filter(|(_, r)| !r.is_correct)
            .map(|(index, _)| *index)
            .collect()
    }

    pub fn clear(&mut self) {
        self.answers.clear();
        self.results.clear();
    }

    /// Move every entry of `other` into `self`, overwriting entries at the
    /// same index. `other` is left empty.
    pub fn absorb(&mut self, other: &mut RecordBook) {
        self.answers.append(&mut other.answers);
        self.results.append(&mut other.results);
    }

    /// Re-key entries after the collection was reordered.
    ///
    /// `order[new] = old` describes the new arrangement. Entries whose index
    /// is not covered by `order` are dropped.
    pub fn reindex(&mut self, order: &[usize]) {
        let mut new_index_of = vec![None; order.len()];
        for (new, &old) in order.iter().enumerate() {
            if let Some(slot) = new_index_of.get_mut(old) {
                *slot = Some(new);
            }
        }
        let lookup = |old: usize| new_index_of.get(old).copied().flatten();

        self.answers = std::mem::take(&mut self.answers)
            .into_iter()
            .filter_map(|(old, v)| lookup(old).map(|new| (new, v)))
            .collect();
        self.results = std::mem::take(&mut self.results)
            .into_iter()
            .filter_map(|(old, v)| lookup(old).map(|new| (new, v)))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn result(labels: &[&str], is_correct: bool) -> AnswerResult {
        AnswerResult {
            user_answer: labels.iter().map(|s| (*s).to_string()).collect(),
            correct_answer: vec!["x".into()],
            is_correct,
            submitted_at: fixed_now(),
        }
    }

    #[test]
    fn status_follows_answers_then_results() {
        let mut book = RecordBook::new();
        assert_eq!(book.status(0), QuestionStatus::Unanswered);

        book.record(0, result(&["x"], true));
        book.record(1, result(&["y"], false));
        assert_eq!(book.status(0), QuestionStatus::Correct);
        assert_eq!(book.status(1), QuestionStatus::Incorrect);
        assert_eq!(book.answered_count(), 2);
        assert_eq!(book.correct_count(), 1);
        assert_eq!(book.incorrect_indices(), vec![1]);
    }

    #[test]
    fn answer_without_result_counts_as_incorrect() {
        let mut answers = AnswerMap::new();
        answers.insert(3, vec!["x".into()]);
        let book = RecordBook::from_parts(answers, ResultMap::new());
        assert_eq!(book.status(3), QuestionStatus::Incorrect);
    }

    #[test]
    fn absorb_overwrites_and_drains() {
        let mut normal = RecordBook::new();
        normal.record(0, result(&["y"], false));
        normal.record(1, result(&["x"], true));

        let mut wrong = RecordBook::new();
        wrong.record(0, result(&["x"], true));

        normal.absorb(&mut wrong);
        assert!(wrong.is_empty());
        assert_eq!(normal.status(0), QuestionStatus::Correct);
        assert_eq!(normal.status(1), QuestionStatus::Correct);
    }

    #[test]
    fn reindex_moves_entries_and_drops_strays() {
        let mut book = RecordBook::new();
        book.record(0, result(&["a"], true));
        book.record(2, result(&["c"], false));
        book.record(9, result(&["z"], false));

        // new arrangement: [old 2, old 0, old 1]
        book.reindex(&[2, 0, 1]);

        assert_eq!(book.answers().get(&0), Some(&vec!["c".to_string()]));
        assert_eq!(book.answers().get(&1), Some(&vec!["a".to_string()]));
        assert!(!book.answers().contains_key(&2));
        assert_eq!(book.results().len(), 2);
    }

    #[test]
    fn result_serializes_camel_case() {
        let json = serde_json::to_value(result(&["x"], true)).unwrap();
        assert_eq!(json["userAnswer"], serde_json::json!(["x"]));
        assert_eq!(json["isCorrect"], serde_json::json!(true));
        assert_eq!(json["submittedAt"], serde_json::json!("2023-11-14T22:13:20Z"));
    }
}
