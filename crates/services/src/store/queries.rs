//! Read-only views derived from the store's state on demand.

use quiz_core::model::{
    ImportStatus, Question, QuestionStatus, QuestionType, RecordBook, SectionGroup,
    TrainingMode, WrongQuestionStats, group_sections,
};

use super::QuestionStore;

impl QuestionStore {
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Display index into [`Self::available_questions`].
    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn training_mode(&self) -> TrainingMode {
        self.mode
    }

    #[must_use]
    pub fn import_status(&self) -> &ImportStatus {
        &self.import_status
    }

    #[must_use]
    pub fn is_settings_open(&self) -> bool {
        self.settings_open
    }

    /// Records used by normal and memorize modes.
    #[must_use]
    pub fn records(&self) -> &RecordBook {
        &self.normal
    }

    /// Records used while training on wrong answers.
    #[must_use]
    pub fn wrong_only_records(&self) -> &RecordBook {
        &self.wrong_only
    }

    /// Records of the active mode.
    #[must_use]
    pub fn active_records(&self) -> &RecordBook {
        if self.mode.is_wrong_only() {
            &self.wrong_only
        } else {
            &self.normal
        }
    }

    /// Actual indices the user can navigate.
    ///
    /// In wrong-only mode these are the questions whose normal-mode result is
    /// incorrect, ascending; otherwise every index.
    #[must_use]
    pub fn available_questions(&self) -> Vec<usize> {
        if self.mode.is_wrong_only() {
            self.normal.incorrect_indices()
        } else {
            (0..self.questions.len()).collect()
        }
    }

    #[must_use]
    pub fn available_question_count(&self) -> usize {
        if self.mode.is_wrong_only() {
            self.normal.results().values().filter(|r| !r.is_correct).count()
        } else {
            self.questions.len()
        }
    }

    /// Map a display index to an index into the full collection.
    ///
    /// Identity outside wrong-only mode. In wrong-only mode an index past the
    /// available list maps to 0.
    #[must_use]
    pub fn get_actual_question_index(&self, display_index: usize) -> usize {
        if self.mode.is_wrong_only() {
            self.available_questions()
                .get(display_index)
                .copied()
                .unwrap_or(0)
        } else {
            display_index
        }
    }

    /// Actual index of the current question, if there is one.
    pub(super) fn current_actual_index(&self) -> Option<usize> {
        if self.mode.is_wrong_only() && self.available_question_count() == 0 {
            return None;
        }
        let index = self.get_actual_question_index(self.current_index);
        (index < self.questions.len()).then_some(index)
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_actual_index()
            .and_then(|index| self.questions.get(index))
    }

    #[must_use]
    pub fn current_question_type(&self) -> QuestionType {
        match self.current_question() {
            Some(question) if question.is_multiple_choice() => QuestionType::Multiple,
            _ => QuestionType::Single,
        }
    }

    /// Status of the question at actual `index` in the active namespace.
    #[must_use]
    pub fn get_question_status(&self, index: usize) -> QuestionStatus {
        self.active_records().status(index)
    }

    /// Questions grouped by section, in first-seen order.
    #[must_use]
    pub fn sections(&self) -> Vec<SectionGroup> {
        group_sections(&self.questions, |index| self.get_question_status(index))
    }

    /// Normal-mode answered count.
    #[must_use]
    pub fn answered_questions(&self) -> usize {
        self.normal.answered_count()
    }

    /// Normal-mode correct count.
    #[must_use]
    pub fn correct_answers(&self) -> usize {
        self.normal.correct_count()
    }

    #[must_use]
    pub fn get_wrong_question_stats(&self) -> WrongQuestionStats {
        WrongQuestionStats::from_results(&self.questions, self.normal.results())
    }
}

#[cfg(test)]
mod tests {
    use quiz_core::model::{ImportMode, QuestionDraft};
    use quiz_core::time::fixed_clock;

    use super::*;

    fn draft(section: &str, problem: &str, answer: &[&str]) -> QuestionDraft {
        QuestionDraft::new(
            section,
            problem,
            vec!["x".into(), "y".into(), "z".into()],
            answer.iter().map(|s| (*s).to_string()).collect(),
        )
    }

    fn store_with(questions: Vec<QuestionDraft>) -> QuestionStore {
        let mut store = QuestionStore::in_memory(fixed_clock());
        store.import_questions(questions, ImportMode::Replace).unwrap();
        store
    }

    #[test]
    fn question_type_follows_answer_count() {
        let mut store = store_with(vec![draft("A", "1", &["x"]), draft("A", "2", &["x", "y"])]);
        assert_eq!(store.current_question_type(), QuestionType::Single);
        store.set_current_question(1);
        assert_eq!(store.current_question_type(), QuestionType::Multiple);
    }

    #[test]
    fn empty_store_has_no_current_question() {
        let store = QuestionStore::in_memory(fixed_clock());
        assert!(store.current_question().is_none());
        assert_eq!(store.current_question_type(), QuestionType::Single);
        assert!(store.available_questions().is_empty());
    }

    #[test]
    fn wrong_only_remap_defaults_to_zero() {
        let mut store = store_with(vec![
            draft("A", "1", &["x"]),
            draft("A", "2", &["x"]),
            draft("A", "3", &["x"]),
        ]);
        store.set_current_question(2);
        store.submit_answer("y");
        store.set_training_mode(TrainingMode::WrongOnly);

        assert_eq!(store.available_questions(), vec![2]);
        assert_eq!(store.get_actual_question_index(0), 2);
        assert_eq!(store.get_actual_question_index(5), 0);
        assert_eq!(store.current_question().map(Question::problem), Some("3"));
    }

    #[test]
    fn wrong_only_without_mistakes_has_no_current_question() {
        let mut store = store_with(vec![draft("A", "1", &["x"])]);
        store.submit_answer("x");
        store.set_training_mode(TrainingMode::WrongOnly);
        assert!(store.current_question().is_none());
        assert!(!store.submit_answer("x"));
    }

    #[test]
    fn sections_use_active_namespace() {
        let mut store = store_with(vec![draft("A", "1", &["x"]), draft("B", "2", &["x"])]);
        store.submit_answer("y");

        let groups = store.sections();
        assert_eq!(groups[0].entries[0].status, QuestionStatus::Incorrect);
        assert_eq!(groups[1].entries[0].status, QuestionStatus::Unanswered);

        store.set_training_mode(TrainingMode::WrongOnly);
        let groups = store.sections();
        assert_eq!(groups[0].entries[0].status, QuestionStatus::Unanswered);
    }

    #[test]
    fn counts_use_normal_namespace_only() {
        let mut store = store_with(vec![draft("A", "1", &["x"]), draft("A", "2", &["x"])]);
        store.submit_answer("z");
        store.set_training_mode(TrainingMode::WrongOnly);
        store.submit_answer("x");

        assert_eq!(store.answered_questions(), 1);
        assert_eq!(store.correct_answers(), 0);
        assert_eq!(store.wrong_only_records().correct_count(), 1);
    }
}
