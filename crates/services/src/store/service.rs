use std::sync::Arc;

use rand::Rng;

use quiz_core::model::{
    ImportMode, ImportStatus, Question, QuestionDraft, RecordBook, TrainingMode, AnswerResult,
};
use quiz_core::scoring::{self, SubmittedAnswer};
use storage::keys;
use storage::repository::{KeyValueStore, StorageError};

use super::persist::{self, PersistedState, Snapshot};
use crate::Clock;
use crate::error::ImportError;
use crate::import;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load saved data, it may be corrupted";
pub const QUOTA_EXCEEDED_MESSAGE: &str = "Storage quota exceeded, please clear some data";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save data";

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Questions that entered the collection.
    pub added: usize,
    /// Collection size after the import.
    pub total: usize,
}

/// Question collection, answers and training state for one user.
///
/// Every mutation that touches questions, records or mode writes the full
/// state back to the key-value backend. Save failures never roll back
/// in-memory state; they surface through [`QuestionStore::import_status`].
///
/// All methods take `&mut self` and finish before returning. Share across
/// threads only behind a single lock.
pub struct QuestionStore {
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
    pub(super) questions: Vec<Question>,
    pub(super) current_index: usize,
    pub(super) normal: RecordBook,
    pub(super) wrong_only: RecordBook,
    pub(super) mode: TrainingMode,
    pub(super) settings_open: bool,
    pub(super) import_status: ImportStatus,
}

impl QuestionStore {
    /// Load persisted state from `kv`, falling back to defaults.
    ///
    /// Entries with the wrong shape are skipped individually. If the load as
    /// a whole fails, the store's keys are removed on a best-effort basis and
    /// an error status is set. Never fails.
    #[must_use]
    pub fn load(kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let (state, import_status) = match persist::load_state(kv.as_ref()) {
            Ok(state) => (state, ImportStatus::default()),
            Err(err) => {
                tracing::error!(error = %err, "failed to load quiz state");
                if let Err(cleanup) = persist::remove_keys(kv.as_ref(), &keys::ALL_KEYS) {
                    tracing::error!(error = %cleanup, "failed to clear corrupted quiz state");
                }
                (
                    PersistedState::default(),
                    ImportStatus::error(LOAD_FAILED_MESSAGE),
                )
            }
        };

        tracing::debug!(
            questions = state.questions.len(),
            answered = state.normal.answered_count(),
            mode = %state.mode,
            "quiz state loaded"
        );

        Self {
            kv,
            clock,
            questions: state.questions,
            current_index: 0,
            normal: state.normal,
            wrong_only: state.wrong_only,
            mode: state.mode,
            settings_open: false,
            import_status,
        }
    }

    /// Store backed by a fresh in-memory backend.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::load(Arc::new(storage::InMemoryStore::new()), clock)
    }

    //
    // ─── PERSISTENCE ───────────────────────────────────────────────────────────
    //

    /// Write the full state. Failures only change the status.
    fn persist(&mut self) {
        let snapshot = Snapshot {
            questions: &self.questions,
            normal: &self.normal,
            wrong_only: &self.wrong_only,
            mode: self.mode,
        };
        if let Err(err) = persist::save_state(self.kv.as_ref(), &snapshot) {
            self.report_save_failure(&err);
        }
    }

    fn report_save_failure(&mut self, err: &StorageError) {
        tracing::error!(error = %err, "failed to save quiz state");
        self.import_status = if err.is_quota_exceeded() {
            ImportStatus::error(QUOTA_EXCEEDED_MESSAGE)
        } else {
            ImportStatus::error(SAVE_FAILED_MESSAGE)
        };
    }

    //
    // ─── IMPORT ────────────────────────────────────────────────────────────────
    //

    /// Import questions, replacing or extending the collection.
    ///
    /// The whole batch is validated first; on error the collection is left
    /// untouched and the error is also set as the status. In append mode a
    /// question is skipped when its section and problem already exist in the
    /// collection as it was before this import.
    ///
    /// # Errors
    ///
    /// Returns `ImportError` naming the first invalid question (1-based).
    pub fn import_questions(
        &mut self,
        drafts: Vec<QuestionDraft>,
        mode: ImportMode,
    ) -> Result<ImportSummary, ImportError> {
        let incoming = match import::validate_batch(drafts) {
            Ok(questions) => questions,
            Err(err) => return Err(self.reject_import(err)),
        };

        let summary = match mode {
            ImportMode::Replace => {
                let total = incoming.len();
                self.questions = incoming;
                self.import_status = ImportStatus::success(format!(
                    "Imported {total} questions in their original order"
                ));
                ImportSummary {
                    added: total,
                    total,
                }
            }
            ImportMode::Append => {
                let existing = self.questions.len();
                let fresh: Vec<Question> = incoming
                    .into_iter()
                    .filter(|q| !self.questions.iter().any(|e| e.is_duplicate_of(q)))
                    .collect();
                self.questions.extend(fresh);
                let total = self.questions.len();
                let added = total - existing;
                self.import_status = ImportStatus::success(format!(
                    "Appended {added} new questions, {total} in total"
                ));
                ImportSummary { added, total }
            }
        };

        tracing::info!(?mode, added = summary.added, total = summary.total, "questions imported");
        self.persist();
        Ok(summary)
    }

    /// Import from raw JSON text (a list of question objects).
    ///
    /// # Errors
    ///
    /// Returns `ImportError` if the text is not a JSON list or any element is
    /// invalid. Nothing is changed on error.
    pub fn import_json(&mut self, text: &str, mode: ImportMode) -> Result<ImportSummary, ImportError> {
        match import::parse_drafts(text) {
            Ok(drafts) => self.import_questions(drafts, mode),
            Err(err) => Err(self.reject_import(err)),
        }
    }

    fn reject_import(&mut self, err: ImportError) -> ImportError {
        tracing::warn!(error = %err, "question import rejected");
        self.import_status = ImportStatus::error(err.to_string());
        err
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to `display_index` within the available questions. Out-of-range
    /// indices are ignored.
    pub fn set_current_question(&mut self, display_index: usize) {
        if display_index < self.available_question_count() {
            self.current_index = display_index;
        }
    }

    pub fn next_question(&mut self) {
        self.set_current_question(self.current_index.saturating_add(1));
    }

    pub fn previous_question(&mut self) {
        if let Some(prev) = self.current_index.checked_sub(1) {
            self.set_current_question(prev);
        }
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Score and record an answer for the current question.
    ///
    /// Returns whether the answer was correct; returns `false` without
    /// recording anything when there is no current question. The record goes
    /// to the active namespace at the question's actual index.
    pub fn submit_answer(&mut self, answer: impl Into<SubmittedAnswer>) -> bool {
        let Some(index) = self.current_actual_index() else {
            return false;
        };
        let Some(question) = self.questions.get(index) else {
            return false;
        };

        let user_answer = answer.into().into_labels();
        let correct_answer = question.answer().to_vec();
        let is_correct = scoring::is_correct(&user_answer, &correct_answer);

        let result = AnswerResult {
            user_answer,
            correct_answer,
            is_correct,
            submitted_at: self.clock.now(),
        };
        self.active_book_mut().record(index, result);
        tracing::debug!(index, is_correct, mode = %self.mode, "answer submitted");

        self.persist();
        is_correct
    }

    /// Drop normal-mode answers and results and go back to the first
    /// question. Wrong-only records and questions are kept.
    pub fn reset_progress(&mut self) {
        self.normal.clear();
        self.current_index = 0;
        self.persist();
    }

    /// Remove questions and both namespaces, in memory and in the backend.
    ///
    /// A backend failure is reported through the status like a failed save.
    pub fn clear_all_data(&mut self) {
        self.questions.clear();
        self.normal.clear();
        self.wrong_only.clear();
        self.current_index = 0;
        match persist::remove_keys(self.kv.as_ref(), &keys::DATA_KEYS) {
            Ok(()) => tracing::info!("all quiz data cleared"),
            Err(err) => self.report_save_failure(&err),
        }
    }

    /// Fold wrong-only records into the normal namespace, overwriting normal
    /// entries at the same index, then empty the wrong-only namespace.
    pub fn merge_wrong_answers(&mut self) {
        let merged = self.wrong_only.answered_count();
        self.normal.absorb(&mut self.wrong_only);
        tracing::info!(merged, "wrong-only records merged");
        self.persist();
    }

    //
    // ─── ORDERING & MODE ───────────────────────────────────────────────────────
    //

    /// Shuffle the collection with the thread-local RNG.
    pub fn shuffle_questions(&mut self) {
        self.shuffle_questions_with(&mut rand::rng());
    }

    /// Shuffle the collection, moving every record along with its question.
    pub fn shuffle_questions_with<R: Rng>(&mut self, rng: &mut R) {
        let order = permutation(self.questions.len(), rng);

        let mut slots: Vec<Option<Question>> =
            std::mem::take(&mut self.questions).into_iter().map(Some).collect();
        self.questions = order
            .iter()
            .filter_map(|&old| slots.get_mut(old).and_then(Option::take))
            .collect();
        self.normal.reindex(&order);
        self.wrong_only.reindex(&order);
        self.current_index = 0;

        tracing::debug!(count = self.questions.len(), "questions shuffled");
        self.persist();
    }

    /// Switch training mode. Records are untouched; the display index and
    /// the status are reset.
    pub fn set_training_mode(&mut self, mode: TrainingMode) {
        self.mode = mode;
        self.current_index = 0;
        self.import_status = ImportStatus::default();
        tracing::debug!(%mode, "training mode changed");
        self.persist();
    }

    //
    // ─── UI FLAGS ──────────────────────────────────────────────────────────────
    //

    pub fn clear_import_status(&mut self) {
        self.import_status = ImportStatus::default();
    }

    pub fn set_settings_open(&mut self, open: bool) {
        self.settings_open = open;
    }

    pub fn toggle_settings(&mut self) {
        self.settings_open = !self.settings_open;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    pub(super) fn active_book_mut(&mut self) -> &mut RecordBook {
        if self.mode.is_wrong_only() {
            &mut self.wrong_only
        } else {
            &mut self.normal
        }
    }
}

/// Fisher–Yates: `result[new] = old`, uniform over all permutations.
fn permutation<R: Rng>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = rng.random_range(0..=i);
        indices.swap(i, j);
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn permutation_covers_every_index_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in [0, 1, 2, 5, 40] {
            let mut order = permutation(len, &mut rng);
            order.sort_unstable();
            assert_eq!(order, (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn permutation_reaches_every_arrangement_of_three() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(permutation(3, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }
}
