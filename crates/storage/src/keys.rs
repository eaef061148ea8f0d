//! Key names under which the quiz state is persisted.

/// Schema marker written on every save.
pub const DATA_VERSION: &str = "dataVersion";
pub const QUESTIONS: &str = "studyQuestions";
pub const USER_ANSWERS: &str = "userAnswers";
pub const QUESTION_RESULTS: &str = "questionResults";
pub const TRAINING_MODE: &str = "trainingMode";
pub const WRONG_ONLY_ANSWERS: &str = "wrongOnlyAnswers";
pub const WRONG_ONLY_RESULTS: &str = "wrongOnlyResults";

/// Value written to [`DATA_VERSION`].
pub const CURRENT_VERSION: &str = "2.0";

/// Versions that load without a warning. `1.0` predates the wrong-only keys.
pub const COMPATIBLE_VERSIONS: [&str; 2] = ["1.0", CURRENT_VERSION];

/// Keys holding questions and records; removed by a full clear.
pub const DATA_KEYS: [&str; 5] = [
    QUESTIONS,
    USER_ANSWERS,
    QUESTION_RESULTS,
    WRONG_ONLY_ANSWERS,
    WRONG_ONLY_RESULTS,
];

/// Every key the quiz state owns.
pub const ALL_KEYS: [&str; 7] = [
    DATA_VERSION,
    QUESTIONS,
    USER_ANSWERS,
    QUESTION_RESULTS,
    TRAINING_MODE,
    WRONG_ONLY_ANSWERS,
    WRONG_ONLY_RESULTS,
];
