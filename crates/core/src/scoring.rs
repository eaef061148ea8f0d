//! Answer normalization and correctness checks.

/// An answer as submitted by the UI: one label or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedAnswer {
    Single(String),
    Multiple(Vec<String>),
}

impl SubmittedAnswer {
    /// Normalize to a list of labels, keeping submission order.
    #[must_use]
    pub fn into_labels(self) -> Vec<String> {
        match self {
            SubmittedAnswer::Single(label) => vec![label],
            SubmittedAnswer::Multiple(labels) => labels,
        }
    }
}

impl From<String> for SubmittedAnswer {
    fn from(label: String) -> Self {
        Self::Single(label)
    }
}

impl From<&str> for SubmittedAnswer {
    fn from(label: &str) -> Self {
        Self::Single(label.to_string())
    }
}

impl From<Vec<String>> for SubmittedAnswer {
    fn from(labels: Vec<String>) -> Self {
        Self::Multiple(labels)
    }
}

impl From<Vec<&str>> for SubmittedAnswer {
    fn from(labels: Vec<&str>) -> Self {
        Self::Multiple(labels.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for SubmittedAnswer {
    fn from(labels: [&str; N]) -> Self {
        Self::Multiple(labels.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Order-independent comparison of submitted labels against the key.
///
/// Correct when both lists have the same length and every submitted label
/// appears in `correct`. Duplicate submitted labels are not collapsed, so
/// `["x", "x"]` against `["x", "y"]` passes the length check and is scored
/// correct.
#[must_use]
pub fn is_correct(submitted: &[String], correct: &[String]) -> bool {
    submitted.len() == correct.len() && submitted.iter().all(|label| correct.contains(label))
}
