use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrainingModeError {
    #[error("unknown training mode: {0}")]
    Unknown(String),
}

/// How the user is working through the collection.
///
/// - `Normal`: every question, in collection order.
/// - `Memorize`: same ordering as `Normal`; answers are not gated by the UI.
/// - `WrongOnly`: only questions whose normal-mode result is incorrect, with
///   answers recorded in a separate namespace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingMode {
    #[default]
    Normal,
    Memorize,
    WrongOnly,
}

impl TrainingMode {
    pub const ALL: [TrainingMode; 3] = [Self::Normal, Self::Memorize, Self::WrongOnly];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrainingMode::Normal => "normal",
            TrainingMode::Memorize => "memorize",
            TrainingMode::WrongOnly => "wrong_only",
        }
    }

    /// True when answers go to the wrong-only namespace and navigation is
    /// restricted to previously incorrect questions.
    #[must_use]
    pub fn is_wrong_only(self) -> bool {
        matches!(self, TrainingMode::WrongOnly)
    }
}

impl fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrainingMode {
    type Err = TrainingModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| TrainingModeError::Unknown(s.to_string()))
    }
}

/// How an import combines with the existing collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportMode {
    /// Overwrite the collection, keeping input order.
    #[default]
    Replace,
    /// Add questions whose (section, problem) pair is not already present.
    Append,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!("normal".parse::<TrainingMode>().unwrap(), TrainingMode::Normal);
        assert_eq!(
            "wrong_only".parse::<TrainingMode>().unwrap(),
            TrainingMode::WrongOnly
        );
        assert!(matches!(
            "WrongOnly".parse::<TrainingMode>(),
            Err(TrainingModeError::Unknown(_))
        ));
    }

    #[test]
    fn serde_matches_display() {
        for mode in TrainingMode::ALL {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
    }
}
