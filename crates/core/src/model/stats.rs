use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::{Question, QuestionStatus, ResultMap};

pub const UNKNOWN_SECTION: &str = "Unknown section";
pub const UNKNOWN_PROBLEM: &str = "Unknown problem";

/// One incorrectly answered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongQuestion {
    pub index: usize,
    pub section: String,
    pub problem: String,
    pub user_answer: Vec<String>,
    pub correct_answer: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Summary of incorrect results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrongQuestionStats {
    pub total: usize,
    pub questions: Vec<WrongQuestion>,
    /// Incorrect count per section name.
    pub section_stats: BTreeMap<String, usize>,
}

impl WrongQuestionStats {
    /// Collect every incorrect entry of `results`, resolving text from
    /// `questions`. Missing questions get placeholder text.
    #[must_use]
    pub fn from_results(questions: &[Question], results: &ResultMap) -> Self {
        let wrong: Vec<WrongQuestion> = results
            .iter()
            .filter(|(_, result)| !result.is_correct)
            .map(|(&index, result)| {
                let question = questions.get(index);
                WrongQuestion {
                    index,
                    section: question.map_or(UNKNOWN_SECTION, Question::section).to_string(),
                    problem: question.map_or(UNKNOWN_PROBLEM, Question::problem).to_string(),
                    user_answer: result.user_answer.clone(),
                    correct_answer: result.correct_answer.clone(),
                    submitted_at: result.submitted_at,
                }
            })
            .collect();

        let mut section_stats = BTreeMap::new();
        for item in &wrong {
            *section_stats.entry(item.section.clone()).or_insert(0) += 1;
        }

        Self {
            total: wrong.len(),
            questions: wrong,
            section_stats,
        }
    }
}

/// A question inside a section view, with its actual index and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntry {
    pub index: usize,
    pub question: Question,
    pub status: QuestionStatus,
}

/// Questions sharing a section name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionGroup {
    pub name: String,
    pub entries: Vec<SectionEntry>,
}

/// Group `questions` by section in first-seen order.
pub fn group_sections(
    questions: &[Question],
    status_of: impl Fn(usize) -> QuestionStatus,
) -> Vec<SectionGroup> {
    let mut groups: Vec<SectionGroup> = Vec::new();
    for (index, question) in questions.iter().enumerate() {
        let entry = SectionEntry {
            index,
            question: question.clone(),
            status: status_of(index),
        };
        match groups.iter_mut().find(|g| g.name == question.section()) {
            Some(group) => group.entries.push(entry),
            None => groups.push(SectionGroup {
                name: question.section().to_string(),
                entries: vec![entry],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerResult;
    use crate::time::fixed_now;

    fn question(section: &str, problem: &str) -> Question {
        Question::new(section, problem, vec!["x".into()], vec!["x".into()]).unwrap()
    }

    fn wrong() -> AnswerResult {
        AnswerResult {
            user_answer: vec!["y".into()],
            correct_answer: vec!["x".into()],
            is_correct: false,
            submitted_at: fixed_now(),
        }
    }

    #[test]
    fn stats_count_incorrect_per_section() {
        let questions = vec![question("A", "P1"), question("B", "P2"), question("A", "P3")];
        let mut results = ResultMap::new();
        results.insert(0, wrong());
        results.insert(2, wrong());
        results.insert(
            1,
            AnswerResult {
                is_correct: true,
                ..wrong()
            },
        );

        let stats = WrongQuestionStats::from_results(&questions, &results);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.section_stats.get("A"), Some(&2));
        assert!(!stats.section_stats.contains_key("B"));
        assert_eq!(stats.questions[1].problem, "P3");
    }

    #[test]
    fn missing_question_uses_placeholders() {
        let mut results = ResultMap::new();
        results.insert(7, wrong());
        let stats = WrongQuestionStats::from_results(&[], &results);
        assert_eq!(stats.questions[0].section, UNKNOWN_SECTION);
        assert_eq!(stats.questions[0].problem, UNKNOWN_PROBLEM);
        assert_eq!(stats.section_stats.get(UNKNOWN_SECTION), Some(&1));
    }

    #[test]
    fn sections_keep_first_seen_order() {
        let questions = vec![question("B", "1"), question("A", "2"), question("B", "3")];
        let groups = group_sections(&questions, |i| {
            if i == 2 {
                QuestionStatus::Correct
            } else {
                QuestionStatus::Unanswered
            }
        });
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "B");
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].entries[1].index, 2);
        assert_eq!(groups[0].entries[1].status, QuestionStatus::Correct);
        assert_eq!(groups[1].name, "A");
    }
}
