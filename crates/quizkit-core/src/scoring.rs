//! Answer correctness and percentage scoring.
//!
//! [`is_correct`] is the one correctness predicate in the system. Submission
//! scoring and the result review both go through it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{Answer, Question, QuestionType, Test};

/// Whether `answer` is a correct answer to `question`.
///
/// Returns `None` for free-text questions, which are never auto-scored.
/// A missing answer is incorrect.
///
/// - `single`: correct iff exactly one option is selected and it is the sole
///   correct option.
/// - `multiple`: correct iff the selected set equals the correct set. Order
///   and duplicates do not matter; no partial credit.
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> Option<bool> {
    let selected = match answer {
        Some(answer) => answer.selected_options.as_slice(),
        None => return question.kind.is_scorable().then_some(false),
    };

    match question.kind {
        QuestionType::Text => None,
        QuestionType::Single => match (selected, question.correct_answers.as_slice()) {
            ([selected], [expected]) => Some(selected == expected),
            _ => Some(false),
        },
        QuestionType::Multiple => {
            let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
            let expected: HashSet<&str> =
                question.correct_answers.iter().map(String::as_str).collect();
            Some(selected == expected)
        }
    }
}

/// Correct and scorable question counts for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub correct: usize,
    pub scorable: usize,
}

impl ScoreBreakdown {
    /// Tally an attempt. Answers are matched to questions by `questionId`.
    pub fn compute(test: &Test, answers: &[Answer]) -> Self {
        let mut correct = 0;
        let mut scorable = 0;

        for question in &test.questions {
            let answer = answers.iter().find(|a| a.question_id == question.id);
            match is_correct(question, answer) {
                Some(true) => {
                    scorable += 1;
                    correct += 1;
                }
                Some(false) => scorable += 1,
                None => {}
            }
        }

        Self { correct, scorable }
    }

    /// `round(100 * correct / scorable)`, rounding halves up.
    ///
    /// A test without scorable questions scores 0.
    pub fn percent(&self) -> u32 {
        if self.scorable == 0 {
            return 0;
        }
        let correct = self.correct as u64;
        let scorable = self.scorable as u64;
        ((correct * 200 + scorable) / (scorable * 2)) as u32
    }
}

/// Percentage score of `answers` against `test`, in `0..=100`.
pub fn score(test: &Test, answers: &[Answer]) -> u32 {
    ScoreBreakdown::compute(test, answers).percent()
}
