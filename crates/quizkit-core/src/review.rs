//! Result review: per-question correctness of a stored result.
//!
//! Verdicts come from [`crate::scoring::is_correct`], the same predicate used
//! when the attempt was scored, so a review can never disagree with the
//! stored score.

use serde::Serialize;

use crate::model::{Answer, AnswerOption, Question, Test, TestResult};
use crate::scoring::{self, ScoreBreakdown};

/// Correctness of one reviewed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Free-text answers are not auto-scored.
    Ungraded,
}

/// How a single option is highlighted in the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionMark {
    SelectedCorrect,
    SelectedWrong,
    MissedCorrect,
    Neutral,
}

/// Coarse score grading used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn of(score: u32) -> Self {
        match score {
            80.. => ScoreBand::Good,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewedOption<'a> {
    pub option: &'a AnswerOption,
    pub mark: OptionMark,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionReview<'a> {
    /// Zero-based position in the test.
    pub index: usize,
    pub question: &'a Question,
    pub answer: Option<&'a Answer>,
    pub verdict: Verdict,
    pub options: Vec<ReviewedOption<'a>>,
}

/// A stored result laid out against its test.
#[derive(Debug, Clone, Serialize)]
pub struct ResultReview<'a> {
    pub test: &'a Test,
    pub result: &'a TestResult,
    pub band: ScoreBand,
    pub questions: Vec<QuestionReview<'a>>,
}

impl<'a> ResultReview<'a> {
    pub fn build(test: &'a Test, result: &'a TestResult) -> Self {
        let questions = test
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answer = result.answer_for(&question.id);
                let verdict = match scoring::is_correct(question, answer) {
                    Some(true) => Verdict::Correct,
                    Some(false) => Verdict::Incorrect,
                    None => Verdict::Ungraded,
                };
                let options = question
                    .options
                    .iter()
                    .map(|option| ReviewedOption {
                        option,
                        mark: mark_option(question, answer, &option.id),
                    })
                    .collect();
                QuestionReview {
                    index,
                    question,
                    answer,
                    verdict,
                    options,
                }
            })
            .collect();

        Self {
            test,
            result,
            band: ScoreBand::of(result.score),
            questions,
        }
    }

    /// Correct and scorable counts re-derived from the stored answers.
    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown::compute(self.test, &self.result.answers)
    }

    /// The score re-derived from the stored answers.
    pub fn rescored(&self) -> u32 {
        self.breakdown().percent()
    }

    /// Whether the stored score matches a fresh scoring of the answers.
    pub fn is_consistent(&self) -> bool {
        self.rescored() == self.result.score
    }
}

fn mark_option(question: &Question, answer: Option<&Answer>, option_id: &str) -> OptionMark {
    let selected = answer.is_some_and(|a| a.is_selected(option_id));
    let correct = question.is_correct_option(option_id);
    match (selected, correct) {
        (true, true) => OptionMark::SelectedCorrect,
        (true, false) => OptionMark::SelectedWrong,
        (false, true) => OptionMark::MissedCorrect,
        (false, false) => OptionMark::Neutral,
    }
}

/// Countdown format: `m:ss`.
pub fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed-time format: `Xm Ys`.
pub fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
