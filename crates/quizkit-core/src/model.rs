//! Core data model types for quizkit.
//!
//! These are the types persisted in the data store and shared by every other
//! part of the system: tests, their questions and options, the answers given
//! during an attempt, and the stored outcome of that attempt.
//!
//! Field names serialize in camelCase (`timeLimit`, `correctAnswers`, ...) so
//! the stored JSON keeps a single stable shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Unique within the owning question.
    pub id: String,
    /// Text shown to the test taker.
    pub text: String,
}

/// How a question is answered and scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    /// Exactly one option is correct.
    Single,
    /// One or more options are correct; all must be selected.
    Multiple,
    /// Free text, never auto-scored.
    Text,
}

impl QuestionType {
    /// Whether questions of this type count toward the score.
    pub fn is_scorable(self) -> bool {
        !matches!(self, QuestionType::Text)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Single => write!(f, "single"),
            QuestionType::Multiple => write!(f, "multiple"),
            QuestionType::Text => write!(f, "text"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" | "single-choice" => Ok(QuestionType::Single),
            "multiple" | "multiple-choice" | "multi" => Ok(QuestionType::Multiple),
            "text" | "free-text" => Ok(QuestionType::Text),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A single quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Ordered options; empty for text questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<AnswerOption>,
    /// Ids of the correct options; empty for text questions.
    #[serde(default)]
    pub correct_answers: Vec<String>,
}

impl Question {
    /// Look up an option by id.
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Whether `option_id` is one of the correct answers.
    pub fn is_correct_option(&self, option_id: &str) -> bool {
        self.correct_answers.iter().any(|id| id == option_id)
    }
}

/// Difficulty label shown in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// An authored test, as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Time limit in minutes. `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub questions: Vec<Question>,
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl Test {
    /// Time limit converted to seconds.
    pub fn time_limit_secs(&self) -> Option<u64> {
        self.time_limit.map(|minutes| u64::from(minutes) * 60)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }

    /// Number of questions that count toward the score.
    pub fn scorable_count(&self) -> usize {
        self.questions.iter().filter(|q| q.kind.is_scorable()).count()
    }
}

/// A test before the state provider has assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTest {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub questions: Vec<Question>,
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

impl NewTest {
    pub fn with_id(self, id: String) -> Test {
        Test {
            id,
            title: self.title,
            description: self.description,
            time_limit: self.time_limit,
            questions: self.questions,
            category: self.category,
            difficulty: self.difficulty,
            created_at: self.created_at,
        }
    }
}

/// The answer given to one question during an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub question_id: String,
    /// Selected option ids, in selection order.
    #[serde(default)]
    pub selected_options: Vec<String>,
    #[serde(default)]
    pub text_answer: String,
}

impl Answer {
    /// An answer with nothing selected and no text.
    pub fn blank(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            selected_options: Vec::new(),
            text_answer: String::new(),
        }
    }

    pub fn is_selected(&self, option_id: &str) -> bool {
        self.selected_options.iter().any(|id| id == option_id)
    }
}

/// The stored outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub id: String,
    /// Weak reference; the test may no longer resolve.
    pub test_id: String,
    pub answers: Vec<Answer>,
    /// Integer percentage in `0..=100`.
    pub score: u32,
    /// Seconds spent in the attempt.
    pub time_taken: u64,
    pub date: DateTime<Utc>,
}

impl TestResult {
    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }
}

/// A result before the state provider has assigned an id and a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestResult {
    pub test_id: String,
    pub answers: Vec<Answer>,
    pub score: u32,
    pub time_taken: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::Single.to_string(), "single");
        assert_eq!("Multiple".parse::<QuestionType>().unwrap(), QuestionType::Multiple);
        assert_eq!("free-text".parse::<QuestionType>().unwrap(), QuestionType::Text);
        assert!("essay".parse::<QuestionType>().is_err());
        assert!(!QuestionType::Text.is_scorable());
    }

    #[test]
    fn difficulty_parse() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let test = Test {
            id: "t1".into(),
            title: "Rust".into(),
            description: "Ownership".into(),
            time_limit: Some(5),
            questions: vec![Question {
                id: "q1".into(),
                text: "Explain borrowing".into(),
                kind: QuestionType::Text,
                options: vec![],
                correct_answers: vec![],
            }],
            category: "Programming".into(),
            difficulty: Difficulty::Hard,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&test).unwrap();
        assert_eq!(json["timeLimit"], 5);
        assert_eq!(json["questions"][0]["type"], "text");
        assert!(json["questions"][0].get("options").is_none());
        assert_eq!(json["questions"][0]["correctAnswers"], serde_json::json!([]));
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["difficulty"], "hard");
    }

    #[test]
    fn absent_time_limit_means_unlimited() {
        let json = r#"{
            "id": "t1", "title": "T", "description": "D", "category": "C",
            "difficulty": "easy", "createdAt": "2024-01-01T00:00:00Z",
            "questions": []
        }"#;
        let test: Test = serde_json::from_str(json).unwrap();
        assert_eq!(test.time_limit, None);
        assert_eq!(test.time_limit_secs(), None);
    }

    #[test]
    fn result_reads_missing_answer_fields_as_empty() {
        let json = r#"{
            "id": "r1", "testId": "t1", "score": 50, "timeTaken": 12,
            "date": "2024-01-01T00:00:00Z",
            "answers": [{ "questionId": "q1" }]
        }"#;
        let result: TestResult = serde_json::from_str(json).unwrap();
        let answer = result.answer_for("q1").unwrap();
        assert!(answer.selected_options.is_empty());
        assert!(answer.text_answer.is_empty());
    }
}
