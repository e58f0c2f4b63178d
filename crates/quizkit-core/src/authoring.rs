//! Test authoring: TOML test files, question drafts, and validation.
//!
//! A test file looks like:
//!
//! ```toml
//! [test]
//! title = "Rust Basics"
//! description = "Ownership and borrowing"
//! category = "Programming"
//! difficulty = "easy"
//! time_limit = 10
//!
//! [[questions]]
//! text = "Which keyword declares an immutable binding?"
//! type = "single"
//! options = [{ text = "let", correct = true }, { text = "mut" }]
//! ```
//!
//! Question and option ids are generated at parse time. Parsing never
//! validates; run [`validate_new_test`] before handing the result to the
//! state provider.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ValidationErrors;
use crate::model::{AnswerOption, Difficulty, NewTest, Question, QuestionType};

/// Intermediate TOML structure for parsing test files.
#[derive(Debug, Deserialize)]
struct TomlTestFile {
    test: TomlTestHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default = "default_difficulty_str")]
    difficulty: String,
    #[serde(default)]
    time_limit: Option<u32>,
}

fn default_difficulty_str() -> String {
    "medium".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    text: String,
    #[serde(rename = "type", default = "default_type_str")]
    kind: String,
    #[serde(default)]
    options: Vec<TomlOption>,
}

fn default_type_str() -> String {
    "single".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlOption {
    #[serde(default)]
    text: String,
    #[serde(default)]
    correct: bool,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a single TOML test file.
pub fn parse_test_file(path: &Path) -> Result<NewTest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read test file: {}", path.display()))?;

    parse_test_str(&content, path)
}

/// Parse a TOML string into a `NewTest` (useful for testing).
pub fn parse_test_str(content: &str, source_path: &Path) -> Result<NewTest> {
    let parsed: TomlTestFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let difficulty: Difficulty = parsed
        .test
        .difficulty
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let kind: QuestionType = q.kind.parse().map_err(|e: String| anyhow::anyhow!("{}", e))?;
            let mut draft = QuestionDraft::new(kind);
            draft.text = q.text;
            if kind != QuestionType::Text {
                draft.options.clear();
                for option in q.options {
                    let id = draft.add_option();
                    draft.set_option_text(&id, &option.text);
                    if option.correct {
                        draft.correct_answers.push(id);
                    }
                }
            }
            Ok(draft.into_question())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NewTest {
        title: parsed.test.title,
        description: parsed.test.description,
        time_limit: parsed.test.time_limit,
        questions,
        category: parsed.test.category,
        difficulty,
        created_at: Utc::now(),
    })
}

/// Recursively load all `.toml` test files from a directory.
///
/// Files that fail to parse are skipped with a warning. Use
/// [`scan_test_directory`] to see the failures.
pub fn load_test_directory(dir: &Path) -> Result<Vec<NewTest>> {
    let mut tests = Vec::new();
    for (path, parsed) in scan_test_directory(dir)? {
        match parsed {
            Ok(test) => tests.push(test),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }
    Ok(tests)
}

/// Parse every `.toml` file under `dir`, in path order, keeping each
/// file's outcome.
pub fn scan_test_directory(dir: &Path) -> Result<Vec<(PathBuf, Result<NewTest>)>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    let mut scanned = Vec::new();
    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            scanned.extend(scan_test_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            let parsed = parse_test_file(&path);
            scanned.push((path, parsed));
        }
    }

    Ok(scanned)
}

// ---------------------------------------------------------------------------
// Question drafts
// ---------------------------------------------------------------------------

/// A question being edited in the creation form.
///
/// The editing methods are library API for interactive editors. The CLI
/// builds tests from TOML files and goes through [`parse_test_file`]
/// instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: String,
    pub text: String,
    pub kind: QuestionType,
    pub options: Vec<AnswerOption>,
    pub correct_answers: Vec<String>,
}

impl QuestionDraft {
    /// A blank question. Choice questions start with two empty options.
    pub fn new(kind: QuestionType) -> Self {
        let options = if kind == QuestionType::Text {
            Vec::new()
        } else {
            (0..2)
                .map(|_| AnswerOption {
                    id: new_id(),
                    text: String::new(),
                })
                .collect()
        };
        Self {
            id: new_id(),
            text: String::new(),
            kind,
            options,
            correct_answers: Vec::new(),
        }
    }

    /// Append an empty option and return its id.
    pub fn add_option(&mut self) -> String {
        let id = new_id();
        self.options.push(AnswerOption {
            id: id.clone(),
            text: String::new(),
        });
        id
    }

    /// Remove an option; it is also dropped from the correct answers.
    pub fn remove_option(&mut self, option_id: &str) {
        self.options.retain(|o| o.id != option_id);
        self.correct_answers.retain(|id| id != option_id);
    }

    pub fn set_option_text(&mut self, option_id: &str, text: &str) {
        if let Some(option) = self.options.iter_mut().find(|o| o.id == option_id) {
            option.text = text.to_string();
        }
    }

    /// Mark or unmark `option_id` as correct.
    ///
    /// Single-choice replaces the correct answer; multiple-choice toggles it;
    /// free-text questions ignore the call.
    pub fn toggle_correct(&mut self, option_id: &str) {
        match self.kind {
            QuestionType::Single => self.correct_answers = vec![option_id.to_string()],
            QuestionType::Multiple => {
                if let Some(pos) = self.correct_answers.iter().position(|id| id == option_id) {
                    self.correct_answers.remove(pos);
                } else {
                    self.correct_answers.push(option_id.to_string());
                }
            }
            QuestionType::Text => {}
        }
    }

    /// Switch the question type, normalizing options and correct answers.
    ///
    /// To single keeps only the first correct answer; to text drops options
    /// and correct answers; single to multiple keeps the selection.
    pub fn change_type(&mut self, kind: QuestionType) {
        match kind {
            QuestionType::Single => self.correct_answers.truncate(1),
            QuestionType::Text => {
                self.options.clear();
                self.correct_answers.clear();
            }
            QuestionType::Multiple => {}
        }
        self.kind = kind;
    }

    pub fn into_question(self) -> Question {
        Question {
            id: self.id,
            text: self.text,
            kind: self.kind,
            options: self.options,
            correct_answers: self.correct_answers,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a new test against the authoring rules.
///
/// Every problem is reported against its field. The `questions` field gets a
/// single summary message; the specific problem for question `i` is reported
/// under `questions[i]`.
pub fn validate_new_test(test: &NewTest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if test.title.trim().is_empty() {
        errors.push("title", "Title is required");
    }
    if test.description.trim().is_empty() {
        errors.push("description", "Description is required");
    }
    if test.category.trim().is_empty() {
        errors.push("category", "Category is required");
    }
    if test.time_limit == Some(0) {
        errors.push("timeLimit", "Time limit must be a positive number of minutes");
    }

    if test.questions.is_empty() {
        errors.push("questions", "At least one question is required");
    } else {
        let mut question_errors = ValidationErrors::default();
        for (index, question) in test.questions.iter().enumerate() {
            if let Some(message) = question_problem(question) {
                question_errors.push(format!("questions[{index}]"), message);
            }
        }
        if !question_errors.is_empty() {
            errors.push("questions", "Please complete all questions and options");
            errors.errors.extend(question_errors.errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn question_problem(question: &Question) -> Option<String> {
    if question.text.trim().is_empty() {
        return Some("question text is required".into());
    }

    if question.kind == QuestionType::Text {
        if !question.options.is_empty() || !question.correct_answers.is_empty() {
            return Some("free-text questions take no options or correct answers".into());
        }
        return None;
    }

    if question.options.len() < 2 {
        return Some("at least two options are required".into());
    }
    if question.options.iter().any(|o| o.text.trim().is_empty()) {
        return Some("every option needs text".into());
    }

    let mut seen = HashSet::new();
    if let Some(dup) = question.options.iter().find(|o| !seen.insert(o.id.as_str())) {
        return Some(format!("duplicate option id: {}", dup.id));
    }
    if let Some(stray) = question
        .correct_answers
        .iter()
        .find(|id| question.option(id).is_none())
    {
        return Some(format!("correct answer {stray} is not one of the options"));
    }

    match question.kind {
        QuestionType::Single if question.correct_answers.len() != 1 => {
            Some("single-choice questions need exactly one correct answer".into())
        }
        QuestionType::Multiple if question.correct_answers.is_empty() => {
            Some("multiple-choice questions need at least one correct answer".into())
        }
        _ => None,
    }
}
