//! Error types for quizkit.
//!
//! Lookups that miss, authoring input that fails validation, and persistence
//! failures each get their own variant so callers can tell a "not found"
//! view apart from a storage problem without string matching.

use std::fmt;

use thiserror::Error;

/// Errors surfaced by the state provider and the test-taking session.
#[derive(Debug, Error)]
pub enum QuizError {
    /// No test with the given id exists in the catalog.
    #[error("test not found: {0}")]
    TestNotFound(String),

    /// No result with the given id exists in the history.
    #[error("result not found: {0}")]
    ResultNotFound(String),

    /// A new test failed authoring validation. Nothing was saved.
    #[error("test failed validation: {0}")]
    Validation(#[from] ValidationErrors),

    /// The mutation for `id` was applied in memory but could not be persisted.
    #[error("could not persist {id}")]
    Write {
        id: String,
        #[source]
        source: WriteError,
    },

    /// The store could not be read at initialization.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// A stored collection is not valid JSON for its type.
    #[error("stored collection '{key}' is corrupt")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A session operation was not valid in the session's current state.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl QuizError {
    /// Returns `true` for lookups that simply found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            QuizError::TestNotFound(_) | QuizError::ResultNotFound(_)
        )
    }
}

/// Failure to write a collection to the data store.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to write '{key}'")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize '{key}'")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to read a collection from the data store.
#[derive(Debug, Error)]
#[error("failed to read '{key}'")]
pub struct ReadError {
    pub key: String,
    #[source]
    pub source: std::io::Error,
}

/// Invalid operations on a test-taking session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the test has not been started")]
    NotStarted,

    #[error("the test has already been started")]
    AlreadyStarted,

    #[error("the test has already been submitted")]
    AlreadySubmitted,

    #[error("question {question_id} has no option {option_id}")]
    UnknownOption {
        question_id: String,
        option_id: String,
    },

    #[error("question {0} is a free-text question")]
    NotAChoiceQuestion(String),

    #[error("question {0} does not take a text answer")]
    NotATextQuestion(String),
}

/// A single field-level authoring problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path, e.g. `title` or `questions[2]`.
    pub field: String,
    pub message: String,
}

/// Every field-level problem found while validating a new test.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The first message reported for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.push("title", "Title is required");
        errors.push("category", "Category is required");
        assert_eq!(
            errors.to_string(),
            "title: Title is required; category: Category is required"
        );
        assert_eq!(errors.message_for("category"), Some("Category is required"));
        assert_eq!(errors.message_for("description"), None);
    }

    #[test]
    fn not_found_classification() {
        assert!(QuizError::TestNotFound("x".into()).is_not_found());
        assert!(QuizError::ResultNotFound("x".into()).is_not_found());
        assert!(!QuizError::Session(SessionError::NotStarted).is_not_found());
    }
}
