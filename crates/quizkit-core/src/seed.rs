//! The sample catalog installed when no tests are stored yet.

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::model::{AnswerOption, Difficulty, Question, QuestionType, Test};

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A choice question; `correct` holds indices into `options`.
fn choice(kind: QuestionType, text: &str, options: &[&str], correct: &[usize]) -> Question {
    let options: Vec<AnswerOption> = options
        .iter()
        .map(|text| AnswerOption {
            id: new_id(),
            text: (*text).to_string(),
        })
        .collect();
    let correct_answers = correct.iter().map(|&i| options[i].id.clone()).collect();
    Question {
        id: new_id(),
        text: text.to_string(),
        kind,
        options,
        correct_answers,
    }
}

fn free_text(text: &str) -> Question {
    Question {
        id: new_id(),
        text: text.to_string(),
        kind: QuestionType::Text,
        options: Vec::new(),
        correct_answers: Vec::new(),
    }
}

/// Three starter tests across two categories.
pub fn sample_tests() -> Vec<Test> {
    let now = Utc::now();
    vec![
        Test {
            id: new_id(),
            title: "Web Development Basics".into(),
            description: "Test your knowledge of fundamental web development concepts \
                          including HTML, CSS, and JavaScript."
                .into(),
            time_limit: Some(15),
            category: "Programming".into(),
            difficulty: Difficulty::Easy,
            created_at: now - Duration::days(7),
            questions: vec![
                choice(
                    QuestionType::Single,
                    "What does HTML stand for?",
                    &[
                        "Hyper Text Markup Language",
                        "High Tech Modern Language",
                        "Hyper Transfer Markup Language",
                        "Home Tool Markup Language",
                    ],
                    &[0],
                ),
                choice(
                    QuestionType::Multiple,
                    "Which of the following are valid CSS selectors?",
                    &[".class", "#id", "*element", "element > child"],
                    &[0, 1, 3],
                ),
                free_text("Explain the difference between let, const, and var in JavaScript."),
            ],
        },
        Test {
            id: new_id(),
            title: "React Fundamentals".into(),
            description: "Test your understanding of React core concepts and hooks.".into(),
            time_limit: Some(20),
            category: "Programming".into(),
            difficulty: Difficulty::Medium,
            created_at: now - Duration::days(3),
            questions: vec![
                choice(
                    QuestionType::Single,
                    "What is JSX?",
                    &[
                        "JavaScript XML",
                        "Java Syntax Extension",
                        "JavaScript Extension",
                        "JSON XML Syntax",
                    ],
                    &[0],
                ),
                choice(
                    QuestionType::Multiple,
                    "Which of the following are React hooks?",
                    &["useState", "useContext", "useHistory", "useComponent"],
                    &[0, 1, 2],
                ),
                free_text("What is the virtual DOM and why is it important?"),
            ],
        },
        Test {
            id: new_id(),
            title: "Basic Mathematics".into(),
            description: "Test your knowledge of basic mathematical concepts and \
                          problem-solving abilities."
                .into(),
            time_limit: Some(30),
            category: "Mathematics".into(),
            difficulty: Difficulty::Medium,
            created_at: now - Duration::days(14),
            questions: vec![
                choice(
                    QuestionType::Single,
                    "What is the value of x in the equation 2x + 5 = 15?",
                    &["5", "10", "7.5", "4"],
                    &[0],
                ),
                choice(
                    QuestionType::Multiple,
                    "Which of the following are prime numbers?",
                    &["2", "4", "7", "9"],
                    &[0, 2],
                ),
                free_text("Solve for the area of a circle with radius 7cm. Show your work."),
            ],
        },
    ]
}
