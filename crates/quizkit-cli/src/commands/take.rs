//! The `quizkit take` command: an interactive, timed session on stdin.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::error::QuizError;
use quizkit_core::model::QuestionType;
use quizkit_core::review::{format_clock, format_duration};
use quizkit_core::session::TestSession;
use quizkit_runner::{run_session, SessionEnd, SessionObserver, StdinSource};

use super::time_limit_label;

const HELP: &str = "Commands: start, next, prev, goto N, pick N, text <answer>, submit, quit";

/// Prints the session to the terminal as it changes.
struct TerminalObserver;

impl TerminalObserver {
    fn print_question(&self, session: &TestSession) {
        let snapshot = session.snapshot();
        let Some(question) = session.current_question() else {
            return;
        };
        let clock = match snapshot.remaining_secs {
            Some(secs) => format!(" | {} left", format_clock(secs)),
            None => String::new(),
        };
        println!(
            "\nQuestion {} of {} ({}%){clock}",
            snapshot.question_index + 1,
            snapshot.question_count,
            snapshot.progress_percent
        );
        println!("{}", question.text);

        let answer = session.current_answer();
        match question.kind {
            QuestionType::Text => {
                let text = answer.map(|a| a.text_answer.as_str()).unwrap_or("");
                if text.is_empty() {
                    println!("  (type: text <your answer>)");
                } else {
                    println!("  Your answer: {text}");
                }
            }
            kind => {
                let hint = if kind == QuestionType::Multiple {
                    " (select all that apply)"
                } else {
                    ""
                };
                for (i, option) in question.options.iter().enumerate() {
                    let selected = answer.is_some_and(|a| a.is_selected(&option.id));
                    println!(
                        "  {}. [{}] {}",
                        i + 1,
                        if selected { "x" } else { " " },
                        option.text
                    );
                }
                if !hint.is_empty() {
                    println!(" {hint}");
                }
            }
        }
    }
}

impl SessionObserver for TerminalObserver {
    fn on_start(&mut self, session: &TestSession) {
        self.print_question(session);
    }

    fn on_change(&mut self, session: &TestSession) {
        self.print_question(session);
    }

    fn on_tick(&mut self, session: &TestSession) {
        if let Some(remaining) = session.remaining_secs() {
            if remaining == 60 || remaining == 10 {
                println!("  {} remaining", format_clock(remaining));
            }
        }
    }

    fn on_rejected(&mut self, reason: &str) {
        println!("  ! {reason}");
    }

    fn on_persist_failed(&mut self, error: &QuizError) {
        eprintln!("Warning: {error:#}; the result is kept for this run only.");
    }
}

pub async fn execute(config_path: Option<PathBuf>, id: String) -> Result<()> {
    let (_, mut provider) = super::open(config_path.as_deref())?;
    let test = provider.require_test(&id)?.clone();

    println!("{}", test.title);
    println!("{}", test.description);
    println!(
        "{} questions | time limit: {}",
        test.questions.len(),
        time_limit_label(test.time_limit)
    );
    println!("{HELP}");

    let mut session = TestSession::new(test);
    let mut source = StdinSource::spawn();
    let end = run_session(&mut session, &mut provider, &mut source, &mut TerminalObserver).await?;

    match end {
        SessionEnd::Submitted {
            result_id,
            score,
            auto,
            persisted,
        } => {
            if auto {
                println!("\nTime is up. Your answers were submitted.");
            }
            println!("\nScore: {score}%");
            println!("Time taken: {}", format_duration(session.elapsed_secs()));
            println!("Result: {result_id}");
            if persisted {
                println!("Review with: quizkit result {result_id}");
            }
        }
        SessionEnd::Abandoned => println!("\nSession abandoned. Nothing was saved."),
    }

    Ok(())
}
