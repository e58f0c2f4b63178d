//! Test-taking session state machine.
//!
//! A session moves `NotStarted → InProgress → Submitted` and never back.
//! It is driven by explicit calls: user actions (`start`, navigation, answer
//! capture, `submit`) and one [`TestSession::tick`] per elapsed wall-clock
//! second. Wall-clock scheduling lives in `quizkit-runner`; this type is
//! fully deterministic so the whole flow can be exercised tick by tick.

use serde::Serialize;

use crate::error::{QuizError, SessionError};
use crate::model::{Answer, NewTestResult, Question, QuestionType, Test};
use crate::scoring;
use crate::state::StateProvider;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    /// A submission is being recorded; further submits are suppressed.
    Submitting,
    Submitted { result_id: String },
}

/// Outcome of a [`TestSession::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The attempt was scored and recorded under `result_id`.
    Submitted { result_id: String, score: u32 },
    /// A submission already happened or is in flight; nothing was recorded.
    Suppressed,
}

/// Outcome of a [`TestSession::tick`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not in progress; the tick was ignored.
    Idle,
    /// One second was counted.
    Running {
        elapsed_secs: u64,
        remaining_secs: Option<u64>,
    },
    /// The countdown reached zero and the attempt was submitted.
    TimeExpired { result_id: String, score: u32 },
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub question_index: usize,
    pub question_count: usize,
    pub progress_percent: u32,
    pub elapsed_secs: u64,
    pub remaining_secs: Option<u64>,
}

/// One attempt at one test.
#[derive(Debug, Clone)]
pub struct TestSession {
    test: Test,
    phase: SessionPhase,
    current: usize,
    answers: Vec<Answer>,
    elapsed_secs: u64,
    remaining_secs: Option<u64>,
}

impl TestSession {
    pub fn new(test: Test) -> Self {
        Self {
            test,
            phase: SessionPhase::NotStarted,
            current: 0,
            answers: Vec::new(),
            elapsed_secs: 0,
            remaining_secs: None,
        }
    }

    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_in_progress(&self) -> bool {
        self.phase == SessionPhase::InProgress
    }

    /// The recorded result id once submitted.
    pub fn result_id(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Submitted { result_id } => Some(result_id),
            _ => None,
        }
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.test.questions.get(self.current)
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        let question = self.current_question()?;
        self.answers.iter().find(|a| a.question_id == question.id)
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.remaining_secs
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let question_count = self.test.questions.len();
        let progress_percent = if question_count == 0 {
            0
        } else {
            ((2 * 100 * (self.current + 1) + question_count) / (2 * question_count)) as u32
        };
        SessionSnapshot {
            phase: self.phase.clone(),
            question_index: self.current,
            question_count,
            progress_percent,
            elapsed_secs: self.elapsed_secs,
            remaining_secs: self.remaining_secs,
        }
    }

    /// Enter `InProgress`: blank answers for every question, countdown armed
    /// from the test's time limit.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::NotStarted => {}
            SessionPhase::InProgress => return Err(SessionError::AlreadyStarted),
            SessionPhase::Submitting | SessionPhase::Submitted { .. } => {
                return Err(SessionError::AlreadySubmitted)
            }
        }

        self.answers = self
            .test
            .questions
            .iter()
            .map(|q| Answer::blank(q.id.clone()))
            .collect();
        self.current = 0;
        self.elapsed_secs = 0;
        self.remaining_secs = self.test.time_limit_secs();
        self.phase = SessionPhase::InProgress;
        tracing::debug!(test_id = %self.test.id, "session started");
        Ok(())
    }

    /// Move to the next question. A no-op on the last question.
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        if self.current + 1 < self.test.questions.len() {
            self.current += 1;
        }
        Ok(())
    }

    /// Move to the previous question. A no-op on the first question.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Jump to `index`, clamped to the last question.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        self.current = index.min(self.test.questions.len().saturating_sub(1));
        Ok(())
    }

    /// Select `option_id` on the current question.
    ///
    /// Single-choice questions replace the selection; multiple-choice
    /// questions toggle the option.
    pub fn select_option(&mut self, option_id: &str) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let question = self.current_question_checked()?;
        if question.kind == QuestionType::Text {
            return Err(SessionError::NotAChoiceQuestion(question.id.clone()));
        }
        if question.option(option_id).is_none() {
            return Err(SessionError::UnknownOption {
                question_id: question.id.clone(),
                option_id: option_id.to_string(),
            });
        }
        let kind = question.kind;
        let answer = self.current_answer_mut()?;

        if kind == QuestionType::Single {
            answer.selected_options = vec![option_id.to_string()];
        } else if let Some(pos) = answer.selected_options.iter().position(|id| id == option_id) {
            answer.selected_options.remove(pos);
        } else {
            answer.selected_options.push(option_id.to_string());
        }
        Ok(())
    }

    /// Overwrite the text answer of the current (free-text) question.
    pub fn set_text(&mut self, text: &str) -> Result<(), SessionError> {
        self.ensure_in_progress()?;
        let question = self.current_question_checked()?;
        if question.kind != QuestionType::Text {
            return Err(SessionError::NotATextQuestion(question.id.clone()));
        }
        self.current_answer_mut()?.text_answer = text.to_string();
        Ok(())
    }

    /// Count one elapsed second.
    ///
    /// When the countdown reaches zero the attempt is submitted through
    /// `provider`. Ticks outside `InProgress` are ignored, so an expired
    /// session never submits twice.
    pub fn tick(&mut self, provider: &mut StateProvider) -> Result<TickOutcome, QuizError> {
        if !self.is_in_progress() {
            return Ok(TickOutcome::Idle);
        }

        self.elapsed_secs += 1;
        let Some(remaining) = self.remaining_secs.as_mut() else {
            return Ok(TickOutcome::Running {
                elapsed_secs: self.elapsed_secs,
                remaining_secs: None,
            });
        };

        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            return Ok(TickOutcome::Running {
                elapsed_secs: self.elapsed_secs,
                remaining_secs: Some(*remaining),
            });
        }

        tracing::info!(test_id = %self.test.id, "time limit reached, submitting");
        match self.submit(provider)? {
            SubmitOutcome::Submitted { result_id, score } => {
                Ok(TickOutcome::TimeExpired { result_id, score })
            }
            SubmitOutcome::Suppressed => Ok(TickOutcome::Idle),
        }
    }

    /// Score the attempt and record it through `provider`.
    ///
    /// Only the first submission records anything; later calls return
    /// [`SubmitOutcome::Suppressed`]. If the result was recorded in memory but
    /// could not be persisted the session still ends as submitted and the
    /// write error is returned.
    pub fn submit(&mut self, provider: &mut StateProvider) -> Result<SubmitOutcome, QuizError> {
        match self.phase {
            SessionPhase::NotStarted => return Err(SessionError::NotStarted.into()),
            SessionPhase::Submitting | SessionPhase::Submitted { .. } => {
                tracing::debug!(test_id = %self.test.id, "duplicate submit suppressed");
                return Ok(SubmitOutcome::Suppressed);
            }
            SessionPhase::InProgress => {}
        }
        self.phase = SessionPhase::Submitting;

        let score = scoring::score(&self.test, &self.answers);
        let saved = provider.save_test_result(NewTestResult {
            test_id: self.test.id.clone(),
            answers: self.answers.clone(),
            score,
            time_taken: self.elapsed_secs,
        });

        match saved {
            Ok(result_id) => {
                tracing::info!(test_id = %self.test.id, %result_id, score, "test submitted");
                self.phase = SessionPhase::Submitted {
                    result_id: result_id.clone(),
                };
                Ok(SubmitOutcome::Submitted { result_id, score })
            }
            Err(QuizError::Write { id, source }) => {
                self.phase = SessionPhase::Submitted {
                    result_id: id.clone(),
                };
                Err(QuizError::Write { id, source })
            }
            Err(other) => {
                self.phase = SessionPhase::InProgress;
                Err(other)
            }
        }
    }

    fn ensure_in_progress(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => Ok(()),
            SessionPhase::NotStarted => Err(SessionError::NotStarted),
            SessionPhase::Submitting | SessionPhase::Submitted { .. } => {
                Err(SessionError::AlreadySubmitted)
            }
        }
    }

    fn current_question_checked(&self) -> Result<&Question, SessionError> {
        self.current_question().ok_or(SessionError::NotStarted)
    }

    fn current_answer_mut(&mut self) -> Result<&mut Answer, SessionError> {
        let question_id = self.current_question_checked()?.id.clone();
        self.answers
            .iter_mut()
            .find(|a| a.question_id == question_id)
            .ok_or(SessionError::NotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReadError, WriteError};
    use crate::model::{AnswerOption, Difficulty};
    use crate::traits::DataStore;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct NullStore {
        fail_writes: AtomicBool,
    }

    impl DataStore for NullStore {
        fn name(&self) -> &str {
            "null"
        }

        fn load(&self, _key: &str) -> Result<Option<Vec<u8>>, ReadError> {
            Ok(None)
        }

        fn save(&self, key: &str, _bytes: &[u8]) -> Result<(), WriteError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(WriteError::Io {
                    key: key.to_string(),
                    source: std::io::Error::other("quota exceeded"),
                });
            }
            Ok(())
        }
    }

    fn opts() -> Vec<AnswerOption> {
        ["a", "b", "c", "d"]
            .iter()
            .map(|id| AnswerOption {
                id: (*id).into(),
                text: id.to_uppercase(),
            })
            .collect()
    }

    fn sample_test(time_limit: Option<u32>) -> Test {
        Test {
            id: "test-1".into(),
            title: "Sample".into(),
            description: "Three questions".into(),
            time_limit,
            questions: vec![
                Question {
                    id: "q-single".into(),
                    text: "Pick B".into(),
                    kind: QuestionType::Single,
                    options: opts(),
                    correct_answers: vec!["b".into()],
                },
                Question {
                    id: "q-multi".into(),
                    text: "Pick A and C".into(),
                    kind: QuestionType::Multiple,
                    options: opts(),
                    correct_answers: vec!["a".into(), "c".into()],
                },
                Question {
                    id: "q-text".into(),
                    text: "Explain".into(),
                    kind: QuestionType::Text,
                    options: vec![],
                    correct_answers: vec![],
                },
            ],
            category: "General".into(),
            difficulty: Difficulty::Medium,
            created_at: Utc::now(),
        }
    }

    fn provider() -> StateProvider {
        StateProvider::open(Box::new(NullStore::default()), vec![]).unwrap()
    }

    #[test]
    fn actions_before_start_are_rejected() {
        let mut provider = provider();
        let mut session = TestSession::new(sample_test(None));
        assert_eq!(session.next(), Err(SessionError::NotStarted));
        assert_eq!(session.select_option("a"), Err(SessionError::NotStarted));
        assert!(matches!(
            session.submit(&mut provider),
            Err(QuizError::Session(SessionError::NotStarted))
        ));
        assert_eq!(session.tick(&mut provider).unwrap(), TickOutcome::Idle);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn start_initializes_blank_answers_and_countdown() {
        let mut session = TestSession::new(sample_test(Some(2)));
        session.start().unwrap();

        assert!(session.is_in_progress());
        assert_eq!(session.answers().len(), 3);
        assert!(session
            .answers()
            .iter()
            .all(|a| a.selected_options.is_empty() && a.text_answer.is_empty()));
        assert_eq!(session.remaining_secs(), Some(120));
        assert_eq!(session.start(), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn navigation_is_clamped() {
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();

        session.previous().unwrap();
        assert_eq!(session.current_index(), 0);
        session.next().unwrap();
        session.next().unwrap();
        session.next().unwrap();
        assert_eq!(session.current_index(), 2);
        session.go_to(99).unwrap();
        assert_eq!(session.current_index(), 2);
        session.go_to(1).unwrap();
        assert_eq!(session.current_question().unwrap().id, "q-multi");
    }

    #[test]
    fn single_choice_selection_replaces() {
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        session.select_option("a").unwrap();
        session.select_option("b").unwrap();
        assert_eq!(session.current_answer().unwrap().selected_options, vec!["b"]);
    }

    #[test]
    fn multiple_choice_selection_toggles() {
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        session.next().unwrap();
        session.select_option("a").unwrap();
        session.select_option("c").unwrap();
        session.select_option("a").unwrap();
        assert_eq!(session.current_answer().unwrap().selected_options, vec!["c"]);
    }

    #[test]
    fn text_answer_overwrites() {
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        session.go_to(2).unwrap();
        session.set_text("first draft").unwrap();
        session.set_text("final").unwrap();
        assert_eq!(session.current_answer().unwrap().text_answer, "final");
        assert_eq!(
            session.select_option("a"),
            Err(SessionError::NotAChoiceQuestion("q-text".into()))
        );
    }

    #[test]
    fn invalid_answer_targets_are_rejected() {
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        assert!(matches!(
            session.select_option("zzz"),
            Err(SessionError::UnknownOption { .. })
        ));
        assert_eq!(
            session.set_text("nope"),
            Err(SessionError::NotATextQuestion("q-single".into()))
        );
    }

    #[test]
    fn manual_submit_scores_and_records_once() {
        let mut provider = provider();
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        session.select_option("b").unwrap();
        session.next().unwrap();
        session.select_option("c").unwrap();
        session.select_option("a").unwrap();
        for _ in 0..7 {
            session.tick(&mut provider).unwrap();
        }

        let outcome = session.submit(&mut provider).unwrap();
        let SubmitOutcome::Submitted { result_id, score } = outcome else {
            panic!("expected submission");
        };
        assert_eq!(score, 100);
        assert_eq!(session.result_id(), Some(result_id.as_str()));

        let stored = provider.get_test_result(&result_id).unwrap();
        assert_eq!(stored.time_taken, 7);
        assert_eq!(stored.answers.len(), 3);
        assert_eq!(stored.answers[0].question_id, "q-single");

        assert_eq!(session.submit(&mut provider).unwrap(), SubmitOutcome::Suppressed);
        assert_eq!(provider.results().len(), 1);
        assert_eq!(session.next(), Err(SessionError::AlreadySubmitted));
    }

    #[test]
    fn unlimited_session_never_expires() {
        let mut provider = provider();
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        for _ in 0..5_000 {
            session.tick(&mut provider).unwrap();
        }
        assert!(session.is_in_progress());
        assert_eq!(session.elapsed_secs(), 5_000);
        assert_eq!(session.remaining_secs(), None);
    }

    #[test]
    fn countdown_auto_submits_exactly_once() {
        let mut provider = provider();
        let mut session = TestSession::new(sample_test(Some(1)));
        session.start().unwrap();
        session.select_option("b").unwrap();

        for second in 1..60 {
            let outcome = session.tick(&mut provider).unwrap();
            assert_eq!(
                outcome,
                TickOutcome::Running {
                    elapsed_secs: second,
                    remaining_secs: Some(60 - second),
                }
            );
        }

        let outcome = session.tick(&mut provider).unwrap();
        let TickOutcome::TimeExpired { result_id, score } = outcome else {
            panic!("expected expiry, got {outcome:?}");
        };
        assert_eq!(score, 50);
        assert_eq!(session.result_id(), Some(result_id.as_str()));
        assert_eq!(provider.get_test_result(&result_id).unwrap().time_taken, 60);

        assert_eq!(session.tick(&mut provider).unwrap(), TickOutcome::Idle);
        assert_eq!(session.submit(&mut provider).unwrap(), SubmitOutcome::Suppressed);
        assert_eq!(provider.results().len(), 1);
    }

    #[test]
    fn write_failure_still_ends_session() {
        let store = Arc::new(NullStore::default());
        let mut provider = StateProvider::open(Box::new(Arc::clone(&store)), vec![]).unwrap();
        let mut session = TestSession::new(sample_test(None));
        session.start().unwrap();
        store.fail_writes.store(true, Ordering::SeqCst);

        let err = session.submit(&mut provider).unwrap_err();
        let QuizError::Write { id, .. } = err else {
            panic!("expected write error");
        };
        assert_eq!(session.result_id(), Some(id.as_str()));
        assert!(provider.get_test_result(&id).is_some());
        assert_eq!(session.submit(&mut provider).unwrap(), SubmitOutcome::Suppressed);
    }

    #[test]
    fn snapshot_reports_progress() {
        let mut session = TestSession::new(sample_test(Some(5)));
        session.start().unwrap();
        session.next().unwrap();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.question_index, 1);
        assert_eq!(snapshot.question_count, 3);
        assert_eq!(snapshot.progress_percent, 67);
        assert_eq!(snapshot.remaining_secs, Some(300));
        assert_eq!(snapshot.phase, SessionPhase::InProgress);
    }
}
