//! quizkit-runner: interactive, timed test-taking.
//!
//! Drives a [`TestSession`] from a [`CommandSource`] while a [`SessionClock`]
//! ticks once per second in the background. The time limit, the one-shot
//! submission and the "nothing is saved on quit" rule all come from the
//! session itself; this crate only decides which event reaches it next.

pub mod clock;
pub mod command;
pub mod source;

use std::time::Duration;

use quizkit_core::error::{QuizError, SessionError};
use quizkit_core::scoring;
use quizkit_core::session::{SubmitOutcome, TestSession, TickOutcome};
use quizkit_core::state::StateProvider;

pub use clock::SessionClock;
pub use command::SessionCommand;
pub use source::{ChannelSource, CommandSource, LineSource, StdinSource};

/// How an interactive session finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    Submitted {
        result_id: String,
        score: u32,
        /// The countdown ran out rather than the user submitting.
        auto: bool,
        /// Whether the result reached the data store.
        persisted: bool,
    },
    /// The user quit, or input ended, before submitting.
    Abandoned,
}

impl SessionEnd {
    pub fn result_id(&self) -> Option<&str> {
        match self {
            SessionEnd::Submitted { result_id, .. } => Some(result_id),
            SessionEnd::Abandoned => None,
        }
    }

    fn auto(self) -> Self {
        match self {
            SessionEnd::Submitted {
                result_id,
                score,
                persisted,
                ..
            } => SessionEnd::Submitted {
                result_id,
                score,
                auto: true,
                persisted,
            },
            SessionEnd::Abandoned => SessionEnd::Abandoned,
        }
    }
}

/// Hooks for rendering a running session. All methods default to no-ops.
pub trait SessionObserver: Send {
    /// The session entered `InProgress`.
    fn on_start(&mut self, _session: &TestSession) {}
    /// A command changed the position or an answer.
    fn on_change(&mut self, _session: &TestSession) {}
    /// One second elapsed.
    fn on_tick(&mut self, _session: &TestSession) {}
    /// A command was not applied.
    fn on_rejected(&mut self, _reason: &str) {}
    /// The result could not be written; it is still held in memory.
    fn on_persist_failed(&mut self, _error: &QuizError) {}
    fn on_end(&mut self, _end: &SessionEnd) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Runs sessions with a configurable tick period.
#[derive(Debug, Clone)]
pub struct SessionRunner {
    tick_period: Duration,
}

impl Default for SessionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRunner {
    pub fn new() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
        }
    }

    /// Wall-clock length of one session second.
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Run `session` until it is submitted or abandoned.
    ///
    /// Command errors (bad input, acting before `start`, unknown options) are
    /// reported to the observer and the loop continues. A failed result write
    /// still ends the session as submitted, with `persisted: false`. Any other
    /// store error is returned.
    pub async fn run<S, O>(
        &self,
        session: &mut TestSession,
        provider: &mut StateProvider,
        source: &mut S,
        observer: &mut O,
    ) -> Result<SessionEnd, QuizError>
    where
        S: CommandSource + ?Sized,
        O: SessionObserver + ?Sized,
    {
        let mut clock: Option<SessionClock> = None;

        let end = loop {
            tokio::select! {
                biased;
                _ = next_tick(&mut clock) => {
                    match session.tick(provider) {
                        Ok(TickOutcome::Running { .. }) => observer.on_tick(session),
                        Ok(TickOutcome::TimeExpired { result_id, score }) => {
                            break SessionEnd::Submitted { result_id, score, auto: true, persisted: true };
                        }
                        Ok(TickOutcome::Idle) => {}
                        Err(e) => match written_anyway(session, &e) {
                            Some(end) => {
                                observer.on_persist_failed(&e);
                                break end.auto();
                            }
                            None => return Err(e),
                        },
                    }
                }
                command = source.next_command() => {
                    let command = match command {
                        Some(Ok(command)) => command,
                        Some(Err(reason)) => {
                            observer.on_rejected(&reason);
                            continue;
                        }
                        None => {
                            tracing::debug!(test_id = %session.test().id, "input closed, abandoning session");
                            break SessionEnd::Abandoned;
                        }
                    };
                    match command {
                        SessionCommand::Quit => break SessionEnd::Abandoned,
                        SessionCommand::Submit => match session.submit(provider) {
                            Ok(SubmitOutcome::Submitted { result_id, score }) => {
                                break SessionEnd::Submitted { result_id, score, auto: false, persisted: true };
                            }
                            Ok(SubmitOutcome::Suppressed) => {}
                            Err(QuizError::Session(e)) => observer.on_rejected(&e.to_string()),
                            Err(e) => match written_anyway(session, &e) {
                                Some(end) => {
                                    observer.on_persist_failed(&e);
                                    break end;
                                }
                                None => return Err(e),
                            },
                        },
                        SessionCommand::Start => match session.start() {
                            Ok(()) => {
                                clock = Some(SessionClock::start(self.tick_period));
                                observer.on_start(session);
                            }
                            Err(e) => observer.on_rejected(&e.to_string()),
                        },
                        other => match apply(session, &other) {
                            Ok(()) => observer.on_change(session),
                            Err(reason) => observer.on_rejected(&reason),
                        },
                    }
                }
            }
        };

        if let Some(clock) = clock.as_mut() {
            clock.stop();
        }
        tracing::debug!(test_id = %session.test().id, ?end, "session finished");
        observer.on_end(&end);
        Ok(end)
    }
}

/// Run `session` with one tick per second.
pub async fn run_session<S, O>(
    session: &mut TestSession,
    provider: &mut StateProvider,
    source: &mut S,
    observer: &mut O,
) -> Result<SessionEnd, QuizError>
where
    S: CommandSource + ?Sized,
    O: SessionObserver + ?Sized,
{
    SessionRunner::new()
        .run(session, provider, source, observer)
        .await
}

async fn next_tick(clock: &mut Option<SessionClock>) {
    match clock {
        Some(clock) => clock.tick().await,
        None => std::future::pending().await,
    }
}

/// A session whose write failed is still submitted under the failed id.
fn written_anyway(session: &TestSession, error: &QuizError) -> Option<SessionEnd> {
    match error {
        QuizError::Write { id, .. } if session.result_id() == Some(id.as_str()) => {
            Some(SessionEnd::Submitted {
                result_id: id.clone(),
                score: scoring::score(session.test(), session.answers()),
                auto: false,
                persisted: false,
            })
        }
        _ => None,
    }
}

fn apply(session: &mut TestSession, command: &SessionCommand) -> Result<(), String> {
    let result = match command {
        SessionCommand::Next => session.next(),
        SessionCommand::Previous => session.previous(),
        SessionCommand::GoTo(n) => session.go_to(n.saturating_sub(1)),
        SessionCommand::Pick(n) => {
            let option_id = session
                .current_question()
                .ok_or_else(|| SessionError::NotStarted.to_string())?
                .options
                .get(n.wrapping_sub(1))
                .map(|option| option.id.clone());
            match option_id {
                Some(id) => session.select_option(&id),
                None => return Err(format!("no option {n} on this question")),
            }
        }
        SessionCommand::Text(text) => session.set_text(text),
        SessionCommand::Start | SessionCommand::Submit | SessionCommand::Quit => Ok(()),
    };
    result.map_err(|e| e.to_string())
}
