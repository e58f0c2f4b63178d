//! Where session commands come from.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;

use crate::command::SessionCommand;

/// A stream of user commands.
///
/// `next_command` must be cancel safe: the session loop drops a pending call
/// whenever a clock tick arrives first.
#[async_trait]
pub trait CommandSource: Send {
    /// The next command, `Some(Err(_))` for input that does not parse, or
    /// `None` once input is exhausted.
    async fn next_command(&mut self) -> Option<Result<SessionCommand, String>>;
}

/// Reads one command per line, skipping blank lines.
pub struct LineSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> CommandSource for LineSource<R> {
    async fn next_command(&mut self) -> Option<Result<SessionCommand, String>> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => return Some(line.parse()),
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!("failed to read command: {e}");
                    return None;
                }
            }
        }
    }
}

/// Commands pushed from elsewhere in the program.
pub struct ChannelSource {
    rx: mpsc::Receiver<SessionCommand>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<SessionCommand>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl CommandSource for ChannelSource {
    async fn next_command(&mut self) -> Option<Result<SessionCommand, String>> {
        self.rx.recv().await.map(Ok)
    }
}

/// Reads standard input on a detached thread, one command per line.
///
/// A blocking stdin read cannot be cancelled, so it runs on a plain thread
/// that never holds up runtime shutdown.
pub struct StdinSource {
    lines: mpsc::Receiver<String>,
}

impl StdinSource {
    pub fn spawn() -> Self {
        let (tx, lines) = mpsc::channel(16);
        std::thread::spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else {
                    break;
                };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });
        Self { lines }
    }
}

#[async_trait]
impl CommandSource for StdinSource {
    async fn next_command(&mut self) -> Option<Result<SessionCommand, String>> {
        loop {
            let line = self.lines.recv().await?;
            if !line.trim().is_empty() {
                return Some(line.parse());
            }
        }
    }
}
