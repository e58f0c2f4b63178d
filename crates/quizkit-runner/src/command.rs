//! User commands for an interactive session.

use std::fmt;
use std::str::FromStr;

/// One user action. Positions are 1-based as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Next,
    Previous,
    /// Jump to question N.
    GoTo(usize),
    /// Select (or toggle) option N of the current question.
    Pick(usize),
    /// Replace the text answer of the current question.
    Text(String),
    Submit,
    /// Leave without recording anything.
    Quit,
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCommand::Start => write!(f, "start"),
            SessionCommand::Next => write!(f, "next"),
            SessionCommand::Previous => write!(f, "prev"),
            SessionCommand::GoTo(n) => write!(f, "goto {n}"),
            SessionCommand::Pick(n) => write!(f, "pick {n}"),
            SessionCommand::Text(text) => write!(f, "text {text}"),
            SessionCommand::Submit => write!(f, "submit"),
            SessionCommand::Quit => write!(f, "quit"),
        }
    }
}

fn position(word: &str, arg: &str) -> Result<usize, String> {
    match arg.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("{word} expects a number starting at 1, got '{}'", arg.trim())),
        Ok(n) => Ok(n),
    }
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start();
        let (word, rest) = match s.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (s.trim_end(), ""),
        };
        match word.to_lowercase().as_str() {
            "start" | "begin" => Ok(SessionCommand::Start),
            "next" | "n" => Ok(SessionCommand::Next),
            "prev" | "previous" | "p" => Ok(SessionCommand::Previous),
            "goto" | "g" => position("goto", rest).map(SessionCommand::GoTo),
            "pick" | "x" => position("pick", rest).map(SessionCommand::Pick),
            // Text keeps inner whitespace; only the line ending is dropped.
            "text" | "t" => Ok(SessionCommand::Text(
                rest.trim_end_matches(['\r', '\n']).to_string(),
            )),
            "submit" => Ok(SessionCommand::Submit),
            "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
            "" => Err("empty command".to_string()),
            other => Err(format!("unknown command: {other}")),
        }
    }
}
