//! quizkit-report: result views.
//!
//! Renders a [`ResultReview`] as plain text, markdown, a self-contained HTML
//! page, or JSON.

pub mod html;
pub mod text;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};

use quizkit_core::review::ResultReview;

/// Output format for a result review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Html,
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Markdown => write!(f, "markdown"),
            ReportFormat::Html => write!(f, "html"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("unknown format: {s}")),
        }
    }
}

impl ReportFormat {
    /// File extension for reports in this format.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Markdown => "md",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

/// Render `review` in `format`.
pub fn render(review: &ResultReview<'_>, format: ReportFormat) -> Result<String> {
    Ok(match format {
        ReportFormat::Text => text::generate_text(review),
        ReportFormat::Markdown => text::generate_markdown(review),
        ReportFormat::Html => html::generate_html(review),
        ReportFormat::Json => {
            serde_json::to_string_pretty(review).context("failed to serialize review")?
        }
    })
}

/// Render `review` in `format` and write it to `path`, creating parent
/// directories as needed.
pub fn write_report(review: &ResultReview<'_>, format: ReportFormat, path: &Path) -> Result<()> {
    let content = render(review, format)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}
