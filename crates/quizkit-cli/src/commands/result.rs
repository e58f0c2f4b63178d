//! The `quizkit result` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::review::ResultReview;
use quizkit_report::{render, write_report, ReportFormat};

pub fn execute(
    config_path: Option<PathBuf>,
    id: String,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let (config, provider) = super::open(config_path.as_deref())?;
    let result = provider.require_test_result(&id)?;
    let test = provider.require_test(&result.test_id)?;
    let review = ResultReview::build(test, result);

    // HTML is never dumped to the terminal.
    let output = output.or_else(|| {
        (format == ReportFormat::Html)
            .then(|| config.output_dir.join(format!("{}.{}", id, format.extension())))
    });

    match output {
        Some(path) => {
            write_report(&review, format, &path)?;
            println!("Review written to {}", path.display());
        }
        None => print!("{}", render(&review, format)?),
    }

    Ok(())
}
