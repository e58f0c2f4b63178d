//! The `quizkit results` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizkit_core::catalog::{completed_entries, HistorySummary};
use quizkit_core::review::format_duration;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, provider) = super::open(config_path.as_deref())?;
    let entries = completed_entries(&provider);

    if entries.is_empty() {
        println!("No completed tests yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Test", "Score", "Time taken", "Result ID"]);
    for entry in &entries {
        table.add_row(vec![
            entry.result.date.format("%Y-%m-%d %H:%M").to_string(),
            entry.test.title.clone(),
            format!("{}%", entry.result.score),
            format_duration(entry.result.time_taken),
            entry.result.id.clone(),
        ]);
    }
    println!("{table}");

    let summary = HistorySummary::compute(&entries);
    println!(
        "{} attempts | average {:.0}% | best {}%",
        summary.attempts,
        summary.average_score,
        summary.best_score.unwrap_or(0)
    );

    Ok(())
}
