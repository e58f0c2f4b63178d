//! The `quizkit show` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::catalog::completed_entries;

use super::time_limit_label;

pub fn execute(config_path: Option<PathBuf>, id: String) -> Result<()> {
    let (_, provider) = super::open(config_path.as_deref())?;
    let test = provider.require_test(&id)?;

    println!("{}", test.title);
    println!("{}\n", test.description);
    println!("Category:   {}", test.category);
    println!("Difficulty: {}", test.difficulty);
    println!("Questions:  {}", test.questions.len());
    println!("Time limit: {}", time_limit_label(test.time_limit));
    println!("Created:    {}", test.created_at.format("%Y-%m-%d"));

    let attempts = completed_entries(&provider)
        .iter()
        .filter(|e| e.test.id == test.id)
        .count();
    if attempts > 0 {
        println!("Attempts:   {attempts}");
    }
    println!("\nStart with: quizkit take {}", test.id);

    Ok(())
}
