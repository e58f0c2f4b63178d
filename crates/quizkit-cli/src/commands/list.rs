//! The `quizkit list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizkit_core::catalog::{categories, recent_tests, CatalogFilter};
use quizkit_core::model::Difficulty;

use super::time_limit_label;

pub fn execute(
    config_path: Option<PathBuf>,
    search: Option<String>,
    category: Option<String>,
    difficulty: Option<Difficulty>,
    recent: Option<usize>,
) -> Result<()> {
    let (_, provider) = super::open(config_path.as_deref())?;
    let filter = CatalogFilter {
        search,
        category,
        difficulty,
    };
    // --recent narrows to the newest tests before the other filters apply.
    let tests = match recent {
        Some(n) => recent_tests(provider.tests(), n)
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect::<Vec<_>>(),
        None => filter.apply(provider.tests()),
    };

    if tests.is_empty() {
        println!("No tests match.");
        let known = categories(provider.tests());
        if !known.is_empty() {
            println!("Categories: {}", known.join(", "));
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Category",
        "Difficulty",
        "Questions",
        "Time limit",
    ]);
    for test in &tests {
        table.add_row(vec![
            test.id.clone(),
            test.title.clone(),
            test.category.clone(),
            test.difficulty.to_string(),
            test.questions.len().to_string(),
            time_limit_label(test.time_limit),
        ]);
    }
    println!("{table}");
    println!("{} of {} tests", tests.len(), provider.tests().len());

    Ok(())
}
