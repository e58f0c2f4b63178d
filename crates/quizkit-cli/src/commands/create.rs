//! The `quizkit create` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizkit_core::authoring::{parse_test_file, validate_new_test};

pub fn execute(config_path: Option<PathBuf>, file: PathBuf) -> Result<()> {
    let test = parse_test_file(&file)?;
    if let Err(errors) = validate_new_test(&test) {
        return Err(errors).context(format!("{} is not a valid test", file.display()));
    }

    let (_, mut provider) = super::open(config_path.as_deref())?;
    let title = test.title.clone();
    let id = provider.add_test(test)?;
    println!("Created test {id}");
    println!("  {title}");

    Ok(())
}
