//! The `quizkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::authoring::{parse_test_file, scan_test_directory, validate_new_test};

pub fn execute(path: PathBuf) -> Result<()> {
    let scanned = if path.is_dir() {
        scan_test_directory(&path)?
    } else {
        vec![(path.clone(), parse_test_file(&path))]
    };

    let mut total_errors = 0;

    for (file, parsed) in &scanned {
        let test = match parsed {
            Ok(test) => test,
            Err(e) => {
                println!("{}: {:#}", file.display(), e);
                total_errors += 1;
                continue;
            }
        };
        println!("Test: {} ({} questions)", test.title, test.questions.len());
        if let Err(errors) = validate_new_test(test) {
            for e in &errors.errors {
                println!("  {}: {}", e.field, e.message);
            }
            total_errors += errors.len();
        }
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} validation error(s) found");
    }
    println!("All tests valid.");

    Ok(())
}
