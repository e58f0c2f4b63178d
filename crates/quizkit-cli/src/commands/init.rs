//! The `quizkit init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizkit.toml
    if std::path::Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    // Create example test
    std::fs::create_dir_all("tests")?;
    let example_path = std::path::Path::new("tests/example.toml");
    if example_path.exists() {
        println!("tests/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST)?;
        println!("Created tests/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizkit validate --file tests/example.toml");
    println!("  2. Run: quizkit create --file tests/example.toml");
    println!("  3. Run: quizkit list, then quizkit take <test-id>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

# Where tests.json and testResults.json are kept.
data_dir = "./quizkit-data"

# "file" or "memory"
store = "file"

# Install the sample catalog when no tests are stored yet.
seed_catalog = true

# Where `quizkit result --format html` writes reports.
output_dir = "./quizkit-reports"
"#;

const EXAMPLE_TEST: &str = r#"[test]
title = "Rust Basics"
description = "Bindings, ownership and the standard types."
category = "Programming"
difficulty = "easy"
time_limit = 10

[[questions]]
text = "Which keyword declares an immutable binding?"
type = "single"
options = [
    { text = "let", correct = true },
    { text = "mut" },
    { text = "var" },
]

[[questions]]
text = "Which of these types are Copy?"
type = "multiple"
options = [
    { text = "u32", correct = true },
    { text = "String" },
    { text = "bool", correct = true },
    { text = "Vec<u8>" },
]

[[questions]]
text = "Explain what happens to a String when it is moved."
type = "text"
"#;
