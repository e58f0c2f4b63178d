//! quizkit CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizkit_core::model::Difficulty;
use quizkit_report::ReportFormat;

mod commands;

#[derive(Parser)]
#[command(name = "quizkit", version, about = "Author, take and review timed quizzes")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an example test file
    Init,

    /// List tests in the catalog
    List {
        /// Case-insensitive search over title and description
        #[arg(long)]
        search: Option<String>,

        /// Only tests in this category
        #[arg(long)]
        category: Option<String>,

        /// Only tests of this difficulty: easy, medium, hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Only the N most recently created tests, newest first
        #[arg(long, value_name = "N")]
        recent: Option<usize>,
    },

    /// Show one test
    Show {
        /// Test id
        id: String,
    },

    /// Validate test TOML files
    Validate {
        /// Path to a test file or directory
        #[arg(long)]
        file: PathBuf,
    },

    /// Add a test from a TOML file to the catalog
    Create {
        /// Path to a test file
        #[arg(long)]
        file: PathBuf,
    },

    /// Take a test interactively
    Take {
        /// Test id
        id: String,
    },

    /// List completed tests, most recent first
    Results,

    /// Review one result
    Result {
        /// Result id
        id: String,

        /// Output format: text, markdown, html, json
        #[arg(long, default_value = "text")]
        format: ReportFormat,

        /// Write the review to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizkit=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::List {
            search,
            category,
            difficulty,
            recent,
        } => commands::list::execute(config, search, category, difficulty, recent),
        Commands::Show { id } => commands::show::execute(config, id),
        Commands::Validate { file } => commands::validate::execute(file),
        Commands::Create { file } => commands::create::execute(config, file),
        Commands::Take { id } => commands::take::execute(config, id).await,
        Commands::Results => commands::results::execute(config),
        Commands::Result { id, format, output } => {
            commands::result::execute(config, id, format, output)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
