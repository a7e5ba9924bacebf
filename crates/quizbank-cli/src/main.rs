//! quizbank CLI: practice exams from plain-text question banks.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizbank_core::model::{BlockFilter, FeedbackMode};

mod bank;
mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "quizbank",
    version,
    about = "Practice exams from plain-text question banks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a practice exam interactively
    Run {
        /// Question bank file (defaults to `default_bank` from the config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Block to draw questions from: a block number or "all"
        #[arg(long)]
        block: Option<BlockFilter>,

        /// Number of questions
        #[arg(long)]
        count: Option<usize>,

        /// When to reveal correctness: immediate or end
        #[arg(long)]
        feedback: Option<FeedbackMode>,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,

        /// Print every question with the correct and given answers at the end
        #[arg(long)]
        review: bool,

        /// Print the results report as JSON at the end
        #[arg(long)]
        json: bool,

        /// Print the results report as Markdown at the end
        #[arg(long, conflicts_with = "json")]
        markdown: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank and report malformed blocks
    Validate {
        /// Question bank file
        #[arg(long)]
        bank: PathBuf,
    },

    /// List the blocks of a certification and how many questions each has
    Blocks {
        /// Question bank file (defaults to `default_bank` from the config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Certification id whose block names to show (e.g. "gh300")
        #[arg(long)]
        certification: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and example question bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizbank=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            bank,
            block,
            count,
            feedback,
            seed,
            review,
            json,
            markdown,
            config,
        } => commands::run::execute(
            bank, block, count, feedback, seed, review, json, markdown, config,
        ),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Blocks {
            bank,
            certification,
            config,
        } => commands::blocks::execute(bank, certification, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
