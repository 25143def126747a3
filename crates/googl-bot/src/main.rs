//! GooglBot - Main Entry Point
//!
//! Usage:
//!     googlbot
//!     googlbot --knowledge-base ~/.googlbot.json --cutoff 0.7

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use googl_bot::{BotConfig, Result, Session};
use googl_core::fuzzy::{FuzzyEngine, Metric, DEFAULT_CUTOFF};
use googl_core::knowledge::{JsonFileStore, DEFAULT_PATH};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "googlbot")]
#[command(about = "Console bot that does math and learns answers")]
#[command(version)]
struct Args {
    /// Knowledge base file
    #[arg(long, default_value = DEFAULT_PATH)]
    knowledge_base: PathBuf,

    /// Minimum similarity (0 to 1) for a stored question to match
    #[arg(long, default_value_t = DEFAULT_CUTOFF)]
    cutoff: f64,

    /// Similarity metric (sequence, levenshtein, jaro-winkler)
    #[arg(long, default_value = "sequence")]
    metric: Metric,

    /// Log level when RUST_LOG is unset (debug, info, warn, error)
    #[arg(long, default_value = googl_bot::tracing::DEFAULT_FILTER)]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    googl_bot::tracing::init_with_filter(&args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session ended with an error");
            eprintln!("googlbot: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = BotConfig {
        knowledge_path: args.knowledge_base,
        cutoff: args.cutoff,
        metric: args.metric,
    }
    .validate()?;

    info!("Starting GooglBot {}", env!("CARGO_PKG_VERSION"));
    info!(
        path = %config.knowledge_path.display(),
        cutoff = config.cutoff,
        metric = %config.metric,
        "configuration"
    );

    let store = JsonFileStore::new(&config.knowledge_path);
    let engine = FuzzyEngine::with_config(config.engine_config());
    let mut session = Session::open(store, engine)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    session.run(stdin.lock(), stdout.lock())
}
