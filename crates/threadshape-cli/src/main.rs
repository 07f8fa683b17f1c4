//! threadshape CLI
//!
//! # Commands
//!
//! - `build-tensor`: assemble the feature tensor from a corpus and persist it
//! - `decompose`: run the configured CP solver at every requested rank
//! - `summarize`: rank groups, features and horizons per latent component
//! - `detailed-examples`: print the reply structure of flagged conversations
//! - `run`: all four in order, resuming from stored artifacts
//!
//! Logging goes to stderr and is controlled by `THREADSHAPE_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use threadshape_core::config::CliOverrides;
use threadshape_core::errors::ThreadshapeErrorCode;

mod commands;
mod error;
mod output;

/// Latent temporal-structural patterns in threaded conversations.
#[derive(Parser, Debug)]
#[command(name = "threadshape", version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Working root: holds threadshape.toml and, by default, the data directory
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// JSONL corpus with precomputed per-horizon features
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Smallest observation horizon
    #[arg(long, global = true)]
    pub horizon_min: Option<usize>,

    /// Largest observation horizon
    #[arg(long, global = true)]
    pub horizon_max: Option<usize>,

    /// Decomposition ranks, comma separated
    #[arg(long, global = true, value_delimiter = ',')]
    pub ranks: Option<Vec<usize>>,

    /// Symmetric z-score threshold
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Solver seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Rank to report on
    #[arg(long, global = true)]
    pub rank: Option<usize>,

    /// Artifact directory
    #[arg(long, global = true)]
    pub work_dir: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            horizon_min: self.horizon_min,
            horizon_max: self.horizon_max,
            ranks: self.ranks.clone(),
            threshold: self.threshold,
            seed: self.seed,
            report_rank: self.rank,
            work_dir: self.work_dir.clone(),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Assemble and persist the feature tensor
    BuildTensor,
    /// Decompose the stored tensor at every configured rank
    Decompose,
    /// Group-normalized outlier summary per component
    Summarize,
    /// Reply structure of every flagged conversation
    DetailedExamples,
    /// All stages, skipping those whose artifacts exist
    Run {
        /// Recompute every stage
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    threadshape_core::tracing::init_tracing();
    let cli = Cli::parse();

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Command::BuildTensor => commands::build_tensor(&cli.global, &mut stdout),
        Command::Decompose => commands::decompose(&cli.global, &mut stdout),
        Command::Summarize => commands::summarize(&cli.global, &mut stdout),
        Command::DetailedExamples => commands::detailed_examples(&cli.global, &mut stdout),
        Command::Run { force } => commands::run(&cli.global, force, &mut stdout),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(code = err.error_code(), error = %err, "command failed");
            eprintln!("{}", err.display_with_code());
            ExitCode::from(err.exit_code())
        }
    }
}
