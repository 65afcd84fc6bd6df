//! stale CLI — offline inspection of a persisted change-detection snapshot.
//!
//! Provides `stale status` for a summary of the recorded state, `stale show`
//! for one file's recorded hash and dependencies, and `stale clear` to drop
//! the snapshot and force a cold start. The CLI never runs tests and never
//! resolves dependencies; it only reads (or deletes) the snapshot file.

#![warn(missing_docs)]

mod clear;
mod show;
mod status;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// stale — skip tests whose dependency closure is provably unchanged.
#[derive(Parser, Debug)]
#[command(name = "stale", version, about = "Incremental test-selection cache")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Working directory containing the snapshot (defaults to the current
    /// directory).
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Summarize the persisted snapshot.
    Status,
    /// Show the recorded hash and direct dependencies of one file.
    Show(ShowArgs),
    /// Delete the snapshot, forcing a cold start on the next run.
    Clear,
}

/// Arguments for the `stale show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// The file to look up.
    pub path: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Output format for `stale show`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// The working directory to operate in.
    pub dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        dir: cli.dir,
    };

    let result = match cli.command {
        Command::Status => status::run(&global),
        Command::Show(ref args) => show::run(args, &global),
        Command::Clear => clear::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

/// Resolves the working directory and the snapshot path from the global
/// flags plus any `stale.toml` override.
pub(crate) fn snapshot_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match &global.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let config = stale_config::load_config(&dir)?;
    Ok(config.snapshot_path())
}
