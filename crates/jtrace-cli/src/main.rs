//! jtrace CLI tool.
//!
//! Usage:
//! ```bash
//! jtrace scan [OPTIONS] [PATH]
//! jtrace enforce --fail-on warning [PATH]
//! jtrace cycles [PATH]
//! jtrace rules
//! jtrace init
//! ```
//!
//! Exit codes: `0` clean (or below the threshold), `1` violations at or
//! above the threshold, `2` configuration or engine failure.

use clap::{Parser, Subcommand};
use jtrace_core::{ConfigError, Severity};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

use commands::Outcome;

/// Architecture rule checker for Java sources
#[derive(Parser)]
#[command(name = "jtrace")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "JTRACE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze sources and report violations
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Analyze sources and fail at a given severity threshold
    Enforce {
        #[command(flatten)]
        scan: ScanArgs,

        /// Severity threshold overriding `fail_on` from the config
        #[arg(long)]
        fail_on: Option<Severity>,
    },

    /// Print class-level dependency cycles
    Cycles {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List supported rule types
    Rules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Arguments shared by `scan` and `enforce`.
#[derive(clap::Args)]
pub struct ScanArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    let outcome = match cli.command {
        Commands::Scan { scan } => commands::scan::run(&scan, None, config),
        Commands::Enforce { scan, fail_on } => commands::enforce::run(&scan, fail_on, config),
        Commands::Cycles { path, exclude } => commands::cycles::run(&path, &exclude, config),
        Commands::Rules => {
            commands::rules::run();
            Ok(Outcome::Passed)
        }
        Commands::Init { force } => {
            commands::init::run(std::path::Path::new("."), force).map(|()| Outcome::Passed)
        }
    };

    match outcome {
        Ok(outcome) => outcome.exit_code(),
        Err(err) => report_failure(err),
    }
}

/// Renders a fatal error and returns the failure exit code.
fn report_failure(err: anyhow::Error) -> ExitCode {
    let err = match err.downcast::<ConfigError>() {
        Ok(config_err) => {
            eprintln!("{:?}", miette::Report::new(config_err));
            return ExitCode::from(2);
        }
        Err(other) => other,
    };
    match err.downcast::<config_resolver::ConfigNotFound>() {
        Ok(not_found) => eprintln!("{:?}", miette::Report::new(not_found)),
        Err(other) => eprintln!("error: {other:#}"),
    }
    ExitCode::from(2)
}
