//! dblint CLI tool.
//!
//! Usage:
//! ```bash
//! dblint scan [OPTIONS] [PATH]
//! dblint list-rules
//! dblint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use dblint_core::Severity;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod discovery;
mod rule_file;

/// SQL and database anti-pattern scanner for Java codebases
#[derive(Parser)]
#[command(name = "dblint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan Java sources for anti-pattern findings
    Scan {
        /// Path to scan (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Rule file (TOML or JSON); defaults to the built-in catalog
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exit nonzero when a finding meets this severity
        #[arg(long)]
        fail_on: Option<SeverityArg>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Worker threads (default: all cores)
        #[arg(long)]
        jobs: Option<usize>,

        /// Per-file time budget in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// List available rules
    ListRules {
        /// Rule file to list instead of the built-in catalog
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Initialize a starter configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for scan results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

/// Severity threshold argument.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SeverityArg {
    /// Fail on any finding.
    Info,
    /// Fail on warnings and errors.
    Warning,
    /// Fail on errors only.
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Info => Self::Info,
            SeverityArg::Warning => Self::Warning,
            SeverityArg::Error => Self::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Scan {
            path,
            rules,
            format,
            fail_on,
            exclude,
            jobs,
            timeout_ms,
        } => commands::scan::run(commands::scan::ScanArgs {
            path,
            rules,
            format,
            fail_on: fail_on.map(Severity::from),
            exclude,
            jobs,
            timeout_ms,
            config: cli.config,
        }),
        Commands::ListRules { rules } => commands::list_rules::run(rules.as_deref()),
        Commands::Init { force } => commands::init::run(force),
    }
}
