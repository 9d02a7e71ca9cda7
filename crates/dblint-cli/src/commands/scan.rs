//! Scan command implementation.

use anyhow::{Context, Result};
use dblint_core::{registry, CancelToken, ScanConfig, ScanEngine, ScanOptions, Severity};
use dblint_java::JavaExtractor;
use std::path::PathBuf;

use super::output;
use crate::{discovery, rule_file, OutputFormat};

/// Arguments for the scan command, CLI flags plus the global config path.
pub struct ScanArgs {
    /// Root to scan.
    pub path: PathBuf,
    /// Rule file, or `None` for the built-in catalog.
    pub rules: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Severity threshold for a failing exit.
    pub fail_on: Option<Severity>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Worker thread cap.
    pub jobs: Option<usize>,
    /// Per-file time budget override.
    pub timeout_ms: Option<u64>,
    /// Explicit config file.
    pub config: Option<PathBuf>,
}

/// Runs the scan command.
pub fn run(args: ScanArgs) -> Result<()> {
    let mut config = resolve_config(&args)?;

    // CLI flags override file configuration.
    config.scanner.exclude.extend(args.exclude);
    if let Some(jobs) = args.jobs {
        config.scanner.jobs = Some(jobs);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.scanner.timeout_ms = timeout_ms;
    }
    if let Some(fail_on) = args.fail_on {
        config.fail_on = Some(fail_on);
    }

    let specs = match &args.rules {
        Some(path) => rule_file::load_specs(path)?,
        None => dblint_rules::builtin_specs(),
    };
    let registry =
        registry::load_with_config(specs, &config).context("invalid rule specification")?;

    let files = discovery::discover(
        &args.path,
        &config.scanner.exclude,
        config.scanner.respect_gitignore,
    )?;
    tracing::info!("Scanning {} file(s) under {:?}", files.len(), args.path);

    let engine = ScanEngine::new(registry, ScanOptions::from_config(&config));
    let extractor = JavaExtractor::new();
    let result = engine
        .scan_paths(&files, &extractor, &CancelToken::new())
        .context("scan failed")?;

    output::print(&result, args.format)?;

    // Warnings never affect exit status; findings at or above the
    // threshold do.
    if result.has_findings_at(config.fail_on()) {
        std::process::exit(1);
    }

    Ok(())
}

fn resolve_config(args: &ScanArgs) -> Result<ScanConfig> {
    if let Some(path) = &args.config {
        return ScanConfig::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display()));
    }

    let default_path = args.path.join("dblint.toml");
    if default_path.exists() {
        tracing::info!("Using config: {}", default_path.display());
        return ScanConfig::from_file(&default_path)
            .with_context(|| format!("failed to load config: {}", default_path.display()));
    }

    Ok(ScanConfig::default())
}
