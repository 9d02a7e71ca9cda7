//! Scan engine: schedules matcher strategies over source units.
//!
//! The engine fans out one task per unit across a rayon worker pool. Each
//! task produces a private outcome (candidates + warnings); outcomes are
//! merged once per file by a single collector and handed to the
//! aggregator, which imposes the deterministic final ordering.

use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::aggregate::aggregate;
use crate::config::ScanConfig;
use crate::registry::RuleRegistry;
use crate::strategies::StrategySet;
use crate::types::{MatchCandidate, ScanPhase, ScanResult, ScanWarning};
use crate::unit::{Extractor, SourceUnit};

/// Errors that can occur while setting up a scan.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Scan-wide options.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Per-file time budget covering extraction and matching.
    pub timeout: Duration,
    /// Worker thread cap (`None` = rayon default, all cores).
    pub jobs: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(2000),
            jobs: None,
        }
    }
}

impl ScanOptions {
    /// Derives options from a [`ScanConfig`].
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.scanner.timeout_ms),
            jobs: config.scanner.jobs,
        }
    }
}

/// Scan-wide cancellation signal.
///
/// Cloning shares the underlying flag; cancelling stops work that has not
/// started while results from already-completed files are retained.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation to all holders.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Private per-unit result produced by one worker task.
#[derive(Debug, Default)]
struct UnitOutcome {
    candidates: Vec<MatchCandidate>,
    warnings: Vec<ScanWarning>,
    completed: bool,
}

impl UnitOutcome {
    fn skipped() -> Self {
        Self::default()
    }

    fn failed(warning: ScanWarning) -> Self {
        Self {
            warnings: vec![warning],
            ..Self::default()
        }
    }
}

/// Runs all applicable strategies against all source units.
///
/// The registry is passed in explicitly and shared read-only across
/// workers; two engines with different rule sets can scan concurrently in
/// the same process.
pub struct ScanEngine {
    registry: RuleRegistry,
    strategies: StrategySet,
    options: ScanOptions,
}

impl ScanEngine {
    /// Creates an engine over the given registry.
    #[must_use]
    pub fn new(registry: RuleRegistry, options: ScanOptions) -> Self {
        Self {
            registry,
            strategies: StrategySet::new(),
            options,
        }
    }

    /// Returns the registry this engine scans with.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Scans pre-extracted units.
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker pool cannot be built; matching
    /// failures degrade to warnings in the result.
    pub fn scan_units(
        &self,
        units: &[SourceUnit],
        cancel: &CancelToken,
    ) -> Result<ScanResult, EngineError> {
        info!("Scanning {} unit(s) with {} rule(s)", units.len(), self.registry.len());
        let outcomes = self.install(|| {
            units
                .par_iter()
                .map(|unit| self.match_unit(unit, Instant::now() + self.options.timeout, cancel))
                .collect()
        })?;
        Ok(self.collect(outcomes))
    }

    /// Reads, extracts, and scans files.
    ///
    /// Extraction happens inside the worker task so the per-file timeout
    /// covers both extraction and matching. Unreadable files degrade to
    /// extraction warnings.
    ///
    /// # Errors
    ///
    /// Returns an error only if the worker pool cannot be built.
    pub fn scan_paths(
        &self,
        paths: &[PathBuf],
        extractor: &dyn Extractor,
        cancel: &CancelToken,
    ) -> Result<ScanResult, EngineError> {
        info!("Scanning {} file(s) with {} rule(s)", paths.len(), self.registry.len());
        let outcomes = self.install(|| {
            paths
                .par_iter()
                .map(|path| self.scan_one_path(path, extractor, cancel))
                .collect()
        })?;
        Ok(self.collect(outcomes))
    }

    fn scan_one_path(
        &self,
        path: &PathBuf,
        extractor: &dyn Extractor,
        cancel: &CancelToken,
    ) -> UnitOutcome {
        if cancel.is_cancelled() {
            return UnitOutcome::skipped();
        }
        let deadline = Instant::now() + self.options.timeout;

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to read {}: {e}", path.display());
                return UnitOutcome::failed(ScanWarning::Extraction {
                    path: path.clone(),
                    detail: format!("could not read file: {e}"),
                });
            }
        };

        debug!("Extracting: {}", path.display());
        let extraction = extractor.extract(path, &source);

        if Instant::now() >= deadline {
            return UnitOutcome::failed(self.timeout_warning(path.clone(), ScanPhase::Extract));
        }

        let mut outcome = self.match_unit(&extraction.unit, deadline, cancel);
        // Extraction warnings survive even when matching completed.
        outcome.warnings.splice(0..0, extraction.warnings);
        outcome
    }

    /// Matches every applicable rule against one unit.
    ///
    /// Failures are isolated per unit/rule pair: a strategy error yields
    /// zero results for that pair and a warning, and never aborts other
    /// rules, let alone other units. Invariant violations are additionally
    /// logged at error level: they indicate registry/strategy contract
    /// drift, not user input problems.
    fn match_unit(&self, unit: &SourceUnit, deadline: Instant, cancel: &CancelToken) -> UnitOutcome {
        let mut candidates = Vec::new();
        let mut warnings = Vec::new();

        for category in self.registry.categories() {
            if !category.applies_to(unit) {
                continue;
            }
            let strategy = self.strategies.for_category(category);

            for rule in self.registry.by_category(category) {
                if cancel.is_cancelled() {
                    return UnitOutcome::skipped();
                }
                if Instant::now() >= deadline {
                    return UnitOutcome::failed(
                        self.timeout_warning(unit.path.clone(), ScanPhase::Match(category)),
                    );
                }

                match strategy.apply(unit, rule) {
                    Ok(found) => candidates.extend(found),
                    Err(e) => {
                        error!("{}: {e}", unit.path.display());
                        warnings.push(ScanWarning::RuleFailure {
                            path: unit.path.clone(),
                            rule_id: rule.id().to_string(),
                            detail: e.to_string(),
                        });
                    }
                }
            }
        }

        debug_assert!(
            unit.line_count == 0
                || candidates.iter().all(|c| c.location.line <= unit.line_count),
            "candidate outside unit line range"
        );

        UnitOutcome {
            candidates,
            warnings,
            completed: true,
        }
    }

    /// Single merge point: one append per completed file, then aggregate.
    fn collect(&self, outcomes: Vec<UnitOutcome>) -> ScanResult {
        let mut result = ScanResult::new();
        let mut candidates = Vec::new();

        for outcome in outcomes {
            if outcome.completed {
                result.files_scanned += 1;
            }
            candidates.extend(outcome.candidates);
            result.warnings.extend(outcome.warnings);
        }

        // Candidates can only reference registry rules; anything else is
        // contract drift. Drop the stray candidate loudly and keep the
        // best-effort findings.
        candidates.retain(|c| {
            if self.registry.get(&c.rule_id).is_some() {
                true
            } else {
                error!("candidate references unknown rule `{}`", c.rule_id);
                result.warnings.push(ScanWarning::Invariant {
                    rule_id: c.rule_id.clone(),
                    detail: "candidate references a rule absent from the registry".to_string(),
                });
                false
            }
        });

        match aggregate(candidates, &self.registry) {
            Ok(findings) => result.findings = findings,
            Err(e) => {
                error!("aggregation failed: {e}");
                result.warnings.push(ScanWarning::Invariant {
                    rule_id: String::new(),
                    detail: e.to_string(),
                });
            }
        }

        info!(
            "Scan complete: {} finding(s), {} warning(s) in {} file(s)",
            result.findings.len(),
            result.warnings.len(),
            result.files_scanned
        );
        result
    }

    fn timeout_warning(&self, path: PathBuf, phase: ScanPhase) -> ScanWarning {
        let budget_ms = u64::try_from(self.options.timeout.as_millis()).unwrap_or(u64::MAX);
        warn!("{}: timed out during {phase}", path.display());
        ScanWarning::Timeout {
            path,
            budget_ms,
            phase,
        }
    }

    fn install<R: Send>(
        &self,
        run: impl FnOnce() -> Vec<R> + Send,
    ) -> Result<Vec<R>, EngineError> {
        match self.options.jobs {
            None => Ok(run()),
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
                Ok(pool.install(run))
            }
        }
    }
}
