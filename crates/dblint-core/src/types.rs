//! Core types for scan findings and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::registry::RuleCategory;

/// Severity level for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a scan.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the scan root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// An unconfirmed, possibly-duplicate detection produced by one strategy.
///
/// Candidates are transient: the engine hands them straight to the
/// aggregator, which resolves duplicates into [`Finding`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    /// Id of the rule that fired.
    pub rule_id: String,
    /// Where the pattern occurred.
    pub location: Location,
    /// Source excerpt for the report.
    pub snippet: String,
    /// Match confidence in `0.0..=1.0`. Below 1.0 for heuristic matches.
    pub confidence: f32,
    /// Which strategy produced this candidate (used for tie-breaking).
    pub strategy: RuleCategory,
}

/// A deduplicated, final detection reported to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Id of the rule that fired (e.g., "sql-java-020").
    pub rule_id: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Primary location of the finding.
    pub location: Location,
    /// Human-readable rule description.
    pub message: String,
    /// Source excerpt the rule matched on.
    pub snippet: String,
    /// Match confidence in `0.0..=1.0`.
    pub confidence: f32,
}

impl Finding {
    /// Formats the finding for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} at {}:{}:{}\n",
            self.rule_id,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        let _ = writeln!(output, "  > {}", self.snippet);
        if self.confidence < 1.0 {
            let _ = writeln!(output, "  = confidence: {:.2}", self.confidence);
        }
        output
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.rule_id,
            self.message
        )
    }
}

/// Converts a Finding to a miette Diagnostic for rich error display.
#[allow(dead_code)] // Public API for miette integration
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct FindingDiagnostic {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Finding> for FindingDiagnostic {
    fn from(finding: &Finding) -> Self {
        Self {
            message: format!("[{}] {}", finding.rule_id, finding.message),
            span: SourceSpan::from((finding.location.offset, finding.location.length)),
            label_message: finding.snippet.clone(),
        }
    }
}

/// The phase a file was in when its time budget expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    /// Fact extraction.
    Extract,
    /// Matching rules of the given category.
    Match(RuleCategory),
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extract => write!(f, "extraction"),
            Self::Match(category) => write!(f, "{category} matching"),
        }
    }
}

/// A non-fatal condition recorded during a scan.
///
/// Warnings never abort a scan; they accompany the best-effort findings so
/// that degraded files are traceable rather than silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ScanWarning {
    /// A file had unparseable regions; facts from those regions were skipped.
    #[error("{path}: extraction degraded: {detail}")]
    Extraction {
        /// File that degraded.
        path: PathBuf,
        /// What was skipped.
        detail: String,
    },

    /// A file exceeded its per-file time budget and was excluded.
    #[error("{path}: timed out after {budget_ms}ms during {phase}")]
    Timeout {
        /// File that timed out.
        path: PathBuf,
        /// Configured budget in milliseconds.
        budget_ms: u64,
        /// What was in progress when the deadline passed.
        phase: ScanPhase,
    },

    /// Matching one rule against one unit failed; the pair yielded no results.
    #[error("{path}: rule {rule_id} failed: {detail}")]
    RuleFailure {
        /// File being matched.
        path: PathBuf,
        /// Rule that failed.
        rule_id: String,
        /// Failure detail.
        detail: String,
    },

    /// A rule passed registry validation but a strategy could not process it.
    ///
    /// Always a programming-level bug (registry/strategy contract drift);
    /// logged at error level in addition to being reported here.
    #[error("internal invariant violated for rule {rule_id}: {detail}")]
    Invariant {
        /// Rule involved.
        rule_id: String,
        /// What the strategy could not process.
        detail: String,
    },
}

/// Result of running a scan.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// All findings, sorted by `(file, line, rule_id)`.
    pub findings: Vec<Finding>,
    /// Non-fatal warnings recorded during the scan.
    pub warnings: Vec<ScanWarning>,
    /// Number of files scanned to completion.
    pub files_scanned: usize,
}

impl ScanResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any error-severity findings.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    /// Checks if any finding meets or exceeds the given severity threshold.
    #[must_use]
    pub fn has_findings_at(&self, severity: Severity) -> bool {
        self.findings.iter().any(|f| f.severity >= severity)
    }

    /// Returns findings filtered by severity.
    #[must_use]
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .collect()
    }

    /// Counts findings by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let errors = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        let warnings = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
            .count();
        let infos = self
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Info)
            .count();
        (errors, warnings, infos)
    }

    /// Formats a full text report.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;
        let mut report = String::new();

        for finding in &self.findings {
            let _ = writeln!(report, "{}", finding.format());
        }

        if !self.warnings.is_empty() {
            let _ = writeln!(report, "warnings:");
            for warning in &self.warnings {
                let _ = writeln!(report, "  - {warning}");
            }
            let _ = writeln!(report);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Found {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_scanned
        );

        report
    }

    /// Prints the report to stdout.
    pub fn print_report(&self) {
        print!("{}", self.format_report());
    }

    /// Adds findings and warnings from another result.
    pub fn extend(&mut self, other: Self) {
        self.findings.extend(other.findings);
        self.warnings.extend(other.warnings);
        self.files_scanned += other.files_scanned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_finding(severity: Severity) -> Finding {
        Finding {
            rule_id: "sql-java-020".to_string(),
            severity,
            location: Location::new(PathBuf::from("src/UserDao.java"), 42, 9),
            message: "SELECT statement assembled in a string literal".to_string(),
            snippet: "String sql = \"SELECT * FROM users\";".to_string(),
            confidence: 1.0,
        }
    }

    // --- Finding formatting ---

    #[test]
    fn finding_format_includes_location_and_severity() {
        let f = make_finding(Severity::Warning);
        let formatted = f.format();
        assert!(formatted.contains("sql-java-020 at src/UserDao.java:42:9"));
        assert!(formatted.contains("warning: SELECT statement"));
    }

    #[test]
    fn finding_format_omits_confidence_when_exact() {
        let f = make_finding(Severity::Warning);
        assert!(!f.format().contains("confidence"));
    }

    #[test]
    fn finding_format_includes_confidence_when_heuristic() {
        let mut f = make_finding(Severity::Warning);
        f.confidence = 0.7;
        assert!(f.format().contains("= confidence: 0.70"));
    }

    #[test]
    fn finding_display_one_line() {
        let f = make_finding(Severity::Error);
        let display = format!("{f}");
        assert!(display.starts_with("src/UserDao.java:42:9: error [sql-java-020]"));
    }

    // --- Severity ordering ---

    #[test]
    fn severity_orders_info_warning_error() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    // --- ScanResult ---

    #[test]
    fn has_findings_at_respects_threshold() {
        let mut result = ScanResult::new();
        result.findings.push(make_finding(Severity::Warning));
        assert!(!result.has_findings_at(Severity::Error));
        assert!(result.has_findings_at(Severity::Warning));
        assert!(result.has_findings_at(Severity::Info));
    }

    #[test]
    fn count_by_severity_buckets() {
        let mut result = ScanResult::new();
        result.findings.push(make_finding(Severity::Error));
        result.findings.push(make_finding(Severity::Warning));
        result.findings.push(make_finding(Severity::Warning));
        assert_eq!(result.count_by_severity(), (1, 2, 0));
    }

    #[test]
    fn report_includes_warnings_section() {
        let mut result = ScanResult::new();
        result.files_scanned = 3;
        result.warnings.push(ScanWarning::Extraction {
            path: PathBuf::from("src/Broken.java"),
            detail: "2 syntax error region(s) skipped".to_string(),
        });

        let report = result.format_report();
        assert!(report.contains("warnings:"));
        assert!(report.contains("src/Broken.java: extraction degraded"));
        assert!(report.contains("in 3 file(s)"));
    }

    #[test]
    fn extend_merges_counts() {
        let mut a = ScanResult::new();
        a.files_scanned = 2;
        a.findings.push(make_finding(Severity::Info));

        let mut b = ScanResult::new();
        b.files_scanned = 1;
        b.findings.push(make_finding(Severity::Error));

        a.extend(b);
        assert_eq!(a.files_scanned, 3);
        assert_eq!(a.findings.len(), 2);
    }
}
