//! Shared output formatting for scan results.

use anyhow::Result;
use dblint_core::{ScanResult, Severity};

use crate::OutputFormat;

/// Print scan results in the specified format.
pub fn print(result: &ScanResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &ScanResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for finding in &result.findings {
        let severity_indicator = match finding.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} at {}:{}:{}",
            finding.rule_id,
            finding.location.file.display(),
            finding.location.line,
            finding.location.column,
        );
        println!("  {}: {}", severity_indicator, finding.message);
        println!("  > {}", finding.snippet);
        if finding.confidence < 1.0 {
            println!("  = confidence: {:.2}", finding.confidence);
        }
        println!();
    }

    if !result.warnings.is_empty() {
        println!("\x1b[33mwarnings:\x1b[0m");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_scanned
    );
}

fn print_json(result: &ScanResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &ScanResult) {
    for finding in &result.findings {
        println!(
            "{}:{}:{}: {} [{}] {}",
            finding.location.file.display(),
            finding.location.line,
            finding.location.column,
            finding.severity,
            finding.rule_id,
            finding.message,
        );
    }
}
