//! List-rules command implementation.

use anyhow::{Context, Result};
use dblint_core::RuleRegistry;
use std::path::Path;

use crate::rule_file;

/// Runs the list-rules command.
///
/// Validates the specs the same way `scan` would, so a broken rule file
/// fails here too rather than at scan time.
pub fn run(rules_path: Option<&Path>) -> Result<()> {
    let specs = match rules_path {
        Some(path) => rule_file::load_specs(path)?,
        None => dblint_rules::builtin_specs(),
    };
    let registry = RuleRegistry::load(specs).context("invalid rule specification")?;

    println!("Available rules:\n");
    for rule in registry.iter() {
        println!(
            "  {}  [{}] {}",
            rule.id(),
            rule.category(),
            rule.severity()
        );
        println!("      {}", rule.description());
    }
    println!("\n{} rule(s)", registry.len());

    Ok(())
}
