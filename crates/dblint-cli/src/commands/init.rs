//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# dblint configuration

# Severity threshold for a failing exit status (info, warning, error)
fail-on = "error"

[scanner]
# Per-file time budget in milliseconds
timeout-ms = 2000

# Worker threads (remove to use all cores)
# jobs = 4

# Glob patterns to exclude from scanning
exclude = [
    "**/target/**",
    "**/build/**",
    "**/generated/**",
]

# Respect .gitignore files
respect-gitignore = true

# Rule configurations
# Each built-in rule can be disabled or have its severity overridden

# [rules.sql-java-020]
# enabled = false

# [rules.sql-java-011]
# severity = "warning"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("dblint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created dblint.toml");
    println!("\nNext steps:");
    println!("  1. Edit dblint.toml to configure rules");
    println!("  2. Run: dblint scan");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dblint_core::ScanConfig;

    #[test]
    fn starter_config_parses() {
        let config = ScanConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.fail_on(), dblint_core::Severity::Error);
        assert_eq!(config.scanner.timeout_ms, 2000);
        assert_eq!(config.scanner.exclude.len(), 3);
    }
}
