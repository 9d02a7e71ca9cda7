//! Rule-spec file loading.
//!
//! The file format is chosen by extension: `.json` parses with serde_json,
//! everything else parses as TOML.

use anyhow::{Context, Result};
use dblint_core::{RuleFileDto, RuleSpecRaw};
use std::path::Path;

/// Loads raw rule specs from a TOML or JSON file.
pub fn load_specs(path: &Path) -> Result<Vec<RuleSpecRaw>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule file {}", path.display()))?;

    let dto: RuleFileDto = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON rule file {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("invalid TOML rule file {}", path.display()))?
    };

    Ok(dto.rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_toml_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        std::fs::write(
            &path,
            r#"
[[rules]]
id = "sql-java-020"
category = "literal-contains"
needle = "SELECT"
description = "select in literal"
"#,
        )
        .unwrap();

        let specs = load_specs(&path).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].id, "sql-java-020");
    }

    #[test]
    fn loads_json_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{
  "rules": [
    {
      "id": "sql-java-001",
      "category": "call-shape",
      "methods": ["setMinIdle"],
      "receiver": "BasicDataSource",
      "description": "pool sizing"
    }
  ]
}"#,
        )
        .unwrap();

        let specs = load_specs(&path).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].methods, vec!["setMinIdle"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_specs(Path::new("/nonexistent/rules.toml")).is_err());
    }
}
