//! Java source discovery.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Discovers `.java` files under `root`, honoring `.gitignore` when asked
/// and dropping anything matched by an exclude glob.
///
/// Paths come back sorted so downstream output is deterministic
/// regardless of walk order.
pub fn discover(root: &Path, excludes: &[String], respect_gitignore: bool) -> Result<Vec<PathBuf>> {
    let patterns: Vec<glob::Pattern> = excludes
        .iter()
        .map(|p| glob::Pattern::new(p).with_context(|| format!("invalid exclude pattern `{p}`")))
        .collect::<Result<_>>()?;

    let mut files = Vec::new();
    let walker = WalkBuilder::new(root)
        .git_ignore(respect_gitignore)
        .git_global(respect_gitignore)
        .hidden(true)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if path.extension().map_or(true, |ext| ext != "java") {
            continue;
        }
        if is_excluded(path, &patterns) {
            debug!("Excluding: {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn is_excluded(path: &Path, patterns: &[glob::Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|pattern| {
        if pattern.matches(&path_str) {
            return true;
        }
        // Substring fallback for patterns like "**/generated/**".
        let normalized = pattern.as_str().replace("**", "");
        !normalized.is_empty() && path_str.contains(&normalized)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "class T {}").unwrap();
    }

    #[test]
    fn finds_java_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b/Second.java"));
        touch(&dir.path().join("a/First.java"));
        touch(&dir.path().join("a/readme.md"));

        let files = discover(dir.path(), &[], true).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a/First.java"));
        assert!(files[1].ends_with("b/Second.java"));
    }

    #[test]
    fn exclude_pattern_filters_paths() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/Main.java"));
        touch(&dir.path().join("generated/Stub.java"));

        let files = discover(dir.path(), &["**/generated/**".to_string()], true).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/Main.java"));
    }

    #[test]
    fn invalid_exclude_pattern_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), &["[".to_string()], true).is_err());
    }
}
