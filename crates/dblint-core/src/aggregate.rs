//! Aggregation and deduplication of match candidates into findings.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::registry::RuleRegistry;
use crate::types::{Finding, MatchCandidate};

/// Errors during candidate aggregation.
///
/// These indicate a broken engine contract, not user error: candidates are
/// only ever produced from registry rules.
#[derive(Debug, thiserror::Error)]
pub enum AggregateError {
    /// A candidate referenced a rule id absent from the registry.
    #[error("candidate references unknown rule `{id}`")]
    UnknownRule {
        /// The unknown id.
        id: String,
    },
}

/// Returns true if `candidate` should replace `current` for the same
/// grouping key: higher confidence wins, equal confidence falls back to
/// strategy priority (exact matches outrank reconstructed ones).
fn outranks(candidate: &MatchCandidate, current: &MatchCandidate) -> bool {
    match candidate.confidence.total_cmp(&current.confidence) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => {
            candidate.strategy.priority() > current.strategy.priority()
        }
    }
}

/// Merges raw candidates into final findings.
///
/// Grouping key is `(rule_id, file, line)`: when several strategies fire on
/// the same location for the same rule, the highest-confidence candidate
/// survives. Output is sorted by `(file, line, rule_id)` so reports are
/// deterministic regardless of match completion order.
///
/// # Errors
///
/// Returns [`AggregateError::UnknownRule`] if a candidate's rule id does
/// not exist in the registry, which is an internal invariant violation.
pub fn aggregate(
    candidates: Vec<MatchCandidate>,
    registry: &RuleRegistry,
) -> Result<Vec<Finding>, AggregateError> {
    let mut best: BTreeMap<(String, PathBuf, usize), MatchCandidate> = BTreeMap::new();

    for candidate in candidates {
        let key = (
            candidate.rule_id.clone(),
            candidate.location.file.clone(),
            candidate.location.line,
        );
        match best.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(candidate);
            }
            Entry::Occupied(mut entry) => {
                if outranks(&candidate, entry.get()) {
                    entry.insert(candidate);
                }
            }
        }
    }

    let mut findings = Vec::with_capacity(best.len());
    for candidate in best.into_values() {
        let rule = registry
            .get(&candidate.rule_id)
            .ok_or_else(|| AggregateError::UnknownRule {
                id: candidate.rule_id.clone(),
            })?;
        findings.push(Finding {
            rule_id: candidate.rule_id,
            severity: rule.severity(),
            location: candidate.location,
            message: rule.description().to_string(),
            snippet: candidate.snippet,
            confidence: candidate.confidence,
        });
    }

    findings.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.rule_id.cmp(&b.rule_id))
    });

    Ok(findings)
}
