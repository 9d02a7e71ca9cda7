//! Dynamic-SQL strategy: literal patterns over reconstructed
//! concatenation chains.

use crate::registry::{PatternSpec, Rule, RuleCategory};
use crate::types::MatchCandidate;
use crate::unit::SourceUnit;

use super::{clip_snippet, invariant, Strategy, StrategyError, CONFIDENCE_RECONSTRUCTED};

/// Re-applies literal matching to each reconstructed concatenation group.
///
/// Reconstruction joins the group's literal parts only; intervening
/// variables are not evaluated, so every match here is heuristic and
/// reported below exact confidence.
#[derive(Debug, Default)]
pub struct DynamicSqlStrategy;

impl Strategy for DynamicSqlStrategy {
    fn category(&self) -> RuleCategory {
        RuleCategory::DynamicSqlBuild
    }

    fn apply(&self, unit: &SourceUnit, rule: &Rule) -> Result<Vec<MatchCandidate>, StrategyError> {
        let PatternSpec::DynamicSql(pattern) = rule.pattern() else {
            return Err(invariant(self.category(), rule));
        };

        Ok(unit
            .concat_groups()
            .into_iter()
            .filter(|group| pattern.is_match(&group.text))
            .map(|group| MatchCandidate {
                rule_id: rule.id().to_string(),
                location: group.location,
                snippet: clip_snippet(&group.text),
                confidence: CONFIDENCE_RECONSTRUCTED,
                strategy: self.category(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RuleRegistry, RuleSpecRaw};
    use crate::types::Location;
    use crate::unit::{GroupId, Literal};
    use std::path::PathBuf;

    fn grouped_literal(text: &str, line: usize, group: u32) -> Literal {
        Literal {
            text: text.to_string(),
            location: Location::new(PathBuf::from("src/OrderDao.java"), line, 20)
                .with_span(line * 50, text.len()),
            end_line: line,
            concat_group: Some(GroupId(group)),
        }
    }

    fn where_rule() -> RuleRegistry {
        RuleRegistry::load(vec![RuleSpecRaw {
            id: "sql-java-021".to_string(),
            category: "dynamic-sql-build".to_string(),
            needle: Some("WHERE status".to_string()),
            ..RuleSpecRaw::default()
        }])
        .unwrap()
    }

    #[test]
    fn reconstructed_chain_matches_at_reduced_confidence() {
        let mut unit = SourceUnit::new("src/OrderDao.java");
        unit.literals
            .push(grouped_literal("SELECT * FROM users WHERE", 4, 0));
        unit.literals
            .push(grouped_literal(" status = 'active'", 5, 0));

        let registry = where_rule();
        let candidates = DynamicSqlStrategy
            .apply(&unit, registry.get("sql-java-021").unwrap())
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].confidence, 0.7);
        // Anchored at the first literal of the chain.
        assert_eq!(candidates[0].location.line, 4);
        assert_eq!(
            candidates[0].snippet,
            "SELECT * FROM users WHERE status = 'active'"
        );
    }

    #[test]
    fn member_literals_do_not_match_alone() {
        // Neither half contains the needle; only the joined text does.
        assert!(!"SELECT * FROM users WHERE".contains("WHERE status"));
        assert!(!" status = 'active'".contains("WHERE status"));
    }

    #[test]
    fn non_matching_group_yields_nothing() {
        let mut unit = SourceUnit::new("src/OrderDao.java");
        unit.literals.push(grouped_literal("DELETE FROM audit", 2, 0));
        unit.literals.push(grouped_literal(" WHERE ts < ?", 3, 0));

        let registry = where_rule();
        assert!(DynamicSqlStrategy
            .apply(&unit, registry.get("sql-java-021").unwrap())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn regex_form_applies_to_reconstruction() {
        let mut unit = SourceUnit::new("src/OrderDao.java");
        unit.literals.push(grouped_literal("select id from t", 7, 2));
        unit.literals.push(grouped_literal(" where name = '", 8, 2));

        let registry = RuleRegistry::load(vec![RuleSpecRaw {
            id: "sql-java-022".to_string(),
            category: "dynamic-sql-build".to_string(),
            regex: Some(r"(?i)where\s+\w+\s*=\s*'$".to_string()),
            ..RuleSpecRaw::default()
        }])
        .unwrap();

        let candidates = DynamicSqlStrategy
            .apply(&unit, registry.get("sql-java-022").unwrap())
            .unwrap();
        assert_eq!(candidates.len(), 1);
    }
}
