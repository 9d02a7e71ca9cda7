//! Literal-scanning strategies: substring and regex over string literals.

use crate::registry::{LiteralPattern, PatternSpec, Rule, RuleCategory};
use crate::types::MatchCandidate;
use crate::unit::SourceUnit;

use super::{clip_snippet, invariant, Strategy, StrategyError, CONFIDENCE_EXACT};

/// Shared scan over `unit.literals` for both literal categories.
fn match_literals(
    unit: &SourceUnit,
    rule: &Rule,
    category: RuleCategory,
) -> Result<Vec<MatchCandidate>, StrategyError> {
    let PatternSpec::Literal(pattern) = rule.pattern() else {
        return Err(invariant(category, rule));
    };
    // The registry guarantees category/variant pairing; a regex pattern on
    // a literal-contains rule (or vice versa) is the same contract drift.
    match (category, pattern) {
        (RuleCategory::LiteralContains, LiteralPattern::Regex(_))
        | (RuleCategory::LiteralRegex, LiteralPattern::Contains { .. }) => {
            return Err(invariant(category, rule));
        }
        _ => {}
    }

    Ok(unit
        .literals
        .iter()
        .filter(|literal| pattern.is_match(&literal.text))
        .map(|literal| MatchCandidate {
            rule_id: rule.id().to_string(),
            location: literal.location.clone(),
            snippet: clip_snippet(&literal.text),
            confidence: CONFIDENCE_EXACT,
            strategy: category,
        })
        .collect())
}

/// Substring search over string literals.
#[derive(Debug, Default)]
pub struct LiteralContainsStrategy;

impl Strategy for LiteralContainsStrategy {
    fn category(&self) -> RuleCategory {
        RuleCategory::LiteralContains
    }

    fn apply(&self, unit: &SourceUnit, rule: &Rule) -> Result<Vec<MatchCandidate>, StrategyError> {
        match_literals(unit, rule, self.category())
    }
}

/// Regex search over string literals.
#[derive(Debug, Default)]
pub struct LiteralRegexStrategy;

impl Strategy for LiteralRegexStrategy {
    fn category(&self) -> RuleCategory {
        RuleCategory::LiteralRegex
    }

    fn apply(&self, unit: &SourceUnit, rule: &Rule) -> Result<Vec<MatchCandidate>, StrategyError> {
        match_literals(unit, rule, self.category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RuleSpecRaw, RuleRegistry};
    use crate::types::Location;
    use crate::unit::Literal;
    use std::path::PathBuf;

    fn unit_with_literals(texts: &[&str]) -> SourceUnit {
        let mut unit = SourceUnit::new("src/UserDao.java");
        for (i, text) in texts.iter().enumerate() {
            unit.literals.push(Literal {
                text: (*text).to_string(),
                location: Location::new(PathBuf::from("src/UserDao.java"), i + 1, 20),
                end_line: i + 1,
                concat_group: None,
            });
        }
        unit
    }

    fn contains_rule(id: &str, needle: &str, case_insensitive: bool) -> RuleRegistry {
        RuleRegistry::load(vec![RuleSpecRaw {
            id: id.to_string(),
            category: "literal-contains".to_string(),
            needle: Some(needle.to_string()),
            case_insensitive,
            ..RuleSpecRaw::default()
        }])
        .unwrap()
    }

    #[test]
    fn contains_matches_each_occurrence() {
        let unit = unit_with_literals(&[
            "SELECT * FROM users",
            "UPDATE users SET name = ?",
            "SELECT id FROM orders",
        ]);
        let registry = contains_rule("sql-java-020", "SELECT", false);
        let rule = registry.get("sql-java-020").unwrap();

        let candidates = LiteralContainsStrategy.apply(&unit, rule).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].location.line, 1);
        assert_eq!(candidates[1].location.line, 3);
        assert!(candidates.iter().all(|c| c.confidence == 1.0));
        assert!(candidates
            .iter()
            .all(|c| c.strategy == RuleCategory::LiteralContains));
    }

    #[test]
    fn contains_respects_case_flag() {
        let unit = unit_with_literals(&["select * from users"]);

        let sensitive = contains_rule("a", "SELECT", false);
        assert!(LiteralContainsStrategy
            .apply(&unit, sensitive.get("a").unwrap())
            .unwrap()
            .is_empty());

        let insensitive = contains_rule("b", "SELECT", true);
        assert_eq!(
            LiteralContainsStrategy
                .apply(&unit, insensitive.get("b").unwrap())
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn regex_matches_within_literal() {
        let unit = unit_with_literals(&[
            "SELECT * FROM orders WITH (NOLOCK)",
            "SELECT * FROM orders",
        ]);
        let registry = RuleRegistry::load(vec![RuleSpecRaw {
            id: "sql-java-030".to_string(),
            category: "literal-regex".to_string(),
            regex: Some(r"(?i)WITH\s*\(NOLOCK\)".to_string()),
            ..RuleSpecRaw::default()
        }])
        .unwrap();

        let candidates = LiteralRegexStrategy
            .apply(&unit, registry.get("sql-java-030").unwrap())
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].location.line, 1);
    }

    #[test]
    fn mismatched_pattern_is_invariant_violation() {
        let unit = unit_with_literals(&["SELECT 1"]);
        let registry = RuleRegistry::load(vec![RuleSpecRaw {
            id: "sql-java-010".to_string(),
            category: "call-shape".to_string(),
            methods: vec!["executeQuery".to_string()],
            ..RuleSpecRaw::default()
        }])
        .unwrap();

        let result = LiteralContainsStrategy.apply(&unit, registry.get("sql-java-010").unwrap());
        assert!(matches!(result, Err(StrategyError::Invariant { .. })));
    }
}
