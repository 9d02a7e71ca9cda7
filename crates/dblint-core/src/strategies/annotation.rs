//! Annotation strategy: name equality plus attribute constraints.

use crate::registry::{PatternSpec, Rule, RuleCategory};
use crate::types::MatchCandidate;
use crate::unit::SourceUnit;

use super::{clip_snippet, invariant, Strategy, StrategyError, CONFIDENCE_EXACT};

/// Matches annotation usages by simple name and attribute constraints.
#[derive(Debug, Default)]
pub struct AnnotationAttrStrategy;

impl Strategy for AnnotationAttrStrategy {
    fn category(&self) -> RuleCategory {
        RuleCategory::AnnotationAttr
    }

    fn apply(&self, unit: &SourceUnit, rule: &Rule) -> Result<Vec<MatchCandidate>, StrategyError> {
        let PatternSpec::AnnotationAttr { name, constraints } = rule.pattern() else {
            return Err(invariant(self.category(), rule));
        };

        Ok(unit
            .annotations
            .iter()
            .filter(|annotation| {
                annotation.name == *name
                    && constraints
                        .iter()
                        .all(|c| c.is_satisfied_by(&annotation.attributes))
            })
            .map(|annotation| MatchCandidate {
                rule_id: rule.id().to_string(),
                location: annotation.location.clone(),
                snippet: clip_snippet(&annotation.snippet),
                confidence: CONFIDENCE_EXACT,
                strategy: self.category(),
            })
            .collect())
    }
}
