//! Call-shape strategy: method-invocation matching with receiver hints.

use crate::registry::{PatternSpec, Rule, RuleCategory};
use crate::types::MatchCandidate;
use crate::unit::SourceUnit;

use super::{
    clip_snippet, invariant, Strategy, StrategyError, CONFIDENCE_AMBIGUOUS_RECEIVER,
    CONFIDENCE_EXACT,
};

/// Matches invocations whose method name is in the rule's set, graded by
/// receiver-hint agreement.
///
/// Without semantic type resolution an unknown receiver cannot be told
/// apart from an unrelated type that happens to share a method name
/// (`setMinIdle` exists on DBCP pools and on arbitrary user classes), so
/// those matches are reported at reduced confidence rather than dropped.
#[derive(Debug, Default)]
pub struct CallShapeStrategy;

impl Strategy for CallShapeStrategy {
    fn category(&self) -> RuleCategory {
        RuleCategory::CallShape
    }

    fn apply(&self, unit: &SourceUnit, rule: &Rule) -> Result<Vec<MatchCandidate>, StrategyError> {
        let PatternSpec::CallShape {
            methods,
            receiver_hint,
            arg_count,
        } = rule.pattern()
        else {
            return Err(invariant(self.category(), rule));
        };

        let mut candidates = Vec::new();
        for invocation in &unit.invocations {
            if !methods.contains(&invocation.method) {
                continue;
            }
            if let Some(expected) = arg_count {
                if invocation.arg_literals.len() != *expected {
                    continue;
                }
            }

            let confidence = match (receiver_hint, &invocation.receiver_hint) {
                // Rule requires a receiver type and the unit knows it.
                (Some(want), Some(have)) => {
                    if want == have {
                        CONFIDENCE_EXACT
                    } else {
                        continue;
                    }
                }
                // Rule requires a receiver type but the receiver is unknown.
                (Some(_), None) => CONFIDENCE_AMBIGUOUS_RECEIVER,
                // Rule matches on method name alone.
                (None, _) => CONFIDENCE_EXACT,
            };

            candidates.push(MatchCandidate {
                rule_id: rule.id().to_string(),
                location: invocation.location.clone(),
                snippet: clip_snippet(&invocation.snippet),
                confidence,
                strategy: self.category(),
            });
        }

        Ok(candidates)
    }
}
