//! Matcher strategies, one per rule category.
//!
//! Each strategy consumes [`SourceUnit`] facts and one [`Rule`] and yields
//! zero or more [`MatchCandidate`]s. Strategies switch on the rule's
//! pattern variant; a mismatched variant means the registry and the
//! strategy set have drifted apart, which is a programming bug surfaced
//! via [`StrategyError::Invariant`] rather than a user-facing error.

mod annotation;
mod call_shape;
mod dynamic_sql;
mod literal;

pub use annotation::AnnotationAttrStrategy;
pub use call_shape::CallShapeStrategy;
pub use dynamic_sql::DynamicSqlStrategy;
pub use literal::{LiteralContainsStrategy, LiteralRegexStrategy};

use crate::registry::{Rule, RuleCategory};
use crate::types::MatchCandidate;
use crate::unit::SourceUnit;

/// Confidence for exact matches.
pub const CONFIDENCE_EXACT: f32 = 1.0;

/// Confidence when a call-shape rule wants a receiver hint the invocation
/// does not carry (e.g., `setMinIdle` on an unknown receiver type).
pub const CONFIDENCE_AMBIGUOUS_RECEIVER: f32 = 0.8;

/// Confidence for matches against reconstructed concatenation text, where
/// intervening variables were not evaluated.
pub const CONFIDENCE_RECONSTRUCTED: f32 = 0.7;

const SNIPPET_MAX_CHARS: usize = 120;

/// Error raised when a strategy cannot process a rule.
///
/// This can only happen on a malformed rule that should have been rejected
/// by the registry; encountering one in production indicates
/// registry/strategy contract drift.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StrategyError {
    /// The rule's pattern variant does not match the strategy's category.
    #[error("{category} strategy received rule `{rule_id}` with a mismatched pattern variant")]
    Invariant {
        /// Strategy category that was invoked.
        category: RuleCategory,
        /// The offending rule.
        rule_id: String,
    },
}

/// A matcher strategy for one rule category.
pub trait Strategy: Send + Sync {
    /// The category this strategy handles.
    fn category(&self) -> RuleCategory;

    /// Matches one rule against one unit.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::Invariant`] if the rule's pattern variant
    /// does not belong to this strategy's category.
    fn apply(&self, unit: &SourceUnit, rule: &Rule) -> Result<Vec<MatchCandidate>, StrategyError>;
}

/// The full strategy set, one instance per category.
#[derive(Debug, Default)]
pub struct StrategySet {
    literal_contains: LiteralContainsStrategy,
    literal_regex: LiteralRegexStrategy,
    call_shape: CallShapeStrategy,
    annotation: AnnotationAttrStrategy,
    dynamic_sql: DynamicSqlStrategy,
}

impl StrategySet {
    /// Creates the default strategy set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the strategy for a category.
    #[must_use]
    pub fn for_category(&self, category: RuleCategory) -> &dyn Strategy {
        match category {
            RuleCategory::LiteralContains => &self.literal_contains,
            RuleCategory::LiteralRegex => &self.literal_regex,
            RuleCategory::CallShape => &self.call_shape,
            RuleCategory::AnnotationAttr => &self.annotation,
            RuleCategory::DynamicSqlBuild => &self.dynamic_sql,
        }
    }
}

/// Caps a snippet at a display-friendly length, respecting char
/// boundaries.
pub(crate) fn clip_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        text.to_string()
    } else {
        let mut clipped: String = text.chars().take(SNIPPET_MAX_CHARS).collect();
        clipped.push('…');
        clipped
    }
}

pub(crate) fn invariant(category: RuleCategory, rule: &Rule) -> StrategyError {
    StrategyError::Invariant {
        category,
        rule_id: rule.id().to_string(),
    }
}
