//! Validated rule model and the registry aggregate.
//!
//! All invariants are enforced at load time: once a [`RuleRegistry`]
//! exists, every rule in it has a well-formed pattern matching its
//! category. Rules are immutable for the duration of a scan.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use crate::types::Severity;
use crate::unit::SourceUnit;

/// Rule category, one per matcher strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Substring search over string literals.
    LiteralContains,
    /// Regex search over string literals.
    LiteralRegex,
    /// Method-invocation shape match.
    CallShape,
    /// Annotation name + attribute match.
    AnnotationAttr,
    /// Literal pattern applied to reconstructed concatenation chains.
    DynamicSqlBuild,
}

impl RuleCategory {
    /// Returns the kebab-case name used in rule files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LiteralContains => "literal-contains",
            Self::LiteralRegex => "literal-regex",
            Self::CallShape => "call-shape",
            Self::AnnotationAttr => "annotation-attr",
            Self::DynamicSqlBuild => "dynamic-sql-build",
        }
    }

    /// Tie-break priority when two strategies fire on the same location
    /// with equal confidence: exact matches outrank reconstructed ones.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Self::CallShape => 4,
            Self::AnnotationAttr => 3,
            Self::LiteralRegex => 2,
            Self::LiteralContains => 1,
            Self::DynamicSqlBuild => 0,
        }
    }

    /// Whether a unit carries the fact kind this category consumes.
    ///
    /// Used by the engine to skip strategies that cannot possibly match;
    /// an optimization, not a behavior change.
    #[must_use]
    pub fn applies_to(self, unit: &SourceUnit) -> bool {
        match self {
            Self::LiteralContains | Self::LiteralRegex => !unit.literals.is_empty(),
            Self::CallShape => !unit.invocations.is_empty(),
            Self::AnnotationAttr => !unit.annotations.is_empty(),
            Self::DynamicSqlBuild => unit.has_concat_groups(),
        }
    }

    /// All categories in declaration order.
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::LiteralContains,
            Self::LiteralRegex,
            Self::CallShape,
            Self::AnnotationAttr,
            Self::DynamicSqlBuild,
        ]
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A literal search pattern: substring or compiled regex.
///
/// Shared between the two literal categories and the dynamic-SQL category,
/// which re-applies the same logic to reconstructed strings.
#[derive(Debug, Clone)]
pub enum LiteralPattern {
    /// Substring search with optional ASCII case folding.
    Contains {
        /// Substring to search for.
        needle: String,
        /// Ignore ASCII case when true.
        case_insensitive: bool,
    },
    /// Compiled regular expression, matched anywhere in the text.
    Regex(regex::Regex),
}

/// Case-insensitive substring search without allocation.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

impl LiteralPattern {
    /// Tests whether the pattern occurs anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Contains {
                needle,
                case_insensitive,
            } => {
                if *case_insensitive {
                    contains_ignore_case(text, needle)
                } else {
                    text.contains(needle.as_str())
                }
            }
            Self::Regex(re) => re.is_match(text),
        }
    }
}

/// Expectation on a single annotation attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrExpectation {
    /// No constraint; always satisfied. Documents intent in a rule file.
    Any,
    /// Attribute must be present, value irrelevant.
    Present,
    /// Attribute must be present and equal to the given value.
    Equals(String),
}

/// A named attribute constraint within an annotation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrConstraint {
    /// Attribute name (e.g., "columnDefinition").
    pub key: String,
    /// What the attribute must satisfy.
    pub expectation: AttrExpectation,
}

impl AttrConstraint {
    /// Tests this constraint against an annotation's attribute map.
    #[must_use]
    pub fn is_satisfied_by(&self, attributes: &BTreeMap<String, String>) -> bool {
        match &self.expectation {
            AttrExpectation::Any => true,
            AttrExpectation::Present => attributes.contains_key(&self.key),
            AttrExpectation::Equals(expected) => {
                attributes.get(&self.key).is_some_and(|v| v == expected)
            }
        }
    }
}

/// Pattern payload, one variant per category.
///
/// A tagged variant rather than a trait hierarchy: strategies switch on
/// the variant, keeping rule data and matching logic decoupled.
#[derive(Debug, Clone)]
pub enum PatternSpec {
    /// Literal pattern (both `LiteralContains` and `LiteralRegex`).
    Literal(LiteralPattern),
    /// Method invocation shape.
    CallShape {
        /// Non-empty method-name set.
        methods: BTreeSet<String>,
        /// Required receiver type, if any.
        receiver_hint: Option<String>,
        /// Exact argument count, if constrained.
        arg_count: Option<usize>,
    },
    /// Annotation name plus attribute constraints.
    AnnotationAttr {
        /// Annotation simple name without the `@`.
        name: String,
        /// Constraints that must all be satisfied.
        constraints: Vec<AttrConstraint>,
    },
    /// Literal pattern applied to reconstructed concatenation text.
    DynamicSql(LiteralPattern),
}

/// A declarative specification of one detectable pattern.
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    category: RuleCategory,
    severity: Severity,
    description: String,
    pattern: PatternSpec,
}

impl Rule {
    /// Creates a validated rule. Callers go through the loader, which
    /// guarantees the pattern variant matches the category.
    #[must_use]
    pub(crate) fn new(
        id: String,
        category: RuleCategory,
        severity: Severity,
        description: String,
        pattern: PatternSpec,
    ) -> Self {
        Self {
            id,
            category,
            severity,
            description,
            pattern,
        }
    }

    /// Returns the stable rule id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the rule category.
    #[must_use]
    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Returns the severity assigned to findings from this rule.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the pattern payload.
    #[must_use]
    pub fn pattern(&self) -> &PatternSpec {
        &self.pattern
    }
}

/// Immutable collection of validated rules, uniquely keyed by id.
///
/// This is the aggregate root: the engine receives it explicitly per scan
/// invocation (never ambient global state), shares it read-only across
/// workers, and queries rules by category to skip irrelevant strategies.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    by_id: HashMap<String, usize>,
    by_category: HashMap<RuleCategory, Vec<usize>>,
}

impl RuleRegistry {
    /// Builds a registry from validated rules, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateRuleId`](super::RegistryError)
    /// if two rules share an id.
    pub(crate) fn from_rules(rules: Vec<Rule>) -> Result<Self, super::RegistryError> {
        let mut by_id = HashMap::with_capacity(rules.len());
        let mut by_category: HashMap<RuleCategory, Vec<usize>> = HashMap::new();

        for (index, rule) in rules.iter().enumerate() {
            if by_id.insert(rule.id.clone(), index).is_some() {
                return Err(super::RegistryError::DuplicateRuleId {
                    id: rule.id.clone(),
                });
            }
            by_category.entry(rule.category).or_default().push(index);
        }

        Ok(Self {
            rules,
            by_id,
            by_category,
        })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the registry holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.by_id.get(id).map(|&i| &self.rules[i])
    }

    /// Iterates all rules in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Iterates the rules of one category in load order.
    pub fn by_category(&self, category: RuleCategory) -> impl Iterator<Item = &Rule> {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.rules[i])
    }

    /// Categories that have at least one rule.
    #[must_use]
    pub fn categories(&self) -> Vec<RuleCategory> {
        RuleCategory::all()
            .into_iter()
            .filter(|c| self.by_category.contains_key(c))
            .collect()
    }
}
