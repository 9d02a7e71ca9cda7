//! DTO → rule model conversion with validation.

use std::collections::BTreeSet;

use crate::config::ScanConfig;
use crate::types::Severity;

use super::dto::RuleSpecRaw;
use super::model::{
    AttrConstraint, AttrExpectation, LiteralPattern, PatternSpec, Rule, RuleCategory, RuleRegistry,
};

/// Errors during rule-spec validation.
///
/// All of these are configuration errors: they abort before a scan starts.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two specs share the same id.
    #[error("duplicate rule id `{id}`")]
    DuplicateRuleId {
        /// The duplicated id.
        id: String,
    },

    /// A pattern field is missing, malformed, or does not compile.
    #[error("rule `{id}`: invalid pattern: {reason}")]
    InvalidPattern {
        /// Rule with the bad pattern.
        id: String,
        /// Why it is invalid.
        reason: String,
    },

    /// Unknown category string.
    #[error("rule `{id}`: unknown category `{value}`, expected one of: \
             literal-contains, literal-regex, call-shape, annotation-attr, dynamic-sql-build")]
    UnknownCategory {
        /// Rule with the bad category.
        id: String,
        /// The invalid value.
        value: String,
    },

    /// Unknown severity string.
    #[error("rule `{id}`: unknown severity `{value}`, expected: error, warning, info")]
    UnknownSeverity {
        /// Rule with the bad severity.
        id: String,
        /// The invalid value.
        value: String,
    },
}

/// Converts raw specs into a validated [`RuleRegistry`].
///
/// # Errors
///
/// Returns the first [`RegistryError`] encountered.
pub fn load(specs: Vec<RuleSpecRaw>) -> Result<RuleRegistry, RegistryError> {
    let rules = specs
        .into_iter()
        .map(convert_spec)
        .collect::<Result<Vec<_>, _>>()?;
    RuleRegistry::from_rules(rules)
}

/// Converts raw specs into a registry, applying per-rule configuration:
/// disabled rules are dropped, severity overrides are applied.
///
/// # Errors
///
/// Returns the first [`RegistryError`] encountered. Disabled rules are
/// still validated; a broken spec is a config error even when switched off.
pub fn load_with_config(
    specs: Vec<RuleSpecRaw>,
    config: &ScanConfig,
) -> Result<RuleRegistry, RegistryError> {
    let mut rules = Vec::with_capacity(specs.len());
    for spec in specs {
        let rule = convert_spec(spec)?;
        if !config.is_rule_enabled(rule.id()) {
            tracing::debug!("Skipping disabled rule: {}", rule.id());
            continue;
        }
        let rule = match config.rule_severity(rule.id()) {
            Some(severity) => Rule::new(
                rule.id().to_string(),
                rule.category(),
                severity,
                rule.description().to_string(),
                rule.pattern().clone(),
            ),
            None => rule,
        };
        rules.push(rule);
    }
    RuleRegistry::from_rules(rules)
}

fn convert_spec(spec: RuleSpecRaw) -> Result<Rule, RegistryError> {
    let category = parse_category(&spec.id, &spec.category)?;
    let severity = match spec.severity.as_deref() {
        None => Severity::Warning,
        Some(value) => parse_severity(&spec.id, value)?,
    };

    let pattern = match category {
        RuleCategory::LiteralContains => PatternSpec::Literal(contains_pattern(&spec)?),
        RuleCategory::LiteralRegex => PatternSpec::Literal(regex_pattern(&spec)?),
        RuleCategory::CallShape => call_shape_pattern(&spec)?,
        RuleCategory::AnnotationAttr => annotation_pattern(&spec)?,
        RuleCategory::DynamicSqlBuild => PatternSpec::DynamicSql(embedded_pattern(&spec)?),
    };

    Ok(Rule::new(
        spec.id,
        category,
        severity,
        spec.description,
        pattern,
    ))
}

fn contains_pattern(spec: &RuleSpecRaw) -> Result<LiteralPattern, RegistryError> {
    match spec.needle.as_deref() {
        Some(needle) if !needle.is_empty() => Ok(LiteralPattern::Contains {
            needle: needle.to_string(),
            case_insensitive: spec.case_insensitive,
        }),
        Some(_) => Err(invalid(spec, "`needle` must not be empty")),
        None => Err(invalid(spec, "missing `needle`")),
    }
}

fn regex_pattern(spec: &RuleSpecRaw) -> Result<LiteralPattern, RegistryError> {
    let raw = spec
        .regex
        .as_deref()
        .ok_or_else(|| invalid(spec, "missing `regex`"))?;
    let compiled = regex::Regex::new(raw)
        .map_err(|e| invalid(spec, &format!("regex failed to compile: {e}")))?;
    Ok(LiteralPattern::Regex(compiled))
}

/// Dynamic-SQL rules embed either a substring or a regex sub-pattern.
fn embedded_pattern(spec: &RuleSpecRaw) -> Result<LiteralPattern, RegistryError> {
    match (&spec.needle, &spec.regex) {
        (Some(_), Some(_)) => Err(invalid(spec, "set either `needle` or `regex`, not both")),
        (Some(_), None) => contains_pattern(spec),
        (None, Some(_)) => regex_pattern(spec),
        (None, None) => Err(invalid(spec, "missing `needle` or `regex`")),
    }
}

fn call_shape_pattern(spec: &RuleSpecRaw) -> Result<PatternSpec, RegistryError> {
    if spec.methods.is_empty() {
        return Err(invalid(spec, "empty method-name set"));
    }
    let methods: BTreeSet<String> = spec.methods.iter().cloned().collect();
    Ok(PatternSpec::CallShape {
        methods,
        receiver_hint: spec.receiver.clone(),
        arg_count: spec.arg_count,
    })
}

fn annotation_pattern(spec: &RuleSpecRaw) -> Result<PatternSpec, RegistryError> {
    let name = spec
        .annotation
        .as_deref()
        .ok_or_else(|| invalid(spec, "missing `annotation`"))?;
    if name.is_empty() {
        return Err(invalid(spec, "`annotation` must not be empty"));
    }

    let constraints = spec
        .attributes
        .iter()
        .map(|(key, value)| AttrConstraint {
            key: key.clone(),
            expectation: match value.as_str() {
                "any" => AttrExpectation::Any,
                "present" => AttrExpectation::Present,
                other => AttrExpectation::Equals(other.to_string()),
            },
        })
        .collect();

    Ok(PatternSpec::AnnotationAttr {
        name: name.to_string(),
        constraints,
    })
}

fn parse_category(id: &str, value: &str) -> Result<RuleCategory, RegistryError> {
    match value {
        "literal-contains" => Ok(RuleCategory::LiteralContains),
        "literal-regex" => Ok(RuleCategory::LiteralRegex),
        "call-shape" => Ok(RuleCategory::CallShape),
        "annotation-attr" => Ok(RuleCategory::AnnotationAttr),
        "dynamic-sql-build" => Ok(RuleCategory::DynamicSqlBuild),
        _ => Err(RegistryError::UnknownCategory {
            id: id.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_severity(id: &str, value: &str) -> Result<Severity, RegistryError> {
    match value {
        "error" => Ok(Severity::Error),
        "warning" => Ok(Severity::Warning),
        "info" => Ok(Severity::Info),
        _ => Err(RegistryError::UnknownSeverity {
            id: id.to_string(),
            value: value.to_string(),
        }),
    }
}

fn invalid(spec: &RuleSpecRaw, reason: &str) -> RegistryError {
    RegistryError::InvalidPattern {
        id: spec.id.clone(),
        reason: reason.to_string(),
    }
}
