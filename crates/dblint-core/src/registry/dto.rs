//! Rule-spec deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization of rule files.
//! They are converted to validated [`Rule`](super::Rule)s via the loader.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw file representation of a rule catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleFileDto {
    /// Rule specifications.
    #[serde(default)]
    pub rules: Vec<RuleSpecRaw>,
}

/// Raw representation of one rule specification.
///
/// Pattern fields are all optional at this layer; which ones are required
/// depends on `category` and is enforced by the loader.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSpecRaw {
    /// Stable rule id (e.g., "sql-java-020").
    pub id: String,

    /// Rule category: "literal-contains", "literal-regex", "call-shape",
    /// "annotation-attr", or "dynamic-sql-build".
    pub category: String,

    /// Severity (default: "warning").
    #[serde(default)]
    pub severity: Option<String>,

    /// Human-readable description, reported with each finding.
    #[serde(default)]
    pub description: String,

    /// Substring to search for (literal-contains / dynamic-sql-build).
    #[serde(default)]
    pub needle: Option<String>,

    /// Whether substring matching ignores ASCII case.
    #[serde(default)]
    pub case_insensitive: bool,

    /// Regular expression (literal-regex / dynamic-sql-build).
    #[serde(default)]
    pub regex: Option<String>,

    /// Method name set (call-shape).
    #[serde(default)]
    pub methods: Vec<String>,

    /// Receiver type hint (call-shape).
    #[serde(default)]
    pub receiver: Option<String>,

    /// Exact argument count constraint (call-shape).
    #[serde(default)]
    pub arg_count: Option<usize>,

    /// Annotation simple name (annotation-attr).
    #[serde(default)]
    pub annotation: Option<String>,

    /// Attribute constraints (annotation-attr). A value of "present"
    /// requires the attribute to exist; "any" always passes; anything else
    /// requires equality.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}
