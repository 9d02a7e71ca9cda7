//! Vendor-specific SQL hint and function rules.

use dblint_core::RuleSpecRaw;

/// Rules for lock hints and date functions that pin a database vendor.
#[must_use]
pub fn rules() -> Vec<RuleSpecRaw> {
    vec![
        RuleSpecRaw {
            id: "sql-java-030".to_string(),
            category: "literal-regex".to_string(),
            description: "SQL Server NOLOCK hint; reads uncommitted data and pins the \
                          vendor"
                .to_string(),
            regex: Some(r"(?i)WITH\s*\(\s*NOLOCK\s*\)".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-031".to_string(),
            category: "literal-regex".to_string(),
            description: "vendor lock clause (FOR UPDATE NOWAIT / SKIP LOCKED)".to_string(),
            regex: Some(r"(?i)FOR\s+UPDATE\s+(NOWAIT|SKIP\s+LOCKED)".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-032".to_string(),
            category: "literal-regex".to_string(),
            description: "vendor-specific date function (SYSDATE / GETDATE / TO_DATE)"
                .to_string(),
            regex: Some(r"(?i)\b(SYSDATE|GETDATE\s*\(|TO_DATE\s*\()".to_string()),
            ..RuleSpecRaw::default()
        },
    ]
}
