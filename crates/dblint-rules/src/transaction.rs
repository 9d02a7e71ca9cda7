//! Transaction-boundary rules.

use dblint_core::RuleSpecRaw;

/// Rules for manual transaction control on JDBC connections.
#[must_use]
pub fn rules() -> Vec<RuleSpecRaw> {
    vec![
        RuleSpecRaw {
            id: "sql-java-040".to_string(),
            category: "call-shape".to_string(),
            description: "manual transaction boundary via setAutoCommit; boundaries belong \
                          to the transaction manager"
                .to_string(),
            methods: vec!["setAutoCommit".to_string()],
            receiver: Some("Connection".to_string()),
            arg_count: Some(1),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-041".to_string(),
            category: "call-shape".to_string(),
            severity: Some("info".to_string()),
            description: "explicit commit/rollback on a Connection; verify rollback on every \
                          failure path"
                .to_string(),
            methods: vec!["commit".to_string(), "rollback".to_string()],
            receiver: Some("Connection".to_string()),
            ..RuleSpecRaw::default()
        },
    ]
}
