//! Connection-pool misconfiguration rules (Apache DBCP).

use dblint_core::RuleSpecRaw;

/// Rules for pool sizing and validation configured in code.
#[must_use]
pub fn rules() -> Vec<RuleSpecRaw> {
    vec![
        RuleSpecRaw {
            id: "sql-java-001".to_string(),
            category: "call-shape".to_string(),
            description: "connection pool sized in code on DBCP BasicDataSource; \
                          externalize pool sizing to configuration"
                .to_string(),
            methods: vec![
                "setMinIdle".to_string(),
                "setMaxIdle".to_string(),
                "setInitialSize".to_string(),
                "setMaxTotal".to_string(),
            ],
            receiver: Some("BasicDataSource".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-002".to_string(),
            category: "call-shape".to_string(),
            description: "pool wait budget hard-coded on DBCP BasicDataSource".to_string(),
            methods: vec!["setMaxWaitMillis".to_string(), "setMaxWait".to_string()],
            receiver: Some("BasicDataSource".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-003".to_string(),
            category: "call-shape".to_string(),
            severity: Some("info".to_string()),
            description: "connection validation query configured inline".to_string(),
            methods: vec!["setValidationQuery".to_string()],
            receiver: Some("BasicDataSource".to_string()),
            ..RuleSpecRaw::default()
        },
    ]
}
