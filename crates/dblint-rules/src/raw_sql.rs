//! Raw string SQL construction and JDBC Statement misuse rules.

use dblint_core::RuleSpecRaw;

/// Rules for raw Statement usage and string-built SQL.
#[must_use]
pub fn rules() -> Vec<RuleSpecRaw> {
    vec![
        RuleSpecRaw {
            id: "sql-java-010".to_string(),
            category: "call-shape".to_string(),
            description: "raw Statement created from Connection; prefer PreparedStatement \
                          with bind parameters"
                .to_string(),
            methods: vec!["createStatement".to_string()],
            receiver: Some("Connection".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-011".to_string(),
            category: "call-shape".to_string(),
            severity: Some("error".to_string()),
            description: "SQL executed on a raw Statement; injection risk when the text \
                          carries user input"
                .to_string(),
            methods: vec![
                "executeQuery".to_string(),
                "executeUpdate".to_string(),
                "execute".to_string(),
                "addBatch".to_string(),
            ],
            receiver: Some("Statement".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-012".to_string(),
            category: "dynamic-sql-build".to_string(),
            severity: Some("error".to_string()),
            description: "SQL statement assembled from string concatenation".to_string(),
            regex: Some(r"(?i)^\s*(select|insert|update|delete)\b".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-020".to_string(),
            category: "literal-contains".to_string(),
            description: "SELECT statement embedded in a string literal; move query text \
                          to a named query or mapper"
                .to_string(),
            needle: Some("SELECT".to_string()),
            case_insensitive: true,
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-021".to_string(),
            category: "dynamic-sql-build".to_string(),
            description: "WHERE clause built via concatenation; filters belong in bind \
                          parameters"
                .to_string(),
            needle: Some("WHERE ".to_string()),
            case_insensitive: true,
            ..RuleSpecRaw::default()
        },
    ]
}
