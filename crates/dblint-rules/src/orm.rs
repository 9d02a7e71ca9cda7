//! ORM framework misuse rules: Hibernate, JPA, MyBatis, EclipseLink.

use dblint_core::RuleSpecRaw;

/// Rules for ORM bootstrap, injection, and query API misuse.
#[must_use]
pub fn rules() -> Vec<RuleSpecRaw> {
    vec![
        RuleSpecRaw {
            id: "sql-java-050".to_string(),
            category: "call-shape".to_string(),
            description: "Hibernate Configuration bootstrapped at the call site; a \
                          SessionFactory should be built once"
                .to_string(),
            methods: vec!["configure".to_string(), "buildSessionFactory".to_string()],
            receiver: Some("Configuration".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-051".to_string(),
            category: "call-shape".to_string(),
            description: "EntityManagerFactory created per call site; factories are \
                          heavyweight and container-managed"
                .to_string(),
            methods: vec!["createEntityManagerFactory".to_string()],
            receiver: Some("Persistence".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-052".to_string(),
            category: "annotation-attr".to_string(),
            severity: Some("info".to_string()),
            description: "field-injected @PersistenceContext; audit the owning component's \
                          lifecycle"
                .to_string(),
            annotation: Some("PersistenceContext".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-053".to_string(),
            category: "annotation-attr".to_string(),
            description: "JPQL embedded in @NamedQuery".to_string(),
            annotation: Some("NamedQuery".to_string()),
            attributes: [("query".to_string(), "present".to_string())].into(),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-054".to_string(),
            category: "annotation-attr".to_string(),
            description: "vendor DDL embedded in @Column(columnDefinition = …)".to_string(),
            annotation: Some("Column".to_string()),
            attributes: [("columnDefinition".to_string(), "present".to_string())].into(),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-060".to_string(),
            category: "call-shape".to_string(),
            description: "MyBatis statement id resolved at runtime on SqlSession".to_string(),
            methods: vec!["selectList".to_string(), "selectOne".to_string()],
            receiver: Some("SqlSession".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-061".to_string(),
            category: "call-shape".to_string(),
            severity: Some("info".to_string()),
            description: "MyBatis write API on SqlSession; verify mapper-level transaction \
                          handling"
                .to_string(),
            methods: vec![
                "insert".to_string(),
                "update".to_string(),
                "delete".to_string(),
            ],
            receiver: Some("SqlSession".to_string()),
            ..RuleSpecRaw::default()
        },
        RuleSpecRaw {
            id: "sql-java-070".to_string(),
            category: "call-shape".to_string(),
            description: "raw SQL string on an EclipseLink query object".to_string(),
            methods: vec!["setSQLString".to_string()],
            receiver: Some("ReadAllQuery".to_string()),
            ..RuleSpecRaw::default()
        },
    ]
}
