//! Integration test: Java source end-to-end through extractor and engine.
//!
//! Mirrors the shape of the rule fixtures: each snippet demonstrates one
//! anti-pattern plus non-matching baseline code, and the matching rule
//! must fire at the documented lines only.

use std::path::Path;

use dblint_core::{CancelToken, Extractor, RuleRegistry, RuleSpecRaw, ScanEngine, ScanOptions};
use dblint_java::JavaExtractor;

fn spec(id: &str, category: &str) -> RuleSpecRaw {
    RuleSpecRaw {
        id: id.to_string(),
        category: category.to_string(),
        ..RuleSpecRaw::default()
    }
}

fn scan(source: &str, specs: Vec<RuleSpecRaw>) -> dblint_core::ScanResult {
    let extraction = JavaExtractor::new().extract(Path::new("Fixture.java"), source);
    let registry = RuleRegistry::load(specs).expect("specs should load");
    let engine = ScanEngine::new(registry, ScanOptions::default());
    engine
        .scan_units(&[extraction.unit], &CancelToken::new())
        .expect("scan should run")
}

#[test]
fn select_statement_fixture_yields_findings_per_literal() {
    let source = r#"
public class UserDao {
    public List<User> findAll() {
        String sql = "SELECT id, name FROM users";
        return run(sql);
    }

    public List<User> findActive() {
        String sql = "SELECT * FROM users WHERE active = 1";
        return run(sql);
    }

    public void log() {
        String msg = "loaded users";
    }
}
"#;
    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());

    let result = scan(source, vec![select]);
    let lines: Vec<usize> = result.findings.iter().map(|f| f.location.line).collect();
    assert_eq!(lines, vec![4, 9]);
    assert!(result.findings.iter().all(|f| f.confidence == 1.0));
}

#[test]
fn concatenated_where_clause_detected_only_via_reconstruction() {
    let source = r#"
public class OrderDao {
    public List<Order> findByStatus(String status) {
        String sql = "SELECT * FROM orders WHERE";
        sql += " status = '" + status + "'";
        return run(sql);
    }
}
"#;
    let mut dynamic = spec("sql-java-021", "dynamic-sql-build");
    dynamic.needle = Some("WHERE status".to_string());
    let mut contains = spec("sql-java-029", "literal-contains");
    contains.needle = Some("WHERE status".to_string());

    let result = scan(source, vec![dynamic, contains]);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].rule_id, "sql-java-021");
    assert_eq!(result.findings[0].confidence, 0.7);
    assert_eq!(result.findings[0].location.line, 4);
}

#[test]
fn pool_setter_with_declared_receiver_is_exact() {
    let source = r#"
public class PoolConfig {
    public DataSource build() {
        BasicDataSource pool = new BasicDataSource();
        pool.setMinIdle(0);
        pool.setMaxIdle(200);
        helper.setMinIdle(5);
        return pool;
    }
}
"#;
    let mut pool = spec("sql-java-001", "call-shape");
    pool.methods = vec!["setMinIdle".to_string(), "setMaxIdle".to_string()];
    pool.receiver = Some("BasicDataSource".to_string());

    let result = scan(source, vec![pool]);
    // pool.* calls match exactly; helper.* has an unknown receiver and
    // matches at reduced confidence.
    assert_eq!(result.findings.len(), 3);
    assert_eq!(result.findings[0].location.line, 5);
    assert_eq!(result.findings[0].confidence, 1.0);
    assert_eq!(result.findings[1].location.line, 6);
    assert_eq!(result.findings[1].confidence, 1.0);
    assert_eq!(result.findings[2].location.line, 7);
    assert_eq!(result.findings[2].confidence, 0.8);
}

#[test]
fn orm_annotation_fixture_matches_attribute_constraints() {
    let source = r#"
@Entity
public class Account {
    @Column(name = "balance", columnDefinition = "NUMBER(19,4)")
    private BigDecimal balance;

    @Column(name = "owner")
    private String owner;

    @PersistenceContext
    private EntityManager em;
}
"#;
    let mut column = spec("sql-java-054", "annotation-attr");
    column.annotation = Some("Column".to_string());
    column
        .attributes
        .insert("columnDefinition".to_string(), "present".to_string());
    let mut ctx = spec("sql-java-052", "annotation-attr");
    ctx.annotation = Some("PersistenceContext".to_string());

    let result = scan(source, vec![column, ctx]);
    assert_eq!(result.findings.len(), 2);
    assert_eq!(result.findings[0].rule_id, "sql-java-054");
    assert_eq!(result.findings[0].location.line, 4);
    assert_eq!(result.findings[1].rule_id, "sql-java-052");
    assert_eq!(result.findings[1].location.line, 10);
}

#[test]
fn vendor_lock_hint_regex_fires_on_literal() {
    let source = r#"
public class ReportDao {
    String fast = "SELECT * FROM orders WITH (NOLOCK)";
    String slow = "SELECT * FROM orders";
}
"#;
    let mut nolock = spec("sql-java-030", "literal-regex");
    nolock.regex = Some(r"(?i)WITH\s*\(NOLOCK\)".to_string());

    let result = scan(source, vec![nolock]);
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].location.line, 3);
}

#[test]
fn broken_fixture_still_reports_recovered_facts() {
    // Missing brace: the literal before the error region still extracts.
    let source = r#"
public class Broken {
    void m() {
        String sql = "SELECT * FROM users";
"#;
    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());

    let extraction = JavaExtractor::new().extract(Path::new("Broken.java"), source);
    assert!(!extraction.warnings.is_empty());

    let registry = RuleRegistry::load(vec![select]).unwrap();
    let engine = ScanEngine::new(registry, ScanOptions::default());
    let result = engine
        .scan_units(&[extraction.unit], &CancelToken::new())
        .unwrap();
    assert_eq!(result.findings.len(), 1);
}
