//! Integration test: rule specs end-to-end via ScanEngine.
//!
//! Exercises the full spec → registry → strategy → engine → aggregator
//! pipeline over hand-built source units, covering deduplication,
//! idempotence, dynamic-SQL reconstruction, receiver ambiguity, and
//! partial-failure isolation.

use std::path::{Path, PathBuf};

use dblint_core::{
    aggregate, CancelToken, Extraction, Extractor, GroupId, Invocation, Literal, Location,
    MatchCandidate, RuleCategory, RuleRegistry, RuleSpecRaw, ScanEngine, ScanOptions, ScanWarning,
    SourceUnit, Severity,
};

fn spec(id: &str, category: &str) -> RuleSpecRaw {
    RuleSpecRaw {
        id: id.to_string(),
        category: category.to_string(),
        ..RuleSpecRaw::default()
    }
}

fn literal(file: &str, text: &str, line: usize, group: Option<u32>) -> Literal {
    Literal {
        text: text.to_string(),
        location: Location::new(PathBuf::from(file), line, 20).with_span(line * 40, text.len()),
        end_line: line,
        concat_group: group.map(GroupId),
    }
}

fn engine_with(specs: Vec<RuleSpecRaw>) -> ScanEngine {
    let registry = RuleRegistry::load(specs).expect("specs should load");
    ScanEngine::new(registry, ScanOptions::default())
}

// ── Fixture-shaped detection ──

#[test]
fn select_literal_assignments_each_yield_a_finding() {
    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());
    select.severity = Some("warning".to_string());
    select.description = "SELECT statement assembled in a string literal".to_string();

    let mut unit = SourceUnit::new("java-db-020-select-statement.java");
    unit.line_count = 40;
    unit.literals.push(literal(
        "java-db-020-select-statement.java",
        "SELECT id, name FROM users",
        12,
        None,
    ));
    unit.literals.push(literal(
        "java-db-020-select-statement.java",
        "SELECT * FROM orders WHERE total > 100",
        23,
        None,
    ));
    unit.literals.push(literal(
        "java-db-020-select-statement.java",
        "count must be positive",
        30,
        None,
    ));

    let result = engine_with(vec![select])
        .scan_units(&[unit], &CancelToken::new())
        .unwrap();

    assert_eq!(result.findings.len(), 2);
    assert!(result.findings.iter().all(|f| f.rule_id == "sql-java-020"));
    assert_eq!(result.findings[0].location.line, 12);
    assert_eq!(result.findings[1].location.line, 23);
    assert_eq!(result.findings[0].severity, Severity::Warning);
}

// ── Idempotence ──

#[test]
fn scanning_twice_yields_identical_findings() {
    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());
    let mut dynamic = spec("sql-java-021", "dynamic-sql-build");
    dynamic.needle = Some("WHERE".to_string());

    let mut a = SourceUnit::new("A.java");
    a.line_count = 20;
    a.literals.push(literal("A.java", "SELECT * FROM t", 3, None));
    a.literals.push(literal("A.java", "SELECT x FROM u ", 7, Some(0)));
    a.literals.push(literal("A.java", "WHERE x = 1", 8, Some(0)));

    let mut b = SourceUnit::new("B.java");
    b.line_count = 5;
    b.literals.push(literal("B.java", "SELECT 1", 2, None));

    let engine = engine_with(vec![select, dynamic]);
    let units = vec![b, a];

    let first = engine.scan_units(&units, &CancelToken::new()).unwrap();
    let second = engine.scan_units(&units, &CancelToken::new()).unwrap();

    assert_eq!(first.findings, second.findings);
    assert!(!first.findings.is_empty());
}

// ── Deduplication and tie-break ──

#[test]
fn same_rule_and_line_from_two_strategies_dedupes_to_higher_confidence() {
    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());
    let registry = RuleRegistry::load(vec![select]).unwrap();

    let exact = MatchCandidate {
        rule_id: "sql-java-020".to_string(),
        location: Location::new(PathBuf::from("A.java"), 4, 1),
        snippet: "exact".to_string(),
        confidence: 1.0,
        strategy: RuleCategory::LiteralContains,
    };
    let reconstructed = MatchCandidate {
        confidence: 0.7,
        strategy: RuleCategory::DynamicSqlBuild,
        snippet: "reconstructed".to_string(),
        ..exact.clone()
    };

    let findings = aggregate(vec![reconstructed, exact], &registry).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].confidence, 1.0);
    assert_eq!(findings[0].snippet, "exact");
}

#[test]
fn equal_confidence_tie_break_follows_strategy_priority() {
    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());
    let registry = RuleRegistry::load(vec![select]).unwrap();

    let base = MatchCandidate {
        rule_id: "sql-java-020".to_string(),
        location: Location::new(PathBuf::from("A.java"), 4, 1),
        snippet: String::new(),
        confidence: 0.8,
        strategy: RuleCategory::LiteralContains,
    };
    let call_shape = MatchCandidate {
        strategy: RuleCategory::CallShape,
        snippet: "call".to_string(),
        ..base.clone()
    };

    // CallShape outranks LiteralContains at equal confidence.
    let findings = aggregate(vec![base, call_shape], &registry).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].snippet, "call");
}

// ── Dynamic-SQL reconstruction ──

#[test]
fn concat_group_matches_only_when_reconstructed() {
    let mut dynamic = spec("sql-java-021", "dynamic-sql-build");
    dynamic.needle = Some("WHERE status".to_string());
    let mut contains = spec("sql-java-022", "literal-contains");
    contains.needle = Some("WHERE status".to_string());

    let mut unit = SourceUnit::new("OrderDao.java");
    unit.line_count = 10;
    unit.literals
        .push(literal("OrderDao.java", "SELECT * FROM users WHERE", 4, Some(0)));
    unit.literals
        .push(literal("OrderDao.java", " status = 'active'", 5, Some(0)));

    let result = engine_with(vec![dynamic, contains])
        .scan_units(&[unit], &CancelToken::new())
        .unwrap();

    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].rule_id, "sql-java-021");
    assert_eq!(result.findings[0].confidence, 0.7);
    assert_eq!(result.findings[0].location.line, 4);
}

// ── Receiver-hint ambiguity ──

#[test]
fn missing_receiver_hint_yields_reduced_confidence() {
    let mut pool = spec("sql-java-001", "call-shape");
    pool.methods = vec!["setMinIdle".to_string()];
    pool.receiver = Some("BasicDataSource".to_string());

    let mut unit = SourceUnit::new("PoolConfig.java");
    unit.line_count = 30;
    unit.invocations.push(Invocation {
        receiver_hint: None,
        method: "setMinIdle".to_string(),
        arg_literals: vec![None],
        location: Location::new(PathBuf::from("PoolConfig.java"), 14, 9),
        snippet: "pool.setMinIdle(0)".to_string(),
    });

    let result = engine_with(vec![pool])
        .scan_units(&[unit], &CancelToken::new())
        .unwrap();

    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].confidence, 0.8);
}

// ── Partial-failure isolation ──

/// Stub extractor: any path named `Broken.java` degrades, others yield one
/// SELECT literal.
struct StubExtractor;

impl Extractor for StubExtractor {
    fn extract(&self, path: &Path, _source: &str) -> Extraction {
        if path.file_name().is_some_and(|n| n == "Broken.java") {
            Extraction {
                unit: SourceUnit::new(path),
                warnings: vec![ScanWarning::Extraction {
                    path: path.to_path_buf(),
                    detail: "1 syntax error region(s) skipped".to_string(),
                }],
            }
        } else {
            let mut unit = SourceUnit::new(path);
            unit.line_count = 3;
            unit.literals.push(Literal {
                text: "SELECT * FROM t".to_string(),
                location: Location::new(path.to_path_buf(), 2, 20),
                end_line: 2,
                concat_group: None,
            });
            Extraction {
                unit,
                warnings: Vec::new(),
            }
        }
    }
}

#[test]
fn faulty_unit_does_not_block_other_findings() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("Good.java");
    let broken = dir.path().join("Broken.java");
    std::fs::write(&good, "class Good {}").unwrap();
    std::fs::write(&broken, "class {{{").unwrap();

    let mut select = spec("sql-java-020", "literal-contains");
    select.needle = Some("SELECT".to_string());

    let result = engine_with(vec![select])
        .scan_paths(
            &[broken.clone(), good.clone()],
            &StubExtractor,
            &CancelToken::new(),
        )
        .unwrap();

    // The broken file contributes zero findings plus one warning; the good
    // file still produces its finding.
    assert_eq!(result.findings.len(), 1);
    assert_eq!(result.findings[0].location.file, good);
    assert_eq!(result.files_scanned, 2);
    assert!(matches!(
        result.warnings.as_slice(),
        [ScanWarning::Extraction { path, .. }] if path == &broken
    ));
}
