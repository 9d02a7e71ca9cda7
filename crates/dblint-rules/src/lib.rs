//! # dblint-rules
//!
//! Built-in rule catalog for dblint: the `sql-java-NNN` specifications as
//! declarative data, grouped by concern. The engine treats these exactly
//! like rules loaded from a file; nothing in `dblint-core` depends on
//! this crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod orm;
pub mod pool;
pub mod raw_sql;
pub mod transaction;
pub mod vendor;

use dblint_core::RuleSpecRaw;

/// Returns the full built-in catalog.
///
/// Covers connection-pool misconfiguration, raw Statement usage,
/// string-built SQL, vendor lock/date hints, transaction boundaries, and
/// ORM framework misuse (Hibernate, JPA, MyBatis, EclipseLink).
#[must_use]
pub fn builtin_specs() -> Vec<RuleSpecRaw> {
    let mut specs = Vec::new();
    specs.extend(pool::rules());
    specs.extend(raw_sql::rules());
    specs.extend(vendor::rules());
    specs.extend(transaction::rules());
    specs.extend(orm::rules());
    specs
}
