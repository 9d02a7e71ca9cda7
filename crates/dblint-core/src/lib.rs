//! # dblint-core
//!
//! Core engine for dblint: scans Java source facts for SQL and
//! database-access anti-patterns using declarative rules.
//!
//! This crate provides the foundational types and the matching pipeline:
//!
//! - [`SourceUnit`]: the extracted fact model for one file
//! - [`RuleRegistry`]: validated, immutable rule specs
//! - [`Strategy`] implementations: one matcher per rule category
//! - [`ScanEngine`]: parallel scheduling with per-file isolation
//! - [`aggregate`]: deduplication into final [`Finding`]s
//!
//! ## Example
//!
//! ```ignore
//! use dblint_core::{CancelToken, RuleRegistry, ScanEngine, ScanOptions};
//!
//! let registry = RuleRegistry::load(specs)?;
//! let engine = ScanEngine::new(registry, ScanOptions::default());
//! let result = engine.scan_units(&units, &CancelToken::new())?;
//! result.print_report();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod config;
mod engine;
mod types;
mod unit;

pub mod registry;
pub mod strategies;

pub use aggregate::{aggregate, AggregateError};
pub use config::{ConfigError, RuleConfig, ScanConfig, ScannerConfig};
pub use engine::{CancelToken, EngineError, ScanEngine, ScanOptions};
pub use registry::{
    LiteralPattern, PatternSpec, RegistryError, Rule, RuleCategory, RuleFileDto, RuleRegistry,
    RuleSpecRaw,
};
pub use strategies::{Strategy, StrategyError, StrategySet};
pub use types::{
    Finding, FindingDiagnostic, Location, MatchCandidate, ScanPhase, ScanResult, ScanWarning,
    Severity,
};
pub use unit::{
    AnnotationUse, ConcatGroup, Extraction, Extractor, GroupId, Invocation, Literal, SourceUnit,
};
