//! # dblint-java
//!
//! Tree-sitter based tolerant Java fact extractor for dblint.
//!
//! This crate turns raw Java source into the [`SourceUnit`] fact model
//! from `dblint-core`:
//!
//! - string literals, with concatenation-group membership across `+`
//!   chains and `var += "…"` statements
//! - method invocations, with best-effort receiver type hints
//! - annotation usages, with attribute key/value maps
//!
//! Extraction never fails: Tree-sitter's error recovery supplies facts
//! for the recognizable regions of malformed files, and skipped regions
//! are reported as extraction warnings.
//!
//! [`SourceUnit`]: dblint_core::SourceUnit

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod extractor;

pub use extractor::JavaExtractor;
