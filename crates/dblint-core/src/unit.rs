//! Extracted fact model shared between extractors and the engine.
//!
//! A [`SourceUnit`] is the matchable representation of one source file: a
//! flat set of located facts (string literals, method invocations,
//! annotation usages). Extractors produce it; matcher strategies consume
//! it. No AST survives extraction.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::{Location, ScanWarning};

/// Index of a concatenation group within one source unit.
///
/// Allocated from a per-file arena counter. String literals inferred to
/// form one logical string via `+` concatenation share an id; there is no
/// pointer-linked structure behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

/// A string literal extracted from source.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Literal text with the surrounding quotes stripped.
    pub text: String,
    /// Location of the literal (line = start line).
    pub location: Location,
    /// Last line of the literal (differs from start for text blocks).
    pub end_line: usize,
    /// Concatenation group this literal belongs to, if any.
    pub concat_group: Option<GroupId>,
}

/// A method invocation extracted from source.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Declared type of the receiver when statically known (e.g.,
    /// `BasicDataSource`), `None` when the receiver is ambiguous.
    pub receiver_hint: Option<String>,
    /// Invoked method name.
    pub method: String,
    /// One entry per argument: the literal text for string-literal
    /// arguments, `None` for anything else.
    pub arg_literals: Vec<Option<String>>,
    /// Location of the invocation.
    pub location: Location,
    /// Source excerpt (first line of the call).
    pub snippet: String,
}

/// An annotation usage extracted from source.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationUse {
    /// Simple annotation name without the `@` (e.g., `Column`).
    pub name: String,
    /// Attribute key/value pairs; the single-value shorthand maps to the
    /// conventional `value` key.
    pub attributes: BTreeMap<String, String>,
    /// Location of the annotation.
    pub location: Location,
    /// Source excerpt (first line of the annotation).
    pub snippet: String,
}

/// The extracted, matchable representation of one source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceUnit {
    /// Path relative to the scan root.
    pub path: PathBuf,
    /// Total number of lines in the file.
    pub line_count: usize,
    /// All string literals found.
    pub literals: Vec<Literal>,
    /// All method invocations found.
    pub invocations: Vec<Invocation>,
    /// All annotation usages found.
    pub annotations: Vec<AnnotationUse>,
}

/// A reconstructed concatenation group.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatGroup {
    /// The group id.
    pub id: GroupId,
    /// Member literal texts joined in source order.
    pub text: String,
    /// Location of the first member literal.
    pub location: Location,
}

impl SourceUnit {
    /// Creates an empty unit for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Returns true if any literal carries a concatenation group.
    #[must_use]
    pub fn has_concat_groups(&self) -> bool {
        self.literals.iter().any(|l| l.concat_group.is_some())
    }

    /// Reconstructs every concatenation group by joining member literal
    /// texts in `(line, offset)` order.
    ///
    /// Intervening non-literal expressions are not evaluated; the result
    /// is the literal-parts-only view of the logical string, which is what
    /// dynamic-SQL rules match against.
    #[must_use]
    pub fn concat_groups(&self) -> Vec<ConcatGroup> {
        let mut members: BTreeMap<GroupId, Vec<&Literal>> = BTreeMap::new();
        for literal in &self.literals {
            if let Some(id) = literal.concat_group {
                members.entry(id).or_default().push(literal);
            }
        }

        members
            .into_iter()
            .map(|(id, mut literals)| {
                literals.sort_by_key(|l| (l.location.line, l.location.offset));
                let text = literals
                    .iter()
                    .map(|l| l.text.as_str())
                    .collect::<String>();
                ConcatGroup {
                    id,
                    text,
                    location: literals[0].location.clone(),
                }
            })
            .collect()
    }
}

/// Result of extracting one source file.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// The extracted facts.
    pub unit: SourceUnit,
    /// Warnings for regions that degraded during extraction.
    pub warnings: Vec<ScanWarning>,
}

/// Trait for language-specific fact extraction.
///
/// Implementations must never fail on malformed input: unparseable regions
/// are skipped (contributing no facts) and reported via
/// [`Extraction::warnings`]. Extraction is a pure function of the input
/// text.
pub trait Extractor: Send + Sync {
    /// Extracts literals, invocations, and annotations from source code.
    fn extract(&self, path: &Path, source: &str) -> Extraction;
}
