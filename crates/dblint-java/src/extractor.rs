//! Java fact extractor using Tree-sitter.
//!
//! Produces a [`SourceUnit`] from raw Java source: string literals with
//! concatenation-group membership, method invocations with receiver
//! hints, and annotation usages with attribute maps. Tree-sitter's
//! error-tolerant parse means malformed regions simply contribute no
//! facts; extraction never fails.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser};

use dblint_core::{
    AnnotationUse, Extraction, Extractor, GroupId, Invocation, Literal, Location, ScanWarning,
    SourceUnit,
};

/// Extracts literals, invocations, and annotations from Java source.
pub struct JavaExtractor {
    language: Language,
}

impl JavaExtractor {
    /// Creates a new Java extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_java::LANGUAGE.into(),
        }
    }
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for JavaExtractor {
    fn extract(&self, path: &Path, source: &str) -> Extraction {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .expect("failed to set java language");

        let Some(tree) = parser.parse(source, None) else {
            // Only reachable with a cancelled or misconfigured parser.
            return Extraction {
                unit: SourceUnit::new(path),
                warnings: vec![ScanWarning::Extraction {
                    path: path.to_path_buf(),
                    detail: "parser produced no tree".to_string(),
                }],
            };
        };

        let root = tree.root_node();
        let mut builder = UnitBuilder::new(path, source);
        builder.collect_declared_types(root);
        builder.walk(root);
        builder.finish(root)
    }
}

fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
    std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
}

/// Strips the surrounding quotes from a string literal or text block.
/// Escape sequences are kept as written.
fn literal_text(raw: &str) -> &str {
    if let Some(inner) = raw.strip_prefix("\"\"\"").and_then(|s| s.strip_suffix("\"\"\"")) {
        inner.strip_prefix('\n').unwrap_or(inner)
    } else {
        raw.strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw)
    }
}

fn first_line(raw: &str) -> String {
    raw.lines().next().unwrap_or("").trim_end().to_string()
}

fn is_plus(node: &Node<'_>, src: &[u8]) -> bool {
    node.kind() == "binary_expression"
        && node
            .child_by_field_name("operator")
            .is_some_and(|op| text(&op, src) == "+")
}

struct UnitBuilder<'a> {
    path: PathBuf,
    src: &'a [u8],
    unit: SourceUnit,
    next_group: u32,
    /// Literal nodes already recorded, by tree-sitter node id.
    claimed: HashSet<usize>,
    /// Declared variable/field/parameter types, by simple name.
    var_types: HashMap<String, String>,
    /// Variables whose value is a literal concatenation chain.
    var_groups: HashMap<String, GroupId>,
    /// Variables initialized from a single literal that may yet grow into
    /// a chain via `+=`.
    var_pending: HashMap<String, usize>,
}

impl<'a> UnitBuilder<'a> {
    fn new(path: &Path, source: &'a str) -> Self {
        let mut unit = SourceUnit::new(path);
        unit.line_count = source.lines().count();
        Self {
            path: path.to_path_buf(),
            src: source.as_bytes(),
            unit,
            next_group: 0,
            claimed: HashSet::new(),
            var_types: HashMap::new(),
            var_groups: HashMap::new(),
            var_pending: HashMap::new(),
        }
    }

    fn finish(self, root: Node<'_>) -> Extraction {
        let mut warnings = Vec::new();
        let error_regions = count_error_regions(root);
        if error_regions > 0 {
            warnings.push(ScanWarning::Extraction {
                path: self.path,
                detail: format!("{error_regions} syntax error region(s) skipped"),
            });
        }
        Extraction {
            unit: self.unit,
            warnings,
        }
    }

    // ── Pass 1: declared types ──

    /// Records declared types of locals, fields, parameters, and
    /// try-with-resources variables. Shadowing is resolved last-wins;
    /// precise scoping is out of reach without semantic analysis and the
    /// receiver hint is only a hint.
    fn collect_declared_types(&mut self, node: Node<'_>) {
        match node.kind() {
            "local_variable_declaration" | "field_declaration" => {
                if let Some(ty) = node.child_by_field_name("type") {
                    let ty_text = base_type_name(text(&ty, self.src));
                    let mut cursor = node.walk();
                    for child in node.children(&mut cursor) {
                        if child.kind() == "variable_declarator" {
                            if let Some(name) = child.child_by_field_name("name") {
                                self.var_types
                                    .insert(text(&name, self.src).to_string(), ty_text.clone());
                            }
                        }
                    }
                }
            }
            "formal_parameter" | "resource" => {
                if let (Some(ty), Some(name)) = (
                    node.child_by_field_name("type"),
                    node.child_by_field_name("name"),
                ) {
                    self.var_types.insert(
                        text(&name, self.src).to_string(),
                        base_type_name(text(&ty, self.src)),
                    );
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.collect_declared_types(child);
        }
    }

    // ── Pass 2: facts ──

    fn walk(&mut self, node: Node<'_>) {
        match node.kind() {
            "local_variable_declaration" => self.handle_var_decl(node),
            "assignment_expression" => self.handle_assignment(node),
            "binary_expression" => {
                if is_plus(&node, self.src) {
                    self.handle_concat_chain(node);
                }
            }
            "method_invocation" => self.add_invocation(node),
            "marker_annotation" | "annotation" => self.add_annotation(node),
            "string_literal" => {
                if !self.claimed.contains(&node.id()) {
                    self.add_literal(node, None);
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.walk(child);
        }
    }

    fn alloc_group(&mut self) -> GroupId {
        let id = GroupId(self.next_group);
        self.next_group += 1;
        id
    }

    fn add_literal(&mut self, node: Node<'_>, group: Option<GroupId>) -> usize {
        self.claimed.insert(node.id());
        let raw = text(&node, self.src);
        let start = node.start_position();
        self.unit.literals.push(Literal {
            text: literal_text(raw).to_string(),
            location: Location::new(self.path.clone(), start.row + 1, start.column + 1)
                .with_span(node.start_byte(), node.end_byte() - node.start_byte()),
            end_line: node.end_position().row + 1,
            concat_group: group,
        });
        self.unit.literals.len() - 1
    }

    /// Direct string-literal operands of a `+` expression tree, skipping
    /// literals already claimed by an enclosing chain. Non-literal
    /// operands (variables, calls) are passed over without breaking the
    /// chain; literals inside call arguments are not operands and are not
    /// collected here.
    fn operand_literals<'t>(&self, node: Node<'t>, out: &mut Vec<Node<'t>>) {
        if is_plus(&node, self.src) {
            if let Some(left) = node.child_by_field_name("left") {
                self.operand_literals(left, out);
            }
            if let Some(right) = node.child_by_field_name("right") {
                self.operand_literals(right, out);
            }
        } else if node.kind() == "parenthesized_expression" {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                self.operand_literals(child, out);
            }
        } else if node.kind() == "string_literal" && !self.claimed.contains(&node.id()) {
            out.push(node);
        }
    }

    /// A free-standing `+` chain (an argument, a return value): two or
    /// more literal operands form a group of their own.
    fn handle_concat_chain(&mut self, node: Node<'_>) {
        let mut literals = Vec::new();
        self.operand_literals(node, &mut literals);
        if literals.len() < 2 {
            return;
        }
        let group = self.alloc_group();
        for literal in literals {
            self.add_literal(literal, Some(group));
        }
    }

    fn handle_var_decl(&mut self, node: Node<'_>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() != "variable_declarator" {
                continue;
            }
            let Some(name) = child.child_by_field_name("name") else {
                continue;
            };
            let var = text(&name, self.src).to_string();
            if let Some(value) = child.child_by_field_name("value") {
                self.assign_from_rhs(&var, value, false);
            }
        }
    }

    fn handle_assignment(&mut self, node: Node<'_>) {
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        // `sql = …` and `this.sql = …` both track by simple name.
        let var = match left.kind() {
            "identifier" => text(&left, self.src).to_string(),
            "field_access" => match left.child_by_field_name("field") {
                Some(field) => text(&field, self.src).to_string(),
                None => return,
            },
            _ => return,
        };
        let Some(op) = node.child_by_field_name("operator") else {
            return;
        };
        let Some(right) = node.child_by_field_name("right") else {
            return;
        };

        match text(&op, self.src) {
            "+=" => self.assign_from_rhs(&var, right, true),
            "=" => self.assign_from_rhs(&var, right, false),
            _ => {}
        }
    }

    /// Tracks literal flow through `var = lits…` / `var += lits…` chains.
    ///
    /// A plain assignment resets the variable's chain; `+=` extends it. A
    /// single-literal initializer stays ungrouped until a later `+=`
    /// proves the variable is built from literal parts.
    fn assign_from_rhs(&mut self, var: &str, rhs: Node<'_>, extend: bool) {
        let mut literals = Vec::new();
        self.operand_literals(rhs, &mut literals);

        if !extend {
            self.var_groups.remove(var);
            self.var_pending.remove(var);
        }

        if literals.is_empty() {
            return;
        }

        if extend {
            if let Some(group) = self.var_groups.get(var).copied() {
                for literal in literals {
                    self.add_literal(literal, Some(group));
                }
                return;
            }
            if let Some(pending) = self.var_pending.remove(var) {
                let group = self.alloc_group();
                self.unit.literals[pending].concat_group = Some(group);
                self.var_groups.insert(var.to_string(), group);
                for literal in literals {
                    self.add_literal(literal, Some(group));
                }
                return;
            }
        }

        if literals.len() == 1 {
            let index = self.add_literal(literals[0], None);
            self.var_pending.insert(var.to_string(), index);
        } else {
            let group = self.alloc_group();
            self.var_groups.insert(var.to_string(), group);
            for literal in literals {
                self.add_literal(literal, Some(group));
            }
        }
    }

    fn add_invocation(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };

        let receiver_hint = node
            .child_by_field_name("object")
            .and_then(|object| self.receiver_hint(object));

        let arg_literals = node
            .child_by_field_name("arguments")
            .map(|arguments| {
                let mut cursor = arguments.walk();
                arguments
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() != "line_comment" && c.kind() != "block_comment")
                    .map(|arg| {
                        (arg.kind() == "string_literal")
                            .then(|| literal_text(text(&arg, self.src)).to_string())
                    })
                    .collect()
            })
            .unwrap_or_default();

        let start = node.start_position();
        self.unit.invocations.push(Invocation {
            receiver_hint,
            method: text(&name, self.src).to_string(),
            arg_literals,
            location: Location::new(self.path.clone(), start.row + 1, start.column + 1)
                .with_span(node.start_byte(), node.end_byte() - node.start_byte()),
            snippet: first_line(text(&node, self.src)),
        });
    }

    /// Best-effort receiver type: declared type of a known identifier, the
    /// identifier itself when it reads as a type name (static calls), the
    /// constructed type for `new T().…` chains. Anything else is unknown.
    fn receiver_hint(&self, object: Node<'_>) -> Option<String> {
        match object.kind() {
            "identifier" => {
                let name = text(&object, self.src);
                if let Some(declared) = self.var_types.get(name) {
                    Some(declared.clone())
                } else if name.chars().next().is_some_and(char::is_uppercase) {
                    Some(name.to_string())
                } else {
                    None
                }
            }
            "field_access" => {
                let field = object.child_by_field_name("field")?;
                self.var_types.get(text(&field, self.src)).cloned()
            }
            "object_creation_expression" => {
                let ty = object.child_by_field_name("type")?;
                Some(base_type_name(text(&ty, self.src)))
            }
            _ => None,
        }
    }

    fn add_annotation(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let simple_name = text(&name, self.src)
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_string();

        let mut attributes = std::collections::BTreeMap::new();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            for child in arguments.named_children(&mut cursor) {
                match child.kind() {
                    "element_value_pair" => {
                        if let (Some(key), Some(value)) = (
                            child.child_by_field_name("key"),
                            child.child_by_field_name("value"),
                        ) {
                            attributes.insert(
                                text(&key, self.src).to_string(),
                                attribute_value(&value, self.src),
                            );
                        }
                    }
                    "line_comment" | "block_comment" => {}
                    // `@NamedQuery("…")` shorthand maps to `value`.
                    _ => {
                        attributes
                            .insert("value".to_string(), attribute_value(&child, self.src));
                    }
                }
            }
        }

        let start = node.start_position();
        self.unit.annotations.push(AnnotationUse {
            name: simple_name,
            attributes,
            location: Location::new(self.path.clone(), start.row + 1, start.column + 1)
                .with_span(node.start_byte(), node.end_byte() - node.start_byte()),
            snippet: first_line(text(&node, self.src)),
        });
    }
}

/// Attribute values keep literal text unquoted and everything else
/// verbatim (`false`, `FetchType.LAZY`, `3600`).
fn attribute_value(node: &Node<'_>, src: &[u8]) -> String {
    let raw = text(node, src);
    if node.kind() == "string_literal" {
        literal_text(raw).to_string()
    } else {
        raw.to_string()
    }
}

/// Type name with generics and array brackets dropped: `List<String>` →
/// `List`, `byte[]` → `byte`.
fn base_type_name(raw: &str) -> String {
    raw.split(['<', '['])
        .next()
        .unwrap_or(raw)
        .trim()
        .to_string()
}

fn count_error_regions(node: Node<'_>) -> usize {
    if !node.has_error() {
        return 0;
    }
    let mut count = usize::from(node.is_error() || node.is_missing());
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count += count_error_regions(child);
    }
    count
}
