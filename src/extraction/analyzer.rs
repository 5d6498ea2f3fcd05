//! Per-file fact extraction.
//!
//! One pass over a Swift syntax tree collects everything the ranking stages
//! need: declared type names, public-surface weight, referenced type names,
//! a file-level complexity count and the entrypoint signal.
//!
//! # Signals
//!
//! - Public surface: +1 per public/open type or extension, +2 for a
//!   public/open protocol
//! - References: +1 per `user_type` occurrence, keyed by its root name
//! - Complexity: `if`, `guard`, `for`, `while`, `switch` (+1), `repeat … while`
//!   (+2, both keywords), `&&` / `||` (+1)
//! - Entrypoint: `@main`-style attribute, an `App` conformance in a file that
//!   imports SwiftUI, or any top-level statement that is not a declaration

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, warn};
use tree_sitter::Node;

use crate::extraction::swift::{
    self, Construct, access_level, children, declared_name, inherited_types, is_comment,
    node_text, user_type_root,
};
use crate::types::{AnalysisRecord, DeclKind, Declaration, SourceUnit};

/// Attributes that mark a program entry point.
const ENTRY_ATTRIBUTES: &[&str] = &["main", "UIApplicationMain", "NSApplicationMain"];

/// Conformance that marks an application root, and the module defining it.
const APP_ROOT_PROTOCOL: &str = "App";
const APP_ROOT_MODULE: &str = "SwiftUI";

/// Top-level items that are declarations (or trivia), not executable code.
const TOP_LEVEL_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "protocol_declaration",
    "function_declaration",
    "property_declaration",
    "typealias_declaration",
    "import_declaration",
    "operator_declaration",
    "precedence_group_declaration",
    "associatedtype_declaration",
    "macro_declaration",
    "directive",
    "diagnostic",
    "shebang_line",
    "ERROR",
];

/// Analyze one unit. Never fails: unparseable files yield a zero-signal record.
pub fn analyze(unit: &SourceUnit) -> AnalysisRecord {
    let tree = match swift::parse_swift(&unit.text, &unit.rel_path) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(path = %unit.rel_path, error = %e, "parse failed, using empty analysis");
            return AnalysisRecord::empty(Arc::clone(&unit.rel_path));
        }
    };

    let root = tree.root_node();
    if root.has_error() {
        debug!(path = %unit.rel_path, "syntax tree contains errors");
    }

    let mut walker = FactWalker::new(unit.text.as_bytes());
    walker.visit(root);

    let has_top_level_code = children(root)
        .into_iter()
        .filter(|n| n.is_named() && !is_comment(*n))
        .any(|n| !TOP_LEVEL_DECLARATIONS.contains(&n.kind()));

    let is_app_root = walker.conforms_to_app && walker.imports.contains(APP_ROOT_MODULE);
    let is_entrypoint = walker.has_entry_attribute || is_app_root || has_top_level_code;

    let declared = walker
        .declarations
        .iter()
        .filter(|d| d.kind != DeclKind::Extension)
        .map(|d| d.name.clone())
        .collect();

    AnalysisRecord {
        rel_path: Arc::clone(&unit.rel_path),
        declared,
        public_weight: walker.public_weight,
        references: walker.references,
        complexity: walker.complexity,
        is_entrypoint,
        declarations: walker.declarations,
        ..Default::default()
    }
}

/// Recursive tree visitor accumulating per-file facts.
struct FactWalker<'s> {
    src: &'s [u8],
    /// Nesting path of enclosing type declarations
    nesting: Vec<String>,
    declarations: Vec<Declaration>,
    public_weight: u32,
    references: BTreeMap<String, u32>,
    complexity: u32,
    imports: BTreeSet<String>,
    has_entry_attribute: bool,
    conforms_to_app: bool,
}

impl<'s> FactWalker<'s> {
    fn new(src: &'s [u8]) -> Self {
        Self {
            src,
            nesting: Vec::new(),
            declarations: Vec::new(),
            public_weight: 0,
            references: BTreeMap::new(),
            complexity: 0,
            imports: BTreeSet::new(),
            has_entry_attribute: false,
            conforms_to_app: false,
        }
    }

    fn visit(&mut self, node: Node<'_>) {
        self.count_node(node);

        if let Some(Construct::TypeDecl(kind)) = Construct::classify(node, self.src) {
            if let Some(name) = declared_name(node, kind, self.src) {
                self.enter_declaration(node, kind, name);
                for child in children(node) {
                    self.visit(child);
                }
                self.nesting.pop();
                return;
            }
        }

        for child in children(node) {
            self.visit(child);
        }
    }

    /// Record a declaration and push its container key.
    fn enter_declaration(&mut self, node: Node<'_>, kind: DeclKind, name: &str) {
        let access = access_level(node, self.src);
        if access.is_public_surface() {
            self.public_weight += kind.surface_weight();
        }

        if kind != DeclKind::Extension
            && inherited_types(node, self.src).contains(&APP_ROOT_PROTOCOL)
        {
            self.conforms_to_app = true;
        }

        let segment = match kind {
            DeclKind::Extension => format!("extension {name}"),
            _ => name.to_string(),
        };
        let container_key = match self.nesting.last() {
            Some(parent) => format!("{parent}.{segment}"),
            None => segment,
        };

        self.declarations.push(Declaration {
            name: name.to_string(),
            kind,
            access,
            container_key: container_key.clone(),
        });
        self.nesting.push(container_key);
    }

    /// Per-node signal counting: references, complexity, imports, attributes.
    fn count_node(&mut self, node: Node<'_>) {
        match node.kind() {
            "user_type" => {
                if let Some(name) = user_type_root(node, self.src) {
                    if !is_compiler_attribute(node, name) {
                        *self.references.entry(name.to_string()).or_insert(0) += 1;
                    }
                }
            }
            "if_statement" | "guard_statement" | "for_statement" | "while_statement"
            | "switch_statement" => self.complexity += 1,
            "repeat_while_statement" => self.complexity += 2,
            "conjunction_expression" | "disjunction_expression" => self.complexity += 1,
            "import_declaration" => {
                if let Some(module) = import_module(node, self.src) {
                    self.imports.insert(module);
                }
            }
            "attribute" => {
                if ENTRY_ATTRIBUTES.contains(&attribute_name(node, self.src)) {
                    self.has_entry_attribute = true;
                }
            }
            _ => {}
        }
    }
}

/// `import SwiftUI` / `@testable import struct Foo.Bar` -> root module name.
fn import_module(node: Node<'_>, src: &[u8]) -> Option<String> {
    if let Some(ident) = swift::child_of_kind(node, "identifier") {
        let text = node_text(ident, src);
        return text.split('.').next().map(|s| s.trim().to_string());
    }
    let text = node_text(node, src);
    let after = text.split("import").nth(1)?;
    after
        .split_whitespace()
        .last()
        .and_then(|path| path.split('.').next())
        .map(str::to_string)
}

/// True when `node` is the name of a built-in attribute such as `@main` or
/// `@propertyWrapper`. Custom attributes (property wrappers, result builders,
/// global actors) name real types and stay references.
fn is_compiler_attribute(node: Node<'_>, name: &str) -> bool {
    let in_attribute = node.parent().is_some_and(|p| p.kind() == "attribute");
    in_attribute
        && (ENTRY_ATTRIBUTES.contains(&name) || name.starts_with(|c: char| c.is_ascii_lowercase()))
}

/// `@main` -> "main", `@available(iOS 17, *)` -> "available".
fn attribute_name<'s>(node: Node<'_>, src: &'s [u8]) -> &'s str {
    node_text(node, src)
        .trim_start_matches('@')
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or("")
}
