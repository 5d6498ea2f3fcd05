//! Tree-sitter Swift grammar access and syntax-node classification.
//!
//! The rest of the crate never matches on raw node-kind strings: everything
//! goes through [`Construct::classify`], a closed set of the constructs the
//! analyzer and the renderer care about. Adding a construct kind means adding
//! a variant here and handling it everywhere it is matched.

use std::cell::RefCell;

use once_cell::sync::Lazy;
use tree_sitter::{Language, Node, Parser as TsParser, Tree};

use crate::error::{CondenseError, Result};
use crate::types::{AccessLevel, DeclKind};

static SWIFT: Lazy<Language> = Lazy::new(|| tree_sitter_swift::LANGUAGE.into());

thread_local! {
    /// Thread-local tree-sitter parser (tree-sitter parsers are not thread-safe)
    static TS_PARSER: RefCell<Option<TsParser>> = const { RefCell::new(None) };
}

/// Parser with the Swift grammar loaded.
///
/// Fails with [`CondenseError::Grammar`] when the grammar's ABI version is
/// not supported by the linked tree-sitter runtime.
fn swift_parser() -> Result<TsParser> {
    let mut parser = TsParser::new();
    parser
        .set_language(&SWIFT)
        .map_err(|e| CondenseError::Grammar(e.to_string()))?;
    Ok(parser)
}

/// Check once, before any file is processed, that the grammar loads.
pub fn ensure_grammar() -> Result<()> {
    swift_parser().map(|_| ())
}

/// Parse Swift source into a syntax tree.
///
/// Tree-sitter is error tolerant, so this only fails when the grammar cannot
/// be loaded or the parser gives up entirely. Trees containing `ERROR` nodes
/// are returned as-is.
pub fn parse_swift(content: &str, rel_path: &str) -> Result<Tree> {
    TS_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(swift_parser()?);
        }
        let parser = slot
            .as_mut()
            .ok_or_else(|| CondenseError::Parse(rel_path.to_string()))?;
        parser
            .parse(content, None)
            .ok_or_else(|| CondenseError::Parse(rel_path.to_string()))
    })
}

/// Body-bearing executable constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableKind {
    Function,
    Initializer,
    Deinitializer,
    Subscript,
}

/// The syntax constructs the analyzer and renderer dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    /// Nominal type declaration or extension; opens a container.
    TypeDecl(DeclKind),
    /// Function-like declaration with its own body.
    Executable(ExecutableKind),
    /// Property with a computed accessor block.
    ComputedProperty,
}

impl Construct {
    pub fn classify(node: Node<'_>, src: &[u8]) -> Option<Self> {
        match node.kind() {
            "class_declaration" => declaration_kind(node, src).map(Construct::TypeDecl),
            "protocol_declaration" => Some(Construct::TypeDecl(DeclKind::Protocol)),
            "function_declaration" => Some(Construct::Executable(ExecutableKind::Function)),
            "init_declaration" => Some(Construct::Executable(ExecutableKind::Initializer)),
            "deinit_declaration" => Some(Construct::Executable(ExecutableKind::Deinitializer)),
            "subscript_declaration" => Some(Construct::Executable(ExecutableKind::Subscript)),
            "property_declaration" if child_of_kind(node, "computed_property").is_some() => {
                Some(Construct::ComputedProperty)
            }
            _ => None,
        }
    }
}

/// Read the `class`/`struct`/`enum`/`actor`/`extension` keyword of a
/// `class_declaration`.
fn declaration_kind(node: Node<'_>, src: &[u8]) -> Option<DeclKind> {
    if let Some(kind_node) = node.child_by_field_name("declaration_kind") {
        if let Some(kind) = DeclKind::from_keyword(node_text(kind_node, src)) {
            return Some(kind);
        }
    }
    children(node)
        .into_iter()
        .filter(|c| !c.is_named())
        .find_map(|c| DeclKind::from_keyword(c.kind()))
}

/// Collect a node's direct children.
pub fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

/// First direct child with the given kind.
pub fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    children(node).into_iter().find(|c| c.kind() == kind)
}

pub fn node_text<'s>(node: Node<'_>, src: &'s [u8]) -> &'s str {
    node.utf8_text(src).unwrap_or("")
}

/// Declared access tier from a declaration's own `modifiers`.
///
/// Setter-only forms such as `private(set)` do not change the tier of the
/// declaration itself. No modifier means `internal`.
pub fn access_level(node: Node<'_>, src: &[u8]) -> AccessLevel {
    let Some(modifiers) = child_of_kind(node, "modifiers") else {
        return AccessLevel::default();
    };
    children(modifiers)
        .into_iter()
        .filter(|c| c.kind() == "visibility_modifier")
        .map(|c| node_text(c, src).trim())
        .filter(|text| !text.contains('('))
        .find_map(AccessLevel::from_keyword)
        .unwrap_or_default()
}

/// Root identifier of a `user_type` (`Foo` for `Foo.Bar<Baz>`).
pub fn user_type_root<'s>(node: Node<'_>, src: &'s [u8]) -> Option<&'s str> {
    children(node)
        .into_iter()
        .find(|c| c.kind() == "type_identifier")
        .map(|c| node_text(c, src))
        .filter(|name| !name.is_empty())
}

/// Name of a type declaration. Extensions yield the extended type's root name.
pub fn declared_name<'s>(node: Node<'_>, kind: DeclKind, src: &'s [u8]) -> Option<&'s str> {
    let name_node = node.child_by_field_name("name").or_else(|| {
        children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "type_identifier" | "user_type"))
    })?;

    if kind == DeclKind::Extension && name_node.kind() == "user_type" {
        return user_type_root(name_node, src);
    }
    let text = node_text(name_node, src);
    // `extension Array<Int>` or a generic name; keep the root identifier
    let root = text
        .split(|c: char| c == '<' || c == '.' || c.is_whitespace())
        .next()
        .unwrap_or("");
    (!root.is_empty()).then_some(root)
}

/// Root names of the types a declaration inherits from or conforms to.
pub fn inherited_types<'s>(node: Node<'_>, src: &'s [u8]) -> Vec<&'s str> {
    children(node)
        .into_iter()
        .filter(|c| c.kind() == "inheritance_specifier")
        .filter_map(|spec| {
            let target = spec
                .child_by_field_name("inherits_from")
                .or_else(|| child_of_kind(spec, "user_type"))?;
            user_type_root(target, src)
        })
        .collect()
}

/// The brace-delimited body of a body-bearing construct.
pub fn body_of<'t>(node: Node<'t>, construct: Construct) -> Option<Node<'t>> {
    match construct {
        Construct::Executable(ExecutableKind::Subscript) | Construct::ComputedProperty => {
            child_of_kind(node, "computed_property")
        }
        Construct::Executable(_) => node
            .child_by_field_name("body")
            .filter(|b| b.kind() == "function_body")
            .or_else(|| child_of_kind(node, "function_body")),
        Construct::TypeDecl(_) => node.child_by_field_name("body"),
    }
}

/// Whether a body holds anything other than comments.
pub fn has_statements(body: Node<'_>) -> bool {
    children(body)
        .into_iter()
        .filter(|c| c.is_named())
        .any(|c| !is_comment(c))
}

pub fn is_comment(node: Node<'_>) -> bool {
    matches!(node.kind(), "comment" | "multiline_comment")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
        if node.kind() == kind {
            return Some(node);
        }
        children(node).into_iter().find_map(|c| first_of_kind(c, kind))
    }

    #[test]
    fn test_grammar_loads() {
        ensure_grammar().unwrap();
    }

    #[test]
    fn test_parse_produces_source_file() {
        let tree = parse_swift("struct Foo {}\n", "Foo.swift").unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_clean_file_has_no_error_nodes() {
        let code = "import Foundation\n\npublic final class Cache<T> {\n    private var items: [String: T] = [:]\n\n    public func get(_ key: String) -> T? {\n        return items[key]\n    }\n}\n";
        let tree = parse_swift(code, "Cache.swift").unwrap();
        assert!(!tree.root_node().has_error());
        assert!(
            children(tree.root_node())
                .into_iter()
                .any(|n| Construct::classify(n, code.as_bytes()).is_some())
        );
    }

    #[test]
    fn test_classify_declarations() {
        let code = "public struct Point {}\nclass Node {}\nenum Mode { case a }\nprotocol Shape {}\nextension Point {}\n";
        let tree = parse_swift(code, "t.swift").unwrap();
        let src = code.as_bytes();
        let kinds: Vec<Construct> = children(tree.root_node())
            .into_iter()
            .filter_map(|n| Construct::classify(n, src))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Construct::TypeDecl(DeclKind::Struct),
                Construct::TypeDecl(DeclKind::Class),
                Construct::TypeDecl(DeclKind::Enum),
                Construct::TypeDecl(DeclKind::Protocol),
                Construct::TypeDecl(DeclKind::Extension),
            ]
        );
    }

    #[test]
    fn test_access_level_reading() {
        let code = "public final class A {}\nfileprivate struct B {}\nstruct C {}\n";
        let tree = parse_swift(code, "t.swift").unwrap();
        let src = code.as_bytes();
        let levels: Vec<AccessLevel> = children(tree.root_node())
            .into_iter()
            .filter(|n| n.kind() == "class_declaration")
            .map(|n| access_level(n, src))
            .collect();
        assert_eq!(
            levels,
            vec![AccessLevel::Public, AccessLevel::FilePrivate, AccessLevel::Internal]
        );
    }

    #[test]
    fn test_function_body_lookup() {
        let code = "func run() {\n    print(1)\n}\nfunc idle() {}\n";
        let tree = parse_swift(code, "t.swift").unwrap();
        let src = code.as_bytes();
        let funcs: Vec<Node> = children(tree.root_node())
            .into_iter()
            .filter(|n| n.kind() == "function_declaration")
            .collect();
        assert_eq!(funcs.len(), 2);

        let construct = Construct::Executable(ExecutableKind::Function);
        let run_body = body_of(funcs[0], construct).unwrap();
        assert!(node_text(run_body, src).starts_with('{'));
        assert!(has_statements(run_body));

        let idle_body = body_of(funcs[1], construct).unwrap();
        assert!(!has_statements(idle_body));
    }

    #[test]
    fn test_user_type_root_of_qualified_name() {
        let code = "let x: Foundation.Date = makeDate()\n";
        let tree = parse_swift(code, "t.swift").unwrap();
        let user_type = first_of_kind(tree.root_node(), "user_type").unwrap();
        assert_eq!(user_type_root(user_type, code.as_bytes()), Some("Foundation"));
    }
}
