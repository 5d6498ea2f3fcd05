//! Policy-driven body elision for Swift source.
//!
//! Walks the syntax tree, decides per body-bearing construct whether its
//! body survives, and splices sentinels over the bodies that do not. The
//! whitespace pass runs last, under every policy.
//!
//! # Containers
//!
//! For [`RenderPolicy::KeepOne`], every type declaration and every extension
//! opens its own container; top-level code is container 0. The first
//! executable body (function, init, deinit, subscript) met in depth-first
//! source order keeps its body, later ones in the same container are elided.
//! Computed-property accessors never take that slot and are always elided.

use std::collections::HashSet;

use tracing::{debug, warn};
use tree_sitter::Node;

use crate::extraction::swift::{self, Construct, access_level, body_of, children, has_statements};
use crate::rendering::policy::RenderPolicy;
use crate::rendering::sentinel::{EMPTY_BODY, Sentinel};
use crate::rendering::whitespace::normalize_whitespace;

/// Rendered text plus how many bodies were replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub text: String,
    pub elided: usize,
}

/// Render one Swift file under `policy`.
///
/// Files that cannot be parsed are passed through the whitespace pass only.
pub fn render_source(text: &str, rel_path: &str, policy: RenderPolicy) -> RenderOutcome {
    if policy == RenderPolicy::KeepAll {
        return RenderOutcome {
            text: normalize_whitespace(text),
            elided: 0,
        };
    }

    let tree = match swift::parse_swift(text, rel_path) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(path = rel_path, error = %e, "parse failed, rendering without elision");
            return RenderOutcome {
                text: normalize_whitespace(text),
                elided: 0,
            };
        }
    };

    let mut elider = BodyElider::new(text.as_bytes(), policy);
    elider.visit(tree.root_node());
    let elided = elider.edits.len();
    debug!(path = rel_path, policy = policy.label(), elided, "rendered");

    RenderOutcome {
        text: normalize_whitespace(&apply_edits(text, &elider.edits)),
        elided,
    }
}

/// Byte range `[start, end)` of the source replaced by `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

/// Splice non-overlapping, source-ordered edits into `text`.
fn apply_edits(text: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&text[cursor..edit.start]);
        out.push_str(&edit.replacement);
        cursor = edit.end;
    }
    out.push_str(&text[cursor..]);
    out
}

struct BodyElider<'s> {
    src: &'s [u8],
    policy: RenderPolicy,
    /// Container stack; bottom entry is the implicit top-level container
    containers: Vec<usize>,
    next_container: usize,
    /// Containers whose executable slot is taken
    slot_taken: HashSet<usize>,
    edits: Vec<Edit>,
}

impl<'s> BodyElider<'s> {
    fn new(src: &'s [u8], policy: RenderPolicy) -> Self {
        Self {
            src,
            policy,
            containers: vec![0],
            next_container: 1,
            slot_taken: HashSet::new(),
            edits: Vec::new(),
        }
    }

    fn visit(&mut self, node: Node<'_>) {
        match Construct::classify(node, self.src) {
            Some(Construct::TypeDecl(_)) => {
                self.containers.push(self.next_container);
                self.next_container += 1;
                self.visit_children(node);
                self.containers.pop();
            }
            Some(construct @ (Construct::Executable(_) | Construct::ComputedProperty)) => {
                match body_of(node, construct) {
                    Some(body) if !self.keeps(node, construct) => self.elide(body),
                    _ => self.visit_children(node),
                }
            }
            None => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node<'_>) {
        for child in children(node) {
            self.visit(child);
        }
    }

    /// Keep/elide decision for a construct that has a body.
    fn keeps(&mut self, node: Node<'_>, construct: Construct) -> bool {
        match self.policy {
            RenderPolicy::KeepAll => true,
            RenderPolicy::KeepPublic => access_level(node, self.src).is_public_surface(),
            RenderPolicy::KeepOne => match construct {
                Construct::Executable(_) => {
                    let container = self.containers.last().copied().unwrap_or(0);
                    self.slot_taken.insert(container)
                }
                Construct::ComputedProperty | Construct::TypeDecl(_) => false,
            },
            RenderPolicy::SignaturesOnly => false,
        }
    }

    fn elide(&mut self, body: Node<'_>) {
        let (start, end) = (body.start_byte(), body.end_byte());
        let braced = end >= start + 2 && self.src[start] == b'{' && self.src[end - 1] == b'}';
        if !braced {
            // Not a brace-delimited body (recovered parse); leave it alone
            return;
        }

        let replacement = if has_statements(body) {
            let inner = String::from_utf8_lossy(&self.src[start + 1..end - 1]);
            Sentinel::of(&inner).render()
        } else {
            EMPTY_BODY.to_string()
        };
        self.edits.push(Edit {
            start,
            end,
            replacement,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const COUNTER: &str = r#"struct Counter {
    var value: Int

    init() {
        value = 0
    }

    func second() -> Int {
        return value
    }

    func third() {
        print(value)
    }
}
"#;

    fn sentinel(inner: &str) -> String {
        Sentinel::of(inner).render()
    }

    #[test]
    fn test_keep_one_keeps_first_executable_per_container() {
        let out = render_source(COUNTER, "Counter.swift", RenderPolicy::KeepOne);
        let expected = format!(
            r#"struct Counter {{
    var value: Int

    init() {{
        value = 0
    }}

    func second() -> Int {}

    func third() {}
}}
"#,
            sentinel("\n        return value\n    "),
            sentinel("\n        print(value)\n    "),
        );
        assert_eq!(out.text, expected);
        assert_eq!(out.elided, 2);
    }

    #[test]
    fn test_mid_low_score_keeps_init_only() {
        let policy = RenderPolicy::for_score(0.30);
        assert_eq!(policy, RenderPolicy::KeepOne);

        let out = render_source(COUNTER, "Counter.swift", policy);
        assert!(out.text.contains("    init() {\n        value = 0\n    }\n"));
        assert!(out.text.contains(&format!(
            "    func second() -> Int {}\n",
            sentinel("\n        return value\n    ")
        )));
        assert!(out.text.contains(&format!(
            "    func third() {}\n",
            sentinel("\n        print(value)\n    ")
        )));
        assert_eq!(out.elided, 2);
    }

    #[test]
    fn test_keep_one_never_keeps_computed_property() {
        let code = r#"struct Shape {
    var area: Double {
        return 1.0
    }

    func first() {
        draw()
    }

    func second() {
        erase()
    }

    func third() {
        redraw()
    }
}
"#;
        let out = render_source(code, "Shape.swift", RenderPolicy::KeepOne);
        assert!(out.text.contains(&sentinel("\n        return 1.0\n    ")));
        assert!(out.text.contains("func first() {\n        draw()\n    }"));
        assert!(out.text.contains(&sentinel("\n        erase()\n    ")));
        assert!(out.text.contains(&sentinel("\n        redraw()\n    ")));
        assert_eq!(out.elided, 3);
    }

    #[test]
    fn test_extension_is_its_own_container() {
        let code = r#"struct Box {
    func open() {
        a()
    }
    func close() {
        b()
    }
}

extension Box {
    func shake() {
        c()
    }
    func drop() {
        d()
    }
}
"#;
        let out = render_source(code, "Box.swift", RenderPolicy::KeepOne);
        assert!(out.text.contains("func open() {\n        a()\n    }"));
        assert!(out.text.contains("func shake() {\n        c()\n    }"));
        assert!(out.text.contains(&sentinel("\n        b()\n    ")));
        assert!(out.text.contains(&sentinel("\n        d()\n    ")));
    }

    #[test]
    fn test_top_level_functions_share_implicit_container() {
        let code = "func a() {\n    one()\n}\n\nfunc b() {\n    two()\n}\n";
        let out = render_source(code, "Free.swift", RenderPolicy::KeepOne);
        assert_eq!(
            out.text,
            format!("func a() {{\n    one()\n}}\n\nfunc b() {}\n", sentinel("\n    two()\n"))
        );
    }

    #[test]
    fn test_keep_public_keeps_only_public_and_open() {
        let code = r#"public class Service {
    public func start() {
        boot()
    }

    open func extend() {
        hook()
    }

    func internalWork() {
        grind()
    }

    private func secret() {
        hide()
    }

    package func shared() {
        share()
    }
}
"#;
        let out = render_source(code, "Service.swift", RenderPolicy::KeepPublic);
        assert!(out.text.contains("public func start() {\n        boot()\n    }"));
        assert!(out.text.contains("open func extend() {\n        hook()\n    }"));
        assert!(out.text.contains(&format!("func internalWork() {}", sentinel("\n        grind()\n    "))));
        assert!(out.text.contains(&format!("private func secret() {}", sentinel("\n        hide()\n    "))));
        assert!(out.text.contains(&format!("package func shared() {}", sentinel("\n        share()\n    "))));
        assert_eq!(out.elided, 3);
    }

    #[test]
    fn test_signatures_only_elides_everything() {
        let code = r#"class Engine {
    init(power: Int) {
        self.power = power
    }

    deinit {
        stop()
    }

    subscript(index: Int) -> Int {
        return index
    }

    var rpm: Int {
        get { 1 }
        set { apply(newValue) }
    }

    func idle() {}
}
"#;
        let out = render_source(code, "Engine.swift", RenderPolicy::SignaturesOnly);
        assert!(out.text.contains(&format!("init(power: Int) {}", sentinel("\n        self.power = power\n    "))));
        assert!(out.text.contains(&format!("deinit {}", sentinel("\n        stop()\n    "))));
        assert!(out.text.contains(&format!("subscript(index: Int) -> Int {}", sentinel("\n        return index\n    "))));
        assert!(out.text.contains(&format!(
            "var rpm: Int {}",
            sentinel("\n        get { 1 }\n        set { apply(newValue) }\n    ")
        )));
        assert!(out.text.contains("func idle() {}"));
        assert_eq!(out.elided, 5);
    }

    #[test]
    fn test_empty_body_gets_canonical_marker() {
        let code = "func noop() {\n    // nothing yet\n}\n";
        let out = render_source(code, "Noop.swift", RenderPolicy::SignaturesOnly);
        assert_eq!(out.text, "func noop() {}\n");
    }

    #[test]
    fn test_keep_all_only_normalizes_whitespace() {
        let code = "func a() {   \n\n\n\n    body()\n}\nfunc empty() {\n}\n";
        let out = render_source(code, "All.swift", RenderPolicy::KeepAll);
        assert_eq!(out.text, "func a() {\n\n    body()\n}\nfunc empty() {\n}\n");
        assert_eq!(out.elided, 0);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = render_source(COUNTER, "Counter.swift", RenderPolicy::SignaturesOnly);
        let second = render_source(COUNTER, "Counter.swift", RenderPolicy::SignaturesOnly);
        assert_eq!(first, second);
    }

    #[test]
    fn test_whitespace_change_inside_body_changes_sentinel() {
        let original = "func f() {\n    work()\n}\n";
        let padded = "func f() {\n\n    work()\n}\n";
        let a = render_source(original, "F.swift", RenderPolicy::SignaturesOnly);
        let b = render_source(padded, "F.swift", RenderPolicy::SignaturesOnly);
        assert!(a.text.contains("elided: 3 lines"));
        assert!(b.text.contains("elided: 4 lines"));
        assert_ne!(a.text, b.text);
    }

    #[test]
    fn test_nested_function_in_kept_body_uses_same_container() {
        let code = "func outer() {\n    func inner() {\n        deep()\n    }\n    inner()\n}\n";
        let out = render_source(code, "Nested.swift", RenderPolicy::KeepOne);
        assert_eq!(
            out.text,
            format!(
                "func outer() {{\n    func inner() {}\n    inner()\n}}\n",
                sentinel("\n        deep()\n    ")
            )
        );
    }
}
