//! End-to-end condensation: units in, ordered rendered files out.
//!
//! ```text
//! analyze (par) ─┬─ resolve symbols ─ PageRank ─ score ─ order ─ render (par)
//!                │
//! non-source ────┴──────────── isolated order nodes, score 0 ─────┘
//! ```
//!
//! Each stage only starts once the previous one has finished for every
//! file; rayon's `collect` is the barrier.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::extraction::{analyze, swift};
use crate::ranking::{
    DependencyGraph, OrderNode, PageRanker, SymbolTable, emission_order, resolve_dependencies,
    score_files,
};
use crate::rendering::{JsonLimits, RenderPolicy, render_passthrough, render_source};
use crate::types::{AnalysisRecord, ContentKind, RenderedFile, ScoredFile, SourceUnit};

/// Ranking facts for one emitted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: Arc<str>,
    pub kind: ContentKind,
    pub score: f64,
    /// Only set for analyzable source.
    pub policy: Option<RenderPolicy>,
    pub inbound: u32,
    pub pagerank: f64,
    pub dependencies: Vec<Arc<str>>,
    pub elided: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    /// Unit count per content-kind label
    pub units_by_kind: BTreeMap<&'static str, usize>,
    pub symbols: usize,
    pub edges: usize,
    pub bodies_elided: usize,
    pub input_bytes: u64,
    pub output_bytes: usize,
}

/// Result of a run. `files` and `reports` are both in emission order.
#[derive(Debug, Clone)]
pub struct Condensed {
    pub files: Vec<RenderedFile>,
    pub reports: Vec<FileReport>,
    pub stats: Stats,
}

/// What the renderer needs to know about one path.
struct Entry<'a> {
    unit: &'a SourceUnit,
    scored: Option<ScoredFile>,
}

/// Run the whole pipeline over `units`.
///
/// Every unit appears in the output exactly once. Non-analyzable units join
/// the emission order with score 0 and no edges and stay out of PageRank.
///
/// Fails only when the Swift grammar cannot be loaded; per-file parse
/// problems degrade that file alone.
pub fn condense(units: Vec<SourceUnit>, json: &JsonLimits) -> Result<Condensed> {
    swift::ensure_grammar()?;
    let start = Instant::now();

    let mut records: Vec<AnalysisRecord> = units
        .par_iter()
        .filter(|u| u.kind.is_analyzable())
        .map(analyze)
        .collect();
    info!(records = records.len(), elapsed = ?start.elapsed(), "analyzed sources");

    let symbols = SymbolTable::build(&records);
    resolve_dependencies(&mut records, &symbols);
    let graph = DependencyGraph::from_records(&records);
    info!(symbols = symbols.len(), edges = graph.edge_count(), "resolved dependencies");

    let centrality = PageRanker::default().compute(&graph);
    let scored = score_files(records, &centrality);

    let mut nodes: Vec<OrderNode> = Vec::with_capacity(units.len());
    let mut entries: HashMap<Arc<str>, Entry<'_>> = HashMap::with_capacity(units.len());
    for unit in &units {
        entries.insert(unit.rel_path.clone(), Entry { unit, scored: None });
    }
    for file in scored {
        nodes.push(OrderNode {
            path: file.record.rel_path.clone(),
            score: file.score,
            dependencies: file.record.dependencies.iter().cloned().collect(),
        });
        if let Some(entry) = entries.get_mut(&file.record.rel_path) {
            entry.scored = Some(file);
        }
    }
    for unit in units.iter().filter(|u| !u.kind.is_analyzable()) {
        nodes.push(OrderNode {
            path: unit.rel_path.clone(),
            score: 0.0,
            dependencies: Vec::new(),
        });
    }

    let order = emission_order(&nodes);
    info!(files = order.len(), elapsed = ?start.elapsed(), "ranked and ordered");

    let rendered: Vec<(RenderedFile, FileReport)> = order
        .par_iter()
        .filter_map(|path| entries.get(path).map(|entry| render_entry(entry, json)))
        .collect();

    let mut stats = Stats {
        symbols: symbols.len(),
        edges: graph.edge_count(),
        ..Default::default()
    };
    for unit in &units {
        *stats.units_by_kind.entry(unit.kind.label()).or_default() += 1;
        stats.input_bytes += unit.size;
    }

    let (files, reports): (Vec<_>, Vec<_>) = rendered.into_iter().unzip();
    stats.bodies_elided = reports.iter().map(|r| r.elided).sum();
    stats.output_bytes = files.iter().map(|f| f.text.len()).sum();
    info!(
        bodies_elided = stats.bodies_elided,
        output_bytes = stats.output_bytes,
        elapsed = ?start.elapsed(),
        "rendered"
    );

    Ok(Condensed { files, reports, stats })
}

fn render_entry(entry: &Entry<'_>, json: &JsonLimits) -> (RenderedFile, FileReport) {
    let unit = entry.unit;
    let mut report = FileReport {
        path: unit.rel_path.clone(),
        kind: unit.kind,
        score: 0.0,
        policy: None,
        inbound: 0,
        pagerank: 0.0,
        dependencies: Vec::new(),
        elided: 0,
    };

    let text = match &entry.scored {
        Some(scored) => {
            let policy = RenderPolicy::for_score(scored.score);
            let outcome = render_source(&unit.text, &unit.rel_path, policy);
            report.score = scored.score;
            report.policy = Some(policy);
            report.inbound = scored.inbound;
            report.pagerank = scored.pagerank;
            report.dependencies = scored.record.dependencies.iter().cloned().collect();
            report.elided = outcome.elided;
            outcome.text
        }
        None => render_passthrough(unit, json),
    };

    let file = RenderedFile {
        rel_path: unit.rel_path.clone(),
        text,
    };
    (file, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swift(path: &str, text: &str) -> SourceUnit {
        SourceUnit::new(path, text, ContentKind::Source)
    }

    fn paths(condensed: &Condensed) -> Vec<&str> {
        condensed.files.iter().map(|f| &*f.rel_path).collect()
    }

    fn three_file_package() -> Vec<SourceUnit> {
        vec![
            swift("A.swift", "public protocol Store {\n    func load() -> Int\n}\n"),
            swift(
                "B.swift",
                "final class DiskStore: Store {\n    func load() -> Int {\n        return 1\n    }\n}\n",
            ),
            swift(
                "C.swift",
                "@main\nstruct Tool {\n    static func main() {\n        let store: DiskStore = DiskStore()\n        print(store.load())\n    }\n}\n",
            ),
        ]
    }

    #[test]
    fn test_dependencies_emitted_first() {
        let condensed = condense(three_file_package(), &JsonLimits::default()).unwrap();
        assert_eq!(paths(&condensed), vec!["A.swift", "B.swift", "C.swift"]);
        assert_eq!(condensed.stats.edges, 2);

        let b = &condensed.reports[1];
        assert_eq!(b.dependencies, vec![Arc::<str>::from("A.swift")]);
        assert_eq!(b.inbound, 1);
        assert!(b.policy.is_some());
    }

    #[test]
    fn test_every_unit_emitted_once() {
        let mut units = three_file_package();
        units.push(SourceUnit::new("README.md", "# Tool\n", ContentKind::PlainText));
        units.push(SourceUnit::new("Package.resolved", "{\"pins\": []}", ContentKind::StructuredData));
        let mut logo = SourceUnit::new("logo.png", "", ContentKind::Binary);
        logo.size = 42;
        units.push(logo);

        let condensed = condense(units, &JsonLimits::default()).unwrap();
        let mut emitted = paths(&condensed);
        assert_eq!(emitted.len(), 6);
        emitted.sort();
        emitted.dedup();
        assert_eq!(emitted.len(), 6);

        let logo = condensed.files.iter().find(|f| &*f.rel_path == "logo.png").unwrap();
        assert_eq!(logo.text, "[omitted, size=42 bytes]");

        let readme = condensed.reports.iter().find(|r| &*r.path == "README.md").unwrap();
        assert_eq!(readme.score, 0.0);
        assert!(readme.policy.is_none());

        assert_eq!(condensed.stats.units_by_kind["source"], 3);
        assert_eq!(condensed.stats.units_by_kind["binary"], 1);
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = condense(three_file_package(), &JsonLimits::default()).unwrap();
        let second = condense(three_file_package(), &JsonLimits::default()).unwrap();
        assert_eq!(first.files, second.files);
    }

    #[test]
    fn test_empty_input() {
        let condensed = condense(Vec::new(), &JsonLimits::default()).unwrap();
        assert!(condensed.files.is_empty());
        assert_eq!(condensed.stats.edges, 0);
    }

    #[test]
    fn test_source_with_syntax_errors_still_emitted() {
        let units = vec![swift("Broken.swift", "struct {{{{ ((( func")];
        let condensed = condense(units, &JsonLimits::default()).unwrap();
        assert_eq!(paths(&condensed), vec!["Broken.swift"]);
        assert!(condensed.files[0].text.contains("struct"));
        assert_eq!(condensed.reports[0].kind, ContentKind::Source);
        assert!(condensed.reports[0].policy.is_some());
    }
}
