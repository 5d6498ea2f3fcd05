//! Emission order: dependencies before dependents.
//!
//! Kahn's algorithm on the reversed dependency graph (B → A when A depends
//! on B). The ready queue stays sorted by (score desc, path asc), so ties and
//! newly-ready files are placed deterministically. Files caught in cycles
//! are appended afterwards in the same priority order.

use std::cmp::Ordering;
use std::sync::Arc;

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::ranking::graph::DependencyGraph;

/// One file to place: its path, score and the files it depends on.
#[derive(Debug, Clone)]
pub struct OrderNode {
    pub path: Arc<str>,
    pub score: f64,
    pub dependencies: Vec<Arc<str>>,
}

/// Priority: higher score first, then lexicographic path.
fn priority(a: &OrderNode, b: &OrderNode) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.path.cmp(&b.path))
}

/// Compute the emission order. Every input path appears exactly once.
///
/// Dependencies on paths not present in `nodes` are ignored.
///
/// # Panics
/// If the output is not a permutation of the input, which would be a bug here.
pub fn emission_order(nodes: &[OrderNode]) -> Vec<Arc<str>> {
    // Graph node i is unique[i]: nodes are added in first-seen order
    let mut graph = DependencyGraph::default();
    let mut unique: Vec<&OrderNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if graph.index_of(&node.path).is_none() {
            graph.add_node(&node.path);
            unique.push(node);
        }
    }
    for node in &unique {
        for dep in &node.dependencies {
            graph.add_edge(&node.path, dep);
        }
    }
    let node_at = |i: usize| unique[i];

    // In the reversed graph, in-degree of A = number of files A depends on
    let mut pending: Vec<usize> = graph.nodes().map(|idx| graph.out_degree(idx)).collect();
    let mut placed = vec![false; graph.node_count()];

    let mut ready: Vec<usize> = graph
        .nodes()
        .map(|idx| idx.index())
        .filter(|&i| pending[i] == 0)
        .collect();
    ready.sort_by(|&a, &b| priority(node_at(a), node_at(b)));

    let mut order: Vec<usize> = Vec::with_capacity(graph.node_count());
    while !ready.is_empty() {
        let current = ready.remove(0);
        placed[current] = true;
        order.push(current);

        for dependent in graph.dependents(NodeIndex::new(current)) {
            let d = dependent.index();
            pending[d] -= 1;
            if pending[d] == 0 {
                let pos = ready
                    .binary_search_by(|&probe| priority(node_at(probe), node_at(d)))
                    .unwrap_or_else(|insert_at| insert_at);
                ready.insert(pos, d);
            }
        }
    }

    let mut cyclic: Vec<usize> = (0..graph.node_count()).filter(|&i| !placed[i]).collect();
    if !cyclic.is_empty() {
        debug!(count = cyclic.len(), "appending files caught in dependency cycles");
        cyclic.sort_by(|&a, &b| priority(node_at(a), node_at(b)));
        order.extend(cyclic);
    }

    assert_eq!(
        order.len(),
        graph.node_count(),
        "emission order must place every file exactly once"
    );

    order
        .into_iter()
        .map(|i| Arc::clone(&node_at(i).path))
        .collect()
}
