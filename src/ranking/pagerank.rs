//! PageRank over the file dependency graph.
//!
//! Fixed-iteration power method: no convergence check, so the result is a
//! pure function of the graph and identical on every run.
//!
//! ```text
//! PR'(v) = (1-d)/n
//!        + Σ_{u→v} d·PR(u)/out(u)          for u with outgoing edges
//!        + Σ_{u dangling} d·PR(u)/n        dangling mass spread over all nodes
//! ```
//!
//! Spreading dangling mass over every node keeps the total at 1.

use crate::ranking::graph::DependencyGraph;
use crate::types::CentralityTable;

/// Damping factor.
pub const DAMPING: f64 = 0.85;
/// Number of power iterations.
pub const ITERATIONS: usize = 20;

/// File-level PageRank calculator.
#[derive(Debug, Clone, Copy)]
pub struct PageRanker {
    damping: f64,
    iterations: usize,
}

impl PageRanker {
    pub fn new(damping: f64, iterations: usize) -> Self {
        Self { damping, iterations }
    }

    /// Compute a rank per file. Empty graph yields an empty table.
    pub fn compute(&self, graph: &DependencyGraph) -> CentralityTable {
        let n = graph.node_count();
        if n == 0 {
            return CentralityTable::new();
        }

        let nodes: Vec<_> = graph.nodes().collect();
        let n_f = n as f64;
        let base = (1.0 - self.damping) / n_f;

        // Adjacency snapshot indexed by NodeIndex::index()
        let out_edges: Vec<Vec<usize>> = nodes
            .iter()
            .map(|&idx| graph.dependencies(idx).map(|t| t.index()).collect())
            .collect();

        let mut ranks = vec![1.0 / n_f; n];
        for _ in 0..self.iterations {
            let mut next = vec![base; n];
            let mut dangling_share = 0.0;

            for (u, targets) in out_edges.iter().enumerate() {
                if targets.is_empty() {
                    dangling_share += self.damping * ranks[u] / n_f;
                } else {
                    let share = self.damping * ranks[u] / targets.len() as f64;
                    for &v in targets {
                        next[v] += share;
                    }
                }
            }

            for value in next.iter_mut() {
                *value += dangling_share;
            }
            ranks = next;
        }

        nodes
            .iter()
            .map(|&idx| (std::sync::Arc::clone(graph.path(idx)), ranks[idx.index()]))
            .collect()
    }
}

impl Default for PageRanker {
    fn default() -> Self {
        Self::new(DAMPING, ITERATIONS)
    }
}
