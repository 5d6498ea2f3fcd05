//! File dependency graph.
//!
//! Nodes are files (an arena addressed by `NodeIndex`), edges point from the
//! depending file to the file it depends on. Multiplicity is collapsed: at
//! most one edge per ordered pair, never a self-loop.

use std::collections::HashMap;
use std::sync::Arc;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::types::AnalysisRecord;

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: DiGraph<Arc<str>, ()>,
    node_map: HashMap<Arc<str>, NodeIndex>,
}

impl DependencyGraph {
    /// Build from resolved records. Node order follows record order.
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let mut graph = Self::default();
        for record in records {
            graph.add_node(&record.rel_path);
        }
        for record in records {
            for dep in &record.dependencies {
                graph.add_edge(&record.rel_path, dep);
            }
        }
        graph
    }

    /// Add a file node. Returns the existing index when already present.
    pub fn add_node(&mut self, path: &Arc<str>) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(path) {
            return idx;
        }
        let idx = self.graph.add_node(Arc::clone(path));
        self.node_map.insert(Arc::clone(path), idx);
        idx
    }

    /// Add `from -> to`. Unknown endpoints, self-loops and duplicates are ignored.
    pub fn add_edge(&mut self, from: &Arc<str>, to: &Arc<str>) -> bool {
        let (Some(&a), Some(&b)) = (self.node_map.get(from), self.node_map.get(to)) else {
            return false;
        };
        if a == b || self.graph.contains_edge(a, b) {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn path(&self, idx: NodeIndex) -> &Arc<str> {
        &self.graph[idx]
    }

    pub fn index_of(&self, path: &str) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }

    /// Files `idx` depends on.
    pub fn dependencies(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    /// Files depending on `idx`.
    pub fn dependents(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.dependencies(idx).count()
    }
}
