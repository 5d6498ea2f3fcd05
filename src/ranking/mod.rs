//! Ranking pipeline - from analysis records to importance and order.
//!
//! The ranking system combines:
//! - Name-based symbol resolution into a file dependency graph
//! - Fixed-iteration PageRank on that graph
//! - A composite score folding graph and syntactic signals
//! - A dependency-aware, deterministic emission order

mod graph;
mod order;
mod pagerank;
mod scoring;
mod symbols;

pub use graph::DependencyGraph;
pub use order::{OrderNode, emission_order};
pub use pagerank::{DAMPING, ITERATIONS, PageRanker};
pub use scoring::{ENTRYPOINT_BONUS, SIGNAL_WEIGHT, score_files};
pub use symbols::{SymbolTable, resolve_dependencies};
