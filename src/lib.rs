//! ripcondense - importance-ranked condensation of Swift repositories
//!
//! Turns a repository into one text artifact sized for an LLM context:
//! important files keep their bodies, the rest keep signatures, and files
//! are emitted dependencies-first.
//!
//! # Architecture
//!
//! ```text
//! File Discovery → Analysis → Symbol Resolution → PageRank → Scoring → Order → Rendering
//!       ↓             ↓              ↓                ↓          ↓        ↓         ↓
//!    ignore      tree-sitter     name table       petgraph   5 signals  Kahn    elision +
//!    crate         swift                          DiGraph               sort    sentinels
//! ```
//!
//! Analysis and rendering run per file in parallel via rayon; the stages in
//! between need every record and run on one thread.

pub mod config;
pub mod discovery;
pub mod error;
pub mod extraction;
pub mod pipeline;
pub mod ranking;
pub mod rendering;
pub mod types;

pub use config::Config;
pub use error::{CondenseError, Result};
pub use pipeline::{Condensed, FileReport, Stats, condense};
pub use rendering::{JsonLimits, RenderPolicy};
pub use types::{
    AccessLevel, AnalysisRecord, CentralityTable, ContentKind, DeclKind, Declaration,
    RenderedFile, ScoredFile, SourceUnit,
};
