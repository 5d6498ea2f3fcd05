//! Fact extraction from Swift source using tree-sitter.
//!
//! This module handles:
//! - Loading the Swift grammar into thread-local parsers
//! - Classifying syntax nodes into a closed set of constructs
//! - Walking each file once to build its `AnalysisRecord`

mod analyzer;
pub mod swift;

pub use analyzer::analyze;
pub use swift::{Construct, ExecutableKind, parse_swift};
