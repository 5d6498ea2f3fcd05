//! Core types for ripcondense.
//!
//! Everything that crosses a stage boundary lives here. Key design decisions:
//! - `Arc<str>` for paths so records, graphs and reports share one allocation
//! - Sorted containers (`BTreeMap`/`BTreeSet`) wherever iteration order can
//!   leak into output, so repeated runs are byte-identical
//! - Records are built once per stage and only the dependency fields are
//!   filled in afterwards (by the symbol resolver)

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

/// How a file's bytes should be treated downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    /// Swift source: analyzed, ranked and body-elided.
    Source,
    /// Tree-shaped data (JSON): handed to the structured-data compactor.
    StructuredData,
    /// Known text formats: whitespace-normalized only.
    PlainText,
    /// Non-text or oversized: replaced by a size placeholder.
    Binary,
    /// Valid UTF-8 with an unknown extension: treated like plain text.
    Unrecognized,
}

impl ContentKind {
    pub fn is_analyzable(self) -> bool {
        matches!(self, ContentKind::Source)
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Source => "source",
            ContentKind::StructuredData => "structured-data",
            ContentKind::PlainText => "plain-text",
            ContentKind::Binary => "binary",
            ContentKind::Unrecognized => "unrecognized",
        }
    }
}

/// One discovered file. Immutable once read.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Root-relative path with `/` separators (e.g. "Sources/App/Model.swift")
    pub rel_path: Arc<str>,
    /// File text. Empty for binary and oversized units.
    pub text: Arc<str>,
    /// Size on disk in bytes
    pub size: u64,
    pub kind: ContentKind,
}

impl SourceUnit {
    pub fn new(rel_path: &str, text: &str, kind: ContentKind) -> Self {
        Self {
            rel_path: Arc::from(rel_path),
            text: Arc::from(text),
            size: text.len() as u64,
            kind,
        }
    }
}

/// Access tier, ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Private,
    FilePrivate,
    /// Swift's implicit access level
    #[default]
    Internal,
    Package,
    Public,
    Open,
}

impl AccessLevel {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "private" => Some(AccessLevel::Private),
            "fileprivate" => Some(AccessLevel::FilePrivate),
            "internal" => Some(AccessLevel::Internal),
            "package" => Some(AccessLevel::Package),
            "public" => Some(AccessLevel::Public),
            "open" => Some(AccessLevel::Open),
            _ => None,
        }
    }

    /// Public surface = public or open.
    pub fn is_public_surface(self) -> bool {
        self >= AccessLevel::Public
    }
}

/// Kind of a nominal type declaration (or an extension of one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
    Actor,
    Protocol,
    Extension,
}

impl DeclKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(DeclKind::Class),
            "struct" => Some(DeclKind::Struct),
            "enum" => Some(DeclKind::Enum),
            "actor" => Some(DeclKind::Actor),
            "protocol" => Some(DeclKind::Protocol),
            "extension" => Some(DeclKind::Extension),
            _ => None,
        }
    }

    /// Public protocols weigh double in the public-surface score.
    pub fn surface_weight(self) -> u32 {
        match self {
            DeclKind::Protocol => 2,
            _ => 1,
        }
    }
}

/// A nominal type definition or extension found while walking a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Declared name; for extensions, the extended type's root name
    pub name: String,
    pub kind: DeclKind,
    pub access: AccessLevel,
    /// Nesting path, e.g. "Outer.Inner" or "extension Foo"
    pub container_key: String,
}

/// Per-file facts produced by the analyzer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRecord {
    pub rel_path: Arc<str>,
    /// Declarations in source order
    pub declarations: Vec<Declaration>,
    /// Unique declared type names (extensions excluded)
    pub declared: BTreeSet<String>,
    /// Raw public-surface weight (public protocols count double)
    pub public_weight: u32,
    /// Referenced type name -> occurrence count
    pub references: BTreeMap<String, u32>,
    /// Branch/loop keywords plus boolean operators, whole file
    pub complexity: u32,
    pub is_entrypoint: bool,
    /// Files this one depends on. Filled by the symbol resolver.
    pub dependencies: BTreeSet<Arc<str>>,
    /// Resolved references pointing into this file. Filled by the symbol resolver.
    pub inbound: u32,
}

impl AnalysisRecord {
    /// Zero-signal record used when a file cannot be parsed.
    pub fn empty(rel_path: Arc<str>) -> Self {
        Self {
            rel_path,
            ..Default::default()
        }
    }
}

/// PageRank value per file path. Values sum to 1.
pub type CentralityTable = BTreeMap<Arc<str>, f64>;

/// An analysis record with its composite importance.
#[derive(Debug, Clone)]
pub struct ScoredFile {
    pub record: AnalysisRecord,
    /// Composite score in [0, 1]
    pub score: f64,
    /// Raw inbound reference count
    pub inbound: u32,
    /// Raw PageRank value
    pub pagerank: f64,
}

/// Final output unit: a path and its condensed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub rel_path: Arc<str>,
    pub text: String,
}
