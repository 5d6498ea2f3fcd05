//! Configuration loading from ripcondense.toml.
//!
//! ## Example
//!
//! ```toml
//! include = ["Sources/**", "Package.swift"]
//! extend-exclude = ["**/Generated/**"]
//! max-file-bytes = 262144
//!
//! [json]
//! max-depth = 4
//! max-array-items = 5
//! max-string-len = 80
//! ```
//!
//! Missing file means defaults. A file that exists but does not parse (or
//! has unknown keys) is a [`CondenseError::Config`].

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CondenseError, Result};
use crate::rendering::JsonLimits;

/// Config file name looked up in the root directory.
pub const CONFIG_FILE: &str = "ripcondense.toml";

/// Files above this size are replaced by a placeholder.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 512 * 1024;

/// Default exclude patterns (build products and dependency checkouts).
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git/**",
    "**/.build/**",
    "**/.swiftpm/**",
    "**/DerivedData/**",
    "**/Pods/**",
    "**/Carthage/**",
    "**/xcuserdata/**",
    "**/*.xcworkspace/xcuserdata/**",
    "**/fastlane/report.xml",
    "**/.DS_Store",
];

/// ripcondense configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Source file for this config (for display).
    pub source: Option<PathBuf>,

    /// Glob patterns for files to include. If empty, include everything.
    pub include: Vec<String>,

    /// Glob patterns for files to exclude. Replaces defaults if set.
    pub exclude: Vec<String>,

    /// Additional exclude patterns (extends defaults).
    pub extend_exclude: Vec<String>,

    pub max_file_bytes: u64,

    pub json: JsonLimits,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: None,
            include: Vec::new(),
            exclude: Vec::new(),
            extend_exclude: Vec::new(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            json: JsonLimits::default(),
        }
    }
}

/// Raw config as deserialized from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawConfig {
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    extend_exclude: Option<Vec<String>>,
    max_file_bytes: Option<u64>,
    json: Option<JsonLimits>,
}

impl Config {
    /// Load `ripcondense.toml` from `directory`, or defaults if absent.
    pub fn load(directory: &Path) -> Result<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| CondenseError::io(&path, e))?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, source: PathBuf) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| CondenseError::Config {
            path: source.clone(),
            message: e.to_string(),
        })?;
        Ok(Self::from_raw(raw, source))
    }

    fn from_raw(raw: RawConfig, source: PathBuf) -> Self {
        Self {
            source: Some(source),
            include: raw.include.unwrap_or_default(),
            exclude: raw.exclude.unwrap_or_default(),
            extend_exclude: raw.extend_exclude.unwrap_or_default(),
            max_file_bytes: raw.max_file_bytes.unwrap_or(DEFAULT_MAX_FILE_BYTES),
            json: raw.json.unwrap_or_default(),
        }
    }

    /// Get effective exclude patterns (defaults + extend-exclude, or custom exclude).
    pub fn effective_excludes(&self) -> Vec<String> {
        if !self.exclude.is_empty() {
            self.exclude.clone()
        } else {
            let mut patterns: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
            patterns.extend(self.extend_exclude.iter().cloned());
            patterns
        }
    }

    /// True if no include patterns are set, or `rel_path` matches one.
    pub fn matches_include(&self, rel_path: &str) -> bool {
        self.include.is_empty()
            || self
                .include
                .iter()
                .any(|pattern| glob_match::glob_match(pattern, rel_path))
    }

    pub fn matches_exclude(&self, rel_path: &str) -> bool {
        self.effective_excludes()
            .iter()
            .any(|pattern| glob_match::glob_match(pattern, rel_path))
    }

    /// Check if a root-relative path should be listed.
    pub fn should_include(&self, rel_path: &str) -> bool {
        self.matches_include(rel_path) && !self.matches_exclude(rel_path)
    }

    /// Format config for verbose display.
    pub fn display_summary(&self) -> String {
        let mut parts = Vec::new();

        match self.source {
            Some(ref source) => parts.push(format!("config={}", source.display())),
            None => parts.push("config=(defaults)".to_string()),
        }

        if !self.include.is_empty() {
            parts.push(format!("include=[{}]", self.include.join(", ")));
        }

        let excludes = self.effective_excludes();
        if excludes.len() <= 3 {
            parts.push(format!("exclude=[{}]", excludes.join(", ")));
        } else {
            parts.push(format!(
                "exclude=[{}, ... (+{} more)]",
                excludes[..2].join(", "),
                excludes.len() - 2
            ));
        }

        parts.push(format!("max-file-bytes={}", self.max_file_bytes));
        parts.join(" ")
    }
}
