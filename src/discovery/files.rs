//! Listing and classifying the files of a repository.
//!
//! - Respects .gitignore, the global gitignore and .git/info/exclude via
//!   the `ignore` crate, also outside git repositories
//! - Applies ripcondense.toml include/exclude globs to root-relative paths
//! - Classifies every file into a [`ContentKind`]
//! - Returns units sorted by relative path (`/` separators)

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CondenseError, Result};
use crate::types::{ContentKind, SourceUnit};

/// Leading bytes inspected for a NUL when sniffing binaries.
pub const SNIFF_BYTES: usize = 8 * 1024;

const SOURCE_EXTENSIONS: &[&str] = &["swift"];

/// SwiftPM writes Package.resolved as JSON.
const STRUCTURED_EXTENSIONS: &[&str] = &["json", "resolved"];

const TEXT_EXTENSIONS: &[&str] = &[
    // Docs
    "md", "markdown", "txt", "rst", "adoc",
    // Config
    "yml", "yaml", "toml", "ini", "cfg", "conf", "xcconfig", "entitlements",
    // Apple property lists and resources
    "plist", "xml", "strings", "stringsdict", "storyboard", "xib", "pbxproj",
    "xcscheme", "modulemap",
    // Scripts and other languages living next to Swift
    "sh", "bash", "zsh", "rb", "py", "h", "m", "mm", "c", "cpp", "hpp",
    // Misc
    "gitignore", "gitattributes", "editorconfig", "csv", "html", "css",
];

/// Extension-less file names that are known text.
const TEXT_FILE_NAMES: &[&str] = &[
    "Makefile", "Dockerfile", "Podfile", "Cartfile", "Gemfile", "Brewfile",
    "Fastfile", "Appfile", "Matchfile", "Dangerfile", "LICENSE", "README",
    "CODEOWNERS", ".gitignore", ".gitattributes", ".swift-version",
];

/// Classify a file from its path and leading bytes.
///
/// A NUL byte in the first [`SNIFF_BYTES`] bytes or invalid UTF-8 wins over
/// the extension, so a `.swift` file holding binary data is still binary.
pub fn classify(rel_path: &str, bytes: &[u8]) -> ContentKind {
    let sniff = &bytes[..bytes.len().min(SNIFF_BYTES)];
    if sniff.contains(&0) || std::str::from_utf8(bytes).is_err() {
        return ContentKind::Binary;
    }

    let path = Path::new(rel_path);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or(rel_path);

    match ext.as_deref() {
        Some(e) if SOURCE_EXTENSIONS.contains(&e) => ContentKind::Source,
        Some(e) if STRUCTURED_EXTENSIONS.contains(&e) => ContentKind::StructuredData,
        Some(e) if TEXT_EXTENSIONS.contains(&e) => ContentKind::PlainText,
        _ if TEXT_FILE_NAMES.contains(&name) => ContentKind::PlainText,
        _ => ContentKind::Unrecognized,
    }
}

/// List every unit under `root`, read and classified.
///
/// `root` may also be a single file. Entries that cannot be read are logged
/// and skipped; only a missing root is an error.
pub fn list_units(root: &Path, config: &Config) -> Result<Vec<SourceUnit>> {
    if root.is_file() {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.to_string_lossy().into_owned());
        return match read_unit(root, &name, config.max_file_bytes) {
            Ok(unit) => Ok(vec![unit]),
            Err(e) => {
                warn!(path = %name, error = %e, "skipping unreadable file");
                Ok(Vec::new())
            }
        };
    }

    if !root.is_dir() {
        return Err(CondenseError::Discovery {
            path: root.to_path_buf(),
            message: "path does not exist or is not a directory".to_string(),
        });
    }

    let paths = walk(root, config)?;
    info!(files = paths.len(), "discovered files");

    let units: Vec<SourceUnit> = paths
        .par_iter()
        .filter_map(|(abs, rel)| match read_unit(abs, rel, config.max_file_bytes) {
            Ok(unit) => Some(unit),
            Err(e) => {
                warn!(path = %rel, error = %e, "skipping unreadable file");
                None
            }
        })
        .collect();

    Ok(units)
}

/// Parallel walk; returns `(absolute, relative)` pairs sorted by relative path.
fn walk(root: &Path, config: &Config) -> Result<Vec<(PathBuf, String)>> {
    let walker = WalkBuilder::new(root)
        .hidden(false)          // Let .gitignore and the exclude globs decide
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)     // Work even in non-git directories
        .follow_links(false)
        .threads(0)
        .build_parallel();

    let found = Mutex::new(Vec::new());

    walker.run(|| {
        Box::new(|entry_result| {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    return ignore::WalkState::Continue;
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                return ignore::WalkState::Continue;
            }

            let path = entry.path();
            let rel = relative_path(root, path);
            if !config.should_include(&rel) {
                debug!(path = %rel, "excluded by config");
                return ignore::WalkState::Continue;
            }

            if let Ok(mut found) = found.lock() {
                found.push((path.to_path_buf(), rel));
            }
            ignore::WalkState::Continue
        })
    });

    let mut found = found.into_inner().map_err(|_| CondenseError::Discovery {
        path: root.to_path_buf(),
        message: "walker thread panicked".to_string(),
    })?;
    found.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(found)
}

/// Root-relative path with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_unit(abs: &Path, rel: &str, max_file_bytes: u64) -> Result<SourceUnit> {
    let size = std::fs::metadata(abs).map_err(|e| CondenseError::io(abs, e))?.len();
    if size > max_file_bytes {
        debug!(path = rel, size, "over size cap, omitting content");
        return Ok(oversized(rel, size));
    }

    let bytes = std::fs::read(abs).map_err(|e| CondenseError::io(abs, e))?;
    let kind = classify(rel, &bytes);
    let text = match kind {
        ContentKind::Binary => String::new(),
        _ => String::from_utf8(bytes).unwrap_or_default(),
    };
    let mut unit = SourceUnit::new(rel, &text, kind);
    unit.size = size;
    Ok(unit)
}

fn oversized(rel: &str, size: u64) -> SourceUnit {
    let mut unit = SourceUnit::new(rel, "", ContentKind::Binary);
    unit.size = size;
    unit
}
