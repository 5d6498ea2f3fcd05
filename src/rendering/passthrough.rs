//! Rendering for units that are not ranked: data, text and binaries.

use tracing::debug;

use crate::rendering::json::{JsonLimits, compact_json};
use crate::rendering::whitespace::normalize_whitespace;
use crate::types::{ContentKind, SourceUnit};

/// Placeholder written instead of binary or oversized content.
pub fn binary_placeholder(size: u64) -> String {
    format!("[omitted, size={size} bytes]")
}

/// Render a unit without syntax-aware elision.
///
/// Structured data that fails to parse falls back to whitespace
/// normalization, like plain text. Source units get the keep-all treatment.
pub fn render_passthrough(unit: &SourceUnit, limits: &JsonLimits) -> String {
    match unit.kind {
        ContentKind::Binary => binary_placeholder(unit.size),
        ContentKind::StructuredData => match compact_json(&unit.text, limits) {
            Ok(compacted) => compacted,
            Err(e) => {
                debug!(path = %unit.rel_path, error = %e, "not valid JSON, normalizing only");
                normalize_whitespace(&unit.text)
            }
        },
        ContentKind::PlainText | ContentKind::Unrecognized | ContentKind::Source => {
            normalize_whitespace(&unit.text)
        }
    }
}
