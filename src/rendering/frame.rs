//! Artifact framing: one header block per file, a closing rule at the end.
//!
//! ```text
//!
//! ────────────────
//!  Sources/App/Model.swift
//! ────────────────
//!
//! struct Model { ... }
//!
//! ────────────────
//! ```

use std::io::{self, Write};

use owo_colors::{OwoColorize, Style};

use crate::types::RenderedFile;

/// Width of the rule line in characters.
pub const RULE_WIDTH: usize = 80;

/// Writes rendered files with path headers, optionally coloured.
#[derive(Debug, Clone, Copy)]
pub struct Framer {
    color: bool,
}

impl Framer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn rule(&self) -> String {
        let rule = "─".repeat(RULE_WIDTH);
        if self.color {
            rule.style(Style::new().bright_blue().bold()).to_string()
        } else {
            rule
        }
    }

    fn path_label(&self, path: &str) -> String {
        let label = format!(" {path} ");
        if self.color {
            label.style(Style::new().bold().white().on_blue()).to_string()
        } else {
            label
        }
    }

    /// Write one file: blank line, rule, path, rule, blank line, text.
    pub fn write_file<W: Write>(&self, out: &mut W, file: &RenderedFile) -> io::Result<()> {
        let rule = self.rule();
        writeln!(out)?;
        writeln!(out, "{rule}")?;
        writeln!(out, "{}", self.path_label(&file.rel_path))?;
        writeln!(out, "{rule}")?;
        writeln!(out)?;
        out.write_all(file.text.as_bytes())?;
        if !file.text.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }

    /// Write every file in order, then the closing rule.
    pub fn write_all<W: Write>(&self, out: &mut W, files: &[RenderedFile]) -> io::Result<()> {
        for file in files {
            self.write_file(out, file)?;
        }
        writeln!(out)?;
        writeln!(out, "{}", self.rule())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn file(path: &str, text: &str) -> RenderedFile {
        RenderedFile {
            rel_path: Arc::from(path),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_plain_frame_layout() {
        let rule = "─".repeat(RULE_WIDTH);
        let mut out = Vec::new();
        Framer::new(false)
            .write_all(&mut out, &[file("A.swift", "struct A {}"), file("B.md", "b\n")])
            .unwrap();
        let expected = format!(
            "\n{rule}\n A.swift \n{rule}\n\nstruct A {{}}\n\n{rule}\n B.md \n{rule}\n\nb\n\n{rule}\n"
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_empty_artifact_is_just_closing_rule() {
        let mut out = Vec::new();
        Framer::new(false).write_all(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), format!("\n{}\n", "─".repeat(RULE_WIDTH)));
    }

    #[test]
    fn test_colour_adds_escapes() {
        let mut out = Vec::new();
        Framer::new(true).write_all(&mut out, &[file("A.swift", "x\n")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains(" A.swift "));
    }
}
