//! Final whitespace pass applied to every rendered text.
//!
//! - `\r\n` and lone `\r` become `\n`
//! - trailing spaces and tabs are trimmed from every line
//! - runs of 3+ blank lines collapse to a single blank line (runs of 1 or 2
//!   are kept as-is)

/// Blank-line runs at or above this length collapse to one line.
const COLLAPSE_RUN: usize = 3;

pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let ends_with_newline = unified.ends_with('\n');
    let body = unified.strip_suffix('\n').unwrap_or(&unified);

    let mut out = String::with_capacity(body.len() + 1);
    let mut blank_run = 0usize;
    let mut first = true;

    let mut push_line = |out: &mut String, line: &str| {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(line);
    };

    for line in body.split('\n') {
        let trimmed = line.trim_end_matches([' ', '\t']);
        if trimmed.is_empty() {
            blank_run += 1;
            continue;
        }
        flush_blank_run(&mut out, blank_run, &mut push_line);
        blank_run = 0;
        push_line(&mut out, trimmed);
    }
    flush_blank_run(&mut out, blank_run, &mut push_line);

    if ends_with_newline {
        out.push('\n');
    }
    out
}

fn flush_blank_run(out: &mut String, run: usize, push_line: &mut impl FnMut(&mut String, &str)) {
    let keep = if run >= COLLAPSE_RUN { 1 } else { run };
    for _ in 0..keep {
        push_line(out, "");
    }
}
