//! Turns a captured javac output stream into structured diagnostics.
//!
//! The recognized grammar is the javac line form
//! `<file>.java:<line>: <error|warning>: <message>`, optionally followed by a
//! source snippet line and a caret marker line two lines below the header.
//! When the caret is present its horizontal offset gives the 1-based column
//! and the whole three-line block becomes the diagnostic's raw text;
//! otherwise the column stays unknown and raw is the header line alone.
//!
//! Parsing is lenient by contract: build-tool banners, help links, and blank
//! marker lines are skipped silently, and a header-shaped line that cannot be
//! fully decoded is dropped with a warning. This module never fails.

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use srcdoctor_types::{Diagnostic, Severity};
use std::sync::LazyLock;
use tracing::warn;

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<file>.*?\.java):(?P<line>\d+): (?P<kind>error|warning): (?P<msg>.*)$")
        .expect("header regex")
});

static CARET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\^$").expect("caret regex"));

/// Parse the full captured text of one compiler run.
///
/// Relative file paths are resolved against `repo_root`. Output order follows
/// the compiler's reporting order.
pub fn parse_diagnostics(raw: &str, repo_root: &Utf8Path) -> Vec<Diagnostic> {
    if raw.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = raw.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        let Some(caps) = HEADER_RE.captures(line) else {
            if looks_like_header(line) {
                warn!(line, "dropping diagnostic-shaped line that did not parse");
            }
            i += 1;
            continue;
        };

        let Ok(line_no) = caps["line"].parse::<usize>() else {
            warn!(line, "dropping diagnostic with unparseable line number");
            i += 1;
            continue;
        };

        let severity = match &caps["kind"] {
            "error" => Severity::Error,
            _ => Severity::Warning,
        };

        let mut column = None;
        let mut raw_block = lines[i].to_string();

        // javac prints the offending source line directly under the header
        // and a caret marker under that; the caret offset is the column.
        if i + 2 < lines.len() && CARET_RE.is_match(lines[i + 2]) {
            if let Some(pos) = lines[i + 2].find('^') {
                column = Some(pos + 1);
            }
            raw_block = lines[i..i + 3].join("\n");
            i += 2;
        }

        out.push(Diagnostic {
            path: normalize_path(&caps["file"], repo_root),
            line: line_no,
            column,
            severity,
            message: caps["msg"].trim().to_string(),
            raw: raw_block,
        });

        i += 1;
    }

    out
}

/// The line names a Java file with a position but the full grammar did not
/// match; worth a warning rather than silence.
fn looks_like_header(line: &str) -> bool {
    line.contains(".java:") && line.contains(": ")
}

fn normalize_path(file: &str, repo_root: &Utf8Path) -> Utf8PathBuf {
    let p = Utf8PathBuf::from(file);
    if p.is_absolute() {
        p
    } else {
        repo_root.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ROOT: &str = "/repo";

    fn parse(raw: &str) -> Vec<Diagnostic> {
        parse_diagnostics(raw, Utf8Path::new(ROOT))
    }

    #[test]
    fn empty_output_yields_nothing() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn header_with_caret_yields_column_and_three_line_raw() {
        let raw = "\
src/main/java/com/app/Foo.java:12: error: ';' expected
        int x = 5
                 ^
1 error
";
        let ds = parse(raw);
        assert_eq!(ds.len(), 1);
        let d = &ds[0];
        assert_eq!(d.path, Utf8PathBuf::from("/repo/src/main/java/com/app/Foo.java"));
        assert_eq!(d.line, 12);
        assert_eq!(d.column, Some(18));
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "';' expected");
        assert_eq!(d.raw.lines().count(), 3);
    }

    #[test]
    fn header_without_caret_has_unknown_column() {
        let raw = "Foo.java:3: error: cannot find symbol\n";
        let ds = parse(raw);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].column, None);
        assert_eq!(ds[0].raw, "Foo.java:3: error: cannot find symbol");
    }

    #[test]
    fn absolute_paths_are_kept_as_is() {
        let ds = parse("/abs/Bar.java:1: error: '{' expected\n");
        assert_eq!(ds[0].path, Utf8PathBuf::from("/abs/Bar.java"));
    }

    #[test]
    fn warnings_are_parsed_with_warning_severity() {
        let raw = "Foo.java:8: warning: [deprecation] stop() in Thread has been deprecated\n";
        let ds = parse(raw);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].severity, Severity::Warning);
    }

    #[test]
    fn noise_lines_are_skipped() {
        let raw = "\
Note: Some input files use unchecked or unsafe operations.
Foo.java:5: error: ';' expected
2 errors
error: compilation failed
";
        let ds = parse(raw);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].line, 5);
    }

    #[test]
    fn malformed_header_is_dropped_not_fatal() {
        // Line number overflows usize; the surrounding diagnostics survive.
        let raw = "\
Foo.java:99999999999999999999999999: error: ';' expected
Bar.java:2: error: '{' expected
";
        let ds = parse(raw);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds[0].path, Utf8PathBuf::from("/repo/Bar.java"));
    }

    #[test]
    fn multiple_diagnostics_keep_compiler_order() {
        let raw = "\
A.java:9: error: ';' expected
A.java:2: error: cannot find symbol
B.java:1: warning: something
";
        let ds = parse(raw);
        let lines: Vec<usize> = ds.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![9, 2, 1]);
    }

    #[test]
    fn caret_scan_does_not_cross_into_next_header() {
        // A header two lines before another header must not steal a column.
        let raw = "\
A.java:1: error: ';' expected
B.java:2: error: '{' expected
        public class B
";
        let ds = parse(raw);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds[0].column, None);
        assert_eq!(ds[1].column, None);
    }
}
