//! Rendering helpers for terminal output and report artifacts.
//!
//! Pure functions over DTOs; no I/O here.

use camino::Utf8Path;
use srcdoctor_types::{Diagnostic, Fix, LedgerEntry};
use std::collections::BTreeMap;

/// Diagnostics grouped by file, in path order.
pub fn render_diagnostics(diagnostics: &[Diagnostic], repo_root: &Utf8Path) -> String {
    let mut grouped: BTreeMap<&Utf8Path, Vec<&Diagnostic>> = BTreeMap::new();
    for d in diagnostics {
        grouped.entry(d.path.as_path()).or_default().push(d);
    }

    let mut out = String::new();
    for (path, ds) in grouped {
        let rel = path.strip_prefix(repo_root).unwrap_or(path);
        out.push_str(&format!("File: {rel}\n"));
        for d in ds {
            let col = d
                .column
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".to_string());
            out.push_str(&format!("  L{:>4}:{:>2} - {}\n", d.line, col, d.message));
        }
        out.push('\n');
    }
    out
}

/// Numbered source snippet around a diagnosed line (three lines of context
/// either side), for the interactive prompt.
pub fn render_snippet(lines: &[String], line: usize) -> String {
    if lines.is_empty() {
        return String::new();
    }
    let first = line.saturating_sub(3).max(1);
    let last = (line + 3).min(lines.len());

    let mut out = String::new();
    for i in first..=last {
        let marker = if i == line { ">" } else { " " };
        out.push_str(&format!("{marker}{i:4}: {}\n", lines[i - 1]));
    }
    out
}

/// Unified diff preview of what a fix would change.
pub fn render_fix_preview(fix: &Fix, lines: &[String]) -> String {
    let mut after = lines.to_vec();
    // Best-effort preview: apply the edits the way the applicator would.
    let mut ordered: Vec<_> = fix.edits.iter().collect();
    ordered.sort_by(|a, b| b.line.cmp(&a.line));
    for edit in ordered {
        if edit.is_insert() {
            if edit.line == 0 {
                after.insert(0, edit.replacement.clone());
            } else if edit.line > after.len() {
                after.push(edit.replacement.clone());
            } else {
                after.insert(edit.line - 1, edit.replacement.clone());
            }
        } else if edit.line >= 1 && edit.line <= after.len() {
            after[edit.line - 1] = edit.replacement.clone();
        }
    }

    let before_text = join_lines(lines);
    let after_text = join_lines(&after);
    let patch = diffy::create_patch(&before_text, &after_text);

    let mut out = format!(
        "{} (confidence {}%)\n",
        fix.description,
        (fix.confidence * 100.0).round() as u32
    );
    out.push_str(&patch.to_string());
    out
}

/// Recent-history report: totals plus the newest entries.
pub fn render_report(entries_newest_first: &[LedgerEntry], total: usize) -> String {
    let mut out = format!("{total} fix event(s) recorded\n\n");
    if entries_newest_first.is_empty() {
        out.push_str("No fix attempts on record.\n");
        return out;
    }
    for e in entries_newest_first {
        let status = if e.success { "ok" } else { "reverted" };
        out.push_str(&format!(
            "{} {} [{}] {:.2} {} - {}\n",
            e.ts.format("%Y-%m-%d %H:%M:%S"),
            status,
            e.category,
            e.confidence,
            e.file,
            e.message,
        ));
    }
    out
}

fn join_lines(lines: &[String]) -> String {
    let mut s = lines.join("\n");
    s.push('\n');
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use srcdoctor_types::{FixCategory, LineEdit, Severity};
    use uuid::Uuid;

    fn diag(path: &str, line: usize, column: Option<usize>, message: &str) -> Diagnostic {
        Diagnostic {
            path: Utf8PathBuf::from(path),
            line,
            column,
            severity: Severity::Error,
            message: message.to_string(),
            raw: String::new(),
        }
    }

    #[test]
    fn diagnostics_grouped_by_file_with_relative_paths() {
        let ds = vec![
            diag("/repo/src/B.java", 2, Some(5), "'{' expected"),
            diag("/repo/src/A.java", 1, None, "';' expected"),
        ];
        let out = render_diagnostics(&ds, Utf8Path::new("/repo"));
        assert!(out.contains("File: src/A.java"));
        assert!(out.contains("File: src/B.java"));
        assert!(out.contains(":?"), "unknown column renders as ?");
        let a_pos = out.find("src/A.java").unwrap();
        let b_pos = out.find("src/B.java").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn snippet_window_is_clamped_and_marks_target() {
        let lines: Vec<String> = (1..=4).map(|i| format!("l{i}")).collect();
        let out = render_snippet(&lines, 1);
        assert!(out.starts_with(">"));
        assert!(out.contains("   4: l4"));
        assert!(!out.contains("l5"));
    }

    #[test]
    fn fix_preview_shows_removed_and_added_lines() {
        let lines = vec!["int x = 5".to_string()];
        let fix = Fix::new(
            diag("/repo/Foo.java", 1, None, "';' expected"),
            "Add missing semicolon",
            vec![LineEdit::replace(1, "int x = 5", "int x = 5;")],
            0.9,
            FixCategory::Automatic,
        );
        let out = render_fix_preview(&fix, &lines);
        assert!(out.contains("Add missing semicolon (confidence 90%)"));
        assert!(out.contains("-int x = 5"));
        assert!(out.contains("+int x = 5;"));
    }

    #[test]
    fn report_renders_totals_and_status() {
        let e = LedgerEntry::new(
            Uuid::new_v4(),
            "/repo/Foo.java",
            "';' expected",
            FixCategory::Pattern,
            0.85,
            false,
        );
        let out = render_report(&[e], 7);
        assert!(out.starts_with("7 fix event(s) recorded"));
        assert!(out.contains("reverted"));
        assert!(out.contains("[pattern]"));
    }

    #[test]
    fn empty_report_is_explicit() {
        let out = render_report(&[], 0);
        assert!(out.contains("No fix attempts on record."));
    }
}
