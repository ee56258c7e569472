use crate::context::line_at;
use crate::registry::Fixer;
use regex::Regex;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};
use std::sync::LazyLock;

static HEADER_PARENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\b(?:class|interface|enum|record)\s+[A-Za-z_]\w*)\s*\(\s*\)")
        .expect("header parens regex")
});

static INDENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*").expect("indent regex"));

/// Generic brace repair: appends a missing `{` to the diagnosed line, or a
/// closing `}` at end of file matching the indentation above the caret line.
pub struct BraceFixer;

impl Fixer for BraceFixer {
    fn name(&self) -> &'static str {
        "braces"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        let m = &diagnostic.message;
        m.contains("'{' expected") || m.contains("'}' expected") || m.contains("illegal start of")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        if diagnostic.message.contains("'{' expected")
            && let Some(old) = line_at(lines, diagnostic.line)
        {
            // A class header mistakenly carrying () is repaired in one step.
            let rewritten = HEADER_PARENS_RE.replace(old, "$1");
            if rewritten != old {
                return Some(Fix::new(
                    diagnostic.clone(),
                    "Remove () from class header and add {",
                    vec![LineEdit::replace(
                        diagnostic.line,
                        old,
                        format!("{} {{", rewritten.trim_end()),
                    )],
                    0.90,
                    FixCategory::Pattern,
                ));
            }
            if !old.trim().ends_with('{') {
                return Some(Fix::new(
                    diagnostic.clone(),
                    "Add missing opening brace",
                    vec![LineEdit::replace(
                        diagnostic.line,
                        old,
                        format!("{} {{", old.trim_end()),
                    )],
                    0.80,
                    FixCategory::Automatic,
                ));
            }
        }

        if diagnostic.message.contains("'}' expected") {
            let indent = if diagnostic.line > 1 {
                line_at(lines, diagnostic.line - 1)
                    .and_then(|prev| INDENT_RE.find(prev))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            } else {
                String::new()
            };
            return Some(Fix::new(
                diagnostic.clone(),
                "Add missing closing brace",
                vec![LineEdit::insert(lines.len() + 1, format!("{indent}}}"))],
                0.75,
                FixCategory::Automatic,
            ));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use srcdoctor_types::Severity;

    fn diag(message: &str, line: usize) -> Diagnostic {
        Diagnostic {
            path: Utf8PathBuf::from("/repo/Foo.java"),
            line,
            column: None,
            severity: Severity::Error,
            message: message.to_string(),
            raw: String::new(),
        }
    }

    #[test]
    fn appends_opening_brace() {
        let lines = vec!["public class Foo".to_string()];
        let fix = BraceFixer.generate(&diag("'{' expected", 1), &lines).unwrap();
        assert_eq!(fix.edits[0].replacement, "public class Foo {");
        assert_eq!(fix.confidence, 0.80);
    }

    #[test]
    fn closing_brace_appends_at_end_with_indent() {
        let lines = vec![
            "public class Foo {".to_string(),
            "    int x = 5;".to_string(),
        ];
        let fix = BraceFixer.generate(&diag("'}' expected", 3), &lines).unwrap();
        let edit = &fix.edits[0];
        assert!(edit.is_insert());
        assert_eq!(edit.line, 3);
        assert_eq!(edit.replacement, "    }");
    }

    #[test]
    fn header_paren_variant_is_one_step() {
        let lines = vec!["class Foo()".to_string()];
        let fix = BraceFixer.generate(&diag("'{' expected", 1), &lines).unwrap();
        assert_eq!(fix.edits[0].replacement, "class Foo {");
        assert_eq!(fix.confidence, 0.90);
    }

    #[test]
    fn no_fix_for_illegal_start_alone() {
        let lines = vec!["int x = 5;".to_string()];
        assert!(
            BraceFixer
                .generate(&diag("illegal start of expression", 1), &lines)
                .is_none()
        );
    }
}
