use crate::context::line_at;
use crate::registry::Fixer;
use regex::Regex;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};
use std::sync::LazyLock;

static THROWS_PARENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(throws\s+[A-Za-z_][A-Za-z0-9_.]*)\s*\(\s*\)").expect("throws parens regex")
});

/// Removes stray `()` after an exception type in a throws clause:
/// `throws IOException()` becomes `throws IOException`.
pub struct ThrowsParenFixer;

impl Fixer for ThrowsParenFixer {
    fn name(&self) -> &'static str {
        "throws-paren"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        let m = &diagnostic.message;
        m.contains("';' expected") || m.contains("')' expected") || m.contains("illegal start")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        if !old.contains("throws") || !THROWS_PARENS_RE.is_match(old) {
            return None;
        }

        let new = THROWS_PARENS_RE.replace(old, "$1").into_owned();
        Some(Fix::new(
            diagnostic.clone(),
            "Remove () after exception in throws",
            vec![LineEdit::replace(diagnostic.line, old, new)],
            0.90,
            FixCategory::Pattern,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use srcdoctor_types::Severity;

    fn diag(message: &str) -> Diagnostic {
        Diagnostic {
            path: Utf8PathBuf::from("/repo/Foo.java"),
            line: 1,
            column: None,
            severity: Severity::Error,
            message: message.to_string(),
            raw: String::new(),
        }
    }

    #[test]
    fn strips_parens_from_throws_clause() {
        let lines = vec!["public void load() throws java.io.IOException() {".to_string()];
        let fix = ThrowsParenFixer.generate(&diag("';' expected"), &lines).unwrap();
        assert_eq!(
            fix.edits[0].replacement,
            "public void load() throws java.io.IOException {"
        );
    }

    #[test]
    fn declines_on_well_formed_throws() {
        let lines = vec!["void f() throws IOException {".to_string()];
        assert!(ThrowsParenFixer.generate(&diag("';' expected"), &lines).is_none());
    }

    #[test]
    fn matches_illegal_start_messages_too() {
        let lines = vec!["void f() throws SQLException()".to_string()];
        let fix = ThrowsParenFixer
            .generate(&diag("illegal start of type"), &lines)
            .unwrap();
        assert_eq!(fix.edits[0].replacement, "void f() throws SQLException");
    }
}
