use crate::context::line_at;
use crate::registry::Fixer;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};

/// Closes an unterminated string literal by appending the missing `"`.
pub struct UnclosedStringFixer;

impl Fixer for UnclosedStringFixer {
    fn name(&self) -> &'static str {
        "unclosed-string"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("unclosed string literal")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        let quotes = old.matches('"').count();
        if quotes % 2 == 1 && !old.trim().ends_with('"') {
            return Some(Fix::new(
                diagnostic.clone(),
                "Close unclosed string",
                vec![LineEdit::replace(
                    diagnostic.line,
                    old,
                    format!("{}\"", old.trim_end()),
                )],
                0.75,
                FixCategory::Automatic,
            ));
        }
        None
    }
}

/// Balances an odd number of single quotes on a character-literal line.
pub struct MismatchedQuoteFixer;

impl Fixer for MismatchedQuoteFixer {
    fn name(&self) -> &'static str {
        "mismatched-quotes"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("unclosed character literal")
            || diagnostic.message.contains("empty character literal")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        if old.matches('\'').count() % 2 == 1 {
            return Some(Fix::new(
                diagnostic.clone(),
                "Fix mismatched single quotes",
                vec![LineEdit::replace(diagnostic.line, old, format!("{old}'"))],
                0.70,
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
    fn closes_dangling_string() {
        let lines = vec![r#"String s = "hello;"#.to_string()];
        let fix = UnclosedStringFixer
            .generate(&diag("unclosed string literal"), &lines)
            .unwrap();
        assert_eq!(fix.edits[0].replacement, r#"String s = "hello;""#);
    }

    #[test]
    fn declines_balanced_string_line() {
        let lines = vec![r#"String s = "ok";"#.to_string()];
        assert!(
            UnclosedStringFixer
                .generate(&diag("unclosed string literal"), &lines)
                .is_none()
        );
    }

    #[test]
    fn balances_odd_single_quote() {
        let lines = vec!["char c = 'a;".to_string()];
        let fix = MismatchedQuoteFixer
            .generate(&diag("unclosed character literal"), &lines)
            .unwrap();
        assert_eq!(fix.edits[0].replacement, "char c = 'a;'");
        assert_eq!(fix.confidence, 0.70);
    }

    #[test]
    fn declines_even_single_quotes() {
        let lines = vec!["char c = 'a';".to_string()];
        assert!(
            MismatchedQuoteFixer
                .generate(&diag("empty character literal"), &lines)
                .is_none()
        );
    }
}
