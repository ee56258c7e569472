use crate::strategies;
use camino::Utf8PathBuf;
use srcdoctor_types::{Diagnostic, Fix};
use tracing::debug;

/// A named fix strategy.
///
/// `can_fix` is a cheap predicate over the diagnostic's message text;
/// `generate` inspects the diagnosed line (or file-wide context for import
/// resolution) and either proposes a concrete [`Fix`] or declines.
pub trait Fixer {
    fn name(&self) -> &'static str;

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool;

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix>;
}

/// Fixed, ordered collection of strategies.
///
/// Order matters: more specific strategies are registered before generic ones
/// that match the same message shape, and the first produced fix wins.
pub struct Registry {
    fixers: Vec<Box<dyn Fixer>>,
}

impl Registry {
    pub fn new(fixers: Vec<Box<dyn Fixer>>) -> Self {
        Self { fixers }
    }

    pub fn builtin(src_dir: Utf8PathBuf) -> Self {
        Self::new(builtin_fixers(src_dir))
    }

    /// First matching strategy's fix against the given file snapshot, or
    /// `None` when no strategy can repair this diagnostic.
    pub fn find_fix(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        for fixer in &self.fixers {
            if !fixer.can_fix(diagnostic) {
                continue;
            }
            if let Some(fix) = fixer.generate(diagnostic, lines) {
                debug!(fixer = fixer.name(), confidence = fix.confidence, "fix proposed");
                return Some(fix);
            }
        }
        None
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fixers.iter().map(|f| f.name()).collect()
    }
}

/// The builtin strategy set in registration order.
///
/// `src_dir` is the source tree the import fixer searches when a symbol is
/// not in its common-library table.
pub fn builtin_fixers(src_dir: Utf8PathBuf) -> Vec<Box<dyn Fixer>> {
    vec![
        Box::new(strategies::class_header::ClassHeaderParenFixer),
        Box::new(strategies::throws::ThrowsParenFixer),
        Box::new(strategies::semicolon::MissingSemicolonFixer),
        Box::new(strategies::braces::BraceFixer),
        Box::new(strategies::imports::MissingImportFixer::new(src_dir)),
        Box::new(strategies::strings::UnclosedStringFixer),
        Box::new(strategies::noise::NoiseLineFixer),
        Box::new(strategies::punctuation::ExtraPunctuationFixer),
        Box::new(strategies::strings::MismatchedQuoteFixer),
        Box::new(strategies::punctuation::ParenOrCommaFixer),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use srcdoctor_types::Severity;

    fn diag(message: &str, line: usize, column: Option<usize>) -> Diagnostic {
        Diagnostic {
            path: Utf8PathBuf::from("/repo/src/Foo.java"),
            line,
            column,
            severity: Severity::Error,
            message: message.to_string(),
            raw: message.to_string(),
        }
    }

    fn registry() -> Registry {
        Registry::builtin(Utf8PathBuf::from("/nonexistent-src"))
    }

    #[test]
    fn builtin_order_is_specific_before_generic() {
        let names = registry().names();
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
        // The class-header rewrite must win over the generic brace appender
        // for the same "'{' expected" message.
        assert!(pos("class-header-paren") < pos("braces"));
        assert!(pos("throws-paren") < pos("missing-semicolon"));
        assert!(pos("noise-line") < pos("extra-punctuation"));
    }

    #[test]
    fn class_header_beats_generic_brace_fix() {
        let lines = vec!["public class Foo() {".to_string()];
        let d = diag("'{' expected", 1, None);
        let fix = registry().find_fix(&d, &lines).unwrap();
        assert_eq!(fix.edits[0].replacement, "public class Foo {");
    }

    #[test]
    fn unmatched_message_yields_none() {
        let lines = vec!["int x = 5;".to_string()];
        let d = diag("incompatible types: String cannot be converted to int", 1, None);
        assert!(registry().find_fix(&d, &lines).is_none());
    }

    #[test]
    fn declining_fixer_falls_through_to_next() {
        // ThrowsParenFixer matches "';' expected" but declines on a line with
        // no throws clause; the semicolon fixer then produces the fix.
        let lines = vec!["int x = 5".to_string()];
        let d = diag("';' expected", 1, None);
        let fix = registry().find_fix(&d, &lines).unwrap();
        assert_eq!(fix.edits[0].replacement, "int x = 5;");
    }
}
