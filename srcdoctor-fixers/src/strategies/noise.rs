use crate::context::line_at;
use crate::registry::Fixer;
use regex::Regex;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};
use std::sync::LazyLock;

static CLOSER_NOISE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\)\};\s]+$").expect("closer noise regex"));

/// Blanks out lines that consist solely of stray closers (`)`, `}`, `;`) or a
/// dangling `*/` comment terminator.
pub struct NoiseLineFixer;

impl Fixer for NoiseLineFixer {
    fn name(&self) -> &'static str {
        "noise-line"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        let m = &diagnostic.message;
        m.contains("illegal start")
            || m.contains("class, interface, enum")
            || m.contains("not a statement")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        let trimmed = old.trim();

        if !trimmed.is_empty() && CLOSER_NOISE_RE.is_match(trimmed) {
            return Some(Fix::new(
                diagnostic.clone(),
                "Remove stray close parens/braces/semicolon line",
                vec![LineEdit::replace(diagnostic.line, old, "")],
                0.80,
                FixCategory::Pattern,
            ));
        }

        if trimmed == "*/" {
            return Some(Fix::new(
                diagnostic.clone(),
                "Remove stray comment closer",
                vec![LineEdit::replace(diagnostic.line, old, "")],
                0.80,
                FixCategory::Pattern,
            ));
        }

        None
    }
}
