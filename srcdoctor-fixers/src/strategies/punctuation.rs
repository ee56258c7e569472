use crate::context::line_at;
use crate::registry::Fixer;
use regex::Regex;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};
use std::sync::LazyLock;

static DOUBLE_SEMI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s*;").expect("double semicolon regex"));

static NEXT_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\w").expect("next arg regex"));

/// Removes duplicated punctuation (`;;`, trailing `;,`, or a stray character
/// at the caret position) behind "illegal start" / "not a statement"
/// diagnostics.
pub struct ExtraPunctuationFixer;

impl Fixer for ExtraPunctuationFixer {
    fn name(&self) -> &'static str {
        "extra-punctuation"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("illegal start of expression")
            || diagnostic.message.contains("not a statement")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;

        if old.trim_end().ends_with(";,") || DOUBLE_SEMI_RE.is_match(old) {
            let mut new = DOUBLE_SEMI_RE.replace_all(old, ";").into_owned();
            if new.trim_end().ends_with(";,") {
                let cut = new.trim_end().len() - 2;
                new.truncate(cut);
            }
            return Some(Fix::new(
                diagnostic.clone(),
                "Remove extra semicolon or comma",
                vec![LineEdit::replace(diagnostic.line, old, new)],
                0.85,
                FixCategory::Pattern,
            ));
        }

        if let Some(col) = diagnostic.column {
            let pos = col - 1;
            let bytes = old.as_bytes();
            if pos < bytes.len() && matches!(bytes[pos], b';' | b',' | b')') {
                let new = format!("{}{}", &old[..pos], &old[pos + 1..]);
                return Some(Fix::new(
                    diagnostic.clone(),
                    "Remove extra punctuation at position",
                    vec![LineEdit::replace(diagnostic.line, old, new)],
                    0.88,
                    FixCategory::Position,
                ));
            }
        }

        None
    }
}

/// Inserts the `)` or `,` javac asked for, anchored at the caret column.
/// Declines entirely when the column is unknown; there is no safe whole-line
/// fallback for this message shape.
pub struct ParenOrCommaFixer;

impl Fixer for ParenOrCommaFixer {
    fn name(&self) -> &'static str {
        "paren-or-comma"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("')' or ',' expected")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        let col = diagnostic.column?;
        let pos = (col - 1).min(old.len());
        if !old.is_char_boundary(pos) {
            return None;
        }

        let at_closer = pos == old.len()
            || matches!(old.as_bytes()[pos], b';' | b' ' | b')' | b'}' | b']');
        if at_closer {
            let new = format!("{}){}", &old[..pos], &old[pos..]);
            return Some(Fix::new(
                diagnostic.clone(),
                "Add missing closing parenthesis at position",
                vec![LineEdit::replace(diagnostic.line, old, new)],
                0.95,
                FixCategory::Position,
            ));
        }

        if NEXT_ARG_RE.is_match(&old[pos..]) {
            let new = format!("{},{}", &old[..pos], &old[pos..]);
            return Some(Fix::new(
                diagnostic.clone(),
                "Add missing comma in arguments at position",
                vec![LineEdit::replace(diagnostic.line, old, new)],
                0.80,
                FixCategory::Position,
            ));
        }

        None
    }
}
