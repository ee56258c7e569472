use crate::context::{is_method_or_class_header, line_at};
use crate::registry::Fixer;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};

/// Inserts a missing `;`, preferring the compiler's caret column.
///
/// A caret-anchored insertion scores 0.95; without a usable column the
/// strategy falls back to appending at end of line at 0.90.
pub struct MissingSemicolonFixer;

impl Fixer for MissingSemicolonFixer {
    fn name(&self) -> &'static str {
        "missing-semicolon"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("';' expected")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        if is_method_or_class_header(old) {
            return None;
        }
        if old.trim().ends_with(';') {
            return None;
        }

        if let Some(col) = diagnostic.column {
            let pos = col - 1;
            let bytes = old.as_bytes();
            if pos < bytes.len()
                && old.is_char_boundary(pos)
                && bytes[pos] != b' '
                && bytes[pos] != b';'
            {
                let new = format!("{}{}{}", &old[..pos], ';', &old[pos..]);
                return Some(Fix::new(
                    diagnostic.clone(),
                    "Add missing semicolon at position",
                    vec![LineEdit::replace(diagnostic.line, old, new)],
                    0.95,
                    FixCategory::Position,
                ));
            }
        }

        Some(Fix::new(
            diagnostic.clone(),
            "Add missing semicolon",
            vec![LineEdit::replace(
                diagnostic.line,
                old,
                format!("{};", old.trim_end()),
            )],
            0.90,
            FixCategory::Automatic,
        ))
    }
}
