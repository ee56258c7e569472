use crate::context::line_at;
use crate::registry::Fixer;
use regex::Regex;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};
use std::sync::LazyLock;

static HEADER_PARENS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\b(?:class|interface|enum|record)\s+[A-Za-z_]\w*)\s*\(\s*\)")
        .expect("header parens regex")
});

static EMPTY_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)").expect("empty parens regex"));

static TYPE_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(class|interface|enum|record)\b").expect("type decl regex"));

/// Rewrites `class Foo()` to `class Foo {`.
///
/// Registered before the generic brace strategy so the specific header repair
/// wins for the same message shape.
pub struct ClassHeaderParenFixer;

impl Fixer for ClassHeaderParenFixer {
    fn name(&self) -> &'static str {
        "class-header-paren"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("'{' expected")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let old = line_at(lines, diagnostic.line)?;
        if !TYPE_DECL_RE.is_match(old) || !EMPTY_PARENS_RE.is_match(old) {
            return None;
        }

        let mut new = HEADER_PARENS_RE.replace(old, "$1").into_owned();
        if !new.trim().ends_with('{') {
            new = format!("{} {{", new.trim_end());
        }

        Some(Fix::new(
            diagnostic.clone(),
            "Fix class header () and add {",
            vec![LineEdit::replace(diagnostic.line, old, new)],
            0.92,
            FixCategory::Pattern,
        ))
    }
}
