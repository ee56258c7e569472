//! Shared line-shape predicates used by multiple strategies.

use regex::Regex;
use std::sync::LazyLock;

static TYPE_DECL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(class|interface|enum|record)\b").expect("type decl regex"));

/// True when the line is a structural header (class/method declaration) that
/// no line-local strategy may safely patch. The semicolon fixer in particular
/// must decline here: appending `;` to a method signature corrupts syntax it
/// cannot repair.
pub fn is_method_or_class_header(line: &str) -> bool {
    let t = line.trim();
    if t.ends_with('{') {
        return true;
    }
    let has_modifier = ["public", "private", "protected", "static", "final", "abstract"]
        .iter()
        .any(|m| t.starts_with(m));
    if has_modifier
        && t.contains('(')
        && (t.ends_with(')') || t.ends_with("){") || t.ends_with(") {"))
    {
        return true;
    }
    // Malformed class-like header carrying parentheses.
    TYPE_DECL_RE.is_match(t) && t.contains('(')
}

/// 1-based line lookup.
pub fn line_at(lines: &[String], line: usize) -> Option<&str> {
    if line == 0 || line > lines.len() {
        return None;
    }
    Some(lines[line - 1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_terminated_lines_are_headers() {
        assert!(is_method_or_class_header("public class Foo {"));
        assert!(is_method_or_class_header("    if (x) {"));
    }

    #[test]
    fn method_signatures_are_headers() {
        assert!(is_method_or_class_header("public void run(String arg)"));
        assert!(is_method_or_class_header("private static int add(int a, int b) {"));
    }

    #[test]
    fn malformed_class_header_with_parens_is_a_header() {
        assert!(is_method_or_class_header("class Foo()"));
    }

    #[test]
    fn plain_statements_are_not_headers() {
        assert!(!is_method_or_class_header("int x = 5"));
        assert!(!is_method_or_class_header("return value;"));
    }

    #[test]
    fn line_at_is_one_based_and_bounds_checked() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(line_at(&lines, 1), Some("a"));
        assert_eq!(line_at(&lines, 2), Some("b"));
        assert_eq!(line_at(&lines, 0), None);
        assert_eq!(line_at(&lines, 3), None);
    }
}
