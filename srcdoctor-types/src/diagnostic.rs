use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Severity of a compiler diagnostic.
///
/// Only `Error` triggers fixer matching by default; warnings are parsed so
/// diagnose/report output can show them, but the repair loop skips them
/// unless explicitly asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

/// One structured compiler diagnostic.
///
/// Produced fresh on every compiler invocation and never cached across
/// iterations: line/column offsets go stale the moment any edit shifts line
/// numbers.
///
/// `column` is `None` when the compiler output carried no caret marker. That
/// state is deliberate: position-anchored fixers must not pretend they know
/// column 1 when they do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: Utf8PathBuf,
    /// 1-based source line.
    pub line: usize,
    /// 1-based column from the caret marker, if one was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub severity: Severity,
    pub message: String,
    /// The raw multi-line block this diagnostic was derived from.
    pub raw: String,
}

impl Diagnostic {
    /// Two diagnostics describe the same problem iff file, line, and message
    /// all match. Used to decide whether an applied fix actually resolved the
    /// diagnosed error on recompilation.
    pub fn same_signature(&self, other: &Diagnostic) -> bool {
        self.path == other.path && self.line == other.line && self.message == other.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(line: usize, message: &str) -> Diagnostic {
        Diagnostic {
            path: Utf8PathBuf::from("/p/Foo.java"),
            line,
            column: Some(3),
            severity: Severity::Error,
            message: message.to_string(),
            raw: String::new(),
        }
    }

    #[test]
    fn signature_ignores_column_and_raw() {
        let a = diag(4, "';' expected");
        let mut b = diag(4, "';' expected");
        b.column = None;
        b.raw = "something else".to_string();
        assert!(a.same_signature(&b));
    }

    #[test]
    fn signature_distinguishes_line_and_message() {
        let a = diag(4, "';' expected");
        assert!(!a.same_signature(&diag(5, "';' expected")));
        assert!(!a.same_signature(&diag(4, "'{' expected")));
    }
}
