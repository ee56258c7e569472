use crate::diagnostic::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How mechanically a fix was derived.
///
/// - `Position`: anchored at a caret column reported by the compiler.
/// - `Pattern`: a regex rewrite of the diagnosed line.
/// - `Automatic`: a whole-line heuristic (append/strip at line granularity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixCategory {
    Position,
    Pattern,
    Automatic,
}

impl fmt::Display for FixCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FixCategory::Position => "position",
            FixCategory::Pattern => "pattern",
            FixCategory::Automatic => "automatic",
        };
        f.write_str(s)
    }
}

/// One line-level edit inside a [`Fix`].
///
/// Semantics of `line`:
/// - `0` inserts `replacement` before the first line,
/// - `1..=len` replaces that line,
/// - `> len` appends after the last line.
///
/// A non-empty `expected` is the drift guard: the applicator compares it
/// (trimmed) against the current line content and refuses to write when they
/// no longer match. Insertions carry an empty `expected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEdit {
    pub line: usize,
    pub expected: String,
    pub replacement: String,
}

impl LineEdit {
    pub fn replace(line: usize, expected: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            line,
            expected: expected.into(),
            replacement: replacement.into(),
        }
    }

    pub fn insert(line: usize, replacement: impl Into<String>) -> Self {
        Self {
            line,
            expected: String::new(),
            replacement: replacement.into(),
        }
    }

    pub fn is_insert(&self) -> bool {
        self.expected.is_empty()
    }
}

/// A concrete, disposable repair proposal for one diagnostic.
///
/// Computed against one specific snapshot of file content; if that content
/// changes before the fix is applied, the drift guard invalidates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub diagnostic: Diagnostic,
    pub description: String,
    pub edits: Vec<LineEdit>,
    /// Strategy-specific constant in `[0, 1]`.
    pub confidence: f64,
    pub category: FixCategory,
}

impl Fix {
    pub fn new(
        diagnostic: Diagnostic,
        description: impl Into<String>,
        edits: Vec<LineEdit>,
        confidence: f64,
        category: FixCategory,
    ) -> Self {
        Self {
            diagnostic,
            description: description.into(),
            edits,
            confidence,
            category,
        }
    }
}
