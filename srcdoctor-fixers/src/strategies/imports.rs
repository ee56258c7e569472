use crate::registry::Fixer;
use camino::Utf8PathBuf;
use regex::Regex;
use srcdoctor_types::{Diagnostic, Fix, FixCategory, LineEdit};
use std::sync::LazyLock;
use tracing::debug;

static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"symbol:\s+(?:class|variable)\s+(\w+)").expect("symbol regex"));

/// Common library symbols and their fully-qualified names. Checked before the
/// slower project-tree search.
const COMMON_IMPORTS: &[(&str, &str)] = &[
    ("ArrayList", "java.util.ArrayList"),
    ("BorderFactory", "javax.swing.BorderFactory"),
    ("Collectors", "java.util.stream.Collectors"),
    ("Color", "java.awt.Color"),
    ("CompoundBorder", "javax.swing.border.CompoundBorder"),
    ("DefaultTableModel", "javax.swing.table.DefaultTableModel"),
    ("EmptyBorder", "javax.swing.border.EmptyBorder"),
    ("Files", "java.nio.file.Files"),
    ("Font", "java.awt.Font"),
    ("GradientPaint", "java.awt.GradientPaint"),
    ("HashMap", "java.util.HashMap"),
    ("HashSet", "java.util.HashSet"),
    ("JButton", "javax.swing.JButton"),
    ("JLabel", "javax.swing.JLabel"),
    ("JOptionPane", "javax.swing.JOptionPane"),
    ("JPanel", "javax.swing.JPanel"),
    ("JScrollPane", "javax.swing.JScrollPane"),
    ("JTable", "javax.swing.JTable"),
    ("List", "java.util.List"),
    ("LocalDate", "java.time.LocalDate"),
    ("LocalDateTime", "java.time.LocalDateTime"),
    ("Logger", "org.slf4j.Logger"),
    ("LoggerFactory", "org.slf4j.LoggerFactory"),
    ("Map", "java.util.Map"),
    ("MouseAdapter", "java.awt.event.MouseAdapter"),
    ("Optional", "java.util.Optional"),
    ("Path", "java.nio.file.Path"),
    ("RenderingHints", "java.awt.RenderingHints"),
    ("Set", "java.util.Set"),
    ("Stream", "java.util.stream.Stream"),
    ("Timestamp", "java.sql.Timestamp"),
    ("UIManager", "javax.swing.UIManager"),
    ("UUID", "java.util.UUID"),
];

/// Resolves an unqualified symbol to an import statement.
///
/// Lookup order: the static common-library table, then a file-system search
/// for `<Symbol>.java` under the project source tree (the package is derived
/// from the file's directory path). Declines when the symbol is unknown or
/// the import already exists.
pub struct MissingImportFixer {
    src_dir: Utf8PathBuf,
}

impl MissingImportFixer {
    pub fn new(src_dir: Utf8PathBuf) -> Self {
        Self { src_dir }
    }

    fn resolve(&self, symbol: &str) -> Option<String> {
        if let Some((_, fq)) = COMMON_IMPORTS.iter().find(|(s, _)| *s == symbol) {
            return Some((*fq).to_string());
        }
        self.search_project(symbol)
    }

    fn search_project(&self, symbol: &str) -> Option<String> {
        let pattern = self.src_dir.join("**").join(format!("{symbol}.java"));
        let paths = glob::glob(pattern.as_str()).ok()?;
        for entry in paths.flatten() {
            let found = Utf8PathBuf::from_path_buf(entry).ok()?;
            let rel = found.strip_prefix(&self.src_dir).ok()?;
            let pkg = rel
                .parent()
                .map(|p| p.as_str().replace('/', "."))
                .unwrap_or_default();
            debug!(%found, %pkg, "resolved symbol from project tree");
            return Some(if pkg.is_empty() {
                symbol.to_string()
            } else {
                format!("{pkg}.{symbol}")
            });
        }
        None
    }
}

impl Fixer for MissingImportFixer {
    fn name(&self) -> &'static str {
        "missing-import"
    }

    fn can_fix(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.message.contains("cannot find symbol")
    }

    fn generate(&self, diagnostic: &Diagnostic, lines: &[String]) -> Option<Fix> {
        let symbol = SYMBOL_RE
            .captures(&diagnostic.raw)
            .map(|c| c[1].to_string())?;
        let fq = self.resolve(&symbol)?;
        let import_stmt = format!("import {fq};");

        let mut package_line = 0;
        let mut last_import = 0;
        for (i, line) in lines.iter().enumerate() {
            let t = line.trim();
            if t.starts_with("package ") {
                package_line = i + 1;
            }
            if t.starts_with("import ") {
                last_import = i + 1;
                if t == import_stmt {
                    return None;
                }
            }
        }

        // Directly after the last import, else after the package declaration,
        // else at the very top of the file.
        let anchor = if last_import > 0 { last_import } else { package_line };
        let insert_at = if anchor > 0 { anchor + 1 } else { 0 };

        Some(Fix::new(
            diagnostic.clone(),
            format!("Add import for {symbol}"),
            vec![LineEdit::insert(insert_at, import_stmt)],
            0.85,
            FixCategory::Automatic,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use fs_err as fs;
    use srcdoctor_types::Severity;

    fn fixer() -> MissingImportFixer {
        MissingImportFixer::new(Utf8PathBuf::from("/nonexistent-src"))
    }

    fn diag(symbol: &str) -> Diagnostic {
        Diagnostic {
            path: Utf8PathBuf::from("/repo/Foo.java"),
            line: 10,
            column: None,
            severity: Severity::Error,
            message: format!("cannot find symbol: class {symbol}"),
            raw: format!(
                "Foo.java:10: error: cannot find symbol\n  symbol:   class {symbol}\n  location: class Foo"
            ),
        }
    }

    fn src(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn inserts_after_last_import() {
        let lines = src(&[
            "package com.app;",
            "",
            "import java.util.Map;",
            "",
            "public class Foo {}",
        ]);
        let fix = fixer().generate(&diag("List"), &lines).unwrap();
        let edit = &fix.edits[0];
        assert!(edit.is_insert());
        assert_eq!(edit.line, 4);
        assert_eq!(edit.replacement, "import java.util.List;");
    }

    #[test]
    fn inserts_after_package_when_no_imports() {
        let lines = src(&["package com.app;", "", "public class Foo {}"]);
        let fix = fixer().generate(&diag("List"), &lines).unwrap();
        assert_eq!(fix.edits[0].line, 2);
    }

    #[test]
    fn inserts_at_top_without_package() {
        let lines = src(&["public class Foo {}"]);
        let fix = fixer().generate(&diag("List"), &lines).unwrap();
        assert_eq!(fix.edits[0].line, 0);
    }

    #[test]
    fn refuses_duplicate_import() {
        let lines = src(&[
            "package com.app;",
            "import java.util.List;",
            "public class Foo {}",
        ]);
        assert!(fixer().generate(&diag("List"), &lines).is_none());
    }

    #[test]
    fn declines_unknown_symbol() {
        let lines = src(&["public class Foo {}"]);
        assert!(fixer().generate(&diag("FrobnicatorXyz"), &lines).is_none());
    }

    #[test]
    fn declines_when_raw_has_no_symbol_block() {
        let mut d = diag("List");
        d.raw = "Foo.java:10: error: cannot find symbol".to_string();
        assert!(fixer().generate(&d, &src(&["x"])).is_none());
    }

    #[test]
    fn resolves_project_symbol_from_tree_and_derives_package() {
        let td = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(td.path()).unwrap().to_path_buf();
        fs::create_dir_all(root.join("com/app/model")).unwrap();
        fs::write(root.join("com/app/model/Account.java"), "public class Account {}").unwrap();

        let fixer = MissingImportFixer::new(root);
        let lines = src(&["package com.app.gui;", "public class Panel {}"]);
        let fix = fixer.generate(&diag("Account"), &lines).unwrap();
        assert_eq!(fix.edits[0].replacement, "import com.app.model.Account;");
    }
}
