//! Edit engine: applies one [`Fix`] to disk under the engine's core
//! correctness discipline.
//!
//! Every apply is snapshot → drift-guard → write → recompile-and-check →
//! commit or rollback. No edit is ever left in place unless a fresh compiler
//! run confirms it eliminated the exact diagnostic it targeted; anything
//! else is restored byte-for-byte from the backup.

mod error;

pub use error::ApplyError;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use fs_err as fs;
use srcdoctor_ledger::Ledger;
use srcdoctor_types::{Diagnostic, Fix, LedgerEntry, LineEdit};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Re-diagnosis seam: the orchestrator wires this to the compiler driver plus
/// the parser so the applicator can confirm a fix against fresh diagnostics.
pub trait Revalidate {
    fn diagnostics_for(&self, file: &Utf8Path) -> anyhow::Result<Vec<Diagnostic>>;
}

/// Outcome of one validated apply attempt.
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// True iff the target diagnostic vanished on recompilation.
    pub success: bool,
    /// Retained snapshot for audit/undo, kept even on success.
    pub backup: Utf8PathBuf,
}

pub struct Applicator {
    backup_dir: Utf8PathBuf,
}

impl Applicator {
    pub fn new(backup_dir: Utf8PathBuf) -> Self {
        Self { backup_dir }
    }

    /// Applies `fix`, revalidates, and records the attempt in `ledger`.
    ///
    /// A drift conflict aborts before any write and is NOT recorded: nothing
    /// was attempted against the file. Every apply that reached the compiler
    /// produces exactly one ledger entry, success or failure.
    pub fn apply(
        &self,
        fix: &Fix,
        revalidate: &dyn Revalidate,
        ledger: &Ledger,
        run_id: Uuid,
    ) -> Result<ApplyOutcome, ApplyError> {
        let path = &fix.diagnostic.path;
        if !path.exists() {
            return Err(ApplyError::MissingFile {
                path: path.clone(),
            });
        }

        let mut lines = read_lines(path)?;
        let backup = self.snapshot(path)?;

        apply_edits(&mut lines, &fix.edits, path)?;
        if let Err(e) = write_lines(path, &lines) {
            // A failed write can leave the file truncated; put the
            // snapshot back before surfacing the error.
            if let Err(undo) = restore(&backup, path) {
                warn!(error = %undo, "restore after failed write also failed");
            }
            return Err(e);
        }
        debug!(%path, edits = fix.edits.len(), "edits written, revalidating");

        let post = match revalidate.diagnostics_for(path) {
            Ok(post) => post,
            Err(source) => {
                // Driver-level failure: nothing was confirmed, undo the edit.
                restore(&backup, path)?;
                return Err(ApplyError::Revalidate { source });
            }
        };

        let success = !post.iter().any(|d| d.same_signature(&fix.diagnostic));
        let entry = LedgerEntry::new(
            run_id,
            path.as_str(),
            &fix.diagnostic.message,
            fix.category,
            fix.confidence,
            success,
        );
        if let Err(e) = ledger.append(&entry) {
            warn!(error = %e, "failed to record ledger entry");
        }

        if success {
            info!(%path, line = fix.diagnostic.line, "fix confirmed");
        } else {
            restore(&backup, path)?;
            info!(%path, line = fix.diagnostic.line, "fix did not clear diagnostic; reverted");
        }

        Ok(ApplyOutcome { success, backup })
    }

    /// Full copy of the file into the backup directory, named
    /// `<stem>_<timestamp><ext>`. Backups are retained after the run.
    fn snapshot(&self, path: &Utf8Path) -> Result<Utf8PathBuf, ApplyError> {
        fs::create_dir_all(&self.backup_dir)?;
        let stem = path.file_stem().unwrap_or("file");
        let ext = path
            .extension()
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let ts = Utc::now().format("%Y%m%d_%H%M%S");
        let backup = self.backup_dir.join(format!("{stem}_{ts}{ext}"));
        fs::copy(path, &backup)?;
        Ok(backup)
    }
}

/// Applies edits to the in-memory line buffer.
///
/// Edits are committed in descending target-line order so that insertions
/// and appends never invalidate the line numbers of edits still to come
/// within the same fix. The drift guard compares trimmed content; any
/// mismatch aborts the whole fix before a single byte reaches disk.
pub fn apply_edits(
    lines: &mut Vec<String>,
    edits: &[LineEdit],
    path: &Utf8Path,
) -> Result<(), ApplyError> {
    let mut ordered: Vec<&LineEdit> = edits.iter().collect();
    ordered.sort_by(|a, b| b.line.cmp(&a.line));

    for edit in ordered {
        if edit.is_insert() {
            if edit.line == 0 {
                lines.insert(0, edit.replacement.clone());
            } else if edit.line > lines.len() {
                lines.push(edit.replacement.clone());
            } else {
                lines.insert(edit.line - 1, edit.replacement.clone());
            }
            continue;
        }

        if edit.line == 0 || edit.line > lines.len() {
            return Err(ApplyError::Drift {
                path: path.to_path_buf(),
                line: edit.line,
            });
        }
        let current = &lines[edit.line - 1];
        if current.trim() != edit.expected.trim() {
            return Err(ApplyError::Drift {
                path: path.to_path_buf(),
                line: edit.line,
            });
        }
        lines[edit.line - 1] = edit.replacement.clone();
    }

    Ok(())
}

fn read_lines(path: &Utf8Path) -> Result<Vec<String>, ApplyError> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().map(str::to_string).collect())
}

fn write_lines(path: &Utf8Path, lines: &[String]) -> Result<(), ApplyError> {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

fn restore(backup: &Utf8Path, path: &Utf8Path) -> Result<(), ApplyError> {
    fs::copy(backup, path)?;
    Ok(())
}
