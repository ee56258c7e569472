//! Append-only record of every apply-and-validate attempt.
//!
//! One JSON document per line. Rows are never updated or deleted; the schema
//! is additive-only (see `srcdoctor_types::ledger`). This file is the
//! engine's only state that outlives a process run.
//!
//! Writes are serialized through a mutex (single writer at a time); reading
//! for reports opens the file independently and may happen concurrently.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use srcdoctor_types::LedgerEntry;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

pub struct Ledger {
    path: Utf8PathBuf,
    writer: Mutex<fs::File>,
}

impl Ledger {
    /// Opens (creating if needed) the ledger at `path` in append mode.
    pub fn open(path: impl Into<Utf8PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open ledger {path}"))?;
        Ok(Self {
            path,
            writer: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Appends one entry. Poisoned-lock recovery is deliberate: a panicked
    /// writer cannot corrupt a line-oriented append file.
    pub fn append(&self, entry: &LedgerEntry) -> anyhow::Result<()> {
        let line = serde_json::to_string(entry).context("serialize ledger entry")?;
        let mut file = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(file, "{line}").with_context(|| format!("append to {}", self.path))?;
        Ok(())
    }

    /// All entries in append order. Malformed lines are skipped with a
    /// warning; a partially torn last line must never poison reporting.
    pub fn read_all(&self) -> anyhow::Result<Vec<LedgerEntry>> {
        read_entries(&self.path)
    }

    /// The most recent `n` entries, newest first.
    pub fn recent(&self, n: usize) -> anyhow::Result<Vec<LedgerEntry>> {
        let mut all = self.read_all()?;
        all.reverse();
        all.truncate(n);
        Ok(all)
    }
}

/// Read-only access for report mode; does not require an open writer.
pub fn read_entries(path: &Utf8Path) -> anyhow::Result<Vec<LedgerEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).with_context(|| format!("read ledger {path}"))?;

    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<LedgerEntry>(line) {
            Ok(entry) => out.push(entry),
            Err(e) => warn!(line_no = i + 1, error = %e, "skipping malformed ledger line"),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use srcdoctor_types::FixCategory;
    use uuid::Uuid;

    fn entry(run_id: Uuid, message: &str, success: bool) -> LedgerEntry {
        LedgerEntry::new(
            run_id,
            "/repo/Foo.java",
            message,
            FixCategory::Automatic,
            0.9,
            success,
        )
    }

    fn temp_ledger() -> (tempfile::TempDir, Ledger) {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("srcdoctor/ledger.jsonl")).unwrap();
        let ledger = Ledger::open(path).unwrap();
        (td, ledger)
    }

    #[test]
    fn append_then_read_roundtrips_in_order() {
        let (_td, ledger) = temp_ledger();
        let run = Uuid::new_v4();
        ledger.append(&entry(run, "';' expected", true)).unwrap();
        ledger.append(&entry(run, "'{' expected", false)).unwrap();

        let all = ledger.read_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].message, "';' expected");
        assert_eq!(all[1].message, "'{' expected");
        assert!(all[0].success);
        assert!(!all[1].success);
    }

    #[test]
    fn recent_returns_newest_first() {
        let (_td, ledger) = temp_ledger();
        let run = Uuid::new_v4();
        for i in 0..5 {
            ledger.append(&entry(run, &format!("m{i}"), true)).unwrap();
        }
        let recent = ledger.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "m4");
        assert_eq!(recent[1].message, "m3");
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let (_td, ledger) = temp_ledger();
        let run = Uuid::new_v4();
        ledger.append(&entry(run, "good", true)).unwrap();
        {
            let mut f = ledger.writer.lock().unwrap();
            writeln!(f, "{{not json").unwrap();
        }
        ledger.append(&entry(run, "also good", true)).unwrap();

        let all = ledger.read_all().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("absent.jsonl")).unwrap();
        assert!(read_entries(&path).unwrap().is_empty());
    }

    #[test]
    fn reopening_appends_rather_than_truncates() {
        let td = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(td.path().join("ledger.jsonl")).unwrap();
        let run = Uuid::new_v4();

        let first = Ledger::open(path.clone()).unwrap();
        first.append(&entry(run, "first run", true)).unwrap();
        drop(first);

        let second = Ledger::open(path).unwrap();
        second.append(&entry(run, "second run", false)).unwrap();

        assert_eq!(second.read_all().unwrap().len(), 2);
    }
}
