use camino::{Utf8Path, Utf8PathBuf};

/// Tunables for a repair run. Everything the pipeline needs to know about a
/// repository lives here; frontends build one from flags and config.
#[derive(Debug, Clone)]
pub struct DoctorSettings {
    pub repo_root: Utf8PathBuf,
    /// Java source tree root, Maven-style by default.
    pub src_dir: Utf8PathBuf,
    /// Where pre-apply snapshots are kept.
    pub backup_dir: Utf8PathBuf,
    /// Append-only JSONL fix history.
    pub ledger_path: Utf8PathBuf,
    /// Minimum confidence for unattended application.
    pub confidence_threshold: f64,
    /// Bound on compile-fix-recompile rounds per run.
    pub max_iterations: usize,
    /// Per-invocation compiler wall-clock budget, seconds.
    pub compile_timeout_secs: u64,
    /// Treat `javac` warnings as repair candidates too.
    pub include_warnings: bool,
    /// Quiet period before watch mode reacts to a burst of file events.
    pub debounce_ms: u64,
    /// How many recent ledger entries the report shows.
    pub report_limit: usize,
}

impl DoctorSettings {
    /// Defaults anchored at `repo_root`, with all scratch state kept under
    /// `target/` so it never pollutes the source tree.
    pub fn for_repo(repo_root: impl Into<Utf8PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let src_dir = repo_root.join("src").join("main").join("java");
        let state = repo_root.join("target").join("srcdoctor");
        Self {
            src_dir,
            backup_dir: state.join("backups"),
            ledger_path: state.join("ledger.jsonl"),
            repo_root,
            confidence_threshold: 0.80,
            max_iterations: 20,
            compile_timeout_secs: 120,
            include_warnings: false,
            debounce_ms: 500,
            report_limit: 10,
        }
    }

    pub fn repo_root(&self) -> &Utf8Path {
        &self.repo_root
    }
}

impl Default for DoctorSettings {
    fn default() -> Self {
        Self::for_repo(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_anchor_state_under_target() {
        let s = DoctorSettings::for_repo("/work/proj");
        assert_eq!(s.src_dir, Utf8PathBuf::from("/work/proj/src/main/java"));
        assert_eq!(
            s.ledger_path,
            Utf8PathBuf::from("/work/proj/target/srcdoctor/ledger.jsonl")
        );
        assert_eq!(
            s.backup_dir,
            Utf8PathBuf::from("/work/proj/target/srcdoctor/backups")
        );
        assert_eq!(s.confidence_threshold, 0.80);
        assert_eq!(s.max_iterations, 20);
    }
}
