//! Apply failure taxonomy.
//!
//! Callers must distinguish a drift conflict (fix discarded without any
//! mutation, non-fatal) from a revalidation failure (driver-level, fatal to
//! the run).

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    /// The diagnosed file no longer exists.
    #[error("file missing: {path}")]
    MissingFile { path: Utf8PathBuf },

    /// File content changed between diagnosis and apply; nothing was written.
    #[error("content drift at {path}:{line}; fix discarded")]
    Drift { path: Utf8PathBuf, line: usize },

    /// The post-edit recompilation itself could not be run (distinct from
    /// "still has errors"). The file has been restored.
    #[error("revalidation failed: {source}")]
    Revalidate {
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApplyError {
    /// Drift is the one non-fatal variant: the fix is simply stale.
    pub fn is_drift(&self) -> bool {
        matches!(self, ApplyError::Drift { .. })
    }
}
