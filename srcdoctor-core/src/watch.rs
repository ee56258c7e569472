//! Watch mode: debounce filesystem events over the source tree and run the
//! single-file repair path on each settled `.java` change.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use camino::Utf8PathBuf;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::pipeline::Doctor;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Coalesces a burst of save events into one batch per quiet period. Every
/// new event pushes the deadline out, so a file being written in several
/// chunks is repaired once, after the editor goes quiet.
struct Debouncer {
    quiet: Duration,
    pending: BTreeSet<Utf8PathBuf>,
    deadline: Option<Instant>,
}

impl Debouncer {
    fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: BTreeSet::new(),
            deadline: None,
        }
    }

    fn note(&mut self, path: Utf8PathBuf, now: Instant) {
        self.pending.insert(path);
        self.deadline = Some(now + self.quiet);
    }

    /// The settled batch, or empty while events are still arriving.
    fn drain_due(&mut self, now: Instant) -> Vec<Utf8PathBuf> {
        if self.pending.is_empty() || self.deadline.is_none_or(|d| now < d) {
            return Vec::new();
        }
        self.deadline = None;
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

impl Doctor {
    /// Block watching the source tree, repairing files as they settle.
    /// Returns after SIGINT/SIGTERM (or when `stop` is raised by a test).
    pub fn watch(&self, stop: Arc<AtomicBool>) -> anyhow::Result<()> {
        signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&stop))?;
        signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&stop))?;

        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
        let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())?;
        watcher.watch(
            self.settings().src_dir.as_std_path(),
            RecursiveMode::Recursive,
        )?;
        info!(src = %self.settings().src_dir, "watching for changes (Ctrl-C to stop)");

        let mut debouncer = Debouncer::new(Duration::from_millis(self.settings().debounce_ms));

        while !stop.load(Ordering::Relaxed) {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(event)) => {
                    if !is_content_change(&event.kind) {
                        continue;
                    }
                    for path in event.paths {
                        let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                            continue;
                        };
                        if self.wants(&path) {
                            debouncer.note(path, Instant::now());
                        }
                    }
                }
                Ok(Err(e)) => warn!(error = %e, "watch backend error"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            for path in debouncer.drain_due(Instant::now()) {
                debug!(%path, "settled change");
                match self.fix_file(&path) {
                    Ok(0) => {}
                    Ok(n) => info!(%path, applied = n, "repaired on save"),
                    Err(e) => warn!(%path, error = %e, "repair pass failed"),
                }
            }
        }

        info!("watch stopped");
        Ok(())
    }

    // Only sources inside the watched tree; skip anything the pipeline itself
    // writes under target/.
    fn wants(&self, path: &camino::Utf8Path) -> bool {
        path.extension() == Some("java")
            && path.starts_with(&self.settings().src_dir)
            && !path.starts_with(self.settings().repo_root.join("target"))
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}
