//! External compiler driver.
//!
//! Invokes `javac` on a single file or the whole source tree and hands the
//! combined stdout/stderr text back for parsing. A non-zero exit with
//! diagnostic text is the expected "there are errors" case, not a driver
//! failure; only a missing tool, a spawn error, or a timeout are fatal.
//!
//! The classpath is assembled from repo-local build output plus the build
//! system's cached dependency path list (`target/ext-cp.txt`). The driver
//! only consumes that file; it never recomputes it.

mod error;

pub use error::DriverError;

use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// The seam the orchestrator (and its tests) compile through.
pub trait Compiler {
    /// Compile one file against the project sourcepath; returns raw output.
    fn compile_file(&self, path: &Utf8Path) -> Result<String, DriverError>;

    /// Compile every `.java` file under the source tree; returns raw output.
    /// Required whenever cross-file type resolution matters.
    fn compile_all(&self) -> Result<String, DriverError>;
}

/// Filesystem-backed `javac` driver.
#[derive(Debug, Clone)]
pub struct JavacDriver {
    javac: Utf8PathBuf,
    src_dir: Utf8PathBuf,
    classpath: String,
    timeout: Duration,
}

impl JavacDriver {
    /// Locates `javac` on PATH and assembles the classpath. Failing to find
    /// the tool is fatal, distinct from any later compilation outcome.
    pub fn new(
        repo_root: &Utf8Path,
        src_dir: Utf8PathBuf,
        timeout: Duration,
    ) -> Result<Self, DriverError> {
        let javac = find_tool("javac").ok_or(DriverError::ToolMissing)?;
        let classpath = resolve_classpath(repo_root);
        debug!(%javac, %classpath, "javac driver ready");
        Ok(Self {
            javac,
            src_dir,
            classpath,
            timeout,
        })
    }

    fn run(&self, files: &[Utf8PathBuf]) -> Result<String, DriverError> {
        if files.is_empty() {
            return Ok(String::new());
        }

        // Scratch output dir; class files from a diagnostic run are discarded.
        let out_dir = tempfile::tempdir().map_err(|e| DriverError::Invoke {
            message: format!("create scratch dir: {e}"),
        })?;

        let mut cmd = Command::new(self.javac.as_std_path());
        cmd.arg("-d")
            .arg(out_dir.path())
            .arg("-cp")
            .arg(&self.classpath)
            .arg("-sourcepath")
            .arg(self.src_dir.as_str())
            .arg("-Xlint:all")
            .args(files.iter().map(|f| f.as_str()))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(files = files.len(), "invoking javac");
        run_with_timeout(cmd, self.timeout)
    }
}

impl Compiler for JavacDriver {
    fn compile_file(&self, path: &Utf8Path) -> Result<String, DriverError> {
        self.run(&[path.to_path_buf()])
    }

    fn compile_all(&self) -> Result<String, DriverError> {
        self.run(&java_sources(&self.src_dir))
    }
}

/// All `.java` files under `src_dir`, in sorted order.
pub fn java_sources(src_dir: &Utf8Path) -> Vec<Utf8PathBuf> {
    let pattern = src_dir.join("**").join("*.java");
    let mut out = Vec::new();
    let Ok(paths) = glob::glob(pattern.as_str()) else {
        return out;
    };
    for entry in paths.flatten() {
        if let Ok(p) = Utf8PathBuf::from_path_buf(entry)
            && p.is_file()
        {
            out.push(p);
        }
    }
    out.sort();
    out
}

/// Classpath from repo-local build output plus the cached dependency list.
pub fn resolve_classpath(repo_root: &Utf8Path) -> String {
    let target = repo_root.join("target");
    let mut parts = Vec::new();

    for dir in ["section-classes", "classes"] {
        let p = target.join(dir);
        if p.exists() {
            parts.push(p.to_string());
        }
    }

    let ext = target.join("ext-cp.txt");
    if ext.exists()
        && let Ok(s) = fs::read_to_string(&ext)
    {
        let s = s.trim();
        if !s.is_empty() {
            parts.push(s.to_string());
        }
    }

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join(path_separator())
    }
}

fn path_separator() -> &'static str {
    if cfg!(windows) { ";" } else { ":" }
}

/// Minimal PATH lookup; no shell involved.
fn find_tool(name: &str) -> Option<Utf8PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Utf8PathBuf::from_path_buf(candidate).ok();
        }
        #[cfg(windows)]
        {
            let exe = dir.join(format!("{name}.exe"));
            if exe.is_file() {
                return Utf8PathBuf::from_path_buf(exe).ok();
            }
        }
    }
    None
}

/// Runs a command to completion within `timeout`, capturing combined
/// stdout+stderr. The process is killed on timeout; a timeout is a driver
/// failure, never a diagnostic.
fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<String, DriverError> {
    let mut child = cmd.spawn().map_err(|e| DriverError::Invoke {
        message: format!("spawn compiler: {e}"),
    })?;

    // Drain both pipes on their own threads so a chatty compiler can never
    // deadlock against a full pipe buffer while we poll for exit.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_handle = std::thread::spawn(move || read_all(stdout));
    let err_handle = std::thread::spawn(move || read_all(stderr));

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(code = ?status.code(), "compiler exited");
                break;
            }
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DriverError::Timeout {
                    seconds: timeout.as_secs(),
                });
            }
            Ok(None) => std::thread::sleep(Duration::from_millis(25)),
            Err(e) => {
                let _ = child.kill();
                return Err(DriverError::Invoke {
                    message: format!("wait for compiler: {e}"),
                });
            }
        }
    }

    let mut text = out_handle.join().unwrap_or_default();
    let err_text = err_handle.join().unwrap_or_default();
    text.push_str(&err_text);
    Ok(text)
}

fn read_all(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}
