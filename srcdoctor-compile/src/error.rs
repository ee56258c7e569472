//! Driver failure taxonomy.
//!
//! These are fatal to a run. "Compilation reported errors" is not represented
//! here at all; that case surfaces as diagnostic text in the captured output.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// `javac` is not on PATH.
    #[error("javac not found on PATH; install a JDK (17+) and ensure it is on PATH")]
    ToolMissing,

    /// The compiler exceeded the bounded timeout and was killed.
    #[error("compiler timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The call itself failed (spawn error, wait error, scratch-dir error).
    #[error("compiler invocation failed: {message}")]
    Invoke { message: String },
}

impl DriverError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::Timeout { .. })
    }
}
