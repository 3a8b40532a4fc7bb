//! Result normalization
//!
//! Maps the raw process outcome of one sandbox invocation into a typed
//! [`ExecutionResult`]. A non-zero exit is classified by the phase it
//! occurred in: compile-step failures are compilation errors, everything
//! else is a runtime error. Compile failures are decided purely from the
//! compile step's own exit code, never by scanning stderr text.

use std::time::Duration;

use crate::docker::Phase;
use crate::types::{ExecutionResult, ExecutionStatus};

/// Raw outcome of one sandbox invocation
#[derive(Debug, Clone)]
pub struct RawOutput {
    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Exit code, if the process exited normally
    pub exit_code: Option<i32>,

    /// Wall-clock duration from spawn to exit
    pub duration: Duration,

    /// Whether the launcher killed the container on the wall-clock ceiling
    pub timed_out: bool,
}

impl RawOutput {
    /// Normalize into a typed execution result
    pub fn into_result(self, phase: Phase) -> ExecutionResult {
        let status = match (self.exit_code, self.timed_out) {
            (Some(0), false) => ExecutionStatus::Success,
            _ => match phase {
                Phase::Compile => ExecutionStatus::CompilationError,
                Phase::Run => ExecutionStatus::RuntimeError,
            },
        };

        ExecutionResult {
            status,
            stdout: self.stdout,
            stderr: self.stderr,
            duration_ms: self.duration.as_millis() as u64,
            memory_kb: 0,
            timed_out: self.timed_out,
        }
    }
}
