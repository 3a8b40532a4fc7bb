use serde::{Deserialize, Serialize};

/// One execution attempt submitted by a user.
///
/// `language` is a key into [`Config::languages`](crate::Config); unknown
/// languages are a configuration fault rejected before any workspace is
/// created.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Language ID (e.g., "python", "java")
    pub language: String,

    /// Source code to execute
    pub source: String,

    /// Optional data fed to the program on stdin
    pub stdin: Option<String>,

    /// Optional per-request resource limit overrides
    pub limits: Option<ResourceLimits>,
}

impl ExecutionRequest {
    pub fn new(language: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source: source.into(),
            stdin: None,
            limits: None,
        }
    }

    /// Attach stdin data to the request
    pub fn with_stdin(mut self, stdin: impl Into<String>) -> Self {
        self.stdin = Some(stdin.into());
        self
    }

    /// Attach resource limit overrides to the request
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = Some(limits);
        self
    }
}

/// Resource limits enforced on a sandbox invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLimits {
    /// Hard wall-clock ceiling in milliseconds. The launcher kills the
    /// container once this (plus a small grace period) elapses.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,

    /// Memory ceiling in megabytes (`--memory`, swap pinned to the same value)
    #[serde(default)]
    pub memory_limit_mb: Option<u64>,

    /// CPU share as a fraction of one core (`--cpus`)
    #[serde(default)]
    pub cpu_limit: Option<f64>,

    /// Maximum number of processes/threads (`--pids-limit`)
    #[serde(default)]
    pub pid_limit: Option<u32>,

    /// Maximum accepted source size in bytes. Checked before workspace
    /// acquisition; oversized submissions are a validation fault.
    #[serde(default)]
    pub max_code_size_bytes: Option<u64>,
}

impl ResourceLimits {
    /// Create new resource limits with all fields set to None
    pub fn new() -> Self {
        Self {
            time_limit_ms: None,
            memory_limit_mb: None,
            cpu_limit: None,
            pid_limit: None,
            max_code_size_bytes: None,
        }
    }

    /// Set the wall-clock ceiling in milliseconds
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Set the memory ceiling in megabytes
    pub fn with_memory_limit_mb(mut self, mb: u64) -> Self {
        self.memory_limit_mb = Some(mb);
        self
    }

    /// Set the CPU share
    pub fn with_cpu_limit(mut self, cpus: f64) -> Self {
        self.cpu_limit = Some(cpus);
        self
    }

    /// Set the process-count ceiling
    pub fn with_pid_limit(mut self, pids: u32) -> Self {
        self.pid_limit = Some(pids);
        self
    }

    /// Apply overrides from another ResourceLimits, preferring values from `overrides`
    ///
    /// Returns a new ResourceLimits with values from `overrides` taking
    /// precedence over values from `self` when both are present.
    pub fn with_overrides(&self, overrides: &ResourceLimits) -> ResourceLimits {
        ResourceLimits {
            time_limit_ms: overrides.time_limit_ms.or(self.time_limit_ms),
            memory_limit_mb: overrides.memory_limit_mb.or(self.memory_limit_mb),
            cpu_limit: overrides.cpu_limit.or(self.cpu_limit),
            pid_limit: overrides.pid_limit.or(self.pid_limit),
            max_code_size_bytes: overrides.max_code_size_bytes.or(self.max_code_size_bytes),
        }
    }
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            time_limit_ms: Some(10_000),
            memory_limit_mb: Some(2048),
            cpu_limit: Some(1.0),
            pid_limit: Some(1024),
            max_code_size_bytes: Some(10 * 1024 * 1024),
        }
    }
}

/// Typed outcome of one sandbox invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Process exited with code 0
    #[serde(rename = "success")]
    Success,

    /// The dedicated compile step exited non-zero
    #[serde(rename = "compilation_error")]
    CompilationError,

    /// The run step exited non-zero or was killed
    #[serde(rename = "runtime_error")]
    RuntimeError,

    /// Launcher-level fault (backend unreachable, workspace failure)
    #[serde(rename = "error")]
    Error,
}

/// Result of one execution, produced once per sandbox invocation
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Peak memory usage in kilobytes.
    ///
    /// Not currently measured: the Docker client cannot observe the
    /// container's peak RSS after the fact, so this is always 0. The field
    /// is kept so the result shape is stable once accounting lands.
    pub memory_kb: u64,

    /// Whether the launcher killed the process on the wall-clock ceiling
    pub timed_out: bool,
}

impl ExecutionResult {
    /// Check if the execution succeeded (exit code 0, no enforced kill)
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, ExecutionStatus::Success) && !self.timed_out
    }

    /// Build a launcher-fault result carrying a human-readable message
    pub fn fault(message: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            stderr: message.into(),
            ..Default::default()
        }
    }
}

impl Default for ExecutionResult {
    fn default() -> Self {
        Self {
            status: ExecutionStatus::Success,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 0,
            memory_kb: 0,
            timed_out: false,
        }
    }
}
