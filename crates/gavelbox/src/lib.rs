//! A library for sandboxed code execution and judging.
//!
//! Gavelbox provides an async Rust API for running untrusted submissions in
//! isolated Docker containers and judging them against problem test cases.
//! It supports per-language compile/run protocols, enforced resource limits,
//! and a sequential short-circuiting judging loop with efficiency
//! classification.
//!
//! # Features
//!
//! - **Sandboxed execution** — One ephemeral container per invocation, bound to a throwaway workspace.
//! - **Multi-language** — Supports both compiled and interpreted languages via TOML configuration.
//! - **Resource limits** — Enforce wall-clock time, memory, CPU share, and process-count ceilings.
//! - **Judging** — Sequential test-case evaluation with short-circuiting and typed verdicts.
//! - **Efficiency tiers** — Classify accepted submissions by their slowest test-case time.

pub use config::{Config, ConfigError, EXAMPLE_CONFIG, Language};
pub use docker::{DockerSandbox, LaunchRequest, Phase, RawOutput, Sandbox, SandboxError};
pub use judge::{
    EfficiencyResult, Judge, JudgeError, SubmissionVerdict, TestCase, Tier, Verdict,
};
pub use problems::{Problem, ProblemError, ProblemStore, ProblemSummary};
pub use types::{ExecutionRequest, ExecutionResult, ExecutionStatus, ResourceLimits};
pub use workspace::{Workspace, WorkspaceError, WorkspaceManager};

pub mod config;
pub mod docker;
pub mod judge;
pub mod problems;
pub mod types;
pub mod workspace;
