//! Docker-backed sandbox launcher
//!
//! This module issues one `docker run` per invocation, bounding the container
//! to a mounted workspace and a fixed working directory, with resource limits
//! enforced by the container runtime. Nothing persists between invocations.
//!
//! References for the Docker CLI flags used here:
//! - https://docs.docker.com/reference/cli/docker/container/run/

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use crate::docker::command::DockerCommand;
pub use crate::docker::launcher::DockerSandbox;
pub use crate::docker::output::RawOutput;
use crate::types::ResourceLimits;
use crate::workspace::{Workspace, WorkspaceError};

mod command;
mod launcher;
mod output;

/// Errors that occur at the sandbox launcher boundary
///
/// These never escape the judging layer as panics or unhandled faults; the
/// orchestrator converts them into typed results.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("container runtime unavailable: {0}")]
    BackendUnavailable(String),

    #[error("failed to spawn container runtime: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("execution cancelled")]
    Cancelled,

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which step of the two-phase protocol an invocation belongs to.
///
/// The result normalizer uses this to map a non-zero exit code to either a
/// compilation error (structured per-step signal, no stderr scanning) or a
/// runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Compile,
    Run,
}

/// One sandbox invocation
#[derive(Debug)]
pub struct LaunchRequest<'a> {
    /// Execution image selected by language
    pub image: &'a str,

    /// Workspace mounted as the container's working directory
    pub workspace: &'a Workspace,

    /// Command argument list to run inside the container
    pub command: Vec<String>,

    /// Environment variables for the container
    pub env: &'a HashMap<String, String>,

    /// Enforced resource limits
    pub limits: ResourceLimits,

    /// Compile or run step
    pub phase: Phase,

    /// Cancellation token; aborting kills the container
    pub cancel: &'a CancellationToken,
}

/// Seam between the judge orchestrator and the execution backend
///
/// The production implementation is [`DockerSandbox`]; tests substitute a
/// scripted fake to drive the judging loop deterministically.
pub trait Sandbox {
    fn run(
        &self,
        request: LaunchRequest<'_>,
    ) -> impl Future<Output = Result<RawOutput, SandboxError>> + Send;
}
