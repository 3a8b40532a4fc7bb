//! Process spawning and supervision for the Docker backend
//!
//! Spawns one `docker run` per invocation, captures stdout/stderr, and races
//! completion against the enforced wall-clock ceiling and the cancellation
//! token. On either, the container is killed by name so the process tree
//! inside it cannot outlive the invocation.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::docker::command::DockerCommand;
use crate::docker::output::RawOutput;
use crate::docker::{LaunchRequest, Sandbox, SandboxError};

/// Extra wall-clock time granted beyond the configured ceiling before the
/// container is killed, so that a run finishing right at the limit is
/// measured rather than truncated.
const KILL_GRACE_MS: u64 = 500;

/// Docker client exit code for errors originating in the daemon or client
/// itself (image missing, daemon unreachable), as opposed to the contained
/// command's own exit code.
const DOCKER_CLIENT_ERROR: i32 = 125;

/// Production sandbox backed by the Docker CLI
#[derive(Debug, Clone)]
pub struct DockerSandbox {
    docker_path: PathBuf,
    workdir: String,
}

impl DockerSandbox {
    pub fn new(config: &Config) -> Self {
        Self {
            docker_path: config.docker_binary(),
            workdir: config.container_workdir.clone(),
        }
    }

    #[instrument(skip(self, request), fields(image = request.image, phase = ?request.phase))]
    async fn launch(&self, request: LaunchRequest<'_>) -> Result<RawOutput, SandboxError> {
        let container_name = format!("gavelbox-{}", Uuid::new_v4());
        let ceiling_ms = request.limits.time_limit_ms;

        let args = DockerCommand::new(&self.docker_path, request.image)
            .name(&container_name)
            .mount(request.workspace.host_path(), &self.workdir)
            .workdir(&self.workdir)
            .limits(request.limits)
            .envs(request.env)
            .command(request.command)
            .build();

        debug!(?args, "launching container");

        let start = Instant::now();
        let mut child = Command::new(&args[0])
            .args(&args[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    SandboxError::BackendUnavailable(format!(
                        "docker binary not found at {}",
                        self.docker_path.display()
                    ))
                } else {
                    SandboxError::SpawnFailed(source)
                }
            })?;

        // Drain the pipes concurrently so a chatty program cannot deadlock
        // against a full pipe buffer while we wait for exit.
        let stdout_task = tokio::spawn(read_pipe(child.stdout.take()));
        let stderr_task = tokio::spawn(read_pipe(child.stderr.take()));

        let deadline = Duration::from_millis(
            ceiling_ms.map_or(u64::MAX, |ms| ms.saturating_add(KILL_GRACE_MS)),
        );

        // Dropping the wait future at the end of the select is safe; the
        // child can be waited on again afterwards.
        enum WaitOutcome {
            Exited(std::io::Result<std::process::ExitStatus>),
            TimedOut,
            Cancelled,
        }

        let outcome = tokio::select! {
            status = child.wait() => WaitOutcome::Exited(status),
            _ = tokio::time::sleep(deadline) => WaitOutcome::TimedOut,
            _ = request.cancel.cancelled() => WaitOutcome::Cancelled,
        };

        let mut timed_out = false;
        let exit_code = match outcome {
            WaitOutcome::Exited(status) => status.map_err(SandboxError::Io)?.code(),
            WaitOutcome::TimedOut => {
                timed_out = true;
                warn!(container = %container_name, ?deadline, "wall-clock ceiling reached, killing container");
                self.kill_container(&container_name).await;
                let _ = child.start_kill();
                let _ = child.wait().await;
                None
            }
            WaitOutcome::Cancelled => {
                debug!(container = %container_name, "cancellation requested, killing container");
                self.kill_container(&container_name).await;
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(SandboxError::Cancelled);
            }
        };

        let duration = start.elapsed();
        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        // A 125 comes from the docker client itself, not the judged program
        if exit_code == Some(DOCKER_CLIENT_ERROR) {
            return Err(SandboxError::BackendUnavailable(stderr.trim().to_owned()));
        }

        debug!(?exit_code, ?duration, timed_out, "container finished");

        Ok(RawOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr,
            exit_code,
            duration,
            timed_out,
        })
    }

    /// Kill a container by name, best effort
    ///
    /// Killing the docker client process alone leaves the container running
    /// under the daemon; the container must be killed by name.
    async fn kill_container(&self, name: &str) {
        let result = Command::new(&self.docker_path)
            .args(["kill", name])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        if let Err(error) = result {
            warn!(%error, container = name, "failed to issue docker kill");
        }
    }
}

impl Sandbox for DockerSandbox {
    async fn run(&self, request: LaunchRequest<'_>) -> Result<RawOutput, SandboxError> {
        self.launch(request).await
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> Vec<u8>
where
    R: tokio::io::AsyncRead + Unpin + Send,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf).await;
    }
    buf
}
