//! Command builder for `docker run`
//!
//! Builds the full argument list for one container invocation, translating
//! [`ResourceLimits`] into enforced runtime flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::types::ResourceLimits;

/// Builder for one `docker run` invocation
#[derive(Debug)]
pub struct DockerCommand {
    /// Path to the Docker client binary
    docker_path: PathBuf,
    /// Execution image
    image: String,
    /// --name, so the container can be killed on timeout or cancellation
    container_name: Option<String>,
    /// --volume source (host side) and target (in-container workdir)
    mount: Option<(PathBuf, String)>,
    /// --workdir
    workdir: Option<String>,
    /// Enforced limits (--memory, --cpus, --pids-limit)
    limits: ResourceLimits,
    /// --env
    env: Vec<(String, String)>,
    /// Command argument list run inside the container
    command: Vec<String>,
}

impl DockerCommand {
    pub fn new(docker_path: impl Into<PathBuf>, image: impl Into<String>) -> Self {
        Self {
            docker_path: docker_path.into(),
            image: image.into(),
            container_name: None,
            mount: None,
            workdir: None,
            limits: ResourceLimits::new(),
            env: Vec::new(),
            command: Vec::new(),
        }
    }

    /// Name the container so it can be killed from outside
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.container_name = Some(name.into());
        self
    }

    /// Bind-mount a host directory at the given container path
    pub fn mount(mut self, source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        self.mount = Some((source.into(), target.into()));
        self
    }

    /// Set the working directory inside the container
    pub fn workdir(mut self, dir: impl Into<String>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Set enforced resource limits
    pub fn limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set multiple environment variables
    pub fn envs(mut self, env: &HashMap<String, String>) -> Self {
        for (key, value) in env {
            self.env.push((key.clone(), value.clone()));
        }
        self
    }

    /// Set the command to run inside the container
    pub fn command(mut self, cmd: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.command = cmd.into_iter().map(Into::into).collect();
        self
    }

    /// Build the command-line arguments
    ///
    /// Consumes self to avoid cloning the command vector.
    pub fn build(self) -> Vec<String> {
        let mut args = vec![
            self.docker_path.to_string_lossy().into_owned(),
            "run".to_owned(),
            // One container per invocation; nothing survives it
            "--rm".to_owned(),
            // Untrusted code gets no network
            "--network=none".to_owned(),
        ];

        if let Some(ref name) = self.container_name {
            args.push(format!("--name={name}"));
        }

        // Enforced resource limits
        if let Some(memory) = self.limits.memory_limit_mb {
            args.push(format!("--memory={memory}m"));
            // Pin swap to the memory limit so the ceiling is absolute
            args.push(format!("--memory-swap={memory}m"));
        }
        if let Some(cpus) = self.limits.cpu_limit {
            args.push(format!("--cpus={cpus}"));
        }
        if let Some(pids) = self.limits.pid_limit {
            args.push(format!("--pids-limit={pids}"));
        }

        if let Some((ref source, ref target)) = self.mount {
            args.push(format!("--volume={}:{}", source.display(), target));
        }

        if let Some(ref dir) = self.workdir {
            args.push(format!("--workdir={dir}"));
        }

        for (key, value) in &self.env {
            args.push(format!("--env={key}={value}"));
        }

        args.push(self.image);
        args.extend(self.command);

        args
    }

    /// Get the Docker binary path
    pub fn docker_path(&self) -> &Path {
        &self.docker_path
    }
}
