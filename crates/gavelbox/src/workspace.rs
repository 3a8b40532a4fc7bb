//! Ephemeral per-execution workspaces
//!
//! Each execution gets an exclusively-owned scratch directory that backs the
//! sandbox bind mount. Directories are named by a v4 UUID so concurrent
//! executions never collide, and are deleted unconditionally when the
//! execution finishes.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::Config;

/// Prefix for workspace directory names under the scratch root
const WORKSPACE_PREFIX: &str = "execution-";

/// Errors that occur during workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace at {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Creates and destroys per-execution workspaces under one scratch root
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    scratch_root: PathBuf,
    host_root: Option<PathBuf>,
}

impl WorkspaceManager {
    pub fn new(config: &Config) -> Self {
        Self {
            scratch_root: config.scratch_root.clone(),
            host_root: config.host_scratch_root.clone(),
        }
    }

    /// Create a fresh, exclusively-owned workspace directory
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<Workspace, WorkspaceError> {
        let id = Uuid::new_v4();
        let dir_name = format!("{WORKSPACE_PREFIX}{id}");
        let path = self.scratch_root.join(&dir_name);

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| WorkspaceError::Create {
                path: path.clone(),
                source,
            })?;

        // The container user (not necessarily root) must be able to write
        // compile artifacts into the mounted directory.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o777);
            tokio::fs::set_permissions(&path, perms).await?;
        }

        // Bind-mount sources are resolved by the Docker daemon on the host
        let host_path = match &self.host_root {
            Some(host_root) => host_root.join(&dir_name),
            None => path.clone(),
        };

        debug!(%id, ?path, "acquired workspace");

        Ok(Workspace {
            id,
            path,
            host_path,
            released: false,
        })
    }

    /// The scratch root all workspaces live under
    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }
}

/// An ephemeral directory backing exactly one execution
///
/// Call [`release()`](Self::release) when done. `Drop` performs best-effort
/// removal with a warning so that no exit path leaks a directory.
#[derive(Debug)]
pub struct Workspace {
    id: Uuid,
    path: PathBuf,
    host_path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Unique workspace token
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Workspace directory as seen by this process
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Workspace directory as seen by the Docker daemon (bind-mount source)
    pub fn host_path(&self) -> &Path {
        &self.host_path
    }

    /// Resolve a file name inside the workspace
    ///
    /// Returns an error if the name contains path traversal attempts.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        if name.is_empty() || name.contains("..") || name.starts_with('/') {
            return Err(WorkspaceError::InvalidPath(format!(
                "path traversal not allowed: {name}"
            )));
        }
        Ok(self.path.join(name))
    }

    /// Write a file into the workspace
    #[instrument(skip(self, content))]
    pub async fn write_file(&self, name: &str, content: &[u8]) -> Result<(), WorkspaceError> {
        let path = self.file_path(name)?;
        tokio::fs::write(&path, content).await?;
        debug!(?path, len = content.len(), "wrote file to workspace");
        Ok(())
    }

    /// Read a file from the workspace
    pub async fn read_file(&self, name: &str) -> Result<Vec<u8>, WorkspaceError> {
        let path = self.file_path(name)?;
        Ok(tokio::fs::read(&path).await?)
    }

    /// Check if a file exists in the workspace
    pub async fn file_exists(&self, name: &str) -> Result<bool, WorkspaceError> {
        let path = self.file_path(name)?;
        Ok(tokio::fs::metadata(&path).await.is_ok())
    }

    /// Recursively delete the workspace directory
    ///
    /// Must run on every exit path; the `Drop` fallback covers panics and
    /// forgotten calls but logs a warning.
    #[instrument(skip(self))]
    pub async fn release(mut self) -> Result<(), WorkspaceError> {
        tokio::fs::remove_dir_all(&self.path).await?;
        self.released = true;
        debug!(id = %self.id, "released workspace");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                id = %self.id,
                path = %self.path.display(),
                "workspace dropped without explicit release, removing"
            );
            if let Err(error) = std::fs::remove_dir_all(&self.path) {
                warn!(id = %self.id, %error, "best-effort workspace removal failed");
            }
        }
    }
}
