//! Problem repository
//!
//! Problems live as JSON manifests on disk, one `<id>.json` per problem.
//! The engine only ever reads the `testcases` array; everything else is
//! presentation metadata passed through to callers. Listing deliberately
//! strips test cases and templates so they cannot leak to clients.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::judge::TestCase;

#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("problem '{0}' not found")]
    NotFound(String),

    #[error("invalid problem id: {0}")]
    InvalidId(String),

    #[error("failed to read problem file at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse problem file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One problem manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,

    #[serde(default)]
    pub difficulty: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Validation data; never exposed through [`ProblemStore::list`]
    #[serde(default)]
    pub testcases: Vec<TestCase>,

    /// Starter code keyed by language ID; hidden from listings
    #[serde(default)]
    pub templates: HashMap<String, String>,
}

/// Public metadata for one problem, safe to hand to clients
#[derive(Debug, Clone, Serialize)]
pub struct ProblemSummary {
    pub id: String,
    pub title: String,
    pub difficulty: Option<String>,
}

/// Directory-backed store of problem manifests
#[derive(Debug, Clone)]
pub struct ProblemStore {
    dir: PathBuf,
}

impl ProblemStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load one problem by ID, test cases included
    pub async fn load(&self, id: &str) -> Result<Problem, ProblemError> {
        validate_id(id)?;
        let path = self.dir.join(format!("{id}.json"));

        let data = match tokio::fs::read(&path).await {
            Ok(data) => data,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProblemError::NotFound(id.to_owned()));
            }
            Err(source) => return Err(ProblemError::Io { path, source }),
        };

        let problem: Problem =
            serde_json::from_slice(&data).map_err(|source| ProblemError::Parse { path, source })?;

        debug!(id, testcases = problem.testcases.len(), "loaded problem");
        Ok(problem)
    }

    /// List all problems as public metadata, sorted by title
    pub async fn list(&self) -> Result<Vec<ProblemSummary>, ProblemError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(source) => {
                return Err(ProblemError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|source| ProblemError::Io {
            path: self.dir.clone(),
            source,
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let problem = self.load(id).await?;
            summaries.push(ProblemSummary {
                id: id.to_owned(),
                title: problem.title,
                difficulty: problem.difficulty,
            });
        }

        summaries.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(summaries)
    }

    /// Directory the manifests are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Problem IDs become file names, so anything but a plain identifier is
/// rejected outright
fn validate_id(id: &str) -> Result<(), ProblemError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ProblemError::InvalidId(id.to_owned()))
    }
}
