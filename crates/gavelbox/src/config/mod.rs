use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use crate::config::language::{CompileConfig, Language, RunConfig, STDIN_FILE};
use crate::types::ResourceLimits;

pub mod language;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../gavelbox.example.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("language '{0}' not found in configuration")]
    LanguageNotFound(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Thresholds for bucketing the slowest test-case time into a performance tier
#[derive(Debug, Clone, Deserialize)]
pub struct EfficiencyThresholds {
    /// Upper bound for the OPTIMAL tier in milliseconds
    #[serde(default = "default_optimal_ms")]
    pub optimal_ms: u64,

    /// Upper bound for the ACCEPTABLE tier in milliseconds
    #[serde(default = "default_acceptable_ms")]
    pub acceptable_ms: u64,

    /// Upper bound for the BRUTE_FORCE tier in milliseconds; anything slower
    /// (but under the hard ceiling) is TOO_SLOW
    #[serde(default = "default_brute_force_ms")]
    pub brute_force_ms: u64,
}

impl Default for EfficiencyThresholds {
    fn default() -> Self {
        Self {
            optimal_ms: default_optimal_ms(),
            acceptable_ms: default_acceptable_ms(),
            brute_force_ms: default_brute_force_ms(),
        }
    }
}

fn default_optimal_ms() -> u64 {
    1000
}

fn default_acceptable_ms() -> u64 {
    3000
}

fn default_brute_force_ms() -> u64 {
    5000
}

/// Config for gavelbox
///
/// Injected explicitly into every component; nothing reads process-wide
/// global state.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the Docker client binary (uses PATH if not specified)
    #[serde(default)]
    pub docker_path: Option<PathBuf>,

    /// Root directory under which per-execution workspaces are created
    #[serde(default = "default_scratch_root")]
    pub scratch_root: PathBuf,

    /// Host-side path corresponding to `scratch_root`, for deployments where
    /// the engine itself runs inside a container. Bind-mount sources handed
    /// to the Docker daemon are rewritten from `scratch_root` to this path,
    /// since the daemon resolves mounts against the host filesystem.
    #[serde(default)]
    pub host_scratch_root: Option<PathBuf>,

    /// Fixed working directory inside execution containers
    #[serde(default = "default_container_workdir")]
    pub container_workdir: String,

    /// Default resource limits applied to all executions.
    /// Overridden per language or per request when present.
    #[serde(default)]
    pub default_limits: ResourceLimits,

    /// Efficiency classification thresholds
    #[serde(default)]
    pub efficiency: EfficiencyThresholds,

    /// Language configurations keyed by language ID
    #[serde(default)]
    pub languages: HashMap<String, Language>,
}

impl Config {
    /// Create a new config with the embedded default languages
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty config with no languages
    pub fn empty() -> Self {
        Self {
            docker_path: None,
            scratch_root: default_scratch_root(),
            host_scratch_root: None,
            container_workdir: default_container_workdir(),
            default_limits: ResourceLimits::default(),
            efficiency: EfficiencyThresholds::default(),
            languages: HashMap::new(),
        }
    }

    /// Get a language by ID
    pub fn get_language(&self, id: &str) -> Result<&Language, ConfigError> {
        self.languages
            .get(id)
            .ok_or_else(|| ConfigError::LanguageNotFound(id.to_string()))
    }

    /// Get the path to the Docker client binary
    pub fn docker_binary(&self) -> PathBuf {
        self.docker_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("docker"))
    }

    /// Merge resource limits with defaults
    pub fn effective_limits(&self, overrides: Option<&ResourceLimits>) -> ResourceLimits {
        match overrides {
            Some(limits) => self.default_limits.with_overrides(limits),
            None => self.default_limits.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_toml(EXAMPLE_CONFIG).expect("embedded default config should be valid")
    }
}

fn default_scratch_root() -> PathBuf {
    std::env::temp_dir().join("gavelbox")
}

fn default_container_workdir() -> String {
    "/tmp/code".to_owned()
}
