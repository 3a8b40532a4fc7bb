use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::ResourceLimits;

/// Name of the stdin file written into the workspace when input is present
pub const STDIN_FILE: &str = "input.txt";

/// Configuration for a programming language
///
/// Each language pins its execution image, a fixed source filename understood
/// by that image, and the compile/run protocol. Interpreted languages leave
/// `compile` unset; compiled languages declare a separate compile step whose
/// exit code is the structured compile-failure signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    /// Human-readable name (e.g., "Python 3")
    pub name: String,

    /// Execution image the sandbox launcher selects for this language
    pub image: String,

    /// Fixed source filename inside the sandbox (e.g., "solution.py",
    /// "Main.java"). Never derived from user input.
    pub source_name: String,

    /// Compilation configuration (None for interpreted languages)
    #[serde(default)]
    pub compile: Option<CompileConfig>,

    /// Execution configuration
    pub run: RunConfig,
}

impl Language {
    /// Check if the language has a separate compile step
    pub fn is_compiled(&self) -> bool {
        self.compile.is_some()
    }

    /// Expand the `{source}` placeholder in a command
    pub fn expand_command(command: &[String], source: &str) -> Vec<String> {
        command.iter().map(|arg| arg.replace("{source}", source)).collect()
    }

    /// Build the compile command for this language
    ///
    /// Returns None for interpreted languages.
    pub fn compile_command(&self) -> Option<Vec<String>> {
        self.compile
            .as_ref()
            .map(|c| Self::expand_command(&c.command, &self.source_name))
    }

    /// Build the run command, redirecting the workspace stdin file when input
    /// is present
    ///
    /// The sandbox backend is invoked with an argv, not a shell, so stdin
    /// redirection is expressed by wrapping the command in `sh -c`.
    pub fn run_command(&self, has_stdin: bool) -> Vec<String> {
        let command = Self::expand_command(&self.run.command, &self.source_name);
        if has_stdin {
            vec![
                "sh".to_owned(),
                "-c".to_owned(),
                format!("{} < {}", command.join(" "), STDIN_FILE),
            ]
        } else {
            command
        }
    }
}

/// Configuration for the compilation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileConfig {
    /// Command and arguments; `{source}` expands to the source filename
    pub command: Vec<String>,

    /// Artifact the compiler is expected to produce (e.g., "Main.class").
    /// Its presence is verified before the run step.
    pub artifact: String,

    /// Environment variables to set during compilation
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Resource limits for compilation (overrides the compile-step defaults)
    #[serde(default)]
    pub limits: Option<ResourceLimits>,
}

/// Configuration for the execution step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Command and arguments; `{source}` expands to the source filename
    pub command: Vec<String>,

    /// Environment variables to set
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Resource limits for execution (overrides config defaults)
    #[serde(default)]
    pub limits: Option<ResourceLimits>,
}
