//! Configuration file loading for gavelbox
//!
//! Handles loading and parsing configuration files using the config crate.

use std::path::Path;

use config::{Config as ConfigBuilder, File, FileFormat};

use crate::config::{Config, ConfigError};

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        for (id, lang) in &self.languages {
            if lang.name.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has empty name"
                )));
            }
            if lang.image.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has empty image"
                )));
            }
            if lang.run.command.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has empty run command"
                )));
            }
            // Source names are fixed, sandbox-relative filenames
            if lang.source_name.is_empty()
                || lang.source_name.contains('/')
                || lang.source_name.contains("..")
            {
                return Err(ConfigError::Invalid(format!(
                    "language '{id}' has invalid source name '{}'",
                    lang.source_name
                )));
            }
            if let Some(ref compile) = lang.compile {
                if compile.command.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "language '{id}' has empty compile command"
                    )));
                }
                if compile.artifact.is_empty() || compile.artifact.contains('/') {
                    return Err(ConfigError::Invalid(format!(
                        "language '{id}' has invalid compile artifact '{}'",
                        compile.artifact
                    )));
                }
            }
        }

        if self.efficiency.optimal_ms > self.efficiency.acceptable_ms
            || self.efficiency.acceptable_ms > self.efficiency.brute_force_ms
        {
            return Err(ConfigError::Invalid(
                "efficiency thresholds must be non-decreasing".to_owned(),
            ));
        }

        Ok(())
    }
}
