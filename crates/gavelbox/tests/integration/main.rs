//! Integration tests for gavelbox
//!
//! These tests require a working Docker daemon and the language images named
//! in the default configuration (`gavelbox-python:latest`,
//! `gavelbox-java:latest`).
//! Run with: cargo test -p gavelbox --features integration-tests -- --include-ignored

#![cfg(feature = "integration-tests")]

use gavelbox::Config;

mod config_loading;
mod execution;
mod judging;

/// Config pointing workspaces at a test-owned scratch directory
pub(crate) fn test_config() -> Config {
    Config {
        scratch_root: std::env::temp_dir().join("gavelbox-integration"),
        ..Config::default()
    }
}
