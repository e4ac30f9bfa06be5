//! CLI command implementations.

pub mod check;
pub mod config;
pub mod filter;

use anyhow::{Context, Result};
use attrscope_config::{AttrscopeConfig, ConfigLoader};
use std::path::Path;

/// Loads configuration from `config` if given, else from `project`.
fn load_config(config: Option<&Path>, project: &Path) -> Result<AttrscopeConfig> {
    let mut loader = ConfigLoader::new().with_project_dir(project);
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    loader.load().context("Failed to load configuration")
}
