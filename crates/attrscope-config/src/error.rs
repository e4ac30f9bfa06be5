//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),

    #[error("Invalid filter configuration: {0}")]
    InvalidFilter(#[from] attrscope::ConfigError),

    #[error("XDG directory error: {0}")]
    XdgError(String),
}
