//! Configuration loader with multi-source merging

use crate::{AttrscopeConfig, ConfigError, Paths};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of environment variable overrides.
const ENV_PREFIX: &str = "ATTRSCOPE";

/// Keys parsed as comma-separated lists when they come from the environment.
const LIST_KEYS: [&str; 4] = [
    "filter.attributes_with_scope",
    "filter.scope_attributes",
    "filter.attributes_with_scope_suffix",
    "filter.ignore_check_for_entities",
];

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    config_file: Option<PathBuf>,
    user_config_file: Option<PathBuf>,
    env_vars: Option<config::Map<String, String>>,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            user_config_file: Paths::new().user_config_file().ok(),
            env_vars: None,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Load this file instead of the project and local config files.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use this file as the user config instead of the XDG location.
    pub fn with_user_config_file(mut self, path: impl AsRef<Path>) -> Self {
        self.user_config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Read overrides from `vars` instead of the process environment.
    pub fn with_env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<AttrscopeConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = AttrscopeConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. User config (~/.config/attrscope/config.toml)
        if let Some(user_config_file) = &self.user_config_file {
            if user_config_file.exists() {
                debug!(path = %user_config_file.display(), "Loading user config");
                builder = builder.add_source(toml_file(user_config_file.clone()));
            }
        }

        if let Some(config_file) = &self.config_file {
            // 3. Explicit config file
            if !config_file.exists() {
                return Err(ConfigError::NotFound(config_file.clone()).into());
            }
            debug!(path = %config_file.display(), "Loading config file");
            builder = builder.add_source(toml_file(config_file.clone()));
        } else {
            // 3. Project config (attrscope.toml)
            let project_config_file = Paths::project_config_file(&self.project_dir);
            if project_config_file.exists() {
                debug!(path = %project_config_file.display(), "Loading project config");
                builder = builder.add_source(toml_file(project_config_file));
            }

            // 4. Local config (attrscope.local.toml, gitignored)
            let local_config_file = Paths::local_config_file(&self.project_dir);
            if local_config_file.exists() {
                debug!(path = %local_config_file.display(), "Loading local config");
                builder = builder.add_source(toml_file(local_config_file));
            }
        }

        // 5. Environment variables (ATTRSCOPE_FILTER__*)
        let mut environment = config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .try_parsing(true)
            .source(self.env_vars);
        for key in LIST_KEYS {
            environment = environment.with_list_parse_key(key);
        }
        builder = builder.add_source(environment);

        // Build and deserialize
        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn toml_file(path: PathBuf) -> impl config::Source + Send + Sync + 'static {
    config::File::from(path)
        .required(false)
        .format(config::FileFormat::Toml)
}
