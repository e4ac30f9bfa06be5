//! Configuration management for attrscope
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (ATTRSCOPE_* prefix, highest precedence)
//! 2. attrscope.local.toml (gitignored, local overrides)
//! 3. attrscope.toml (git-tracked, project config), or one explicit file
//! 4. ~/.config/attrscope/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! Filter options live in a `[filter]` table:
//!
//! ```toml
//! [filter]
//! attributes_with_scope = ["eduPersonPrincipalName", "eduPersonScopedAffiliation"]
//! scope_attributes = ["schacHomeOrganization"]
//! attributes_with_scope_suffix = ["department"]
//! ignore_check_for_entities = ["https://idp.example.org"]
//! ignore_case = false
//! ```
//!
//! Environment variables use `__` between path segments, for example
//! `ATTRSCOPE_FILTER__IGNORE_CASE=true`. List options take comma-separated
//! values.

use attrscope::{FilterOptions, FilterPolicy};
use serde::{Deserialize, Serialize};

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Main attrscope configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttrscopeConfig {
    pub filter: FilterConfig,
}

/// The `[filter]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub attributes_with_scope: Vec<String>,
    pub scope_attributes: Vec<String>,
    pub attributes_with_scope_suffix: Vec<String>,
    pub ignore_check_for_entities: Vec<String>,
    pub ignore_case: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterOptions::default().into()
    }
}

impl From<FilterOptions> for FilterConfig {
    fn from(options: FilterOptions) -> Self {
        Self {
            attributes_with_scope: options.attributes_with_scope,
            scope_attributes: options.scope_attributes,
            attributes_with_scope_suffix: options.attributes_with_scope_suffix,
            ignore_check_for_entities: options.ignore_check_for_entities,
            ignore_case: options.ignore_case,
        }
    }
}

impl From<FilterConfig> for FilterOptions {
    fn from(config: FilterConfig) -> Self {
        Self {
            attributes_with_scope: config.attributes_with_scope,
            scope_attributes: config.scope_attributes,
            attributes_with_scope_suffix: config.attributes_with_scope_suffix,
            ignore_check_for_entities: config.ignore_check_for_entities,
            ignore_case: config.ignore_case,
        }
    }
}

impl AttrscopeConfig {
    /// The filter options in the form the core crate takes.
    pub fn filter_options(&self) -> FilterOptions {
        self.filter.clone().into()
    }

    /// Validates the filter options into a policy.
    pub fn policy(&self) -> Result<FilterPolicy, ConfigError> {
        Ok(self.filter_options().resolve()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AttrscopeConfig::default();
        assert_eq!(
            config.filter.attributes_with_scope,
            ["eduPersonPrincipalName", "eduPersonScopedAffiliation"]
        );
        assert_eq!(config.filter.scope_attributes, ["schacHomeOrganization"]);
        assert!(config.filter.attributes_with_scope_suffix.is_empty());
        assert!(!config.filter.ignore_case);
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = AttrscopeConfig::default();
        config.filter.attributes_with_scope_suffix = vec!["department".to_string()];
        config.filter.ignore_check_for_entities = vec!["https://idp.example.org".to_string()];
        config.filter.ignore_case = true;

        let policy = config.policy().expect("valid config");
        assert_eq!(policy.suffix_scope_attributes(), ["department"]);
        assert!(policy.is_exempt("https://idp.example.org"));
        assert!(policy.ignore_case());
    }

    #[test]
    fn test_policy_rejects_empty_attribute_name() {
        let mut config = AttrscopeConfig::default();
        config.filter.scope_attributes = vec![String::new()];

        assert!(matches!(
            config.policy(),
            Err(ConfigError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[filter]
attributes_with_scope_suffix = ["department", "mail"]
ignore_case = true
"#;
        let config: AttrscopeConfig = toml::from_str(toml_str).expect("valid toml");

        assert_eq!(config.filter.attributes_with_scope_suffix, ["department", "mail"]);
        assert!(config.filter.ignore_case);
        assert_eq!(
            config.filter.scope_attributes,
            FilterConfig::default().scope_attributes
        );

        let rendered = toml::to_string(&config).expect("serializable");
        let reparsed: AttrscopeConfig = toml::from_str(&rendered).expect("reparse");
        assert_eq!(reparsed, config);
    }
}
