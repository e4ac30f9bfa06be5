//! Filter configuration.
//!
//! [`FilterOptions`] is the raw, serde-facing option set using the option
//! names hosts already know (`attributesWithScope`, `ignoreCase`, ...).
//! [`FilterPolicy`] is the validated, immutable form the sanitizer reads.
//! Resolution happens once, when a filter is built; a malformed option is
//! rejected there and never surfaces per event.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result, json_kind};

/// Option name of the exact-scope attribute list.
pub const ATTRIBUTES_WITH_SCOPE: &str = "attributesWithScope";
/// Option name of the single-value scope attribute list.
pub const SCOPE_ATTRIBUTES: &str = "scopeAttributes";
/// Option name of the suffix-scope attribute list.
pub const ATTRIBUTES_WITH_SCOPE_SUFFIX: &str = "attributesWithScopeSuffix";
/// Option name of the exempt entity ID list.
pub const IGNORE_CHECK_FOR_ENTITIES: &str = "ignoreCheckForEntities";
/// Option name of the case-insensitivity flag.
pub const IGNORE_CASE: &str = "ignoreCase";

/// Default Category A attributes.
pub const DEFAULT_ATTRIBUTES_WITH_SCOPE: [&str; 2] =
    ["eduPersonPrincipalName", "eduPersonScopedAffiliation"];
/// Default Category B attributes.
pub const DEFAULT_SCOPE_ATTRIBUTES: [&str; 1] = ["schacHomeOrganization"];

// ============================================================================
// FilterOptions
// ============================================================================

/// Raw filter options, as found in a host configuration.
///
/// Every option is optional; missing options take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    /// Category A: values must be `user@scope`.
    pub attributes_with_scope: Vec<String>,
    /// Category B: single value that must equal a scope.
    pub scope_attributes: Vec<String>,
    /// Category C: values must end in a scope or a subdomain of one.
    pub attributes_with_scope_suffix: Vec<String>,
    /// Entity IDs whose assertions skip all checks.
    pub ignore_check_for_entities: Vec<String>,
    /// Compare scopes ignoring ASCII case in Categories A and C.
    pub ignore_case: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            attributes_with_scope: DEFAULT_ATTRIBUTES_WITH_SCOPE
                .iter()
                .map(ToString::to_string)
                .collect(),
            scope_attributes: DEFAULT_SCOPE_ATTRIBUTES
                .iter()
                .map(ToString::to_string)
                .collect(),
            attributes_with_scope_suffix: Vec::new(),
            ignore_check_for_entities: Vec::new(),
            ignore_case: false,
        }
    }
}

impl FilterOptions {
    /// Reads options from a host-supplied JSON map.
    ///
    /// Unrecognized keys are ignored; they belong to the host. A recognized
    /// key with the wrong shape is rejected with the offending option named.
    pub fn from_json(options: &Value) -> Result<Self> {
        let Value::Object(map) = options else {
            return Err(ConfigError::NotAMap {
                found: json_kind(options),
            });
        };

        let mut resolved = Self::default();
        if let Some(value) = map.get(ATTRIBUTES_WITH_SCOPE) {
            resolved.attributes_with_scope = parse_option(ATTRIBUTES_WITH_SCOPE, value)?;
        }
        if let Some(value) = map.get(SCOPE_ATTRIBUTES) {
            resolved.scope_attributes = parse_option(SCOPE_ATTRIBUTES, value)?;
        }
        if let Some(value) = map.get(ATTRIBUTES_WITH_SCOPE_SUFFIX) {
            resolved.attributes_with_scope_suffix =
                parse_option(ATTRIBUTES_WITH_SCOPE_SUFFIX, value)?;
        }
        if let Some(value) = map.get(IGNORE_CHECK_FOR_ENTITIES) {
            resolved.ignore_check_for_entities = parse_option(IGNORE_CHECK_FOR_ENTITIES, value)?;
        }
        if let Some(value) = map.get(IGNORE_CASE) {
            resolved.ignore_case = parse_option(IGNORE_CASE, value)?;
        }

        Ok(resolved)
    }

    /// Validates the options into an immutable [`FilterPolicy`].
    pub fn resolve(self) -> Result<FilterPolicy> {
        FilterPolicy::try_from(self)
    }
}

fn parse_option<T: DeserializeOwned>(option: &str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| ConfigError::InvalidOption {
        option: option.to_string(),
        reason: e.to_string(),
    })
}

fn validate_names(option: &str, names: &[String]) -> Result<()> {
    if names.iter().any(String::is_empty) {
        return Err(ConfigError::InvalidOption {
            option: option.to_string(),
            reason: "attribute names must not be empty".to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// FilterPolicy
// ============================================================================

/// The resolved filter configuration.
///
/// Immutable once built and cheap to share: a single policy serves any number
/// of concurrent events. Serializes as [`FilterOptions`], and deserializing
/// validates the same way [`FilterOptions::resolve`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FilterOptions", into = "FilterOptions")]
pub struct FilterPolicy {
    exact_scope_attributes: Vec<String>,
    scope_attributes: Vec<String>,
    suffix_scope_attributes: Vec<String>,
    exempt_entities: BTreeSet<String>,
    ignore_case: bool,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::from_valid_options(FilterOptions::default())
    }
}

impl TryFrom<FilterOptions> for FilterPolicy {
    type Error = ConfigError;

    fn try_from(options: FilterOptions) -> Result<Self> {
        validate_names(ATTRIBUTES_WITH_SCOPE, &options.attributes_with_scope)?;
        validate_names(SCOPE_ATTRIBUTES, &options.scope_attributes)?;
        validate_names(
            ATTRIBUTES_WITH_SCOPE_SUFFIX,
            &options.attributes_with_scope_suffix,
        )?;
        Ok(Self::from_valid_options(options))
    }
}

impl From<FilterPolicy> for FilterOptions {
    fn from(policy: FilterPolicy) -> Self {
        policy.to_options()
    }
}

impl FilterPolicy {
    /// Creates a policy that checks nothing; combine with the `with_*` builders.
    pub fn empty() -> Self {
        Self {
            exact_scope_attributes: Vec::new(),
            scope_attributes: Vec::new(),
            suffix_scope_attributes: Vec::new(),
            exempt_entities: BTreeSet::new(),
            ignore_case: false,
        }
    }

    /// Resolves a policy straight from host JSON options.
    pub fn from_json(options: &Value) -> Result<Self> {
        FilterOptions::from_json(options)?.resolve()
    }

    fn from_valid_options(options: FilterOptions) -> Self {
        Self {
            exact_scope_attributes: options.attributes_with_scope,
            scope_attributes: options.scope_attributes,
            suffix_scope_attributes: options.attributes_with_scope_suffix,
            exempt_entities: options.ignore_check_for_entities.into_iter().collect(),
            ignore_case: options.ignore_case,
        }
    }

    /// Adds a Category A attribute (builder pattern).
    pub fn with_exact_scope_attribute(mut self, name: impl Into<String>) -> Self {
        self.exact_scope_attributes.push(name.into());
        self
    }

    /// Adds a Category B attribute (builder pattern).
    pub fn with_scope_attribute(mut self, name: impl Into<String>) -> Self {
        self.scope_attributes.push(name.into());
        self
    }

    /// Adds a Category C attribute (builder pattern).
    pub fn with_suffix_scope_attribute(mut self, name: impl Into<String>) -> Self {
        self.suffix_scope_attributes.push(name.into());
        self
    }

    /// Exempts an entity ID from all checks (builder pattern).
    pub fn with_exempt_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.exempt_entities.insert(entity_id.into());
        self
    }

    /// Sets case-insensitive scope comparison (builder pattern).
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Category A attribute names, in configured order.
    pub fn exact_scope_attributes(&self) -> &[String] {
        &self.exact_scope_attributes
    }

    /// Category B attribute names, in configured order.
    pub fn scope_attributes(&self) -> &[String] {
        &self.scope_attributes
    }

    /// Category C attribute names, in configured order.
    pub fn suffix_scope_attributes(&self) -> &[String] {
        &self.suffix_scope_attributes
    }

    /// Exempt entity IDs.
    pub fn exempt_entities(&self) -> &BTreeSet<String> {
        &self.exempt_entities
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Exact, case-sensitive membership test on the exemption set.
    pub fn is_exempt(&self, entity_id: &str) -> bool {
        self.exempt_entities.contains(entity_id)
    }

    /// Converts back into raw options, e.g. for display.
    pub fn to_options(&self) -> FilterOptions {
        FilterOptions {
            attributes_with_scope: self.exact_scope_attributes.clone(),
            scope_attributes: self.scope_attributes.clone(),
            attributes_with_scope_suffix: self.suffix_scope_attributes.clone(),
            ignore_check_for_entities: self.exempt_entities.iter().cloned().collect(),
            ignore_case: self.ignore_case,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
