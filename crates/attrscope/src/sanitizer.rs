//! Attribute sanitizer.
//!
//! Runs one pass over an attribute bag: exemption check, scope resolution,
//! then the three rule categories in fixed order (A, B, C). Each category
//! sees the bag as the previous one left it. Values are kept or dropped
//! verbatim, never rewritten.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ConfigError;
use crate::event::{AttributeBag, SourceMetadata};
use crate::matcher::ScopeMatch;
use crate::policy::{FilterOptions, FilterPolicy};

// ============================================================================
// Outcome
// ============================================================================

/// The rule category that removed a value or attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Category A: `user@scope` values.
    ExactScope,
    /// Category B: single value equal to a scope.
    ScopeValue,
    /// Category C: scope or subdomain suffix.
    ScopeSuffix,
}

impl RuleCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactScope => "exact-scope",
            Self::ScopeValue => "scope-value",
            Self::ScopeSuffix => "scope-suffix",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a whole attribute was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalReason {
    /// The provider declares no scopes.
    NoScope,
    /// Every value failed its category's rule.
    NoValidValues,
    /// A Category B attribute did not have exactly one value.
    NotSingleValued,
    /// A Category B value is not one of the declared scopes.
    ScopeMismatch,
}

/// A single value dropped from an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedValue {
    pub attribute: String,
    pub value: String,
    pub category: RuleCategory,
}

/// An attribute deleted from the bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedAttribute {
    pub attribute: String,
    pub category: RuleCategory,
    pub reason: RemovalReason,
}

/// What a filtering pass removed, in the order it happened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Values dropped by Category A or C checks.
    pub removed_values: Vec<RemovedValue>,
    /// Attributes deleted outright.
    pub removed_attributes: Vec<RemovedAttribute>,
}

impl FilterReport {
    /// Returns `true` if the pass removed nothing.
    pub fn is_unchanged(&self) -> bool {
        self.removed_values.is_empty() && self.removed_attributes.is_empty()
    }
}

/// Summary of one sanitizer pass.
///
/// Advisory only: the mutated bag is the result. The outcome exists so
/// callers can audit or count removals without parsing log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOutcome {
    /// The entity ID is exempt; the bag was not touched.
    Exempted,
    /// The checks ran.
    Filtered(FilterReport),
}

impl FilterOutcome {
    pub fn is_exempted(&self) -> bool {
        matches!(self, Self::Exempted)
    }

    /// The removal report, or `None` if the event was exempt.
    pub fn report(&self) -> Option<&FilterReport> {
        match self {
            Self::Exempted => None,
            Self::Filtered(report) => Some(report),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Filters `bag` in place according to `policy` and the source's scopes.
///
/// # Postconditions
///
/// - Unless exempt, every surviving value of a Category A or C attribute
///   matches a declared scope under its category's rule.
/// - No checked attribute is left with an empty value list.
/// - Running the pass again on its own output removes nothing.
pub fn sanitize(
    policy: &FilterPolicy,
    source: &SourceMetadata,
    bag: &mut AttributeBag,
) -> FilterOutcome {
    if let Some(entity_id) = source.entity_id() {
        if policy.is_exempt(entity_id) {
            debug!(entity_id = %entity_id, "Ignoring scope checking for assertions from exempt entity");
            return FilterOutcome::Exempted;
        }
    }

    let scopes = source.declared_scopes();
    if scopes.is_none() {
        warn!(
            entity_id = source.entity_id().unwrap_or("<unknown>"),
            "No scope extension in IdP metadata, all scoped attributes are filtered out"
        );
    }

    let mut report = FilterReport::default();
    let ignore_case = policy.ignore_case();

    for name in policy.exact_scope_attributes() {
        filter_scoped_values(
            bag,
            name,
            scopes,
            ScopedRule {
                category: RuleCategory::ExactScope,
                matcher: ScopeMatch::Exact,
                ignore_case,
            },
            &mut report,
        );
    }

    for name in policy.scope_attributes() {
        check_scope_value(bag, name, scopes.unwrap_or_default(), &mut report);
    }

    for name in policy.suffix_scope_attributes() {
        filter_scoped_values(
            bag,
            name,
            scopes,
            ScopedRule {
                category: RuleCategory::ScopeSuffix,
                matcher: ScopeMatch::Suffix,
                ignore_case,
            },
            &mut report,
        );
    }

    FilterOutcome::Filtered(report)
}

/// By-value form of [`sanitize`]: consumes a bag and returns the filtered one.
pub fn filter_attributes(
    policy: &FilterPolicy,
    source: &SourceMetadata,
    mut bag: AttributeBag,
) -> AttributeBag {
    sanitize(policy, source, &mut bag);
    bag
}

// ============================================================================
// ScopeFilter
// ============================================================================

/// A configured filter instance.
///
/// Resolves its policy once and is then shared freely; `apply` takes `&self`
/// and keeps no per-event state, so concurrent events need no locking.
#[derive(Debug, Clone, Default)]
pub struct ScopeFilter {
    policy: FilterPolicy,
}

impl ScopeFilter {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    /// Builds a filter from raw options, rejecting malformed ones.
    pub fn from_options(options: FilterOptions) -> Result<Self, ConfigError> {
        Ok(Self::new(options.resolve()?))
    }

    /// Builds a filter from host JSON options.
    pub fn from_json(options: &serde_json::Value) -> Result<Self, ConfigError> {
        Ok(Self::new(FilterPolicy::from_json(options)?))
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    /// Filters one event's attributes in place.
    pub fn apply(&self, source: &SourceMetadata, bag: &mut AttributeBag) -> FilterOutcome {
        sanitize(&self.policy, source, bag)
    }
}

// ============================================================================
// Category passes
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct ScopedRule {
    category: RuleCategory,
    matcher: ScopeMatch,
    ignore_case: bool,
}

/// Category A and C pass over one attribute.
fn filter_scoped_values(
    bag: &mut AttributeBag,
    name: &str,
    scopes: Option<&[String]>,
    rule: ScopedRule,
    report: &mut FilterReport,
) {
    let Some(values) = bag.get_mut(name) else {
        return;
    };

    let Some(scopes) = scopes else {
        info!(
            attribute = %name,
            "Attribute is filtered out due to missing scope information in IdP metadata"
        );
        bag.remove(name);
        report.removed_attributes.push(RemovedAttribute {
            attribute: name.to_string(),
            category: rule.category,
            reason: RemovalReason::NoScope,
        });
        return;
    };

    let (kept, dropped): (Vec<String>, Vec<String>) = std::mem::take(values)
        .into_iter()
        .partition(|value| rule.matcher.matches(value, scopes, rule.ignore_case));

    for value in dropped {
        warn!(
            attribute = %name,
            value = %value,
            check = %rule.category,
            "Attribute value is removed by scope check"
        );
        report.removed_values.push(RemovedValue {
            attribute: name.to_string(),
            value,
            category: rule.category,
        });
    }

    *values = kept;
    if values.is_empty() {
        bag.remove(name);
        info!(attribute = %name, check = %rule.category, "Attribute has no valid values left, removed");
        report.removed_attributes.push(RemovedAttribute {
            attribute: name.to_string(),
            category: rule.category,
            reason: RemovalReason::NoValidValues,
        });
    }
}

/// Category B pass over one attribute.
///
/// Literal, case-sensitive equality against the raw scope list. An empty
/// list simply never matches, which covers the no-scope condition.
fn check_scope_value(
    bag: &mut AttributeBag,
    name: &str,
    scopes: &[String],
    report: &mut FilterReport,
) {
    let Some(values) = bag.get(name) else {
        return;
    };

    let reason = match values.as_slice() {
        [value] if scopes.iter().any(|scope| scope == value) => return,
        [_] => {
            warn!(attribute = %name, "Scope attribute does not match metadata, filtering out");
            RemovalReason::ScopeMismatch
        }
        _ => {
            warn!(
                attribute = %name,
                count = values.len(),
                "Scope attribute must be single valued, filtering out"
            );
            RemovalReason::NotSingleValued
        }
    };

    bag.remove(name);
    report.removed_attributes.push(RemovedAttribute {
        attribute: name.to_string(),
        category: RuleCategory::ScopeValue,
        reason,
    });
}

// ============================================================================
// Tests
// ============================================================================
