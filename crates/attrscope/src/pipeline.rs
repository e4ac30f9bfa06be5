//! Processing-pipeline adapter.
//!
//! Authentication pipelines hand each filter a mutable JSON "state" record:
//!
//! ```text
//! {
//!   "Attributes": { "<name>": ["<value>", ...], ... },
//!   "Source":     { "entityid": "<entity id>", "scope": ["<scope>", ...] },
//!   ...
//! }
//! ```
//!
//! [`ProcessingFilter`] is the registration seam. [`ScopeFilter`] reads the
//! checked attributes and source metadata out of the record, runs the
//! sanitizer, and writes the surviving attributes back. Attributes no
//! category checks, and everything else in the record, are left alone.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::error::{StateError, json_kind};
use crate::event::{AttributeBag, SourceMetadata};
use crate::policy::FilterPolicy;
use crate::sanitizer::ScopeFilter;

/// Key of the attribute map inside a state record.
pub const ATTRIBUTES_KEY: &str = "Attributes";

/// Key of the source metadata inside a state record.
pub const SOURCE_KEY: &str = "Source";

/// A filter that runs as one step of an authentication pipeline.
pub trait ProcessingFilter {
    /// Processes one state record in place.
    fn process(&self, state: &mut Value) -> Result<(), StateError>;
}

impl ProcessingFilter for ScopeFilter {
    fn process(&self, state: &mut Value) -> Result<(), StateError> {
        let found = json_kind(state);
        let Value::Object(record) = state else {
            return Err(StateError::NotAnObject { found });
        };

        let source = record
            .get(SOURCE_KEY)
            .map(SourceMetadata::from_json)
            .unwrap_or_default();

        let attributes = match record.get_mut(ATTRIBUTES_KEY) {
            Some(Value::Object(attributes)) => attributes,
            Some(other) => {
                return Err(StateError::AttributesNotAnObject {
                    found: json_kind(other),
                });
            }
            None => return Err(StateError::MissingAttributes),
        };

        let checked = checked_names(self.policy());
        let mut bag = read_attributes(attributes, &checked)?;
        if self.apply(&source, &mut bag).is_exempted() {
            return Ok(());
        }
        write_attributes(attributes, &checked, bag);

        Ok(())
    }
}

/// Names of every attribute the policy checks, in any category.
fn checked_names(policy: &FilterPolicy) -> BTreeSet<&str> {
    policy
        .exact_scope_attributes()
        .iter()
        .chain(policy.scope_attributes())
        .chain(policy.suffix_scope_attributes())
        .map(String::as_str)
        .collect()
}

/// Reads the checked attributes into a bag. Each must be a list of strings;
/// attributes no category looks at are never parsed.
fn read_attributes(
    attributes: &Map<String, Value>,
    checked: &BTreeSet<&str>,
) -> Result<AttributeBag, StateError> {
    attributes
        .iter()
        .filter(|(name, _)| checked.contains(name.as_str()))
        .map(|(name, values)| -> Result<(String, Vec<String>), StateError> {
            let invalid = || StateError::InvalidAttribute { name: name.clone() };
            let values = values
                .as_array()
                .ok_or_else(invalid)?
                .iter()
                .map(|value| value.as_str().map(str::to_string).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((name.clone(), values))
        })
        .collect()
}

/// Writes the checked attributes back, dropping removed ones and keeping the
/// position of the ones that survived. Unchecked entries are left as they are.
fn write_attributes(
    attributes: &mut Map<String, Value>,
    checked: &BTreeSet<&str>,
    mut bag: AttributeBag,
) {
    attributes.retain(|name, _| !checked.contains(name.as_str()) || bag.contains_key(name));
    for (name, slot) in attributes.iter_mut() {
        if let Some(values) = bag.remove(name) {
            *slot = Value::Array(values.into_iter().map(Value::String).collect());
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
