//! Per-event data handed to the filter.
//!
//! Two inputs make up an authentication event as seen by the filter:
//! - **Attribute bag**: attribute name to ordered values, mutated in place
//! - **Source metadata**: the identity provider's entity ID and declared scopes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute name to ordered attribute values.
///
/// Names are case-sensitive. The filter only ever removes values or whole
/// entries; surviving values keep their original order.
pub type AttributeBag = BTreeMap<String, Vec<String>>;

/// Ordered scopes an identity provider declares itself authoritative for.
pub type ScopeSet = Vec<String>;

/// Key of the entity identifier inside a source record.
pub const ENTITY_ID_KEY: &str = "entityid";

/// Key of the scope list inside a source record.
pub const SCOPE_KEY: &str = "scope";

// ============================================================================
// Source Metadata
// ============================================================================

/// Provider metadata for one authentication event.
///
/// Built by the caller from the identity provider's metadata. Both fields are
/// optional: a provider without an entity ID is never exempt, and a provider
/// without scopes triggers the no-scope condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// The provider's entity identifier.
    #[serde(default, rename = "entityid", skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Declared scopes, in metadata order.
    #[serde(default, rename = "scope", skip_serializing_if = "Option::is_none")]
    pub scopes: Option<ScopeSet>,
}

impl SourceMetadata {
    /// Creates metadata with neither an entity ID nor scopes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the entity identifier.
    pub fn with_entity_id(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Sets the declared scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the entity identifier, if any.
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Returns the declared scopes, or `None` under the no-scope condition
    /// (scopes absent or empty).
    pub fn declared_scopes(&self) -> Option<&[String]> {
        self.scopes.as_deref().filter(|scopes| !scopes.is_empty())
    }

    /// Reads source metadata from a host `Source` record.
    ///
    /// Lenient by contract: anything that is not usable becomes "absent".
    /// A non-object record yields empty metadata, a non-string `entityid` is
    /// ignored, and a `scope` that is not an array yields no scopes. Array
    /// entries that are not strings are skipped.
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(record) = value else {
            return Self::default();
        };

        let entity_id = record
            .get(ENTITY_ID_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);

        let scopes = record.get(SCOPE_KEY).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<ScopeSet>()
        });

        Self { entity_id, scopes }
    }
}

// ============================================================================
// Tests
// ============================================================================
