//! Error types for filter construction and pipeline state handling.
//!
//! Filtering itself never fails: a value that does not match is dropped, and
//! missing scope metadata is a normal input. Errors only arise when the
//! configuration or the host state record has the wrong shape.

use thiserror::Error;

/// A rejected filter configuration.
///
/// Raised once, when the filter is constructed, never per event.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options value handed over by the host is not a key/value map.
    #[error("Filter options must be a map, got {found}")]
    NotAMap { found: &'static str },

    /// A recognized option has the wrong shape or content.
    #[error("Invalid filter option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

/// A host state record that does not carry what the filter needs.
#[derive(Debug, Error)]
pub enum StateError {
    /// The state record is not a JSON object.
    #[error("State record must be an object, got {found}")]
    NotAnObject { found: &'static str },

    /// The `Attributes` entry is missing.
    #[error("State record has no 'Attributes' entry")]
    MissingAttributes,

    /// `Attributes` is not an object.
    #[error("'Attributes' must be an object, got {found}")]
    AttributesNotAnObject { found: &'static str },

    /// An attribute is not a list of strings.
    #[error("Attribute '{name}' must be a list of strings")]
    InvalidAttribute { name: String },
}

/// Result type for configuration resolution.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Names a JSON value's kind for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
