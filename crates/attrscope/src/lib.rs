//! # attrscope: Scoped attribute filtering
//!
//! Validates and sanitizes "scoped" identity attributes released by an
//! identity provider during a federated login. A scoped value such as
//! `staff@example.org` is only trusted when `example.org` is one of the
//! scopes the provider is authoritative for (its `shibmd:Scope` metadata).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Authentication Event                        │
//! │  (AttributeBag + SourceMetadata)             │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Sanitizer (FilterPolicy)                    │
//! │  ├─ Exemption check on the entity ID         │
//! │  ├─ Category A: user@scope values            │
//! │  ├─ Category B: single value == scope        │
//! │  └─ Category C: scope or subdomain suffix    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Filtered AttributeBag                       │
//! │  - Non-conforming values dropped             │
//! │  - Empty attributes removed                  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Scopes are literal domain strings. Characters such as `.`, `*` or `+`
//! inside a scope only ever match themselves.
//!
//! ## Examples
//!
//! ```
//! use attrscope::{AttributeBag, FilterPolicy, SourceMetadata, sanitize};
//!
//! let policy = FilterPolicy::default();
//! let source = SourceMetadata::new().with_scopes(["example.com"]);
//!
//! let mut bag = AttributeBag::new();
//! bag.insert(
//!     "eduPersonScopedAffiliation".to_string(),
//!     vec![
//!         "student@example.com".to_string(),
//!         "staff@example.com".to_string(),
//!         "missing-scope".to_string(),
//!     ],
//! );
//!
//! sanitize(&policy, &source, &mut bag);
//!
//! assert_eq!(
//!     bag["eduPersonScopedAffiliation"],
//!     vec!["student@example.com", "staff@example.com"]
//! );
//! ```

pub mod error;
pub mod event;
pub mod matcher;
pub mod pipeline;
pub mod policy;
pub mod sanitizer;


pub use error::{ConfigError, StateError};
pub use event::{AttributeBag, ScopeSet, SourceMetadata};
pub use matcher::{ScopeMatch, is_exactly_scoped, is_suffix_scoped};
pub use pipeline::ProcessingFilter;
pub use policy::{FilterOptions, FilterPolicy};
pub use sanitizer::{
    FilterOutcome, FilterReport, RemovalReason, RemovedAttribute, RemovedValue, RuleCategory,
    ScopeFilter, filter_attributes, sanitize,
};
