//! Scope matching predicates.
//!
//! Pure functions deciding whether an attribute value is bound to one of a
//! provider's declared scopes. Scopes are compared as literal strings: no
//! pattern syntax is recognized, so a scope such as `ex.mple.com` or
//! `a+b.org` only matches itself.
//!
//! Case folding, when enabled, is ASCII-only. Non-ASCII bytes must match
//! exactly.

use serde::{Deserialize, Serialize};

// ============================================================================
// Match Rules
// ============================================================================

/// The matching rule applied to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeMatch {
    /// `local@scope`, see [`is_exactly_scoped`].
    Exact,
    /// The scope, a dotted subdomain of it, or `local@` either of those,
    /// see [`is_suffix_scoped`].
    Suffix,
}

impl ScopeMatch {
    /// Applies this rule to `value`.
    pub fn matches<S: AsRef<str>>(self, value: &str, scopes: &[S], ignore_case: bool) -> bool {
        match self {
            Self::Exact => is_exactly_scoped(value, scopes, ignore_case),
            Self::Suffix => is_suffix_scoped(value, scopes, ignore_case),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Returns `true` if `value` is `local@scope` for some scope in `scopes`.
///
/// `local` must be non-empty and must not contain `@`. The part after the
/// separating `@` must equal the scope (ignoring ASCII case if `ignore_case`).
/// An empty `scopes` slice never matches.
///
/// # Examples
///
/// ```
/// use attrscope::is_exactly_scoped;
///
/// let scopes = ["example.com"];
/// assert!(is_exactly_scoped("staff@example.com", &scopes, false));
/// assert!(!is_exactly_scoped("staff@sub.example.com", &scopes, false));
/// assert!(!is_exactly_scoped("a@b@example.com", &scopes, false));
/// assert!(is_exactly_scoped("staff@EXAMPLE.COM", &scopes, true));
/// ```
pub fn is_exactly_scoped<S: AsRef<str>>(value: &str, scopes: &[S], ignore_case: bool) -> bool {
    scopes.iter().any(|scope| {
        strip_scope(value, scope.as_ref(), ignore_case)
            .and_then(|head| head.strip_suffix('@'))
            .is_some_and(is_local_part)
    })
}

/// Returns `true` if `value` ends in one of `scopes` on a `.` or `@` boundary.
///
/// Two shapes are accepted for each scope `s`:
/// - bare domain: `s`, or `prefix` + `s` where `prefix` ends with `.` and
///   contains no `@` (`dept.s`, `a.b.s`, `.s`)
/// - scoped: `local@s` or `local@sub.s`, where `local` is non-empty and
///   neither part contains `@`
///
/// # Examples
///
/// ```
/// use attrscope::is_suffix_scoped;
///
/// let scopes = ["example.com"];
/// assert!(is_suffix_scoped("engineering.example.com", &scopes, false));
/// assert!(is_suffix_scoped("user@gsb.example.com", &scopes, false));
/// assert!(!is_suffix_scoped("invalid-example.com", &scopes, false));
/// assert!(!is_suffix_scoped("@example.com", &scopes, false));
/// ```
pub fn is_suffix_scoped<S: AsRef<str>>(value: &str, scopes: &[S], ignore_case: bool) -> bool {
    scopes.iter().any(|scope| {
        strip_scope(value, scope.as_ref(), ignore_case)
            .is_some_and(|head| is_subdomain_prefix(head) || is_scoped_prefix(head))
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Strips a literal `scope` off the end of `value`, returning what precedes it.
///
/// Shared by both predicates so that scope comparison happens in exactly one
/// place. Returns `None` if `value` does not end with `scope`.
fn strip_scope<'a>(value: &'a str, scope: &str, ignore_case: bool) -> Option<&'a str> {
    let split = value.len().checked_sub(scope.len())?;
    // `get` rejects splits inside a multi-byte character.
    let head = value.get(..split)?;
    let tail = value.get(split..)?;

    let same = if ignore_case {
        tail.eq_ignore_ascii_case(scope)
    } else {
        tail == scope
    };

    same.then_some(head)
}

/// One or more characters, none of them `@`.
fn is_local_part(local: &str) -> bool {
    !local.is_empty() && !local.contains('@')
}

/// Empty, or a dotted label sequence ending in `.` with no `@`.
fn is_subdomain_prefix(prefix: &str) -> bool {
    prefix.is_empty() || (prefix.ends_with('.') && !prefix.contains('@'))
}

/// `local@` followed by an optional subdomain prefix.
fn is_scoped_prefix(head: &str) -> bool {
    head.split_once('@')
        .is_some_and(|(local, domain)| is_local_part(local) && is_subdomain_prefix(domain))
}

// ============================================================================
// Tests
// ============================================================================
