//! Property-based tests using proptest.
//!
//! Checks sanitizer invariants over generated scopes, values and bags.

use proptest::prelude::*;

use crate::{
    AttributeBag, FilterPolicy, SourceMetadata, is_exactly_scoped, is_suffix_scoped, sanitize,
};

const SCOPED: &str = "eduPersonPrincipalName";
const SCOPE_VALUE: &str = "schacHomeOrganization";
const SUFFIXED: &str = "department";

fn policy(ignore_case: bool) -> FilterPolicy {
    FilterPolicy::default()
        .with_suffix_scope_attribute(SUFFIXED)
        .with_ignore_case(ignore_case)
}

fn domain() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9-]{1,6}", 1..4).prop_map(|labels| labels.join("."))
}

/// Values skewed towards the shapes the matchers care about.
fn any_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,5}@(example\\.com|EXAMPLE\\.com|other\\.org)",
        "([a-z]{1,5}\\.)?(example\\.com|example\\.org)",
        "[a-z@.]{0,12}",
        any::<String>(),
    ]
}

fn any_bag() -> impl Strategy<Value = AttributeBag> {
    let values = || prop::collection::vec(any_value(), 0..4);
    (values(), values(), values(), values()).prop_map(|(scoped, scope_value, suffixed, other)| {
        AttributeBag::from([
            (SCOPED.to_string(), scoped),
            (SCOPE_VALUE.to_string(), scope_value),
            (SUFFIXED.to_string(), suffixed),
            ("cn".to_string(), other),
        ])
    })
}

fn any_scopes() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![Just("example.com".to_string()), domain()],
        0..3,
    )
}

proptest! {
    // ========================================================================
    // Sanitizer Invariants
    // ========================================================================

    /// A second pass over the output removes nothing.
    #[test]
    fn sanitize_is_idempotent(bag in any_bag(), scopes in any_scopes(), ignore_case: bool) {
        let policy = policy(ignore_case);
        let source = SourceMetadata::new().with_scopes(scopes);

        let mut once = bag;
        sanitize(&policy, &source, &mut once);
        let mut twice = once.clone();
        let outcome = sanitize(&policy, &source, &mut twice);

        prop_assert_eq!(&once, &twice);
        prop_assert!(outcome.report().is_some_and(|report| report.is_unchanged()));
    }

    /// Surviving values satisfy their category's rule and no checked
    /// attribute is left empty.
    #[test]
    fn survivors_are_scoped(bag in any_bag(), scopes in any_scopes(), ignore_case: bool) {
        let source = SourceMetadata::new().with_scopes(scopes.clone());
        let mut bag = bag;
        sanitize(&policy(ignore_case), &source, &mut bag);

        if let Some(values) = bag.get(SCOPED) {
            prop_assert!(!values.is_empty());
            for value in values {
                prop_assert!(is_exactly_scoped(value, &scopes, ignore_case));
            }
        }
        if let Some(values) = bag.get(SUFFIXED) {
            prop_assert!(!values.is_empty());
            for value in values {
                prop_assert!(is_suffix_scoped(value, &scopes, ignore_case));
            }
        }
        if let Some(values) = bag.get(SCOPE_VALUE) {
            prop_assert_eq!(values.len(), 1);
            prop_assert!(scopes.contains(&values[0]));
        }
    }

    /// Without scopes every checked attribute goes and the rest stays.
    #[test]
    fn no_scope_removes_checked_attributes(bag in any_bag(), ignore_case: bool) {
        let untouched = bag["cn"].clone();
        let mut bag = bag;
        sanitize(&policy(ignore_case), &SourceMetadata::new(), &mut bag);

        prop_assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["cn"]);
        prop_assert_eq!(&bag["cn"], &untouched);
    }

    /// An exempt entity never has its bag touched, scopes or not.
    #[test]
    fn exemption_short_circuits(bag in any_bag(), scopes in any_scopes()) {
        let policy = policy(false).with_exempt_entity("https://idp.example.com");
        let source = SourceMetadata::new()
            .with_entity_id("https://idp.example.com")
            .with_scopes(scopes);

        let mut filtered = bag.clone();
        let outcome = sanitize(&policy, &source, &mut filtered);

        prop_assert!(outcome.is_exempted());
        prop_assert_eq!(filtered, bag);
    }

    /// Values that were never checked are never touched.
    #[test]
    fn unlisted_attributes_are_kept(bag in any_bag(), scopes in any_scopes()) {
        let source = SourceMetadata::new().with_scopes(scopes);
        let mut filtered = bag.clone();
        sanitize(&policy(false), &source, &mut filtered);

        prop_assert_eq!(&filtered["cn"], &bag["cn"]);
    }

    // ========================================================================
    // Matcher Properties
    // ========================================================================

    /// `local@scope` matches exactly when `local` is non-empty and has no `@`.
    #[test]
    fn exact_match_iff_valid_local_part(local in "[a-z@.+]{0,8}", scope in domain()) {
        let value = format!("{local}@{scope}");
        let expected = !local.is_empty() && !local.contains('@');

        prop_assert_eq!(is_exactly_scoped(&value, &[&scope], false), expected);
    }

    /// Any dotted subdomain of a scope is suffix-scoped.
    #[test]
    fn subdomains_are_suffix_scoped(sub in domain(), scope in domain()) {
        let bare = format!("{sub}.{scope}");
        let scoped = format!("user@{sub}.{scope}");

        prop_assert!(is_suffix_scoped(&bare, &[&scope], false));
        prop_assert!(is_suffix_scoped(&scoped, &[&scope], false));
    }

    /// Exact matches are always suffix matches too.
    #[test]
    fn exact_implies_suffix(value in any_value(), scopes in any_scopes(), ignore_case: bool) {
        if is_exactly_scoped(&value, &scopes, ignore_case) {
            prop_assert!(is_suffix_scoped(&value, &scopes, ignore_case));
        }
    }

    /// Dots in a scope are literal characters.
    #[test]
    fn scope_dots_are_literal(local in "[a-z]{1,5}", left in "[a-z]{1,5}", right in "[a-z]{1,5}", c in "[a-z]") {
        let scope = format!("{left}.{right}");
        let value = format!("{local}@{left}{c}{right}");

        prop_assert!(!is_exactly_scoped(&value, &[&scope], false));
        prop_assert!(!is_suffix_scoped(&value, &[&scope], false));
    }

    /// Ignoring case accepts the upper-cased form of a matching value.
    #[test]
    fn ignore_case_accepts_upper_case(local in "[a-z]{1,5}", scope in "[a-z]{1,5}\\.[a-z]{2,3}") {
        let value = format!("{local}@{}", scope.to_ascii_uppercase());

        prop_assert!(is_exactly_scoped(&value, &[&scope], true));
        prop_assert!(!is_exactly_scoped(&value, &[&scope], false));
    }
}
