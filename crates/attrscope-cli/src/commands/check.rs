//! Ad-hoc scope checks.

use anyhow::{Result, bail};
use attrscope::ScopeMatch;
use tracing::debug;

/// Prints `accept` or `reject` per value; fails if any value is rejected.
pub fn run(scopes: &[String], suffix: bool, ignore_case: bool, values: &[String]) -> Result<()> {
    let rule = if suffix {
        ScopeMatch::Suffix
    } else {
        ScopeMatch::Exact
    };
    debug!(?rule, ?scopes, ignore_case, "Checking values");

    let mut rejected = 0;
    for value in values {
        if rule.matches(value, scopes, ignore_case) {
            println!("accept\t{value}");
        } else {
            println!("reject\t{value}");
            rejected += 1;
        }
    }

    if rejected > 0 {
        bail!("{rejected} of {} values rejected", values.len());
    }

    Ok(())
}
