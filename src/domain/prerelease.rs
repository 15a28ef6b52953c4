//! Prerelease counter handling
//!
//! Prereleases are treated as a single monotonic counter rather than a dotted
//! sequence: `1.2.3-4` is followed by `1.2.3-5`. Anything that does not parse
//! as a base-10 integer restarts the counter.

use crate::error::{Result, SemverLabelsError};

/// Returns the next value of a prerelease counter.
///
/// The current identifier is read as a base-10 integer; empty or non-numeric
/// identifiers count as 0. A counter already at `i64::MAX` cannot advance and
/// is reported as `BadPrerelease`.
///
/// # Examples
/// ```
/// use gitlab_ci_semver_labels::domain::prerelease::next_counter;
///
/// assert_eq!(next_counter("").unwrap(), "1");
/// assert_eq!(next_counter("7").unwrap(), "8");
/// assert_eq!(next_counter("alpha").unwrap(), "1");
/// ```
pub fn next_counter(current: &str) -> Result<String> {
    let n = current.parse::<i64>().unwrap_or(0);
    n.checked_add(1)
        .map(|next| next.to_string())
        .ok_or_else(|| SemverLabelsError::BadPrerelease {
            prerelease: current.to_string(),
            reason: "prerelease counter overflows".to_string(),
        })
}

/// Builds a prerelease identifier, rejecting anything outside the semver grammar
pub fn identifier(value: &str) -> Result<semver::Prerelease> {
    semver::Prerelease::new(value).map_err(|e| SemverLabelsError::BadPrerelease {
        prerelease: value.to_string(),
        reason: e.to_string(),
    })
}
