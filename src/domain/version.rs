use crate::domain::prerelease;
use crate::error::{Result, SemverLabelsError};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Semantic version per semver 2.0.0
///
/// Equality ignores build metadata: `1.2.3+a` and `1.2.3+b` are the same
/// version.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    inner: semver::Version,
}

impl Version {
    /// Create a release version with no prerelease or build metadata
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            inner: semver::Version::new(major, minor, patch),
        }
    }

    /// Parse a version, accepting an optional leading `v` (e.g. "v1.2.3")
    pub fn parse(version: &str) -> Result<Self> {
        let clean = version.strip_prefix('v').unwrap_or(version);
        let inner = semver::Version::parse(clean)
            .map_err(|e| SemverLabelsError::invalid_semver(version, e))?;
        Ok(Version { inner })
    }

    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    pub fn prerelease(&self) -> &str {
        self.inner.pre.as_str()
    }

    pub fn build(&self) -> &str {
        self.inner.build.as_str()
    }

    /// Increment patch, dropping prerelease and build metadata
    pub fn bump_patch(&self, prerelease: bool) -> Result<Self> {
        let next = semver::Version::new(self.major(), self.minor(), self.increment(self.patch())?);
        self.compose(next, prerelease)
    }

    /// Increment minor and zero patch, dropping prerelease and build metadata
    pub fn bump_minor(&self, prerelease: bool) -> Result<Self> {
        let next = semver::Version::new(self.major(), self.increment(self.minor())?, 0);
        self.compose(next, prerelease)
    }

    /// Increment major and zero minor and patch, dropping prerelease and build metadata
    pub fn bump_major(&self, prerelease: bool) -> Result<Self> {
        let next = semver::Version::new(self.increment(self.major())?, 0, 0);
        self.compose(next, prerelease)
    }

    /// Replace the prerelease identifier with the next counter value.
    ///
    /// The core triple and build metadata are left untouched.
    pub fn bump_prerelease(&self) -> Result<Self> {
        let mut inner = self.inner.clone();
        inner.pre = prerelease::identifier(&prerelease::next_counter(self.prerelease())?)?;
        Ok(Version { inner })
    }

    // The counter continues from the prerelease of the version being bumped,
    // not from the freshly bumped core.
    fn compose(&self, mut next: semver::Version, prerelease: bool) -> Result<Self> {
        if prerelease {
            next.pre = prerelease::identifier(&prerelease::next_counter(self.prerelease())?)?;
        }
        Ok(Version { inner: next })
    }

    fn increment(&self, component: u64) -> Result<u64> {
        component.checked_add(1).ok_or_else(|| {
            SemverLabelsError::invalid_semver(self.to_string(), "version component overflows")
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.inner.cmp_precedence(&other.inner).is_eq()
    }
}

impl FromStr for Version {
    type Err = SemverLabelsError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}

/// Returns true if `version` parses as semver (with optional `v` prefix)
pub fn is_valid(version: &str) -> bool {
    Version::parse(version).is_ok()
}

/// Canonical form of `version`: the `v` prefix is stripped, build metadata kept
pub fn current(version: &str) -> Result<String> {
    trace!(version, "current");
    Ok(Version::parse(version)?.to_string())
}

pub fn bump_patch(version: &str, prerelease: bool) -> Result<String> {
    trace!(version, prerelease, "bump patch");
    Ok(Version::parse(version)?.bump_patch(prerelease)?.to_string())
}

pub fn bump_minor(version: &str, prerelease: bool) -> Result<String> {
    trace!(version, prerelease, "bump minor");
    Ok(Version::parse(version)?.bump_minor(prerelease)?.to_string())
}

pub fn bump_major(version: &str, prerelease: bool) -> Result<String> {
    trace!(version, prerelease, "bump major");
    Ok(Version::parse(version)?.bump_major(prerelease)?.to_string())
}

pub fn bump_prerelease(version: &str) -> Result<String> {
    trace!(version, "bump prerelease");
    Ok(Version::parse(version)?.bump_prerelease()?.to_string())
}
