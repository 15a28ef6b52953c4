use crate::domain::{BumpKind, Classification};
use crate::error::{Result, SemverLabelsError};
use regex::Regex;
use tracing::debug;

pub const DEFAULT_INITIAL_LABEL_REGEXP: &str = r"(?i)initial.release|semver(.|::)initial";
pub const DEFAULT_MAJOR_LABEL_REGEXP: &str =
    r"(?i)(major|breaking).release|semver(.|::)(major|breaking)";
pub const DEFAULT_MINOR_LABEL_REGEXP: &str =
    r"(?i)(minor|feature).release|semver(.|::)(minor|feature)";
pub const DEFAULT_PATCH_LABEL_REGEXP: &str = r"(?i)(patch|fix).release|semver(.|::)(patch|fix)";
pub const DEFAULT_PRERELEASE_LABEL_REGEXP: &str = r"(?i)pre.?release";

/// Uncompiled label patterns, as read from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPatterns {
    pub initial: String,
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub prerelease: String,
}

impl Default for LabelPatterns {
    fn default() -> Self {
        LabelPatterns {
            initial: DEFAULT_INITIAL_LABEL_REGEXP.to_string(),
            major: DEFAULT_MAJOR_LABEL_REGEXP.to_string(),
            minor: DEFAULT_MINOR_LABEL_REGEXP.to_string(),
            patch: DEFAULT_PATCH_LABEL_REGEXP.to_string(),
            prerelease: DEFAULT_PRERELEASE_LABEL_REGEXP.to_string(),
        }
    }
}

/// The five label regexes, compiled once per invocation
#[derive(Debug, Clone)]
pub struct LabelRegexSet {
    initial: Regex,
    major: Regex,
    minor: Regex,
    patch: Regex,
    prerelease: Regex,
}

impl LabelRegexSet {
    pub fn new(patterns: &LabelPatterns) -> Result<Self> {
        Ok(LabelRegexSet {
            initial: compile("initial-label-regexp", &patterns.initial)?,
            major: compile("major-label-regexp", &patterns.major)?,
            minor: compile("minor-label-regexp", &patterns.minor)?,
            patch: compile("patch-label-regexp", &patterns.patch)?,
            prerelease: compile("prerelease-label-regexp", &patterns.prerelease)?,
        })
    }

    /// Maps a label set to a single bump kind.
    ///
    /// Each label is tested against every pattern, so one label may count for
    /// several kinds. More than one distinct primary kind (initial, major,
    /// minor, patch) across the set is an error. A prerelease label only sets
    /// the prerelease modifier.
    pub fn classify<S: AsRef<str>>(&self, labels: &[S]) -> Result<Classification> {
        let mut kind = BumpKind::None;
        let mut prerelease = false;

        for label in labels.iter().map(AsRef::as_ref) {
            if self.prerelease.is_match(label) {
                debug!(label, "prerelease label");
                prerelease = true;
            }

            let primaries = [
                (&self.initial, BumpKind::Initial),
                (&self.major, BumpKind::Major),
                (&self.minor, BumpKind::Minor),
                (&self.patch, BumpKind::Patch),
            ];

            for (re, matched) in primaries {
                if !re.is_match(label) {
                    continue;
                }
                debug!(label, kind = ?matched, "semver label");
                if kind != BumpKind::None && kind != matched {
                    return Err(SemverLabelsError::MultipleSemverLabels);
                }
                kind = matched;
            }
        }

        Ok(Classification { kind, prerelease })
    }
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| SemverLabelsError::InvalidRegex {
        name: name.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(labels: &[&str]) -> Result<Classification> {
        LabelRegexSet::new(&LabelPatterns::default())
            .unwrap()
            .classify(labels)
    }

    #[test]
    fn test_default_patterns_compile() {
        assert!(LabelRegexSet::new(&LabelPatterns::default()).is_ok());
    }

    #[test]
    fn test_single_primary_labels() {
        assert_eq!(classify(&["initial release"]).unwrap().kind, BumpKind::Initial);
        assert_eq!(classify(&["breaking.release"]).unwrap().kind, BumpKind::Major);
        assert_eq!(classify(&["semver::major"]).unwrap().kind, BumpKind::Major);
        assert_eq!(classify(&["Feature Release"]).unwrap().kind, BumpKind::Minor);
        assert_eq!(classify(&["semver-minor"]).unwrap().kind, BumpKind::Minor);
        assert_eq!(classify(&["patch.release"]).unwrap().kind, BumpKind::Patch);
        assert_eq!(classify(&["semver::fix"]).unwrap().kind, BumpKind::Patch);
    }

    #[test]
    fn test_no_match_is_none() {
        let result = classify(&["documentation", "backend"]).unwrap();
        assert_eq!(
            result,
            Classification {
                kind: BumpKind::None,
                prerelease: false
            }
        );
        assert_eq!(classify(&[]).unwrap().kind, BumpKind::None);
    }

    #[test]
    fn test_two_primary_kinds_fail() {
        assert!(matches!(
            classify(&["feature.release", "breaking.release"]),
            Err(SemverLabelsError::MultipleSemverLabels)
        ));
        assert!(matches!(
            classify(&["initial.release", "patch.release"]),
            Err(SemverLabelsError::MultipleSemverLabels)
        ));
    }

    #[test]
    fn test_same_kind_from_two_labels_is_allowed() {
        let result = classify(&["patch.release", "semver::fix"]).unwrap();
        assert_eq!(result.kind, BumpKind::Patch);
    }

    #[test]
    fn test_one_label_matching_two_kinds_fails() {
        let patterns = LabelPatterns {
            minor: "(?i)release".to_string(),
            ..LabelPatterns::default()
        };
        let set = LabelRegexSet::new(&patterns).unwrap();
        assert!(matches!(
            set.classify(&["patch.release"]),
            Err(SemverLabelsError::MultipleSemverLabels)
        ));
    }

    #[test]
    fn test_prerelease_is_a_modifier() {
        let result = classify(&["prerelease", "minor.release"]).unwrap();
        assert_eq!(result.kind, BumpKind::Minor);
        assert!(result.prerelease);

        let alone = classify(&["pre-release"]).unwrap();
        assert_eq!(alone.kind, BumpKind::None);
        assert!(alone.prerelease);
    }

    #[test]
    fn test_prerelease_label_does_not_change_primary_kind() {
        for labels in [
            vec!["major.release"],
            vec!["semver::patch"],
            vec!["unrelated"],
            vec!["initial.release"],
        ] {
            let without = classify(&labels).unwrap();
            let mut with = labels.clone();
            with.push("Pre Release");
            let with = classify(&with).unwrap();
            assert_eq!(without.kind, with.kind);
            assert!(with.prerelease);
        }
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let patterns = LabelPatterns {
            patch: "(unclosed".to_string(),
            ..LabelPatterns::default()
        };
        match LabelRegexSet::new(&patterns) {
            Err(SemverLabelsError::InvalidRegex { name, .. }) => {
                assert_eq!(name, "patch-label-regexp")
            }
            other => panic!("expected InvalidRegex, got {:?}", other),
        }
    }
}
