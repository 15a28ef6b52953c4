use thiserror::Error;

/// Unified error type for gitlab-ci-semver-labels operations
#[derive(Error, Debug)]
pub enum SemverLabelsError {
    #[error("cannot open git repository: {0}")]
    RepoOpen(#[source] git2::Error),

    #[error("cannot fetch tags from remote '{remote}': {source}")]
    Fetch {
        remote: String,
        #[source]
        source: git2::Error,
    },

    #[error("cannot read git tags: {0}")]
    Git(#[from] git2::Error),

    #[error("'{version}' is not a valid semver: {reason}")]
    InvalidSemver { version: String, reason: String },

    #[error("cannot set prerelease '{prerelease}': {reason}")]
    BadPrerelease { prerelease: String, reason: String },

    #[error("no tag found")]
    NoTagFound,

    #[error("semver is already initialized")]
    AlreadyInitialized,

    #[error("more than 1 semver label")]
    MultipleSemverLabels,

    #[error("no label matched")]
    NoLabelMatched,

    #[error("invalid regexp for {name}: {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results in gitlab-ci-semver-labels
pub type Result<T> = std::result::Result<T, SemverLabelsError>;

impl SemverLabelsError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        SemverLabelsError::Config(msg.into())
    }

    /// Create a GitLab API error with context
    pub fn gitlab(msg: impl Into<String>) -> Self {
        SemverLabelsError::GitLabApi(msg.into())
    }

    pub fn invalid_semver(version: impl Into<String>, reason: impl ToString) -> Self {
        SemverLabelsError::InvalidSemver {
            version: version.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(
            SemverLabelsError::AlreadyInitialized.to_string(),
            "semver is already initialized"
        );
        assert_eq!(SemverLabelsError::NoTagFound.to_string(), "no tag found");
        assert_eq!(
            SemverLabelsError::MultipleSemverLabels.to_string(),
            "more than 1 semver label"
        );
        assert_eq!(SemverLabelsError::NoLabelMatched.to_string(), "no label matched");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SemverLabelsError = io_err.into();
        assert!(matches!(err, SemverLabelsError::Output(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_constructors() {
        assert!(SemverLabelsError::config("bad key")
            .to_string()
            .starts_with("Configuration error"));
        assert!(SemverLabelsError::gitlab("401 Unauthorized")
            .to_string()
            .contains("401"));

        let err = SemverLabelsError::invalid_semver("1.2", "unexpected end of input");
        let msg = err.to_string();
        assert!(msg.contains("'1.2'"), "got: {}", msg);
        assert!(msg.contains("unexpected end of input"), "got: {}", msg);
    }

    #[test]
    fn test_regex_error_names_the_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = SemverLabelsError::InvalidRegex {
            name: "major-label-regexp".to_string(),
            source,
        };
        assert!(err.to_string().contains("major-label-regexp"));
    }
}
