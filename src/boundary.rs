use std::fmt;
use tracing::warn;

/// Non-fatal conditions that end or narrow a run without failing it.
/// These are reported at WARNING level and the process still exits 0.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Commit message carries no merge request reference
    MergeRequestNotFound,
    /// None of the merge request labels selects a bump
    NoLabelMatched { labels: Vec<String> },
    /// Tag exists but cannot be parsed as a semantic version
    InvalidSemverTag { tag: String },
}

impl BoundaryWarning {
    /// Report the warning through the log
    pub fn log(&self) {
        warn!("{}", self);
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::MergeRequestNotFound => write!(f, "Merge request not found"),
            BoundaryWarning::NoLabelMatched { labels } => {
                if labels.is_empty() {
                    write!(f, "No semver label matched: merge request has no labels")
                } else {
                    write!(f, "No semver label matched in: {}", labels.join(", "))
                }
            }
            BoundaryWarning::InvalidSemverTag { tag } => {
                write!(f, "{} is not a valid semver", tag)
            }
        }
    }
}
