/// Which semver component a run increments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    /// No version change
    None,
    /// Write the configured initial version
    Initial,
    Prerelease,
    Patch,
    Minor,
    Major,
}

impl BumpKind {
    /// Kinds that can be selected by a merge request label on their own
    pub fn is_primary(self) -> bool {
        matches!(
            self,
            BumpKind::Initial | BumpKind::Patch | BumpKind::Minor | BumpKind::Major
        )
    }
}

/// How the next version is decided for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the canonical form of the latest tag
    Current,
    /// Apply the given bump without consulting labels
    Explicit(BumpKind),
    /// Derive the bump from merge request labels
    Labels,
}

/// Outcome of classifying a label set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: BumpKind,
    /// A prerelease label was present
    pub prerelease: bool,
}
