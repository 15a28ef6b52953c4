//! Git tag discovery
//!
//! This module provides a trait-based abstraction over the few Git operations
//! the tool needs: fetching tags, listing tag references and resolving each one
//! to the time it was tagged.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! [latest_semver_tag] works against any implementation; [find_last_tag] opens
//! a repository on disk and runs it.
//!
//! ```rust
//! # use gitlab_ci_semver_labels::git::{latest_semver_tag, MockRepository, TagQuery};
//! let mut repo = MockRepository::new();
//! repo.add_lightweight("1.0.0", 100);
//! repo.add_annotated("1.1.0", 200);
//!
//! let query = TagQuery::local();
//! assert_eq!(latest_semver_tag(&repo, &query).unwrap(), Some("1.1.0".to_string()));
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::boundary::BoundaryWarning;
use crate::domain::version;
use crate::domain::{ResolvedTag, TagReference};
use crate::error::Result;
use std::path::Path;
use tracing::debug;

/// Refspec used to mirror all remote tags into the local repository
pub const TAGS_REFSPEC: &str = "+refs/tags/*:refs/tags/*";

/// Git operations needed to find the latest tag
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// `git2::Error` to the matching [crate::error::SemverLabelsError] variant.
///
/// ## Implementations
///
/// - [Git2Repository](repository::Git2Repository): Real Git implementation using the `git2` crate
/// - [MockRepository](mock::MockRepository): Test implementation with in-memory tags
pub trait Repository {
    /// Fetch [TAGS_REFSPEC] from `remote`
    ///
    /// A non-empty `token` is sent as HTTP Basic credentials with the
    /// username `oauth2`; an empty token fetches unauthenticated. Being
    /// already up to date is not an error.
    fn fetch_tags(&self, remote: &str, token: &str) -> Result<()>;

    /// List every direct (non-symbolic) reference under `refs/tags/`
    fn tag_references(&self) -> Result<Vec<TagReference>>;

    /// Resolve a tag reference to its tagging time
    ///
    /// # Returns
    /// * `Ok(Some(tag))` - The reference points at an annotated tag or a commit
    /// * `Ok(None)` - The reference points at anything else; it is ignored
    fn resolve_tag(&self, reference: &TagReference) -> Result<Option<ResolvedTag>>;
}

/// Where and how to look for the latest tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagQuery {
    pub remote_name: String,
    /// Empty for unauthenticated fetches
    pub token: String,
    pub fetch_tags: bool,
}

impl TagQuery {
    /// Query that only scans local tags
    pub fn local() -> Self {
        TagQuery {
            remote_name: "origin".to_string(),
            token: String::new(),
            fetch_tags: false,
        }
    }
}

/// Open the repository at `path` and return its most recent semver tag
pub fn find_last_tag(path: &Path, query: &TagQuery) -> Result<Option<String>> {
    debug!(path = %path.display(), remote = %query.remote_name, fetch = query.fetch_tags, "find last tag");
    let repo = Git2Repository::open(path)?;
    latest_semver_tag(&repo, query)
}

/// Return the semver-valid tag with the latest tagging time.
///
/// Ordering is chronological, not by semver precedence. Tags that resolve to
/// neither a commit nor an annotated tag, and tags that are not valid semver,
/// are skipped. With equal timestamps the first tag listed wins.
pub fn latest_semver_tag<R: Repository>(repo: &R, query: &TagQuery) -> Result<Option<String>> {
    if query.fetch_tags {
        debug!(remote = %query.remote_name, "fetch tags");
        repo.fetch_tags(&query.remote_name, &query.token)?;
    }

    let mut latest: Option<ResolvedTag> = None;

    for reference in repo.tag_references()? {
        let Some(resolved) = repo.resolve_tag(&reference)? else {
            debug!(tag = %reference.name, "tag points at neither a commit nor a tag object");
            continue;
        };

        if !version::is_valid(&resolved.name) {
            BoundaryWarning::InvalidSemverTag {
                tag: resolved.name.clone(),
            }
            .log();
            continue;
        }

        debug!(tag = %resolved.name, timestamp = resolved.timestamp, kind = ?resolved.kind, "semver tag");
        if latest
            .as_ref()
            .map_or(true, |current| resolved.timestamp > current.timestamp)
        {
            latest = Some(resolved);
        }
    }

    let latest = latest.map(|tag| tag.name);
    debug!(tag = ?latest, "most recent tag");
    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SemverLabelsError;

    #[test]
    fn test_no_tags() {
        let repo = MockRepository::new();
        assert_eq!(latest_semver_tag(&repo, &TagQuery::local()).unwrap(), None);
    }

    #[test]
    fn test_latest_by_time_not_by_version() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("2.0.0", 100);
        repo.add_lightweight("1.5.0", 300);
        repo.add_annotated("1.9.0", 200);

        let tag = latest_semver_tag(&repo, &TagQuery::local()).unwrap();
        assert_eq!(tag.as_deref(), Some("1.5.0"));
    }

    #[test]
    fn test_annotated_tag_time_wins() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("1.0.0", 100);
        repo.add_annotated("1.0.1", 150);

        let tag = latest_semver_tag(&repo, &TagQuery::local()).unwrap();
        assert_eq!(tag.as_deref(), Some("1.0.1"));
    }

    #[test]
    fn test_invalid_semver_tags_are_skipped() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("1.0.0", 100);
        repo.add_lightweight("latest", 500);
        repo.add_annotated("release-2", 600);

        let tag = latest_semver_tag(&repo, &TagQuery::local()).unwrap();
        assert_eq!(tag.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_unresolvable_tags_are_ignored() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("1.0.0", 100);
        repo.add_unresolvable("9.9.9");

        let tag = latest_semver_tag(&repo, &TagQuery::local()).unwrap();
        assert_eq!(tag.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_v_prefixed_tag_keeps_its_name() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("v3.2.1", 100);

        let tag = latest_semver_tag(&repo, &TagQuery::local()).unwrap();
        assert_eq!(tag.as_deref(), Some("v3.2.1"));
    }

    #[test]
    fn test_fetch_only_when_requested() {
        let repo = MockRepository::new();
        latest_semver_tag(&repo, &TagQuery::local()).unwrap();
        assert!(repo.fetches().is_empty());

        let query = TagQuery {
            remote_name: "upstream".to_string(),
            token: "secret".to_string(),
            fetch_tags: true,
        };
        latest_semver_tag(&repo, &query).unwrap();
        assert_eq!(
            repo.fetches(),
            vec![("upstream".to_string(), "secret".to_string())]
        );
    }

    #[test]
    fn test_fetch_failure_is_fatal() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("1.0.0", 100);
        repo.fail_fetch();

        let query = TagQuery {
            fetch_tags: true,
            ..TagQuery::local()
        };
        assert!(matches!(
            latest_semver_tag(&repo, &query),
            Err(SemverLabelsError::Fetch { .. })
        ));
    }

    #[test]
    fn test_find_last_tag_rejects_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_last_tag(dir.path(), &TagQuery::local()),
            Err(SemverLabelsError::RepoOpen(_))
        ));
    }
}
