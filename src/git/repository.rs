use crate::domain::{ResolvedTag, TagKind, TagReference};
use crate::error::{Result, SemverLabelsError};
use crate::git::TAGS_REFSPEC;
use git2::{Cred, FetchOptions, ReferenceType, RemoteCallbacks, Repository as Git2Repo};
use std::path::Path;
use tracing::debug;

/// Username GitLab expects alongside an access token over HTTPS
const TOKEN_USERNAME: &str = "oauth2";

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open the repository whose work tree (or git dir) is `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::open(path).map_err(SemverLabelsError::RepoOpen)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

impl super::Repository for Git2Repository {
    fn fetch_tags(&self, remote: &str, token: &str) -> Result<()> {
        let fetch_error = |source: git2::Error| SemverLabelsError::Fetch {
            remote: remote.to_string(),
            source,
        };

        let mut remote_handle = self.repo.find_remote(remote).map_err(fetch_error)?;

        let mut callbacks = RemoteCallbacks::new();
        if !token.is_empty() {
            // libgit2 keeps asking while credentials are rejected; answer once.
            let mut attempted = false;
            callbacks.credentials(move |_url, _username_from_url, _allowed_types| {
                if attempted {
                    return Err(git2::Error::from_str("authentication with token failed"));
                }
                attempted = true;
                Cred::userpass_plaintext(TOKEN_USERNAME, token)
            });
        }

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        remote_handle
            .fetch(&[TAGS_REFSPEC], Some(&mut fetch_options), None)
            .map_err(fetch_error)?;

        let stats = remote_handle.stats();
        debug!(
            received_objects = stats.received_objects(),
            "fetched tags"
        );

        Ok(())
    }

    fn tag_references(&self) -> Result<Vec<TagReference>> {
        let mut references = Vec::new();

        for reference in self.repo.references_glob("refs/tags/*")? {
            let reference = reference?;

            if reference.kind() == Some(ReferenceType::Symbolic) {
                debug!(name = ?reference.name(), "skip symbolic tag reference");
                continue;
            }

            let (Some(name), Some(target)) = (reference.name(), reference.target()) else {
                continue;
            };

            references.push(TagReference::new(name, target));
        }

        Ok(references)
    }

    fn resolve_tag(&self, reference: &TagReference) -> Result<Option<ResolvedTag>> {
        if let Ok(tag) = self.repo.find_tag(reference.target) {
            return Ok(tag.tagger().map(|tagger| {
                ResolvedTag::new(&reference.name, tagger.when().seconds(), TagKind::Annotated)
            }));
        }

        if let Ok(commit) = self.repo.find_commit(reference.target) {
            return Ok(Some(ResolvedTag::new(
                &reference.name,
                commit.author().when().seconds(),
                TagKind::Lightweight,
            )));
        }

        Ok(None)
    }
}
