use crate::error::{Result, SemverLabelsError};
use crate::gitlab::MergeRequestApi;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Header GitLab reads personal, project and group access tokens from
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Blocking client for the GitLab REST API v4
pub struct GitLabClient {
    base_url: Url,
    token: Option<String>,
    agent: ureq::Agent,
}

/// The part of a merge request response the tool reads
#[derive(Debug, Deserialize)]
struct MergeRequest {
    iid: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    labels: Vec<String>,
}

impl GitLabClient {
    /// Create a client for the instance at `base_url`
    ///
    /// An empty `token` sends unauthenticated requests.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| {
            SemverLabelsError::gitlab(format!("invalid GitLab URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SemverLabelsError::gitlab(format!(
                "invalid GitLab URL '{}'",
                base_url
            )));
        }

        Ok(GitLabClient {
            base_url,
            token: Some(token.to_string()).filter(|t| !t.is_empty()),
            agent: ureq::AgentBuilder::new().build(),
        })
    }

    fn merge_request_url(&self, project: &str, iid: u64) -> Result<Url> {
        let iid = iid.to_string();
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SemverLabelsError::gitlab("GitLab URL cannot take a path"))?
            .pop_if_empty()
            .extend(&[
                "api",
                "v4",
                "projects",
                project,
                "merge_requests",
                iid.as_str(),
            ]);
        Ok(url)
    }
}

impl MergeRequestApi for GitLabClient {
    fn merge_request_labels(&self, project: &str, iid: u64) -> Result<Vec<String>> {
        let url = self.merge_request_url(project, iid)?;
        debug!(%url, "get merge request");

        let mut request = self.agent.request_url("GET", &url);
        if let Some(token) = &self.token {
            request = request.set(TOKEN_HEADER, token);
        }

        let merge_request: MergeRequest = request
            .call()
            .map_err(|e| {
                SemverLabelsError::gitlab(format!(
                    "failed to get information about merge request: {}",
                    e
                ))
            })?
            .into_json()
            .map_err(|e| {
                SemverLabelsError::gitlab(format!("invalid merge request response: {}", e))
            })?;

        debug!(iid = merge_request.iid, title = %merge_request.title, "found merge request");
        Ok(merge_request.labels)
    }
}
