//! Merge request lookup
//!
//! Labels come from `CI_MERGE_REQUEST_LABELS` when GitLab CI provides it
//! (merge request pipelines). Otherwise the merge request iid is taken from
//! the merge commit message and its labels are fetched from the GitLab API.

pub mod client;

pub use client::GitLabClient;

use crate::boundary::BoundaryWarning;
use crate::error::{Result, SemverLabelsError};
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_COMMIT_MESSAGE_REGEXP: &str =
    r"(?s)(?:^|\n)See merge request (?:\w[\w.+/-]*)?!(\d+)";
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

pub const MERGE_REQUEST_LABELS_ENV: &str = "CI_MERGE_REQUEST_LABELS";
pub const COMMIT_MESSAGE_ENV: &str = "CI_COMMIT_MESSAGE";
pub const PROJECT_ID_ENV: &str = "CI_PROJECT_ID";
pub const SERVER_URL_ENV: &str = "CI_SERVER_URL";

/// Read-only view of environment variables
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;

    /// Value of `name`, treating an empty value as unset
    fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name).filter(|value| !value.is_empty())
    }
}

/// The environment of the running process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Access to merge requests of a GitLab instance
pub trait MergeRequestApi {
    /// Labels of merge request `iid` in `project` (numeric id or full path)
    fn merge_request_labels(&self, project: &str, iid: u64) -> Result<Vec<String>>;
}

impl<T: MergeRequestApi + ?Sized> MergeRequestApi for &T {
    fn merge_request_labels(&self, project: &str, iid: u64) -> Result<Vec<String>> {
        (**self).merge_request_labels(project, iid)
    }
}

/// Extract the merge request iid from a merge commit message
pub fn merge_request_iid(commit_message: &str, re: &Regex) -> Result<Option<u64>> {
    let Some(captures) = re.captures(commit_message) else {
        return Ok(None);
    };
    let Some(iid) = captures.get(1) else {
        return Ok(None);
    };
    iid.as_str()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| SemverLabelsError::gitlab(format!("merge request number is invalid: {}", e)))
}

/// Find the labels of the merge request that produced the current commit.
///
/// `connect` builds the API client and is only called when the labels are not
/// already present in the environment.
///
/// # Returns
/// * `Ok(Some(labels))` - Labels of the merge request
/// * `Ok(None)` - No merge request reference in the commit message
/// * `Err` - Invalid regexp, missing project, or API failure
pub fn resolve_labels<E, A, F>(
    env: &E,
    commit_message_regexp: &str,
    project: &str,
    connect: F,
) -> Result<Option<Vec<String>>>
where
    E: Environment,
    A: MergeRequestApi,
    F: FnOnce() -> Result<A>,
{
    if let Some(labels) = env.non_empty(MERGE_REQUEST_LABELS_ENV) {
        let labels: Vec<String> = labels.split(',').map(str::to_string).collect();
        debug!(?labels, "labels from {}", MERGE_REQUEST_LABELS_ENV);
        return Ok(Some(labels));
    }

    let re = Regex::new(commit_message_regexp).map_err(|source| {
        SemverLabelsError::InvalidRegex {
            name: "commit-message-regexp".to_string(),
            source,
        }
    })?;

    let commit_message = env.var(COMMIT_MESSAGE_ENV).unwrap_or_default();
    let Some(iid) = merge_request_iid(&commit_message, &re)? else {
        BoundaryWarning::MergeRequestNotFound.log();
        return Ok(None);
    };
    debug!(iid, "merge request");

    if project.is_empty() {
        return Err(SemverLabelsError::gitlab(format!(
            "project is not set; use --project or {}",
            PROJECT_ID_ENV
        )));
    }

    let api = connect()?;
    debug!(project, "project");
    let labels = api.merge_request_labels(project, iid)?;
    debug!(?labels, "labels from merge request");
    Ok(Some(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeApi {
        labels: Vec<String>,
        calls: RefCell<Vec<(String, u64)>>,
    }

    impl MergeRequestApi for FakeApi {
        fn merge_request_labels(&self, project: &str, iid: u64) -> Result<Vec<String>> {
            self.calls.borrow_mut().push((project.to_string(), iid));
            Ok(self.labels.clone())
        }
    }

    fn fake(labels: &[&str]) -> FakeApi {
        FakeApi {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_labels_from_environment_skip_api() {
        let env = env(&[(MERGE_REQUEST_LABELS_ENV, "patch.release,backend")]);
        let labels = resolve_labels(&env, DEFAULT_COMMIT_MESSAGE_REGEXP, "1", || -> Result<FakeApi> {
            panic!("API must not be used")
        })
        .unwrap();
        assert_eq!(
            labels,
            Some(vec!["patch.release".to_string(), "backend".to_string()])
        );
    }

    #[test]
    fn test_labels_from_merge_commit() {
        let api = fake(&["feature.release"]);
        let env = env(&[(
            COMMIT_MESSAGE_ENV,
            "Merge branch 'feat' into 'main'\n\nAdd thing\n\nSee merge request group/project!42",
        )]);

        let labels = resolve_labels(&env, DEFAULT_COMMIT_MESSAGE_REGEXP, "123", || Ok(&api)).unwrap();

        assert_eq!(labels, Some(vec!["feature.release".to_string()]));
        assert_eq!(*api.calls.borrow(), vec![("123".to_string(), 42)]);
    }

    #[test]
    fn test_empty_label_variable_falls_back_to_commit() {
        let api = fake(&["semver::major"]);
        let env = env(&[
            (MERGE_REQUEST_LABELS_ENV, ""),
            (COMMIT_MESSAGE_ENV, "See merge request !7"),
        ]);

        let labels = resolve_labels(&env, DEFAULT_COMMIT_MESSAGE_REGEXP, "9", || Ok(&api)).unwrap();
        assert_eq!(labels, Some(vec!["semver::major".to_string()]));
    }

    #[test]
    fn test_no_merge_request_in_commit() {
        let api = fake(&[]);
        let env = env(&[(COMMIT_MESSAGE_ENV, "Fix typo")]);

        let labels = resolve_labels(&env, DEFAULT_COMMIT_MESSAGE_REGEXP, "1", || Ok(&api)).unwrap();
        assert_eq!(labels, None);
        assert!(api.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_project_is_an_error() {
        let api = fake(&[]);
        let env = env(&[(COMMIT_MESSAGE_ENV, "See merge request !3")]);

        assert!(matches!(
            resolve_labels(&env, DEFAULT_COMMIT_MESSAGE_REGEXP, "", || Ok(&api)),
            Err(SemverLabelsError::GitLabApi(_))
        ));
    }

    #[test]
    fn test_connect_failure_is_propagated() {
        let env = env(&[(COMMIT_MESSAGE_ENV, "See merge request !3")]);

        let result = resolve_labels(&env, DEFAULT_COMMIT_MESSAGE_REGEXP, "1", || -> Result<FakeApi> {
            Err(SemverLabelsError::gitlab("invalid URL"))
        });
        assert!(matches!(result, Err(SemverLabelsError::GitLabApi(_))));
    }

    #[test]
    fn test_invalid_commit_message_regexp() {
        let env = env(&[(COMMIT_MESSAGE_ENV, "See merge request !3")]);
        let result = resolve_labels(&env, "(!(\\d+)", "1", || -> Result<FakeApi> {
            panic!("API must not be used")
        });
        assert!(matches!(result, Err(SemverLabelsError::InvalidRegex { .. })));
    }

    #[test]
    fn test_merge_request_iid() {
        let re = Regex::new(DEFAULT_COMMIT_MESSAGE_REGEXP).unwrap();
        assert_eq!(merge_request_iid("See merge request !12", &re).unwrap(), Some(12));
        assert_eq!(
            merge_request_iid("title\n\nSee merge request my-group/sub.project!345", &re).unwrap(),
            Some(345)
        );
        assert_eq!(merge_request_iid("mentions See merge request !1 inline", &re).unwrap(), None);
        assert_eq!(merge_request_iid("", &re).unwrap(), None);
    }

    #[test]
    fn test_merge_request_iid_overflow() {
        let re = Regex::new(DEFAULT_COMMIT_MESSAGE_REGEXP).unwrap();
        assert!(merge_request_iid("See merge request !99999999999999999999999", &re).is_err());
    }
}
