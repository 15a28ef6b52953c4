use crate::cli::{BumpArgs, GlobalArgs};
use crate::error::{Result, SemverLabelsError};
use crate::gitlab::{self, Environment};
use crate::labels::LabelPatterns;
use crate::output::DEFAULT_DOTENV_VAR;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched in the current directory, in order
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".gitlab-ci-semver-labels.yml",
    ".gitlab-ci-semver-labels.yaml",
];

pub const DEFAULT_WORK_TREE: &str = ".";
pub const DEFAULT_REMOTE_NAME: &str = "origin";
pub const DEFAULT_GITLAB_TOKEN_ENV: &str = "GITLAB_TOKEN";
pub const DEFAULT_INITIAL_VERSION: &str = "0.0.0";

/// Contents of `.gitlab-ci-semver-labels.yml`.
///
/// Keys are the long flag names; every key is optional.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct FileConfig {
    pub work_tree: Option<PathBuf>,
    pub remote_name: Option<String>,
    pub fetch_tags: Option<bool>,
    pub gitlab_token_env: Option<String>,
    pub gitlab_url: Option<String>,
    pub project: Option<String>,
    pub dotenv_file: Option<PathBuf>,
    pub dotenv_var: Option<String>,

    pub commit_message_regexp: Option<String>,
    pub fail: Option<bool>,
    pub initial_label_regexp: Option<String>,
    pub initial_version: Option<String>,
    pub major_label_regexp: Option<String>,
    pub minor_label_regexp: Option<String>,
    pub patch_label_regexp: Option<String>,
    pub prerelease: Option<bool>,
    pub prerelease_label_regexp: Option<String>,
}

/// Returns the first config file present in `dir`
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Loads a YAML config file.
///
/// An empty file is the same as no file.
///
/// # Returns
/// * `Ok(FileConfig)` - Parsed configuration
/// * `Err` - If the file cannot be read or is not valid YAML for the known keys
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        SemverLabelsError::config(format!("cannot read config file {}: {}", path.display(), e))
    })?;

    if content.trim().is_empty() {
        return Ok(FileConfig::default());
    }

    serde_yaml::from_str(&content).map_err(|e| {
        SemverLabelsError::config(format!("cannot parse config file {}: {}", path.display(), e))
    })
}

/// Fully resolved, read-only settings for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub work_tree: PathBuf,
    pub remote_name: String,
    pub fetch_tags: bool,
    /// Name of the environment variable holding the GitLab token
    pub gitlab_token_env: String,
    pub gitlab_url: String,
    pub project: String,
    pub dotenv_file: Option<PathBuf>,
    pub dotenv_var: String,

    pub commit_message_regexp: String,
    pub labels: LabelPatterns,
    pub initial_version: String,
    pub fail: bool,
    pub prerelease: bool,
}

impl Settings {
    /// Merge every configuration source.
    ///
    /// Command line values (already merged with their
    /// `GITLAB_CI_SEMVER_LABELS_*` environment variables by clap) win over
    /// the config file. `CI_SERVER_URL` and `CI_PROJECT_ID` stand in as
    /// defaults for `gitlab-url` and `project`.
    pub fn resolve<E: Environment>(
        global: &GlobalArgs,
        bump: Option<&BumpArgs>,
        file: FileConfig,
        env: &E,
    ) -> Self {
        let default_bump = BumpArgs::default();
        let bump = bump.unwrap_or(&default_bump);
        let defaults = LabelPatterns::default();

        Settings {
            work_tree: global
                .work_tree
                .clone()
                .or(file.work_tree)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_TREE)),
            remote_name: pick(&global.remote_name, file.remote_name, DEFAULT_REMOTE_NAME),
            fetch_tags: global.fetch_tags.or(file.fetch_tags).unwrap_or(true),
            gitlab_token_env: pick(
                &global.gitlab_token_env,
                file.gitlab_token_env,
                DEFAULT_GITLAB_TOKEN_ENV,
            ),
            gitlab_url: global
                .gitlab_url
                .clone()
                .or(file.gitlab_url)
                .or_else(|| env.non_empty(gitlab::SERVER_URL_ENV))
                .unwrap_or_else(|| gitlab::DEFAULT_GITLAB_URL.to_string()),
            project: global
                .project
                .clone()
                .or(file.project)
                .or_else(|| env.non_empty(gitlab::PROJECT_ID_ENV))
                .unwrap_or_default(),
            dotenv_file: global
                .dotenv_file
                .clone()
                .or(file.dotenv_file)
                .filter(|path| !path.as_os_str().is_empty()),
            dotenv_var: pick(&global.dotenv_var, file.dotenv_var, DEFAULT_DOTENV_VAR),

            commit_message_regexp: pick(
                &bump.commit_message_regexp,
                file.commit_message_regexp,
                gitlab::DEFAULT_COMMIT_MESSAGE_REGEXP,
            ),
            labels: LabelPatterns {
                initial: pick(
                    &bump.initial_label_regexp,
                    file.initial_label_regexp,
                    &defaults.initial,
                ),
                major: pick(&bump.major_label_regexp, file.major_label_regexp, &defaults.major),
                minor: pick(&bump.minor_label_regexp, file.minor_label_regexp, &defaults.minor),
                patch: pick(&bump.patch_label_regexp, file.patch_label_regexp, &defaults.patch),
                prerelease: pick(
                    &bump.prerelease_label_regexp,
                    file.prerelease_label_regexp,
                    &defaults.prerelease,
                ),
            },
            initial_version: pick(
                &bump.initial_version,
                file.initial_version,
                DEFAULT_INITIAL_VERSION,
            ),
            fail: bump.fail.or(file.fail).unwrap_or(false),
            prerelease: bump.prerelease.or(file.prerelease).unwrap_or(false),
        }
    }
}

fn pick(cli: &Option<String>, file: Option<String>, default: &str) -> String {
    cli.clone()
        .or(file)
        .unwrap_or_else(|| default.to_string())
}
