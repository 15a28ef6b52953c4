//! Command line surface
//!
//! Every flag can also be set through `GITLAB_CI_SEMVER_LABELS_<FLAG>` (upper
//! case, `-` replaced by `_`) or the config file. Fields are `Option`s so that
//! the config file can sit between the environment and built-in defaults; see
//! [crate::config::Settings::resolve].

pub mod orchestration;

use crate::domain::{BumpKind, Mode};
use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gitlab-ci-semver-labels",
    about = "Bump the semver for a GitLab CI project based on merge request labels",
    version
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn mode(&self) -> Mode {
        match &self.command {
            Command::Current => Mode::Current,
            Command::Bump(bump) => bump.mode(),
        }
    }

    pub fn bump_args(&self) -> Option<&BumpArgs> {
        match &self.command {
            Command::Current => None,
            Command::Bump(bump) => Some(bump),
        }
    }
}

/// Flags shared by every subcommand
#[derive(clap::Args, Debug, Default, Clone, PartialEq)]
pub struct GlobalArgs {
    /// DIR to be used for git operations [default: .]
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        env = "GITLAB_CI_SEMVER_LABELS_WORK_TREE"
    )]
    pub work_tree: Option<PathBuf>,

    /// NAME of git remote [default: origin]
    #[arg(
        short = 'r',
        long,
        global = true,
        value_name = "NAME",
        env = "GITLAB_CI_SEMVER_LABELS_REMOTE_NAME"
    )]
    pub remote_name: Option<String>,

    /// Fetch tags from git repo [default: true]
    #[arg(
        short = 'T',
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        env = "GITLAB_CI_SEMVER_LABELS_FETCH_TAGS"
    )]
    pub fetch_tags: Option<bool>,

    /// Name for environment VAR with GitLab token [default: GITLAB_TOKEN]
    #[arg(
        short = 't',
        long,
        global = true,
        value_name = "VAR",
        env = "GITLAB_CI_SEMVER_LABELS_GITLAB_TOKEN_ENV"
    )]
    pub gitlab_token_env: Option<String>,

    /// URL of the GitLab instance [default: $CI_SERVER_URL or https://gitlab.com]
    #[arg(
        short = 'g',
        long,
        global = true,
        value_name = "URL",
        env = "GITLAB_CI_SEMVER_LABELS_GITLAB_URL"
    )]
    pub gitlab_url: Option<String>,

    /// PROJECT id or name [default: $CI_PROJECT_ID]
    #[arg(
        short = 'p',
        long,
        global = true,
        value_name = "PROJECT",
        env = "GITLAB_CI_SEMVER_LABELS_PROJECT"
    )]
    pub project: Option<String>,

    /// Write dotenv format to FILE
    #[arg(
        short = 'd',
        long,
        global = true,
        value_name = "FILE",
        env = "GITLAB_CI_SEMVER_LABELS_DOTENV_FILE"
    )]
    pub dotenv_file: Option<PathBuf>,

    /// Variable NAME in dotenv file [default: VERSION]
    #[arg(
        short = 'D',
        long,
        global = true,
        value_name = "NAME",
        env = "GITLAB_CI_SEMVER_LABELS_DOTENV_VAR"
    )]
    pub dotenv_var: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show current version
    Current,
    /// Bump version
    Bump(BumpArgs),
}

/// Flags of `bump` and its subcommands
#[derive(clap::Args, Debug, Default, Clone, PartialEq)]
pub struct BumpArgs {
    #[command(subcommand)]
    pub kind: Option<BumpCommand>,

    /// REGEXP for commit message after merged MR
    #[arg(
        long,
        value_name = "REGEXP",
        env = "GITLAB_CI_SEMVER_LABELS_COMMIT_MESSAGE_REGEXP"
    )]
    pub commit_message_regexp: Option<String>,

    /// Fail if labels are not matched
    #[arg(
        short = 'f',
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        env = "GITLAB_CI_SEMVER_LABELS_FAIL"
    )]
    pub fail: Option<bool>,

    /// REGEXP for initial release label
    #[arg(
        long,
        value_name = "REGEXP",
        env = "GITLAB_CI_SEMVER_LABELS_INITIAL_LABEL_REGEXP"
    )]
    pub initial_label_regexp: Option<String>,

    /// Initial VERSION for initial release [default: 0.0.0]
    #[arg(
        short = 'V',
        long,
        global = true,
        value_name = "VERSION",
        env = "GITLAB_CI_SEMVER_LABELS_INITIAL_VERSION"
    )]
    pub initial_version: Option<String>,

    /// REGEXP for major (breaking) release label
    #[arg(
        long,
        value_name = "REGEXP",
        env = "GITLAB_CI_SEMVER_LABELS_MAJOR_LABEL_REGEXP"
    )]
    pub major_label_regexp: Option<String>,

    /// REGEXP for minor (feature) release label
    #[arg(
        long,
        value_name = "REGEXP",
        env = "GITLAB_CI_SEMVER_LABELS_MINOR_LABEL_REGEXP"
    )]
    pub minor_label_regexp: Option<String>,

    /// REGEXP for patch (fix) release label
    #[arg(
        long,
        value_name = "REGEXP",
        env = "GITLAB_CI_SEMVER_LABELS_PATCH_LABEL_REGEXP"
    )]
    pub patch_label_regexp: Option<String>,

    /// Bump version as prerelease
    #[arg(
        short = 'P',
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        env = "GITLAB_CI_SEMVER_LABELS_PRERELEASE"
    )]
    pub prerelease: Option<bool>,

    /// REGEXP for prerelease label
    #[arg(
        long,
        value_name = "REGEXP",
        env = "GITLAB_CI_SEMVER_LABELS_PRERELEASE_LABEL_REGEXP"
    )]
    pub prerelease_label_regexp: Option<String>,
}

impl BumpArgs {
    pub fn mode(&self) -> Mode {
        match self.kind {
            None => Mode::Labels,
            Some(kind) => Mode::Explicit(kind.into()),
        }
    }
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpCommand {
    /// Set to initial version without checking labels
    Initial,
    /// Bump major version without checking labels
    Major,
    /// Bump minor version without checking labels
    Minor,
    /// Bump patch version without checking labels
    Patch,
    /// Bump prerelease counter without checking labels
    Prerelease,
}

impl From<BumpCommand> for BumpKind {
    fn from(command: BumpCommand) -> Self {
        match command {
            BumpCommand::Initial => BumpKind::Initial,
            BumpCommand::Major => BumpKind::Major,
            BumpCommand::Minor => BumpKind::Minor,
            BumpCommand::Patch => BumpKind::Patch,
            BumpCommand::Prerelease => BumpKind::Prerelease,
        }
    }
}
