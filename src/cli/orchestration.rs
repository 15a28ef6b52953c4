//! Version decision workflow
//!
//! Combines the latest tag, the requested mode and (in label mode) the merge
//! request labels into the version to emit. [decide_version] works on an
//! already discovered tag and the [MergeRequestApi] trait; [run_workflow]
//! discovers the tag in the work tree and binds the decision to the GitLab API
//! and the output sink.

use crate::boundary::BoundaryWarning;
use crate::config::Settings;
use crate::domain::version;
use crate::domain::{BumpKind, Mode};
use crate::error::{Result, SemverLabelsError};
use crate::git::{self, TagQuery};
use crate::gitlab::{self, Environment, GitLabClient, MergeRequestApi};
use crate::labels::LabelRegexSet;
use crate::output;
use std::io::Write;
use tracing::debug;

/// Tag discovery parameters, with the token read from the configured variable
pub fn tag_query<E: Environment>(settings: &Settings, env: &E) -> TagQuery {
    TagQuery {
        remote_name: settings.remote_name.clone(),
        token: env.var(&settings.gitlab_token_env).unwrap_or_default(),
        fetch_tags: settings.fetch_tags,
    }
}

/// Decide the version for one invocation, given the most recent semver tag.
///
/// # Returns
/// * `Ok(Some(version))` - Version to emit
/// * `Ok(None)` - Nothing to emit: no tag in `current` mode, no merge request
///   found, or no label matched without `fail`
/// * `Err` - Any fatal condition
pub fn decide_version<E, A, F>(
    settings: &Settings,
    mode: Mode,
    tag: Option<String>,
    env: &E,
    connect: F,
) -> Result<Option<String>>
where
    E: Environment,
    A: MergeRequestApi,
    F: FnOnce() -> Result<A>,
{
    match mode {
        Mode::Current => tag.as_deref().map(version::current).transpose(),
        Mode::Explicit(kind) => apply_bump(kind, settings.prerelease, tag.as_deref(), settings),
        Mode::Labels => {
            let Some(labels) = gitlab::resolve_labels(
                env,
                &settings.commit_message_regexp,
                &settings.project,
                connect,
            )?
            else {
                return Ok(None);
            };

            let classification = LabelRegexSet::new(&settings.labels)?.classify(&labels)?;
            debug!(kind = ?classification.kind, prerelease = classification.prerelease, "classified labels");

            if classification.kind == BumpKind::None {
                if settings.fail {
                    return Err(SemverLabelsError::NoLabelMatched);
                }
                BoundaryWarning::NoLabelMatched { labels }.log();
                return Ok(None);
            }

            apply_bump(
                classification.kind,
                classification.prerelease || settings.prerelease,
                tag.as_deref(),
                settings,
            )
        }
    }
}

fn apply_bump(
    kind: BumpKind,
    prerelease: bool,
    tag: Option<&str>,
    settings: &Settings,
) -> Result<Option<String>> {
    debug!(?kind, prerelease, ?tag, "bump");

    let next = match (kind, tag) {
        (BumpKind::None, _) => return Ok(None),
        (BumpKind::Initial, Some(_)) => return Err(SemverLabelsError::AlreadyInitialized),
        (BumpKind::Initial, None) if prerelease => {
            version::bump_prerelease(&settings.initial_version)?
        }
        (BumpKind::Initial, None) => settings.initial_version.clone(),
        (_, None) => return Err(SemverLabelsError::NoTagFound),
        (BumpKind::Patch, Some(tag)) => version::bump_patch(tag, prerelease)?,
        (BumpKind::Minor, Some(tag)) => version::bump_minor(tag, prerelease)?,
        (BumpKind::Major, Some(tag)) => version::bump_major(tag, prerelease)?,
        (BumpKind::Prerelease, Some(tag)) => version::bump_prerelease(tag)?,
    };

    Ok(Some(next))
}

/// Run the full workflow against the repository in `settings.work_tree`,
/// writing the decided version to `out` and the optional dotenv file.
pub fn run_workflow<E: Environment, W: Write>(
    settings: &Settings,
    mode: Mode,
    env: &E,
    out: &mut W,
) -> Result<()> {
    debug!(?mode, work_tree = %settings.work_tree.display(), "run");
    let tag = git::find_last_tag(&settings.work_tree, &tag_query(settings, env))?;

    let connect = || {
        debug!(url = %settings.gitlab_url, "GitLab URL");
        let token = env.var(&settings.gitlab_token_env).unwrap_or_default();
        GitLabClient::new(&settings.gitlab_url, &token)
    };

    match decide_version(settings, mode, tag, env, connect)? {
        Some(next) => output::emit(
            out,
            &next,
            settings.dotenv_file.as_deref(),
            &settings.dotenv_var,
        ),
        None => Ok(()),
    }
}
