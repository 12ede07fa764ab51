//! Summary commit closing an experimental build

use crate::error::Result;
use crate::git::GitDir;
use crate::merge::message::final_message;
use tracing::debug;

/// Add an empty commit summarising what changed since `previous`.
///
/// Returns `false` without committing when `previous` does not exist yet.
pub fn final_commit(git: &GitDir, previous: &str, suffix: Option<&str>) -> Result<bool> {
    if !git.branch_exists(previous) {
        debug!(previous, "previous experimental branch not found, skipping summary");
        return Ok(false);
    }

    let range = format!("{previous}..");
    let not_included = git.output(&[
        "log",
        "--format=%h %ad %an%n     %s",
        "--no-merges",
        &range,
    ])?;
    let merges = git.output(&["log", "--oneline", "--first-parent", &range])?;

    let message = final_message(previous, suffix, merges.trim_end(), not_included.trim_end());
    git.commit_allow_empty(&message)?;
    Ok(true)
}
