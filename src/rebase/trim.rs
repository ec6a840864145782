//! Shared-history trimming by commit message

use crate::error::Result;
use crate::repo::VersionControl;
use tracing::debug;

/// Find a later start point for rebasing `child` onto `base`.
///
/// Walks the commits of both branches since their merge base, oldest first
/// and in lock-step, while messages match. Returns the child-side commit at
/// the last match, or `None` if the very first commits already differ.
///
/// Message equality is a heuristic: reworded or duplicated messages can make
/// it match too little or too much.
pub fn shared_history_start(
    repo: &dyn VersionControl,
    base: &str,
    child: &str,
) -> Result<Option<String>> {
    let merge_base = repo.merge_base(base, child)?;
    let mut base_commits = repo.commits_between(&merge_base, base)?;
    let mut child_commits = repo.commits_between(&merge_base, child)?;
    base_commits.reverse();
    child_commits.reverse();

    let shared = base_commits
        .iter()
        .zip(&child_commits)
        .take_while(|(b, c)| b.message == c.message)
        .count();
    debug!(base, child, shared, "compared shared history");

    Ok(shared
        .checked_sub(1)
        .map(|last| child_commits[last].id.clone()))
}
