//! Local version-control port
//!
//! The core only talks to the working copy through [`VersionControl`], so
//! planning and execution can be exercised against in-memory fakes.

mod git;

pub use git::GitRepo;

use crate::error::Result;
use crate::types::CommitInfo;

/// Outcome of starting or continuing a rebase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseOutcome {
    /// All commits were replayed
    Completed,
    /// The rebase stopped on a conflict and awaits resolution
    Conflicted,
}

/// Primitives the core needs from the local repository.
///
/// Implementations assume exclusive access to the working copy for the
/// duration of a run.
pub trait VersionControl {
    /// Commit id a branch currently points to
    fn commit_of(&self, branch: &str) -> Result<String>;

    /// Whether a local branch with this name exists
    fn branch_exists(&self, branch: &str) -> Result<bool>;

    /// Most recent common ancestor of two refs
    fn merge_base(&self, a: &str, b: &str) -> Result<String>;

    /// Commits reachable from `to` but not from `from`, newest first
    fn commits_between(&self, from: &str, to: &str) -> Result<Vec<CommitInfo>>;

    /// Replay the commits of `branch` after `start` onto `onto`
    fn rebase_onto(
        &self,
        onto: &str,
        start: &str,
        branch: &str,
        interactive: bool,
    ) -> Result<RebaseOutcome>;

    /// Continue a rebase stopped on a conflict
    fn continue_rebase(&self) -> Result<RebaseOutcome>;

    /// Abort the rebase in progress
    fn abort_rebase(&self) -> Result<()>;

    /// Force-update a branch on a remote
    fn force_push(&self, remote: &str, branch: &str) -> Result<()>;

    /// URL configured for a remote
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Name of the checked-out branch, `None` when HEAD is detached
    fn current_branch(&self) -> Result<Option<String>>;

    /// Check out a branch
    fn checkout(&self, branch: &str) -> Result<()>;
}
