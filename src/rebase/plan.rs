//! Rebase planning
//!
//! Reads the forest and the local branch heads, never mutates anything. The
//! resulting [`RebasePlan`] is what `--dry-run` prints and what
//! [`execute_rebase`](super::execute_rebase) consumes.

use super::trim::shared_history_start;
use crate::error::{Error, Result};
use crate::graph::Forest;
use crate::repo::VersionControl;
use serde::Serialize;
use tracing::debug;

/// Options for rebase planning
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// The root branch is going away; its children move onto its parent
    pub delete: bool,
    /// Skip commits whose messages already match on both sides
    pub trim_shared_history: bool,
}

/// A single planned rebase
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebaseStep {
    /// Branch to rebase onto
    pub base: String,
    /// Replay commits after this one (exclusive)
    pub start_commit: String,
    /// Branch being rebased
    pub child: String,
    /// PR whose head is `child`
    pub pr_number: Option<u64>,
    /// Base differs from the PR's current parent (delete mode)
    pub retargeted: bool,
}

impl std::fmt::Display for RebaseStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = self.start_commit.get(..12).unwrap_or(&self.start_commit);
        write!(f, "rebase {} onto {} from {short}", self.child, self.base)?;
        if let Some(number) = self.pr_number {
            write!(f, " (PR #{number})")?;
        }
        Ok(())
    }
}

/// Ordered rebase steps for one root branch
#[derive(Debug, Clone, Serialize)]
pub struct RebasePlan {
    /// Branch whose descendants are rebased
    pub root: String,
    /// Whether the plan was made in delete mode
    pub delete: bool,
    /// Steps in depth-first order; parents always precede descendants
    pub steps: Vec<RebaseStep>,
}

impl RebasePlan {
    /// Whether there is nothing to do
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Follow-ups that must be done on the hosting service by hand
    pub fn manual_tasks(&self) -> Vec<String> {
        self.steps
            .iter()
            .filter(|step| step.retargeted)
            .filter_map(|step| {
                step.pr_number
                    .map(|n| format!("change the base of PR #{n} to `{}`", step.base))
            })
            .collect()
    }
}

/// Plan the rebases that bring every descendant of `root` up to date.
///
/// Each in-scope branch must still point at the head commit its PR last
/// reported; otherwise planning fails with [`Error::Diverged`] and no steps
/// are returned.
///
/// Without trimming, each step replays the child's commits that are not
/// reachable from the base's current tip. If the base was amended or
/// otherwise rewritten, its old commits are still reachable from the child
/// and get replayed too; `trim_shared_history` skips them by message.
pub fn plan_rebase(
    forest: &Forest,
    root: &str,
    options: PlanOptions,
    repo: &dyn VersionControl,
) -> Result<RebasePlan> {
    let root_id = forest
        .find(root)
        .ok_or_else(|| Error::BranchNotFound(root.to_string()))?;
    let root_parent = forest.node(root_id).base();

    let mut steps = Vec::new();
    for visit in forest.depth_first() {
        let Some(parent) = visit.node.base() else {
            continue;
        };
        if !visit.ancestors.contains(&root_id) {
            continue;
        }

        let (base_id, retargeted) = match root_parent {
            Some(grandparent) if options.delete && parent == root_id => (grandparent, true),
            _ => (parent, false),
        };
        let base = forest.name(base_id);
        let child = visit.node.head_branch.as_str();

        if let Some(pr) = &visit.node.pr {
            let local = repo.commit_of(child)?;
            if local != pr.head_sha {
                return Err(Error::Diverged {
                    branch: child.to_string(),
                    local,
                    remote: pr.head_sha.clone(),
                });
            }
        }

        let start_commit = if options.trim_shared_history {
            match shared_history_start(repo, base, child)? {
                Some(commit) => commit,
                None => repo.merge_base(base, child)?,
            }
        } else {
            repo.commit_of(base)?
        };

        debug!(base, child, %start_commit, retargeted, "planned rebase step");
        steps.push(RebaseStep {
            base: base.to_string(),
            start_commit,
            child: child.to_string(),
            pr_number: visit.node.pr.as_ref().map(|pr| pr.number),
            retargeted,
        });
    }

    Ok(RebasePlan {
        root: root.to_string(),
        delete: options.delete,
        steps,
    })
}
