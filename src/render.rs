//! Tree rendering with box-drawing connectors
//!
//! Each branch becomes one line: a connector column per ancestor, a corner
//! glyph, a fork glyph, the branch name and finally the PR decoration.

use crate::error::{Error, Result};
use crate::graph::{Forest, Visit};
use crate::repo::VersionControl;
use crate::types::{PullRequestRef, ReviewerState};
use std::collections::HashMap;
use std::hash::BuildHasher;
use tracing::debug;

const ROOT: &str = "─";
const LAST: &str = "└";
const MIDDLE: &str = "├";
const PIPE: &str = "│";
const BLANK: &str = " ";
const FORK: &str = "┬";
const LEAF: &str = "─";

const SYNCED: &str = "🌕";
const DIVERGED: &str = "🌓";

/// Local/remote agreement for one PR branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncState {
    /// PR's recorded base commit equals the local merge base of base and head
    pub base_synced: bool,
    /// PR's recorded head commit equals the local head commit
    pub head_synced: bool,
}

impl SyncState {
    fn glyphs(self) -> String {
        let glyph = |synced: bool| if synced { SYNCED } else { DIVERGED };
        format!("{}{}", glyph(self.base_synced), glyph(self.head_synced))
    }
}

/// Compare every PR in the forest against the local repository.
///
/// Only branches whose base and head both exist locally get an entry.
pub fn compute_sync_states(
    forest: &Forest,
    repo: &dyn VersionControl,
) -> Result<HashMap<String, SyncState>> {
    let mut states = HashMap::new();

    for visit in forest.depth_first() {
        let (Some(pr), Some(parent)) = (visit.node.pr.as_ref(), visit.node.base()) else {
            continue;
        };
        let base = forest.name(parent);
        let head = visit.node.head_branch.as_str();
        if !repo.branch_exists(base)? || !repo.branch_exists(head)? {
            continue;
        }

        let state = SyncState {
            base_synced: repo.merge_base(base, head)? == pr.base_sha,
            head_synced: repo.commit_of(head)? == pr.head_sha,
        };
        debug!(branch = head, ?state, "computed sync state");
        states.insert(head.to_string(), state);
    }

    Ok(states)
}

/// Render the forest as text lines in depth-first order.
///
/// `reviews` must hold an entry for every open PR in the forest; a miss is
/// reported as [`Error::Internal`].
pub fn render_forest<S1: BuildHasher, S2: BuildHasher>(
    forest: &Forest,
    reviews: &HashMap<u64, Vec<ReviewerState>, S1>,
    sync: &HashMap<String, SyncState, S2>,
) -> Result<Vec<String>> {
    forest
        .depth_first()
        .map(|visit| render_line(forest, &visit, reviews, sync))
        .collect()
}

fn render_line<S1: BuildHasher, S2: BuildHasher>(
    forest: &Forest,
    visit: &Visit<'_>,
    reviews: &HashMap<u64, Vec<ReviewerState>, S1>,
    sync: &HashMap<String, SyncState, S2>,
) -> Result<String> {
    let mut line = String::new();

    for ancestor in &visit.ancestors {
        line.push_str(if forest.is_last_sibling(*ancestor) {
            BLANK
        } else {
            PIPE
        });
    }

    let node = visit.node;
    line.push_str(if node.is_root() {
        ROOT
    } else if forest.is_last_sibling(visit.id) {
        LAST
    } else {
        MIDDLE
    });
    line.push_str(if node.has_children() { FORK } else { LEAF });
    line.push(' ');
    line.push_str(&node.head_branch);

    if let Some(pr) = &node.pr {
        line.push(' ');
        if let Some(state) = sync.get(&node.head_branch) {
            line.push_str(&state.glyphs());
            line.push(' ');
        }
        line.push_str(&pr_marker(pr, reviews)?);
    }

    Ok(line)
}

fn pr_marker<S: BuildHasher>(
    pr: &PullRequestRef,
    reviews: &HashMap<u64, Vec<ReviewerState>, S>,
) -> Result<String> {
    if !pr.is_open() {
        return Ok(format!("[{}] closed", pr.number));
    }

    let reviewers = reviews.get(&pr.number).ok_or_else(|| {
        Error::Internal(format!("no reviewer state fetched for PR #{}", pr.number))
    })?;
    if reviewers.is_empty() {
        return Ok(format!("[{}]", pr.number));
    }

    let list = reviewers
        .iter()
        .map(|r| format!("{}:{}", r.login, r.status.glyph()))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("[{}] {list}", pr.number))
}
