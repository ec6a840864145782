//! Removal of finished leaf branches

use super::Forest;
use tracing::debug;

/// Detach closed or PR-less leaves, bottom-up.
///
/// Nodes are considered in reverse depth-first order so that every child is
/// decided before its parent. A node survives if it still has children or an
/// open PR; roots always survive. Returns the names of detached branches.
pub fn prune_closed(forest: &mut Forest) -> Vec<String> {
    let order: Vec<_> = forest.depth_first().map(|visit| visit.id).collect();
    let mut pruned = Vec::new();

    for id in order.into_iter().rev() {
        let node = forest.node(id);
        if node.is_root() || node.has_children() {
            continue;
        }
        if node.pr.as_ref().is_some_and(|pr| pr.is_open()) {
            continue;
        }

        let name = node.head_branch.clone();
        if forest.detach_leaf(id) {
            debug!(branch = %name, "pruned closed branch");
            pruned.push(name);
        }
    }

    pruned
}
