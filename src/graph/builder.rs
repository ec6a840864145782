//! Forest construction from pull request edges

use super::{Forest, NodeId};
use crate::error::{Error, Result};
use crate::types::PullRequestRef;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Build the branch forest from a list of pull requests.
///
/// Every base branch that is not itself the head of some PR becomes a root.
/// Children are attached level by level, in the order the PRs are given.
///
/// # Errors
/// - [`Error::DuplicateHead`] if two open PRs share a head branch
/// - [`Error::CyclicStack`] if some heads cannot be reached from any root
pub fn build_forest(pulls: &[PullRequestRef]) -> Result<Forest> {
    let edges = dedupe_heads(pulls)?;
    let heads: HashSet<&str> = edges.iter().map(|pr| pr.head_ref.as_str()).collect();

    let mut forest = Forest::default();
    let mut frontier: Vec<NodeId> = Vec::new();

    for pr in &edges {
        let base = pr.base_ref.as_str();
        if heads.contains(base) || forest.find(base).is_some() {
            continue;
        }
        frontier.push(forest.add_root(base.to_string(), None));
    }

    while !frontier.is_empty() {
        let mut next = Vec::new();
        for &parent in &frontier {
            let parent_name = forest.name(parent).to_string();
            for pr in edges.iter().filter(|pr| pr.base_ref == parent_name) {
                let child = forest.add_child(parent, pr.head_ref.clone(), Some((*pr).clone()));
                next.push(child);
            }
        }
        frontier = next;
    }

    let mut unreached: Vec<String> = edges
        .iter()
        .filter(|pr| forest.find(&pr.head_ref).is_none())
        .map(|pr| pr.head_ref.clone())
        .collect();
    if !unreached.is_empty() {
        unreached.sort();
        return Err(Error::CyclicStack(unreached));
    }

    debug!(
        roots = forest.roots().len(),
        nodes = forest.len(),
        "built branch forest"
    );
    Ok(forest)
}

/// Keep one PR per head branch, preserving first-appearance order.
///
/// An open PR wins over a closed one and the newest closed PR wins over
/// older closed ones. Two open PRs for one head are rejected.
fn dedupe_heads(pulls: &[PullRequestRef]) -> Result<Vec<&PullRequestRef>> {
    let mut edges: Vec<&PullRequestRef> = Vec::with_capacity(pulls.len());
    let mut position: HashMap<&str, usize> = HashMap::new();

    for pr in pulls {
        let Some(&idx) = position.get(pr.head_ref.as_str()) else {
            position.insert(pr.head_ref.as_str(), edges.len());
            edges.push(pr);
            continue;
        };

        let existing = edges[idx];
        let replace = match (existing.is_open(), pr.is_open()) {
            (true, true) => {
                return Err(Error::DuplicateHead {
                    branch: pr.head_ref.clone(),
                    first: existing.number.min(pr.number),
                    second: existing.number.max(pr.number),
                });
            }
            (false, true) => true,
            (true, false) => false,
            (false, false) => pr.number > existing.number,
        };
        if replace {
            debug!(
                branch = %pr.head_ref,
                kept = pr.number,
                dropped = existing.number,
                "duplicate head branch"
            );
            edges[idx] = pr;
        }
    }

    Ok(edges)
}
