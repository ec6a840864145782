//! Branch dependency forest
//!
//! Nodes live in an arena owned by [`Forest`]; parent links are plain
//! [`NodeId`] back-references so the forest can be pruned without any
//! reference-counting. Branch names are node identity.

mod builder;
mod prune;
mod traversal;

pub use builder::build_forest;
pub use prune::prune_closed;
pub use traversal::{BreadthFirst, DepthFirst, Visit};

use crate::types::PullRequestRef;
use std::collections::HashMap;

/// Index of a node inside its [`Forest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A branch in the dependency forest
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Branch name, unique within a forest
    pub head_branch: String,
    /// Pull request whose head is this branch, if any
    pub pr: Option<PullRequestRef>,
    base: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    /// Parent node, `None` for roots
    pub const fn base(&self) -> Option<NodeId> {
        self.base
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether this node has no parent
    pub const fn is_root(&self) -> bool {
        self.base.is_none()
    }

    /// Whether this node has at least one child
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A forest of branches built from pull request (head, base) edges
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    by_name: HashMap<String, NodeId>,
}

impl Forest {
    /// Root node ids in build order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Borrow a node
    ///
    /// Ids only come from this forest, so indexing cannot go out of bounds.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Look up a reachable node by branch name
    pub fn find(&self, branch: &str) -> Option<NodeId> {
        self.by_name.get(branch).copied()
    }

    /// Branch name of a node
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).head_branch
    }

    /// Number of reachable nodes
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the forest has no nodes
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// True for roots; otherwise true iff the node is the last child of its parent
    pub fn is_last_sibling(&self, id: NodeId) -> bool {
        match self.node(id).base {
            None => true,
            Some(parent) => self.node(parent).children.last() == Some(&id),
        }
    }

    /// Pre-order walk yielding each node with its ancestor chain
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst::new(self)
    }

    /// Level-order walk yielding each node with its ancestor chain
    pub fn breadth_first(&self) -> BreadthFirst<'_> {
        BreadthFirst::new(self)
    }

    fn add_root(&mut self, head_branch: String, pr: Option<PullRequestRef>) -> NodeId {
        let id = self.push_node(head_branch, pr, None);
        self.roots.push(id);
        id
    }

    fn add_child(
        &mut self,
        parent: NodeId,
        head_branch: String,
        pr: Option<PullRequestRef>,
    ) -> NodeId {
        let id = self.push_node(head_branch, pr, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push_node(
        &mut self,
        head_branch: String,
        pr: Option<PullRequestRef>,
        base: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.by_name.insert(head_branch.clone(), id);
        self.nodes.push(TreeNode {
            head_branch,
            pr,
            base,
            children: Vec::new(),
        });
        id
    }

    /// Detach a non-root leaf from its parent.
    ///
    /// Returns `false` (and changes nothing) for roots and nodes with children.
    fn detach_leaf(&mut self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        let Some(parent) = node.base else {
            return false;
        };
        if node.has_children() {
            return false;
        }

        self.nodes[parent.0].children.retain(|child| *child != id);
        let node = &mut self.nodes[id.0];
        node.base = None;
        self.by_name.remove(&node.head_branch);
        true
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::pr;
    use super::*;

    #[test]
    fn test_is_last_sibling_exactly_one_per_parent() {
        let forest = build_forest(&[
            pr(1, "a", "main"),
            pr(2, "b", "main"),
            pr(3, "c", "main"),
            pr(4, "d", "a"),
        ])
        .unwrap();

        let main = forest.find("main").unwrap();
        let last: Vec<_> = forest
            .node(main)
            .children()
            .iter()
            .filter(|id| forest.is_last_sibling(**id))
            .map(|id| forest.name(*id))
            .collect();
        assert_eq!(last, vec!["c"]);

        assert!(forest.is_last_sibling(main));
        assert!(forest.is_last_sibling(forest.find("d").unwrap()));
    }

    #[test]
    fn test_detach_leaf_refuses_roots_and_inner_nodes() {
        let mut forest = build_forest(&[pr(1, "a", "main"), pr(2, "b", "a")]).unwrap();
        let main = forest.find("main").unwrap();
        let a = forest.find("a").unwrap();
        let b = forest.find("b").unwrap();

        assert!(!forest.detach_leaf(main));
        assert!(!forest.detach_leaf(a));
        assert!(forest.detach_leaf(b));

        assert!(forest.find("b").is_none());
        assert!(!forest.node(a).has_children());
        assert!(forest.node(b).is_root());
        assert_eq!(forest.len(), 2);
    }
}
