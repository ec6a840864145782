//! Lazy forest walks that expose each node's ancestor chain

use super::{Forest, NodeId, TreeNode};
use std::collections::VecDeque;

/// A visited node together with its ancestors
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    /// Id of the visited node
    pub id: NodeId,
    /// The visited node
    pub node: &'a TreeNode,
    /// Strict ancestors, root first, immediate parent last
    pub ancestors: Vec<NodeId>,
}

impl Visit<'_> {
    /// Depth of the node (roots are 0)
    pub fn depth(&self) -> usize {
        self.ancestors.len()
    }
}

/// Pre-order depth-first iterator over a [`Forest`]
pub struct DepthFirst<'a> {
    forest: &'a Forest,
    stack: Vec<(NodeId, Vec<NodeId>)>,
}

impl<'a> DepthFirst<'a> {
    pub(super) fn new(forest: &'a Forest) -> Self {
        let stack = forest
            .roots()
            .iter()
            .rev()
            .map(|id| (*id, Vec::new()))
            .collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, ancestors) = self.stack.pop()?;
        let node = self.forest.node(id);

        for child in node.children().iter().rev() {
            let mut chain = ancestors.clone();
            chain.push(id);
            self.stack.push((*child, chain));
        }

        Some(Visit {
            id,
            node,
            ancestors,
        })
    }
}

/// Level-order iterator over a [`Forest`]
pub struct BreadthFirst<'a> {
    forest: &'a Forest,
    queue: VecDeque<(NodeId, Vec<NodeId>)>,
}

impl<'a> BreadthFirst<'a> {
    pub(super) fn new(forest: &'a Forest) -> Self {
        let queue = forest.roots().iter().map(|id| (*id, Vec::new())).collect();
        Self { forest, queue }
    }
}

impl<'a> Iterator for BreadthFirst<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, ancestors) = self.queue.pop_front()?;
        let node = self.forest.node(id);

        for child in node.children() {
            let mut chain = ancestors.clone();
            chain.push(id);
            self.queue.push_back((*child, chain));
        }

        Some(Visit {
            id,
            node,
            ancestors,
        })
    }
}
