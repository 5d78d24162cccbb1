use std::iter::FusedIterator;

use crate::node::{Node, NodeId};
use crate::tree::CountingTree;

/// In-order cursor over a [`CountingTree`].
///
/// Walks parent and child links only, so it needs no stack. Yields every
/// node exactly once in ascending key order and then keeps returning `None`.
/// The shared borrow of the tree rules out mutation while the cursor lives.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    tree: &'a CountingTree,
    cursor: Option<NodeId>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(tree: &'a CountingTree) -> Self {
        Iter {
            tree,
            cursor: tree.root().map(|root| tree.min_from(root)),
            remaining: tree.len(),
        }
    }

    fn successor(&self, id: NodeId) -> Option<NodeId> {
        let tree = self.tree;
        if let Some(right) = tree.node(id).right {
            return Some(tree.min_from(right));
        }

        let mut child = id;
        let mut parent = tree.node(id).parent;
        while let Some(p) = parent {
            if tree.node(p).left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = tree.node(p).parent;
        }
        None
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = self.successor(current);
        self.remaining -= 1;
        Some(self.tree.node(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a CountingTree {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
