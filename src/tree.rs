use std::cmp::Ordering;

use crate::error::TldError;
use crate::iter::Iter;
use crate::node::{Node, NodeId};

/// Ordered AVL tree of suffixes, each carrying an occurrence counter.
///
/// Nodes live in an arena and are addressed by [`NodeId`]. A node is created
/// the first time its key is inserted and lives until the tree is dropped;
/// later insertions of the same key only bump its count. Keys compare as raw
/// bytes, so `"COM"` and `"com"` are distinct.
#[derive(Debug, Clone, Default)]
pub struct CountingTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

/// Outcome of [`CountingTree::insert_or_increment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The key was new; a node was created and the tree rebalanced.
    Created(NodeId),
    /// The key already existed; its count was incremented.
    Incremented(NodeId),
}

enum Slot {
    Occupied(NodeId),
    Vacant {
        parent: Option<NodeId>,
        ordering: Ordering,
    },
}

impl CountingTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root, 0 for an empty tree.
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Sum of all node counts.
    pub fn total(&self) -> u64 {
        self.nodes.iter().map(Node::count).sum()
    }

    pub fn get(&self, key: &[u8]) -> Option<&Node> {
        match self.locate(key) {
            Slot::Occupied(id) => Some(self.node(id)),
            Slot::Vacant { .. } => None,
        }
    }

    /// Ascending-by-key enumeration of every node in the tree.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Count one occurrence of `key`, creating its node if needed.
    pub fn insert_or_increment(&mut self, key: &[u8]) -> Insertion {
        match self.locate(key) {
            Slot::Occupied(id) => {
                self.node_mut(id).increment();
                Insertion::Incremented(id)
            }
            Slot::Vacant { parent, ordering } => {
                Insertion::Created(self.attach(key, parent, ordering))
            }
        }
    }

    /// Like [`insert_or_increment`](Self::insert_or_increment), but reports
    /// arena allocation failure instead of aborting.
    pub fn try_insert(&mut self, key: &[u8]) -> Result<Insertion, TldError> {
        match self.locate(key) {
            Slot::Occupied(id) => {
                self.node_mut(id).increment();
                Ok(Insertion::Incremented(id))
            }
            Slot::Vacant { parent, ordering } => {
                self.nodes
                    .try_reserve(1)
                    .map_err(|_| TldError::OutOfMemory)?;
                Ok(Insertion::Created(self.attach(key, parent, ordering)))
            }
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn min_from(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.node(id).left {
            id = left;
        }
        id
    }

    fn locate(&self, key: &[u8]) -> Slot {
        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            ordering = key.cmp(node.key());
            cursor = match ordering {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Slot::Occupied(id),
            };
            parent = Some(id);
        }
        Slot::Vacant { parent, ordering }
    }

    fn attach(&mut self, key: &[u8], parent: Option<NodeId>, ordering: Ordering) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(key, parent));
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if ordering == Ordering::Less {
                    self.node_mut(p).left = Some(id);
                } else {
                    self.node_mut(p).right = Some(id);
                }
                self.rebalance_upwards(p);
            }
        }
        id
    }

    #[inline]
    fn height_of(&self, id: Option<NodeId>) -> u32 {
        id.map_or(0, |id| self.node(id).height)
    }

    fn update_height(&mut self, id: NodeId) {
        let node = self.node(id);
        let height = self.height_of(node.left).max(self.height_of(node.right)) + 1;
        self.node_mut(id).height = height;
    }

    /// Left height minus right height.
    fn balance(&self, id: NodeId) -> i64 {
        let node = self.node(id);
        i64::from(self.height_of(node.left)) - i64::from(self.height_of(node.right))
    }

    fn rebalance_upwards(&mut self, start: NodeId) {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            self.update_height(id);
            let balance = self.balance(id);
            let subtree_root = if balance > 1 {
                if let Some(left) = self.node(id).left {
                    if self.balance(left) < 0 {
                        self.rotate_left(left);
                    }
                }
                self.rotate_right(id)
            } else if balance < -1 {
                if let Some(right) = self.node(id).right {
                    if self.balance(right) > 0 {
                        self.rotate_right(right);
                    }
                }
                self.rotate_left(id)
            } else {
                id
            };
            cursor = self.node(subtree_root).parent;
        }
    }

    /// Point whichever link referenced `old` (a parent's child slot or the
    /// root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: NodeId) {
        match parent {
            None => self.root = Some(new),
            Some(p) => {
                let parent = self.node_mut(p);
                if parent.left == Some(old) {
                    parent.left = Some(new);
                } else {
                    parent.right = Some(new);
                }
            }
        }
    }

    /// Rotate `id` down to the right; its left child takes its place.
    /// Returns the new subtree root.
    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.node(id).left else {
            return id;
        };
        let parent = self.node(id).parent;
        let inner = self.node(pivot).right;

        self.node_mut(id).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }

        self.node_mut(pivot).parent = parent;
        self.replace_child(parent, id, pivot);

        self.node_mut(pivot).right = Some(id);
        self.node_mut(id).parent = Some(pivot);

        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    /// Mirror of [`rotate_right`](Self::rotate_right).
    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.node(id).right else {
            return id;
        };
        let parent = self.node(id).parent;
        let inner = self.node(pivot).left;

        self.node_mut(id).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }

        self.node_mut(pivot).parent = parent;
        self.replace_child(parent, id, pivot);

        self.node_mut(pivot).left = Some(id);
        self.node_mut(id).parent = Some(pivot);

        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    /// Walk the whole tree and verify ordering, parent links, stored heights
    /// and the AVL balance bound. Intended for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err(format!("empty root with {} arena nodes", self.nodes.len()))
            };
        };
        if self.node(root).parent.is_some() {
            return Err("root has a parent".to_string());
        }

        let mut visited = 0usize;
        let mut stack = vec![(root, None::<&[u8]>, None::<&[u8]>)];
        while let Some((id, lower, upper)) = stack.pop() {
            visited += 1;
            let node = self.node(id);
            let key = node.key();
            if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
                return Err(format!("key {:?} out of order", node.tld()));
            }
            if node.count() == 0 {
                return Err(format!("key {:?} has zero count", node.tld()));
            }

            let (lh, rh) = (self.height_of(node.left), self.height_of(node.right));
            if node.height != lh.max(rh) + 1 {
                return Err(format!(
                    "key {:?} stores height {} but children give {}",
                    node.tld(),
                    node.height,
                    lh.max(rh) + 1
                ));
            }
            if lh.abs_diff(rh) > 1 {
                return Err(format!(
                    "key {:?} unbalanced: left {} right {}",
                    node.tld(),
                    lh,
                    rh
                ));
            }

            for (child, lo, hi) in [
                (node.left, lower, Some(key)),
                (node.right, Some(key), upper),
            ] {
                if let Some(child) = child {
                    if self.node(child).parent != Some(id) {
                        return Err(format!("child of {:?} has a stale parent link", node.tld()));
                    }
                    stack.push((child, lo, hi));
                }
            }
        }

        if visited != self.nodes.len() {
            return Err(format!(
                "reached {} nodes but arena holds {}",
                visited,
                self.nodes.len()
            ));
        }
        Ok(())
    }
}
