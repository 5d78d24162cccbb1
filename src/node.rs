use std::borrow::Cow;

/// Index of a node inside a [`CountingTree`](crate::tree::CountingTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        NodeId(index as u32)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single suffix and the number of times it has been counted.
///
/// Children are owned by the arena slot of their parent; `parent` is a plain
/// back-reference used for rebalancing and in-order successor walks.
#[derive(Debug, Clone)]
pub struct Node {
    key: Box<[u8]>,
    count: u64,
    pub(crate) height: u32,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(key: &[u8], parent: Option<NodeId>) -> Self {
        Node {
            key: key.into(),
            count: 1,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }

    /// The suffix bytes this node counts.
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// The suffix as text, replacing invalid UTF-8 sequences.
    pub fn tld(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.key)
    }

    /// Number of accepted entries carrying this suffix.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn increment(&mut self) {
        self.count += 1;
    }
}
