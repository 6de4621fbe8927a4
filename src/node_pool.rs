use crate::node::{Label, NodeId, ROOT, TrieNode};

/// Arena owning every node of a trie.
///
/// Children are referenced by [`NodeId`]; the `parent` field is an index back
/// into the same arena and is only followed upward during removal. Released
/// slots are reset and kept on a free list for later insertions.
#[derive(Clone)]
pub(crate) struct NodePool<V> {
    pub(crate) nodes: Vec<TrieNode<V>>,
    pub(crate) free: Vec<NodeId>,
}

impl<V> NodePool<V> {
    /// Creates a pool holding only the root node.
    pub(crate) fn new() -> Self {
        Self::with_capacity(1)
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(TrieNode::root());
        NodePool {
            nodes,
            free: Vec::new(),
        }
    }

    /// Drops every non-root node and resets the root.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT.0] = TrieNode::root();
        self.free.clear();
    }

    #[inline(always)]
    pub(crate) fn get(&self, id: NodeId) -> &TrieNode<V> {
        &self.nodes[id.0]
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut TrieNode<V> {
        &mut self.nodes[id.0]
    }

    /// Number of live nodes, the root included.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Follows `chars` from `start`, returning the node reached, if any.
    pub(crate) fn walk(&self, start: NodeId, chars: impl IntoIterator<Item = char>) -> Option<NodeId> {
        let mut current = start;
        for c in chars {
            current = self.get(current).child(Label::Char(c))?;
        }
        Some(current)
    }

    /// Creates a child of `parent` under `label` and returns its id.
    ///
    /// The caller checks that no child exists under `label` yet.
    pub(crate) fn attach(&mut self, parent: NodeId, label: Label) -> NodeId {
        let depth = self.get(parent).depth + 1;
        let node = TrieNode::new(label, Some(parent), depth);

        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };

        let parent_node = self.get_mut(parent);
        parent_node.children.insert(label, id);
        parent_node.mask |= label.bit();
        id
    }

    /// Unlinks the child under `label` from `parent` and recycles its slot.
    ///
    /// Returns the value the child held. The child must have no children of
    /// its own; subtrees are only ever released one leaf at a time.
    pub(crate) fn detach(&mut self, parent: NodeId, label: Label) -> Option<V> {
        let id = self.get_mut(parent).children.remove(&label)?;
        let node = self.get_mut(id);
        debug_assert!(node.children.is_empty());
        let value = node.value.take();
        node.reset();
        self.free.push(id);
        value
    }

    /// Rebuilds masks from `start` up to the root as the node's own bit OR
    /// the masks of its current children.
    pub(crate) fn recompute_masks(&mut self, start: NodeId) {
        let mut current = Some(start);
        while let Some(id) = current {
            let node = self.get(id);
            let mask = node
                .children
                .values()
                .fold(node.label.bit(), |mask, &child| mask | self.get(child).mask);

            let node = self.get_mut(id);
            node.mask = mask;
            current = node.parent;
        }
    }
}
