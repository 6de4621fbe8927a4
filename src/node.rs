use std::collections::HashMap;

/// Index of a node inside the owning [`NodePool`](crate::node_pool::NodePool).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

pub(crate) const ROOT: NodeId = NodeId(0);

/// The edge a node hangs from.
///
/// `End` marks the synthetic terminal child that carries a stored key's path
/// and value. It is its own variant so no code point can collide with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Label {
    Root,
    Char(char),
    End,
}

impl Label {
    #[inline]
    pub(crate) fn bit(self) -> u64 {
        match self {
            Label::Char(c) => char_bit(c),
            Label::Root | Label::End => 0,
        }
    }
}

#[derive(Clone)]
pub(crate) struct TrieNode<V> {
    pub(crate) label: Label,
    pub(crate) path: String,
    pub(crate) is_terminal: bool,
    pub(crate) depth: usize,
    pub(crate) value: Option<V>,
    pub(crate) mask: u64,
    pub(crate) terminal_count: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: HashMap<Label, NodeId>,
}

impl<V> TrieNode<V> {
    pub(crate) fn new(label: Label, parent: Option<NodeId>, depth: usize) -> Self {
        TrieNode {
            label,
            path: String::new(),
            is_terminal: false,
            depth,
            value: None,
            mask: label.bit(),
            terminal_count: 0,
            parent,
            children: HashMap::new(),
        }
    }

    pub(crate) fn root() -> Self {
        TrieNode::new(Label::Root, None, 0)
    }

    /// Drops everything the node holds so a recycled slot carries nothing over.
    pub(crate) fn reset(&mut self) {
        self.label = Label::Root;
        self.path.clear();
        self.is_terminal = false;
        self.depth = 0;
        self.value = None;
        self.mask = 0;
        self.terminal_count = 0;
        self.parent = None;
        self.children.clear();
    }

    /// A non-root node with nothing below it and no key of its own.
    #[inline]
    pub(crate) fn is_dangling(&self) -> bool {
        self.parent.is_some() && !self.is_terminal && self.children.is_empty()
    }

    #[inline]
    pub(crate) fn child(&self, label: Label) -> Option<NodeId> {
        self.children.get(&label).copied()
    }

    #[inline]
    pub(crate) fn terminal_child(&self) -> Option<NodeId> {
        self.child(Label::End)
    }
}

// Mask utilities. Only `'a'..='z'` get a bit; every other character maps to
// no bit, so masks never claim an absent letter and never miss a present one.

#[inline]
pub(crate) fn char_bit(c: char) -> u64 {
    if c.is_ascii_lowercase() {
        1u64 << (c as u32 - 'a' as u32)
    } else {
        0
    }
}

pub(crate) fn mask_of(chars: &[char]) -> u64 {
    chars.iter().fold(0, |mask, &c| mask | char_bit(c))
}

/// `result[i]` is the mask of `chars[i..]`.
pub(crate) fn suffix_masks(chars: &[char]) -> Vec<u64> {
    let mut masks = vec![0u64; chars.len()];
    let mut acc = 0u64;
    for (i, &c) in chars.iter().enumerate().rev() {
        acc |= char_bit(c);
        masks[i] = acc;
    }
    masks
}

#[inline]
pub(crate) fn covers(mask: u64, required: u64) -> bool {
    mask & required == required
}
