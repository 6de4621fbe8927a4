use std::collections::HashMap;

use log::{debug, trace};

use crate::iter::{Iter, Keys, Values};
use crate::node::{Label, NodeId, ROOT, mask_of, suffix_masks};
use crate::node_pool::NodePool;

/// A `TrieMap` is a string-keyed map stored as a character trie, searchable by
/// exact key, by prefix, by longest literal prefix, and by ordered
/// subsequence.
///
/// Each stored key owns one chain of character nodes from the root, closed by
/// a terminal node holding the full key and its value. Every node carries a
/// bitmask of the lowercase ASCII letters found at or below it, which lets
/// fuzzy search skip whole branches.
///
/// `TrieMap` takes `&mut self` for mutation. For a container shared between
/// threads use [`Trie`](crate::Trie).
///
/// # Examples
///
/// ```
/// use searchtrie::TrieMap;
///
/// let mut map = TrieMap::new();
/// map.insert("foo", 1);
/// map.insert("foretold", 2);
/// map.insert("football", 3);
///
/// assert_eq!(map.get("foo"), Some(&1));
/// assert!(map.has_prefix("fore"));
///
/// let mut keys = map.keys_with_prefix("foo");
/// keys.sort();
/// assert_eq!(keys, vec!["foo", "football"]);
///
/// assert_eq!(map.longest_prefix_match("foretoldme"), Some(("foretold", &2)));
/// assert_eq!(map.fuzzy_search("fb"), vec!["football"]);
///
/// assert_eq!(map.remove("foo"), Some(1));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Clone)]
pub struct TrieMap<V> {
    pub(crate) pool: NodePool<V>,
    pub(crate) size: usize,
}

impl<V> Default for TrieMap<V> {
    /// Creates a new empty `TrieMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let map: TrieMap<i32> = Default::default();
    /// assert!(map.is_empty());
    /// ```
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for TrieMap<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V, K: AsRef<str>> Extend<(K, V)> for TrieMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<V, K: AsRef<str>> FromIterator<(K, V)> for TrieMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TrieMap::new();
        map.extend(iter);
        map
    }
}

impl<V, K: AsRef<str>, const N: usize> From<[(K, V); N]> for TrieMap<V> {
    fn from(array: [(K, V); N]) -> Self {
        array.into_iter().collect()
    }
}

impl<V> TrieMap<V> {
    /// Creates a new empty `TrieMap`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let map: TrieMap<i32> = TrieMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        TrieMap {
            pool: NodePool::new(),
            size: 0,
        }
    }

    /// Creates a new `TrieMap` with room for `nodes` nodes before the arena
    /// reallocates. A key of `n` characters needs at most `n + 1` new nodes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let map: TrieMap<i32> = TrieMap::with_capacity(128);
    /// assert!(map.capacity() >= 128);
    /// ```
    pub fn with_capacity(nodes: usize) -> Self {
        TrieMap {
            pool: NodePool::with_capacity(nodes),
            size: 0,
        }
    }

    /// Returns the number of stored keys.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert("a", 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map holds no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of node slots the arena can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    /// Number of live nodes, root and terminal nodes included.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// assert_eq!(map.node_count(), 1);
    ///
    /// map.insert("ab", ());
    /// assert_eq!(map.node_count(), 4);
    ///
    /// map.remove("ab");
    /// assert_eq!(map.node_count(), 1);
    /// ```
    pub fn node_count(&self) -> usize {
        self.pool.live()
    }

    /// Removes every key, leaving only a reset root.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(!map.has_prefix("a"));
    /// ```
    pub fn clear(&mut self) {
        debug!("clearing trie holding {} keys", self.size);
        self.pool.clear();
        self.size = 0;
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key is already stored its value is replaced and the old value
    /// returned; the key count is unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// assert_eq!(map.insert("a", 1), None);
    /// assert_eq!(map.insert("a", 2), Some(1));
    /// assert_eq!(map.get("a"), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert<K: AsRef<str>>(&mut self, key: K, value: V) -> Option<V> {
        let key = key.as_ref();

        if let Some(terminal) = self.terminal_of(key) {
            trace!("insert: overwriting value of {:?}", key);
            return self.pool.get_mut(terminal).value.replace(value);
        }

        // Each node on the walk absorbs the mask of the key's remaining
        // suffix, so a node's mask covers every letter at or below it.
        let chars: Vec<char> = key.chars().collect();
        let masks = suffix_masks(&chars);

        let root = self.pool.get_mut(ROOT);
        root.mask |= mask_of(&chars);
        root.terminal_count += 1;

        let mut current = ROOT;
        for (&c, &mask) in chars.iter().zip(&masks) {
            let label = Label::Char(c);
            current = match self.pool.get(current).child(label) {
                Some(child) => child,
                None => self.pool.attach(current, label),
            };

            let node = self.pool.get_mut(current);
            node.mask |= mask;
            node.terminal_count += 1;
        }

        let terminal = self.pool.attach(current, Label::End);
        let node = self.pool.get_mut(terminal);
        node.path = key.to_owned();
        node.is_terminal = true;
        node.value = Some(value);
        node.terminal_count = 1;

        self.size += 1;
        trace!("insert: added {:?} at depth {}", key, node.depth);
        None
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("fooish", 1);
    /// map.insert("foobar", 2);
    /// assert_eq!(map.get("foobar"), Some(&2));
    /// assert_eq!(map.get("foo"), None);
    /// ```
    pub fn get<K: AsRef<str>>(&self, key: K) -> Option<&V> {
        let terminal = self.terminal_of(key.as_ref())?;
        self.pool.get(terminal).value.as_ref()
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<K: AsRef<str>>(&mut self, key: K) -> Option<&mut V> {
        let terminal = self.terminal_of(key.as_ref())?;
        self.pool.get_mut(terminal).value.as_mut()
    }

    /// Returns `true` if `key` is stored.
    pub fn contains_key<K: AsRef<str>>(&self, key: K) -> bool {
        self.terminal_of(key.as_ref()).is_some()
    }

    /// Removes `key`, returning its value if it was stored.
    ///
    /// Nodes that no longer lead to any key are unlinked, climbing until an
    /// ancestor that still has children or holds a key itself. Masks from
    /// that ancestor up to the root are then rebuilt from their children.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("foo", 1);
    /// map.insert("foosball", 2);
    ///
    /// assert_eq!(map.remove("foo"), Some(1));
    /// assert_eq!(map.remove("foo"), None);
    /// assert_eq!(map.get("foosball"), Some(&2));
    /// ```
    pub fn remove<K: AsRef<str>>(&mut self, key: K) -> Option<V> {
        let key = key.as_ref();
        let owner = self.pool.walk(ROOT, key.chars())?;
        self.pool.get(owner).terminal_child()?;

        let value = self.pool.detach(owner, Label::End);
        self.size -= 1;

        let mut current = owner;
        let mut pruned = 0usize;
        loop {
            let node = self.pool.get_mut(current);
            node.terminal_count -= 1;
            if !node.is_dangling() {
                break;
            }
            let label = node.label;
            let Some(parent) = node.parent else {
                break;
            };
            trace!("remove: pruning {:?} at depth {}", label, node.depth);
            self.pool.detach(parent, label);
            pruned += 1;
            current = parent;
        }

        let mut above = self.pool.get(current).parent;
        while let Some(id) = above {
            let node = self.pool.get_mut(id);
            node.terminal_count -= 1;
            above = node.parent;
        }
        self.pool.recompute_masks(current);

        debug!("removed {:?}, pruned {} nodes", key, pruned);
        value
    }

    /// Returns `true` if some stored key starts with `prefix`.
    ///
    /// The empty prefix always matches, even in an empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("fooish", 1);
    /// map.insert("foobar", 1);
    /// assert!(map.has_prefix("foo"));
    /// assert!(map.has_prefix("foobar"));
    /// assert!(!map.has_prefix("fool"));
    /// ```
    pub fn has_prefix<K: AsRef<str>>(&self, prefix: K) -> bool {
        self.node_at(prefix.as_ref()).is_some()
    }

    /// Returns an iterator over every entry of the map, in no fixed order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.pool, Some(ROOT))
    }

    /// Returns an iterator over every key of the map.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over every value of the map.
    pub fn values(&self) -> Values<'_, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over the entries whose key starts with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("apple", 1);
    /// map.insert("application", 2);
    /// map.insert("banana", 3);
    ///
    /// let total: i32 = map.prefix_iter("app").map(|(_, v)| v).sum();
    /// assert_eq!(total, 3);
    /// assert_eq!(map.prefix_iter("cherry").count(), 0);
    /// ```
    pub fn prefix_iter<K: AsRef<str>>(&self, prefix: K) -> Iter<'_, V> {
        Iter::new(&self.pool, self.node_at(prefix.as_ref()))
    }

    /// Returns every key starting with `prefix`. The empty prefix lists the
    /// whole map.
    pub fn keys_with_prefix<K: AsRef<str>>(&self, prefix: K) -> Vec<&str> {
        self.prefix_iter(prefix).map(|(k, _)| k).collect()
    }

    /// Returns the value of every key starting with `prefix`.
    pub fn values_with_prefix<K: AsRef<str>>(&self, prefix: K) -> Vec<&V> {
        self.prefix_iter(prefix).map(|(_, v)| v).collect()
    }

    /// Returns every entry whose key starts with `prefix`, keyed by key.
    pub fn entries_with_prefix<K: AsRef<str>>(&self, prefix: K) -> HashMap<&str, &V> {
        self.prefix_iter(prefix).collect()
    }

    pub(crate) fn node_at(&self, prefix: &str) -> Option<NodeId> {
        self.pool.walk(ROOT, prefix.chars())
    }

    pub(crate) fn terminal_of(&self, key: &str) -> Option<NodeId> {
        let owner = self.node_at(key)?;
        self.pool.get(owner).terminal_child()
    }

    /// Panics if any structural invariant of the tree is broken.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use crate::node::covers;

        let mut order = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            for (&label, &child) in &self.pool.get(id).children {
                let node = self.pool.get(child);
                assert_eq!(node.label, label, "child stored under the wrong label");
                assert_eq!(node.parent, Some(id), "parent link out of sync");
                assert_eq!(node.depth, self.pool.get(id).depth + 1);
                stack.push(child);
            }
        }
        assert_eq!(order.len(), self.pool.live(), "unreachable live nodes");

        let mut terminals = HashMap::new();
        for &id in order.iter().rev() {
            let node = self.pool.get(id);
            let below: usize = node.children.values().map(|c| terminals[c]).sum();
            let own = usize::from(node.is_terminal);
            assert_eq!(node.terminal_count, below + own, "terminal_count drift");
            terminals.insert(id, below + own);

            let required = node
                .children
                .values()
                .fold(node.label.bit(), |m, &c| m | self.pool.get(c).mask);
            assert!(covers(node.mask, required), "mask misses a letter below it");

            if node.is_terminal {
                assert_eq!(node.label, Label::End);
                assert!(node.children.is_empty());
                assert!(node.value.is_some());

                let mut chars = Vec::new();
                let mut up = node.parent;
                while let Some(p) = up {
                    if let Label::Char(c) = self.pool.get(p).label {
                        chars.push(c);
                    }
                    up = self.pool.get(p).parent;
                }
                let path: String = chars.into_iter().rev().collect();
                assert_eq!(node.path, path, "terminal path disagrees with its chain");
            } else {
                assert_ne!(node.label, Label::End);
                assert!(!node.is_dangling(), "dangling chain left behind");
            }
        }
        assert_eq!(terminals[&ROOT], self.size, "size disagrees with the tree");
    }
}
