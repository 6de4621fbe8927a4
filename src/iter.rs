use crate::node::NodeId;
use crate::node_pool::NodePool;

/// An iterator over the stored entries below a node.
///
/// This struct is created by [`iter`] and [`prefix_iter`] on [`TrieMap`].
/// The walk is depth-first with an explicit stack, so key length never
/// bounds recursion depth. Order is unspecified.
///
/// [`iter`]: crate::TrieMap::iter
/// [`prefix_iter`]: crate::TrieMap::prefix_iter
/// [`TrieMap`]: crate::TrieMap
pub struct Iter<'a, V> {
    pub(crate) pool: &'a NodePool<V>,
    pub(crate) stack: Vec<NodeId>,
    pub(crate) remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(pool: &'a NodePool<V>, start: Option<NodeId>) -> Self {
        match start {
            Some(id) => Iter {
                pool,
                stack: vec![id],
                remaining: pool.get(id).terminal_count,
            },
            None => Iter {
                pool,
                stack: Vec::new(),
                remaining: 0,
            },
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.pool.get(id);
            self.stack.extend(node.children.values().copied());

            if node.is_terminal {
                if let Some(value) = node.value.as_ref() {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some((node.path.as_str(), value));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// An iterator over the keys below a node.
pub struct Keys<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// An iterator over the values below a node.
pub struct Values<'a, V> {
    pub(crate) inner: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

impl<'a, V> IntoIterator for &'a crate::TrieMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    /// Returns an iterator over references to the entries of the map.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("a", 1);
    /// map.insert("b", 2);
    ///
    /// let mut total = 0;
    /// for (_, value) in &map {
    ///     total += value;
    /// }
    /// assert_eq!(total, 3);
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
