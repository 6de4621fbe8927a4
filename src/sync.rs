//! A [`TrieMap`] behind one reader/writer lock.
//!
//! Mutations hold the write guard for their whole run, pruning and mask
//! rebuilds included, so no reader ever sees half an insert or removal.
//! Reads share the read guard and hand back owned copies; nothing returned
//! points into the tree.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::{SearchMode, TrieMap};

/// A thread-safe string index.
///
/// `Trie` offers the same searches as [`TrieMap`] through `&self`, so it can
/// sit in an `Arc` or a `static` and be queried from many threads at once.
/// Results are cloned out of the tree.
///
/// # Examples
///
/// ```
/// use searchtrie::{SearchMode, Trie};
///
/// let trie = Trie::new();
/// trie.insert("/interfaces", 1);
/// trie.insert("/interfaces/interface", 2);
///
/// assert_eq!(trie.get("/interfaces"), Some(1));
/// assert_eq!(
///     trie.longest_prefix_match("/interfaces/interface[name=1]"),
///     Some(("/interfaces/interface".to_string(), 2))
/// );
/// assert_eq!(trie.search("/interfaces", SearchMode::Exact), vec!["/interfaces"]);
/// ```
pub struct Trie<V> {
    inner: RwLock<TrieMap<V>>,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<TrieMap<V>> for Trie<V> {
    fn from(map: TrieMap<V>) -> Self {
        Trie {
            inner: RwLock::new(map),
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Trie<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&*self.inner.read(), f)
    }
}

impl<V, K: AsRef<str>> FromIterator<(K, V)> for Trie<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Trie::from(iter.into_iter().collect::<TrieMap<V>>())
    }
}

impl<V> Trie<V> {
    /// Creates an empty trie holding only its root.
    pub fn new() -> Self {
        Trie::from(TrieMap::new())
    }

    /// Creates an empty trie whose arena has room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Trie::from(TrieMap::with_capacity(nodes))
    }

    /// Unwraps the underlying map.
    pub fn into_inner(self) -> TrieMap<V> {
        self.inner.into_inner()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Inserts `key`, returning the value it replaced, if any.
    pub fn insert<K: AsRef<str>>(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Removes `key` and prunes the nodes only it used.
    pub fn remove<K: AsRef<str>>(&self, key: K) -> Option<V> {
        self.inner.write().remove(key)
    }

    /// Removes every key.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn contains_key<K: AsRef<str>>(&self, key: K) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn has_prefix<K: AsRef<str>>(&self, prefix: K) -> bool {
        self.inner.read().has_prefix(prefix)
    }

    /// Every stored key.
    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys().map(str::to_owned).collect()
    }

    /// Every key starting with `prefix`.
    pub fn keys_with_prefix<K: AsRef<str>>(&self, prefix: K) -> Vec<String> {
        owned_keys(self.inner.read().keys_with_prefix(prefix))
    }

    /// Fuzzy matches of `partial`, shortest key first.
    pub fn fuzzy_search<K: AsRef<str>>(&self, partial: K) -> Vec<String> {
        owned_keys(self.inner.read().fuzzy_search(partial))
    }

    /// Stored keys that are literal prefixes of `key`, shortest first.
    pub fn matching_prefix_keys<K: AsRef<str>>(&self, key: K) -> Vec<String> {
        owned_keys(self.inner.read().matching_prefix_keys(key))
    }

    /// Keys related to `key` by prefix, ancestry or subsequence.
    pub fn relative_keys<K: AsRef<str>>(&self, key: K) -> Vec<String> {
        owned_keys(self.inner.read().relative_keys(key))
    }

    /// Keys matched by `mode`.
    pub fn search<K: AsRef<str>>(&self, key: K, mode: SearchMode) -> Vec<String> {
        owned_keys(self.inner.read().search(key, mode))
    }

    /// Keys matched by the mode with numeric `code`; empty for unknown codes.
    pub fn search_code<K: AsRef<str>>(&self, key: K, code: u8) -> Vec<String> {
        owned_keys(self.inner.read().search_code(key, code))
    }
}

impl<V: Clone> Trie<V> {
    /// A copy of the value stored under `key`.
    pub fn get<K: AsRef<str>>(&self, key: K) -> Option<V> {
        self.inner.read().get(key).cloned()
    }

    /// A copy of the whole map, taken under one read guard.
    pub fn snapshot(&self) -> TrieMap<V> {
        self.inner.read().clone()
    }

    pub fn values(&self) -> Vec<V> {
        self.inner.read().values().cloned().collect()
    }

    pub fn values_with_prefix<K: AsRef<str>>(&self, prefix: K) -> Vec<V> {
        owned_values(self.inner.read().values_with_prefix(prefix))
    }

    pub fn entries_with_prefix<K: AsRef<str>>(&self, prefix: K) -> HashMap<String, V> {
        owned_entries(self.inner.read().entries_with_prefix(prefix))
    }

    /// The longest stored key that is a literal prefix of `key`, and its value.
    pub fn longest_prefix_match<K: AsRef<str>>(&self, key: K) -> Option<(String, V)> {
        self.inner
            .read()
            .longest_prefix_match(key)
            .map(|(k, v)| (k.to_owned(), v.clone()))
    }

    /// Every stored key that is a literal prefix of `key` with its value,
    /// shortest first.
    pub fn matching_prefixes<K: AsRef<str>>(&self, key: K) -> Vec<(String, V)> {
        self.inner
            .read()
            .matching_prefixes(key)
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()
    }

    pub fn matching_prefix_entries<K: AsRef<str>>(&self, key: K) -> HashMap<String, V> {
        owned_entries(self.inner.read().matching_prefix_entries(key))
    }

    pub fn fuzzy_values<K: AsRef<str>>(&self, partial: K) -> Vec<V> {
        owned_values(self.inner.read().fuzzy_values(partial))
    }

    pub fn fuzzy_entries<K: AsRef<str>>(&self, partial: K) -> HashMap<String, V> {
        owned_entries(self.inner.read().fuzzy_entries(partial))
    }

    pub fn relative_values<K: AsRef<str>>(&self, key: K) -> Vec<V> {
        owned_values(self.inner.read().relative_values(key))
    }

    pub fn relative_entries<K: AsRef<str>>(&self, key: K) -> HashMap<String, V> {
        owned_entries(self.inner.read().relative_entries(key))
    }

    pub fn search_values<K: AsRef<str>>(&self, key: K, mode: SearchMode) -> Vec<V> {
        owned_values(self.inner.read().search_values(key, mode))
    }

    pub fn search_entries<K: AsRef<str>>(&self, key: K, mode: SearchMode) -> HashMap<String, V> {
        owned_entries(self.inner.read().search_entries(key, mode))
    }

    pub fn search_values_code<K: AsRef<str>>(&self, key: K, code: u8) -> Vec<V> {
        owned_values(self.inner.read().search_values_code(key, code))
    }

    pub fn search_entries_code<K: AsRef<str>>(&self, key: K, code: u8) -> HashMap<String, V> {
        owned_entries(self.inner.read().search_entries_code(key, code))
    }
}

fn owned_keys(keys: Vec<&str>) -> Vec<String> {
    keys.into_iter().map(str::to_owned).collect()
}

fn owned_values<V: Clone>(values: Vec<&V>) -> Vec<V> {
    values.into_iter().cloned().collect()
}

fn owned_entries<V: Clone>(entries: HashMap<&str, &V>) -> HashMap<String, V> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.clone()))
        .collect()
}
