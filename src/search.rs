//! Query engines layered over the trie walk: longest-prefix and ancestor
//! matching, subsequence (fuzzy) search, relative queries, and the
//! [`SearchMode`] dispatch that routes one key to any of them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::trace;

use crate::TrieMap;
use crate::iter::Iter;
use crate::node::{Label, NodeId, ROOT, covers, suffix_masks};

/// Which kind of match a dispatched search performs.
///
/// Each mode has a stable numeric code (see [`code`](Self::code)) and a
/// snake_case name accepted by [`FromStr`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchMode {
    /// The key itself, if stored.
    Exact = 0,
    /// Every stored key that starts with the query.
    Prefix = 1,
    /// The longest stored key that is a prefix of the query.
    LongestPrefix = 2,
    /// Every stored key that is a prefix of the query, shortest first.
    MatchingPrefixes = 3,
    /// Every stored key containing the query as an ordered subsequence.
    Fuzzy = 4,
    /// The union of `Prefix`, `MatchingPrefixes` and `Fuzzy`.
    Relative = 5,
}

impl SearchMode {
    pub const ALL: [SearchMode; 6] = [
        SearchMode::Exact,
        SearchMode::Prefix,
        SearchMode::LongestPrefix,
        SearchMode::MatchingPrefixes,
        SearchMode::Fuzzy,
        SearchMode::Relative,
    ];

    /// Maps a numeric mode code back to its mode. Unknown codes give `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::SearchMode;
    /// assert_eq!(SearchMode::from_code(4), Some(SearchMode::Fuzzy));
    /// assert_eq!(SearchMode::from_code(42), None);
    /// ```
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            SearchMode::Exact => "exact",
            SearchMode::Prefix => "prefix",
            SearchMode::LongestPrefix => "longest_prefix",
            SearchMode::MatchingPrefixes => "matching_prefixes",
            SearchMode::Fuzzy => "fuzzy",
            SearchMode::Relative => "relative",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no [`SearchMode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSearchModeError {
    input: String,
}

impl fmt::Display for ParseSearchModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search mode {:?}", self.input)
    }
}

impl std::error::Error for ParseSearchModeError {}

impl FromStr for SearchMode {
    type Err = ParseSearchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| ParseSearchModeError {
                input: s.to_owned(),
            })
    }
}

impl<V> TrieMap<V> {
    /// Returns the longest stored key that is a literal prefix of `key`,
    /// together with its value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("foo", 1);
    /// map.insert("foretold", 2);
    ///
    /// assert_eq!(map.longest_prefix_match("fooo"), Some(("foo", &1)));
    /// assert_eq!(map.longest_prefix_match("foretoldme"), Some(("foretold", &2)));
    /// assert_eq!(map.longest_prefix_match("abc"), None);
    /// ```
    pub fn longest_prefix_match<K: AsRef<str>>(&self, key: K) -> Option<(&str, &V)> {
        let last = self.prefix_terminals(key.as_ref()).pop()?;
        self.entry(last)
    }

    /// Returns every stored key that is a literal prefix of `key`, from the
    /// shortest to the longest. Empty if none is stored.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("/a", 1);
    /// map.insert("/a/b", 2);
    /// map.insert("/a/c", 3);
    ///
    /// assert_eq!(map.matching_prefixes("/a/b/d"), vec![("/a", &1), ("/a/b", &2)]);
    /// assert!(map.matching_prefixes("/x").is_empty());
    /// ```
    pub fn matching_prefixes<K: AsRef<str>>(&self, key: K) -> Vec<(&str, &V)> {
        self.prefix_terminals(key.as_ref())
            .into_iter()
            .filter_map(|id| self.entry(id))
            .collect()
    }

    /// Keys of [`matching_prefixes`](Self::matching_prefixes).
    pub fn matching_prefix_keys<K: AsRef<str>>(&self, key: K) -> Vec<&str> {
        self.matching_prefixes(key).into_iter().map(|(k, _)| k).collect()
    }

    /// [`matching_prefixes`](Self::matching_prefixes) keyed by key.
    pub fn matching_prefix_entries<K: AsRef<str>>(&self, key: K) -> HashMap<&str, &V> {
        self.matching_prefixes(key).into_iter().collect()
    }

    /// Returns every stored key that contains `partial` as an ordered, not
    /// necessarily contiguous, subsequence. Keys with fewer UTF-8 bytes come
    /// first; keys of equal byte length keep the order they were found in.
    /// An empty `partial` matches every key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let map: TrieMap<()> = ["foosball", "bfrza", "foo/bart/baz.go", "frosty"]
    ///     .into_iter()
    ///     .map(|k| (k, ()))
    ///     .collect();
    ///
    /// assert_eq!(map.fuzzy_search("fz"), vec!["bfrza", "foo/bart/baz.go"]);
    /// assert!(map.fuzzy_search("zzz").is_empty());
    /// ```
    pub fn fuzzy_search<K: AsRef<str>>(&self, partial: K) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .fuzzy_matches(partial.as_ref())
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        keys.sort_by_key(|k| k.len());
        keys
    }

    /// Values of every key [`fuzzy_search`](Self::fuzzy_search) would return,
    /// in no particular order.
    pub fn fuzzy_values<K: AsRef<str>>(&self, partial: K) -> Vec<&V> {
        self.fuzzy_matches(partial.as_ref())
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }

    /// Every fuzzy match keyed by key.
    pub fn fuzzy_entries<K: AsRef<str>>(&self, partial: K) -> HashMap<&str, &V> {
        self.fuzzy_matches(partial.as_ref()).into_iter().collect()
    }

    /// Everything related to `key`: the keys stored under it, the stored
    /// keys it extends, and its fuzzy matches, deduplicated by key.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("/if", 1);
    /// map.insert("/if/state", 2);
    /// map.insert("/if/x/state", 3);
    /// map.insert("/other", 4);
    ///
    /// let related = map.relative_entries("/if/state");
    /// assert_eq!(related.len(), 3);
    /// assert_eq!(related["/if"], &1);
    /// assert_eq!(related["/if/x/state"], &3);
    /// ```
    pub fn relative_entries<K: AsRef<str>>(&self, key: K) -> HashMap<&str, &V> {
        let key = key.as_ref();
        let mut related = self.entries_with_prefix(key);
        related.extend(self.matching_prefixes(key));
        related.extend(self.fuzzy_matches(key));
        related
    }

    /// Keys of [`relative_entries`](Self::relative_entries).
    pub fn relative_keys<K: AsRef<str>>(&self, key: K) -> Vec<&str> {
        self.relative_entries(key).into_keys().collect()
    }

    /// Values of [`relative_entries`](Self::relative_entries).
    pub fn relative_values<K: AsRef<str>>(&self, key: K) -> Vec<&V> {
        self.relative_entries(key).into_values().collect()
    }

    /// Runs the search selected by `mode` and returns the matching keys.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::{SearchMode, TrieMap};
    /// let mut map = TrieMap::new();
    /// map.insert("foo", 1);
    /// map.insert("football", 2);
    ///
    /// assert_eq!(map.search("foot", SearchMode::Exact), Vec::<&str>::new());
    /// assert_eq!(map.search("foot", SearchMode::Prefix), vec!["football"]);
    /// assert_eq!(map.search("foot", SearchMode::LongestPrefix), vec!["foo"]);
    /// ```
    pub fn search<K: AsRef<str>>(&self, key: K, mode: SearchMode) -> Vec<&str> {
        self.search_matches(key.as_ref(), mode)
            .into_iter()
            .map(|(k, _)| k)
            .collect()
    }

    /// Runs the search selected by `mode` and returns the matching values.
    pub fn search_values<K: AsRef<str>>(&self, key: K, mode: SearchMode) -> Vec<&V> {
        self.search_matches(key.as_ref(), mode)
            .into_iter()
            .map(|(_, v)| v)
            .collect()
    }

    /// Runs the search selected by `mode` and returns the matches keyed by key.
    pub fn search_entries<K: AsRef<str>>(&self, key: K, mode: SearchMode) -> HashMap<&str, &V> {
        self.search_matches(key.as_ref(), mode).into_iter().collect()
    }

    /// [`search`](Self::search) with a numeric mode code. Unknown codes
    /// match nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use searchtrie::TrieMap;
    /// let mut map = TrieMap::new();
    /// map.insert("foo", 1);
    /// assert_eq!(map.search_code("foo", 0), vec!["foo"]);
    /// assert!(map.search_code("foo", 200).is_empty());
    /// ```
    pub fn search_code<K: AsRef<str>>(&self, key: K, code: u8) -> Vec<&str> {
        SearchMode::from_code(code)
            .map(|mode| self.search(key, mode))
            .unwrap_or_default()
    }

    /// [`search_values`](Self::search_values) with a numeric mode code.
    pub fn search_values_code<K: AsRef<str>>(&self, key: K, code: u8) -> Vec<&V> {
        SearchMode::from_code(code)
            .map(|mode| self.search_values(key, mode))
            .unwrap_or_default()
    }

    /// [`search_entries`](Self::search_entries) with a numeric mode code.
    pub fn search_entries_code<K: AsRef<str>>(&self, key: K, code: u8) -> HashMap<&str, &V> {
        SearchMode::from_code(code)
            .map(|mode| self.search_entries(key, mode))
            .unwrap_or_default()
    }

    fn search_matches(&self, key: &str, mode: SearchMode) -> Vec<(&str, &V)> {
        match mode {
            SearchMode::Exact => self
                .terminal_of(key)
                .and_then(|id| self.entry(id))
                .into_iter()
                .collect(),
            SearchMode::Prefix => self.prefix_iter(key).collect(),
            SearchMode::LongestPrefix => self.longest_prefix_match(key).into_iter().collect(),
            SearchMode::MatchingPrefixes => self.matching_prefixes(key),
            SearchMode::Fuzzy => {
                let mut matches = self.fuzzy_matches(key);
                matches.sort_by_key(|(k, _)| k.len());
                matches
            }
            SearchMode::Relative => self.relative_entries(key).into_iter().collect(),
        }
    }

    fn entry(&self, terminal: NodeId) -> Option<(&str, &V)> {
        let node = self.pool.get(terminal);
        node.value.as_ref().map(|v| (node.path.as_str(), v))
    }

    /// Terminal nodes of every stored key that is a prefix of `key`, shortest
    /// first. The walk stops at the first character with no child.
    fn prefix_terminals(&self, key: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut current = ROOT;
        let mut chars = key.chars();

        loop {
            let node = self.pool.get(current);
            if let Some(terminal) = node.terminal_child() {
                found.push(terminal);
            }
            let Some(c) = chars.next() else {
                break;
            };
            match node.child(Label::Char(c)) {
                Some(next) => current = next,
                None => break,
            }
        }
        found
    }

    /// Backtracking subsequence search, in discovery order.
    ///
    /// Stack entries are `(node, index)` where `index` counts the characters
    /// of `partial` already matched on the path to `node`. A node is dropped
    /// when its mask lacks a letter still required. Once the whole of
    /// `partial` is matched every key below the node matches.
    fn fuzzy_matches(&self, partial: &str) -> Vec<(&str, &V)> {
        let partial: Vec<char> = partial.chars().collect();
        if partial.is_empty() {
            return self.iter().collect();
        }

        let required = suffix_masks(&partial);
        let mut matches = Vec::new();
        let mut stack = vec![(ROOT, 0usize)];
        let mut pruned = 0usize;

        while let Some((id, mut index)) = stack.pop() {
            let node = self.pool.get(id);
            if !covers(node.mask, required[index]) {
                pruned += 1;
                continue;
            }

            if node.label == Label::Char(partial[index]) {
                index += 1;
                if index == partial.len() {
                    matches.extend(Iter::new(&self.pool, Some(id)));
                    continue;
                }
            }

            stack.extend(node.children.values().map(|&child| (child, index)));
        }

        trace!(
            "fuzzy: {} matches, {} branches pruned by mask",
            matches.len(),
            pruned
        );
        matches
    }
}
