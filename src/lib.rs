//! A trie-based string index.
//!
//! This crate provides [`TrieMap`], a map from Unicode string keys to values
//! stored as a character trie, and [`Trie`], the same map behind a
//! reader/writer lock for sharing between threads.
//!
//! # Features
//!
//! - Exact lookup, insertion and removal in O(k) for a key of k characters
//! - Prefix enumeration (`keys_with_prefix`, `values_with_prefix`, ...)
//! - Longest-prefix match and every-ancestor match against stored keys
//! - Fuzzy search: keys that contain the query as an ordered subsequence,
//!   with branches pruned by a per-node letter bitmask
//! - Relative queries and a single [`SearchMode`]-dispatched entry point
//!
//! The pruning mask only tracks `'a'..='z'`. Keys in other scripts, upper
//! case, digits and punctuation are searched correctly but without mask
//! pruning for those characters.
//!
//! Removal unlinks every node the removed key alone was using, so the tree
//! never holds dead chains.
//!
//! Cargo feature `serde` derives `Serialize`/`Deserialize` for [`SearchMode`].

mod iter;
mod node;
mod node_pool;
mod search;
mod sync;
mod trie_map;

pub use iter::{Iter, Keys, Values};
pub use search::{ParseSearchModeError, SearchMode};
pub use sync::Trie;
pub use trie_map::TrieMap;

#[cfg(test)]
mod proptest_trie;
