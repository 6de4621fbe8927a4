use super::*;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap, HashSet};

// Small alphabets force shared prefixes and prefix-of-prefix keys. Upper
// case, '/' and a CJK character exercise characters without a mask bit.
const KEY_PATTERN: &str = "[abcdz/A苹]{0,6}";

fn key_value_pairs(min_pairs: usize, max_pairs: usize) -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec((KEY_PATTERN.prop_map(String::from), any::<i32>()), min_pairs..max_pairs)
}

#[derive(Debug, Clone)]
enum Operation {
    Insert(String, i32),
    Remove(String),
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Operation>> {
    let op = prop_oneof![
        3 => (KEY_PATTERN, any::<i32>()).prop_map(|(k, v)| Operation::Insert(k, v)),
        2 => KEY_PATTERN.prop_map(Operation::Remove),
    ];
    proptest::collection::vec(op, 1..max_ops)
}

fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}

fn sorted(mut keys: Vec<&str>) -> Vec<&str> {
    keys.sort_unstable();
    keys
}

fn build(pairs: &[(String, i32)]) -> (TrieMap<i32>, BTreeMap<String, i32>) {
    let mut trie = TrieMap::new();
    let mut reference = BTreeMap::new();
    for (key, value) in pairs {
        trie.insert(key, *value);
        reference.insert(key.clone(), *value);
    }
    (trie, reference)
}

#[test]
fn test_keys_with_nul_and_terminals_do_not_collide() {
    let mut trie = TrieMap::new();
    trie.insert("a\0", 1);
    trie.insert("a", 2);
    trie.check_invariants();

    assert_eq!(trie.get("a\0"), Some(&1));
    assert_eq!(trie.get("a"), Some(&2));

    trie.remove("a");
    assert_eq!(trie.get("a\0"), Some(&1));
    assert_eq!(trie.get("a"), None);
    trie.check_invariants();
}

#[test]
fn test_remove_everything_in_reverse() {
    let keys = ["", "a", "ab", "abc", "abd", "b", "ba"];
    let mut trie: TrieMap<usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();

    for (i, key) in keys.iter().enumerate().rev() {
        assert_eq!(trie.remove(key), Some(i));
        trie.check_invariants();
    }
    assert_eq!(trie.node_count(), 1);
}

proptest! {
    #[test]
    fn matches_btreemap_model(ops in operations(200)) {
        let mut trie = TrieMap::new();
        let mut reference = BTreeMap::new();

        for op in ops {
            match op {
                Operation::Insert(key, value) => {
                    prop_assert_eq!(trie.insert(&key, value), reference.insert(key, value));
                }
                Operation::Remove(key) => {
                    prop_assert_eq!(trie.remove(&key), reference.remove(&key));
                }
            }
            trie.check_invariants();
            prop_assert_eq!(trie.len(), reference.len());
        }

        for (key, value) in &reference {
            prop_assert_eq!(trie.get(key), Some(value));
        }

        let stored: BTreeMap<String, i32> = trie.iter().map(|(k, v)| (k.to_owned(), *v)).collect();
        prop_assert_eq!(stored, reference);
    }

    #[test]
    fn removing_everything_frees_every_node(pairs in key_value_pairs(1, 60)) {
        let (mut trie, reference) = build(&pairs);

        for key in reference.keys() {
            prop_assert!(trie.remove(key).is_some());
        }

        prop_assert!(trie.is_empty());
        prop_assert_eq!(trie.node_count(), 1);
        trie.check_invariants();
    }

    #[test]
    fn prefix_queries_match_filter(pairs in key_value_pairs(0, 60), prefix in "[abz/苹]{0,3}") {
        let (trie, reference) = build(&pairs);

        let expected: Vec<&str> = reference
            .keys()
            .filter(|k| k.starts_with(prefix.as_str()))
            .map(String::as_str)
            .collect();

        prop_assert_eq!(sorted(trie.keys_with_prefix(&prefix)), expected.clone());
        prop_assert_eq!(trie.prefix_iter(&prefix).len(), expected.len());
        prop_assert_eq!(trie.has_prefix(&prefix), prefix.is_empty() || !expected.is_empty());
    }

    #[test]
    fn fuzzy_search_matches_subsequence_filter(pairs in key_value_pairs(0, 60), partial in "[abcdzA苹/]{0,3}") {
        let (trie, reference) = build(&pairs);

        let expected: Vec<&str> = reference
            .keys()
            .filter(|k| is_subsequence(&partial, k))
            .map(String::as_str)
            .collect();

        let found = trie.fuzzy_search(&partial);
        let lengths: Vec<usize> = found.iter().map(|k| k.len()).collect();
        prop_assert!(lengths.windows(2).all(|w| w[0] <= w[1]), "not sorted by length: {:?}", found);
        prop_assert_eq!(sorted(found), expected);
    }

    #[test]
    fn fuzzy_search_survives_removals(pairs in key_value_pairs(1, 60), partial in "[abcdz]{1,3}") {
        let (mut trie, mut reference) = build(&pairs);

        let doomed: Vec<String> = reference.keys().step_by(2).cloned().collect();
        for key in &doomed {
            trie.remove(key);
            reference.remove(key);
        }

        let expected: Vec<&str> = reference
            .keys()
            .filter(|k| is_subsequence(&partial, k))
            .map(String::as_str)
            .collect();
        prop_assert_eq!(sorted(trie.fuzzy_search(&partial)), expected);
    }

    #[test]
    fn prefix_matches_agree_with_model(pairs in key_value_pairs(0, 60), query in "[abcdz/A苹]{0,8}") {
        let (trie, reference) = build(&pairs);

        let mut expected: Vec<&str> = reference
            .keys()
            .filter(|k| query.starts_with(k.as_str()))
            .map(String::as_str)
            .collect();
        expected.sort_by_key(|k| k.len());

        prop_assert_eq!(trie.matching_prefix_keys(&query), expected.clone());
        prop_assert_eq!(
            trie.longest_prefix_match(&query).map(|(k, _)| k),
            expected.last().copied()
        );
    }

    #[test]
    fn relative_is_union_of_parts(pairs in key_value_pairs(0, 60), query in "[abcz]{0,4}") {
        let (trie, reference) = build(&pairs);

        let expected: HashSet<&str> = reference
            .keys()
            .filter(|k| {
                k.starts_with(query.as_str())
                    || query.starts_with(k.as_str())
                    || is_subsequence(&query, k)
            })
            .map(String::as_str)
            .collect();

        let entries = trie.relative_entries(&query);
        let keys: HashSet<&str> = entries.keys().copied().collect();
        prop_assert_eq!(keys, expected);

        let values: HashMap<&str, i32> = entries.into_iter().map(|(k, v)| (k, *v)).collect();
        for (key, value) in values {
            prop_assert_eq!(reference.get(key), Some(&value));
        }
    }

    #[test]
    fn every_mode_dispatches_consistently(pairs in key_value_pairs(0, 40), query in "[abz]{0,3}", code in 0u8..8) {
        let (trie, _) = build(&pairs);

        let keys: HashSet<&str> = trie.search_code(&query, code).into_iter().collect();
        let entries = trie.search_entries_code(&query, code);
        let entry_keys: HashSet<&str> = entries.keys().copied().collect();
        prop_assert_eq!(&keys, &entry_keys);
        prop_assert_eq!(trie.search_values_code(&query, code).len(), entries.len());

        match SearchMode::from_code(code) {
            Some(mode) => {
                let by_mode: HashSet<&str> = trie.search(&query, mode).into_iter().collect();
                prop_assert_eq!(keys, by_mode);
            }
            None => prop_assert!(keys.is_empty()),
        }
    }
}
