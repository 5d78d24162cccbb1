use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

fn validate_tree(tree: &CountingTree) {
    if let Err(msg) = tree.check_invariants() {
        panic!("tree invariant violated: {msg}");
    }
    let n = tree.len() as f64;
    let bound = (1.45 * (n + 1.0).log2()).ceil() as u32;
    assert!(
        tree.height() <= bound.max(1),
        "height {} exceeds AVL bound {} for {} nodes",
        tree.height(),
        bound,
        tree.len()
    );
}

fn short_key() -> impl Strategy<Value = Vec<u8>> {
    // Small alphabet so repeats are common.
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', b'Z', 0xff]), 0..4)
}

proptest! {
    #[test]
    fn tree_matches_btreemap_model(keys in prop::collection::vec(short_key(), 0..300)) {
        let mut tree = CountingTree::new();
        let mut model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for key in &keys {
            let outcome = tree.insert_or_increment(key);
            let seen = model.contains_key(key);
            *model.entry(key.clone()).or_insert(0) += 1;
            prop_assert_eq!(matches!(outcome, Insertion::Incremented(_)), seen);
        }

        validate_tree(&tree);
        let listed: Vec<(Vec<u8>, u64)> = tree.iter().map(|n| (n.key().to_vec(), n.count())).collect();
        let expected: Vec<(Vec<u8>, u64)> = model.into_iter().collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn every_insertion_prefix_stays_balanced(keys in prop::collection::vec(any::<u16>(), 1..200)) {
        let mut tree = CountingTree::new();
        for key in &keys {
            tree.insert_or_increment(&key.to_be_bytes());
            validate_tree(&tree);
        }
        prop_assert_eq!(tree.total(), keys.len() as u64);
    }

    #[test]
    fn enumeration_is_strictly_ascending_and_fused(keys in prop::collection::vec(short_key(), 0..100)) {
        let mut tree = CountingTree::new();
        for key in &keys {
            tree.insert_or_increment(key);
        }
        let mut iter = tree.iter();
        let mut previous: Option<&[u8]> = None;
        let mut yielded = 0;
        for node in iter.by_ref() {
            if let Some(prev) = previous {
                prop_assert!(prev < node.key());
            }
            previous = Some(node.key());
            yielded += 1;
        }
        prop_assert_eq!(yielded, tree.len());
        prop_assert!(iter.next().is_none());
        prop_assert!(iter.next().is_none());
    }

    #[test]
    fn list_count_equals_in_window_adds(
        entries in prop::collection::vec(("[a-c]{0,2}(\\.[a-cA-C]{0,2}){0,2}", 0u32..40), 0..200),
        begin in 0u32..40,
        span in 0u32..20,
    ) {
        let end = begin + span;
        let mut list = TldList::new(begin, end).unwrap();
        let mut expected = 0u64;
        for (host, day) in &entries {
            let added = list.add(host, day);
            let inside = (begin..=end).contains(day);
            prop_assert_eq!(added.is_counted(), inside);
            expected += u64::from(inside);
        }
        prop_assert_eq!(list.count(), expected);
        prop_assert_eq!(list.iter().map(Node::count).sum::<u64>(), expected);
        validate_tree(list.tree());
    }
}
