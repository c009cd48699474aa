//! Split correctness: overflowing an empty tree produces a 1-key root whose
//! two leaves share the original keys.

use crate::e2e_tests::helpers::number_keys;
use crate::tree::BTree;
use crate::types::Key;

#[test]
fn test_overflow_insert_produces_one_key_root() {
    for max_keys in [2, 3, 4, 5, 6] {
        let mut tree = BTree::new(max_keys);
        for value in 0..=max_keys as i64 {
            tree.add(Key::Number(value));
        }

        let views = tree.nodes();
        let root = &views[0];
        assert_eq!(root.keys.len(), 1, "capacity {max_keys}");
        assert_eq!(root.children.len(), 2, "capacity {max_keys}");

        let leaves: Vec<_> = views.iter().filter(|view| view.is_leaf).collect();
        assert_eq!(leaves.len(), 2, "capacity {max_keys}");
        // The two halves hold every key but the promoted median.
        assert_eq!(
            leaves[0].keys.len() + leaves[1].keys.len(),
            max_keys,
            "capacity {max_keys}"
        );
        assert_eq!(tree.counters().splits, 1, "capacity {max_keys}");
    }
}

#[test]
fn test_ascending_and_descending_workloads_balance() {
    for max_keys in [2, 3, 4] {
        let mut ascending = BTree::new(max_keys);
        let mut descending = BTree::new(max_keys);
        for value in 1..=100 {
            ascending.add(Key::Number(value));
            descending.add(Key::Number(101 - value));
        }

        let expected = number_keys(&(1..=100).collect::<Vec<i64>>());
        assert_eq!(ascending.keys(), expected);
        assert_eq!(descending.keys(), expected);

        // Depth stays logarithmic regardless of insertion order.
        assert!(ascending.depth() <= 8, "capacity {max_keys}");
        assert!(descending.depth() <= 8, "capacity {max_keys}");
    }
}
