//! The scripted order-3 scenario: insert `[10, 20, 30]`, verify the split,
//! remove `10`, verify the merge collapses back to a single leaf.

use crate::e2e_tests::helpers::{number_keys, tree_with};
use crate::types::Key;

#[test]
fn test_order3_insert_sequence_splits_once() {
    let tree = tree_with(2, &[10, 20, 30]);

    // After the third insert the root holds exactly the median.
    let views = tree.nodes();
    let root = &views[0];
    assert_eq!(root.keys, number_keys(&[20]));
    assert_eq!(root.children.len(), 2);
    assert!(!root.is_leaf);

    let leaves: Vec<_> = views.iter().filter(|view| view.is_leaf).collect();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].keys, number_keys(&[10]));
    assert_eq!(leaves[1].keys, number_keys(&[30]));

    assert_eq!(tree.counters().splits, 1);
    assert_eq!(tree.counters().merges, 0);
}

#[test]
fn test_order3_remove_underflows_and_merges() {
    let mut tree = tree_with(2, &[10, 20, 30]);

    // Removing 10 leaves the left leaf empty (min_keys = 1), which merges
    // with its sibling through the separator 20.
    assert!(tree.remove(&Key::Number(10)));

    let views = tree.nodes();
    assert_eq!(views.len(), 1, "tree must collapse to a single leaf");
    assert!(views[0].is_leaf);
    assert_eq!(views[0].keys, number_keys(&[20, 30]));
    assert_eq!(tree.counters().merges, 1);
}

#[test]
fn test_order3_inspection_surface() {
    let tree = tree_with(2, &[10, 20, 30]);

    assert_eq!(tree.max_keys(), 2);
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.keys(), number_keys(&[10, 20, 30]));
    assert!(tree.contains(&Key::Number(20)));
    assert!(!tree.contains(&Key::Number(25)));
    assert!(!tree.is_empty());
}
