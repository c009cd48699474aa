//! Deletion collapse: draining a non-trivial tree one key at a time always
//! ends with an empty root, never a dangling single-child root.

use crate::e2e_tests::helpers::tree_with;
use crate::types::Key;

#[test]
fn test_draining_in_insertion_order() {
    let values: Vec<i64> = (1..=50).collect();
    let mut tree = tree_with(2, &values);
    assert!(tree.depth() >= 3);

    for &value in &values {
        assert!(tree.remove(&Key::Number(value)), "remove {value}");
    }

    assert!(tree.is_empty());
    let views = tree.nodes();
    assert_eq!(views.len(), 1);
    assert!(views[0].is_leaf);
    assert!(views[0].keys.is_empty());
    assert_eq!(tree.depth(), 0);
}

#[test]
fn test_draining_in_reverse_order() {
    let values: Vec<i64> = (1..=50).collect();
    let mut tree = tree_with(3, &values);

    for &value in values.iter().rev() {
        assert!(tree.remove(&Key::Number(value)), "remove {value}");
    }

    assert!(tree.is_empty());
    assert_eq!(tree.nodes().len(), 1);
}

#[test]
fn test_draining_from_the_middle_out() {
    let values: Vec<i64> = (1..=31).collect();
    let mut tree = tree_with(2, &values);

    // Remove the middle, then alternate outwards to both extremes.
    let mut order = vec![16i64];
    for step in 1..=15i64 {
        order.push(16 - step);
        order.push(16 + step);
    }

    for value in order {
        assert!(tree.remove(&Key::Number(value)), "remove {value}");
    }

    assert!(tree.is_empty());
    assert_eq!(tree.nodes().len(), 1);
}

#[test]
fn test_tree_stays_usable_after_caller_mistakes() {
    let mut tree = tree_with(2, &[10, 20, 30]);

    // Removing an absent key reports false and changes nothing.
    assert!(!tree.remove(&Key::Number(99)));
    assert_eq!(tree.keys().len(), 3);

    // The tree keeps working afterwards.
    tree.add(Key::Number(40));
    assert!(tree.contains(&Key::Number(40)));
    assert!(tree.remove(&Key::Number(40)));
}
