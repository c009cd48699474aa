//! Export/import round trips and failure recovery through the public API.

use crate::e2e_tests::helpers::tree_with;
use crate::tree::BTree;
use crate::types::Key;

#[test]
fn test_roundtrip_preserves_keys_and_per_node_counts() {
    let tree = tree_with(3, &[13, 42, 7, 99, 1, 56, 28, 71, 35, 64]);

    let restored = BTree::import(&tree.export()).expect("roundtrip");

    assert_eq!(restored.keys(), tree.keys());
    assert_eq!(restored.depth(), tree.depth());
    assert_eq!(restored.max_keys(), tree.max_keys());

    // Identical shape: same per-node key counts at each position.
    let original_shape: Vec<usize> = tree.nodes().iter().map(|view| view.keys.len()).collect();
    let restored_shape: Vec<usize> = restored
        .nodes()
        .iter()
        .map(|view| view.keys.len())
        .collect();
    assert_eq!(restored_shape, original_shape);

    // Identical ids, so renderers can correlate across the reload.
    let original_ids: Vec<u64> = tree.nodes().iter().map(|view| view.id.as_u64()).collect();
    let restored_ids: Vec<u64> = restored
        .nodes()
        .iter()
        .map(|view| view.id.as_u64())
        .collect();
    assert_eq!(restored_ids, original_ids);
}

#[test]
fn test_failed_import_retains_previous_tree() {
    let tree = tree_with(2, &[10, 20, 30]);

    // The previous tree keeps serving after a rejected payload.
    let result = BTree::import("{\"definitely\": \"not a tree\"}");
    assert!(result.is_err());
    assert_eq!(tree.keys().len(), 3);
    assert!(tree.contains(&Key::Number(20)));
}

#[test]
fn test_imported_tree_accepts_further_mutations() {
    let tree = tree_with(2, &[10, 20, 30, 40, 50]);
    let mut restored = BTree::import(&tree.export()).expect("import");

    restored.add(Key::Number(60));
    assert!(restored.remove(&Key::Number(10)));
    assert!(restored.contains(&Key::Number(60)));
    assert!(!restored.contains(&Key::Number(10)));

    // A second round trip still works.
    let again = BTree::import(&restored.export()).expect("second roundtrip");
    assert_eq!(again.keys(), restored.keys());
}
