//! Synthesized-key workloads end to end: keygen feeds the sequencer, the
//! sequencer drives the tree, and the result round-trips through export.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::e2e_tests::helpers::drain_sequence;
use crate::keygen::{KeyOrder, generate_keys};
use crate::sequencer::FrameSequencer;
use crate::simulation::check_tree;
use crate::tree::BTree;
use crate::types::KeyType;

#[test]
fn test_random_number_workload_through_the_sequencer() {
    let mut rng = StdRng::seed_from_u64(21);
    let keys = generate_keys(&mut rng, 64, KeyType::Number, KeyOrder::Random, &[]);

    let mut sequencer = FrameSequencer::new(BTree::new(3));
    sequencer.add_keys(keys.clone());
    let _ = drain_sequence(&mut sequencer);

    let tree = sequencer.into_tree();
    assert_eq!(tree.keys().len(), keys.len());
    assert!(check_tree(&tree).is_empty());

    let mut sorted = keys;
    sorted.sort();
    assert_eq!(tree.keys(), sorted);
}

#[test]
fn test_text_key_workload_round_trips() {
    let mut rng = StdRng::seed_from_u64(8);
    let keys = generate_keys(&mut rng, 30, KeyType::Text, KeyOrder::Random, &[]);

    let mut tree = BTree::new(2);
    for key in keys {
        tree.add(key);
    }
    assert!(check_tree(&tree).is_empty());

    let restored = BTree::import(&tree.export()).expect("text roundtrip");
    assert_eq!(restored.keys(), tree.keys());
}

#[test]
fn test_generated_batches_extend_a_live_tree() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut tree = BTree::new(3);

    let first = generate_keys(&mut rng, 20, KeyType::Number, KeyOrder::Ascending, &[]);
    for key in first {
        tree.add(key);
    }

    // The next batch continues above the existing keys, so it stays unique.
    let existing = tree.keys();
    let second = generate_keys(&mut rng, 20, KeyType::Number, KeyOrder::Ascending, &existing);
    for key in second {
        assert!(!tree.contains(&key), "keygen produced a duplicate");
        tree.add(key);
    }

    assert_eq!(tree.keys().len(), 40);
    assert!(check_tree(&tree).is_empty());
}
