//! Sequencer navigation: forward steps, instant resolution, sequence
//! replacement, and the state flags a UI polls.

use crate::e2e_tests::helpers::{drain_sequence, number_keys};
use crate::sequencer::FrameSequencer;
use crate::tree::BTree;
use crate::types::Key;

#[test]
fn test_full_sequence_lands_on_the_final_tree() {
    let mut sequencer = FrameSequencer::new(BTree::new(2));
    sequencer.add_keys(number_keys(&[10, 20, 30, 40, 50]));

    let frames = drain_sequence(&mut sequencer);

    // The last frame is the settled, unhighlighted final state.
    let last = frames.last().expect("at least the settled frame");
    assert!(last.highlight.is_empty());
    assert_eq!(last.snapshot.keys(), number_keys(&[10, 20, 30, 40, 50]));
    assert_eq!(sequencer.tree().keys(), number_keys(&[10, 20, 30, 40, 50]));
    assert!(!sequencer.in_sequence());

    // Intermediate frames all carry emphasis.
    for frame in &frames[..frames.len() - 1] {
        assert!(!frame.highlight.is_empty());
    }
}

#[test]
fn test_final_frame_skips_intermediate_tracing() {
    let mut stepped = FrameSequencer::new(BTree::new(2));
    let mut instant = FrameSequencer::new(BTree::new(2));
    let values = number_keys(&[5, 3, 8, 1, 9, 7, 2, 6, 4]);

    stepped.add_keys(values.clone());
    instant.add_keys(values);

    let _ = drain_sequence(&mut stepped);
    let final_frame = instant.final_frame();

    // Both paths land on the same tree and telemetry.
    assert_eq!(instant.tree().keys(), stepped.tree().keys());
    assert_eq!(
        instant.tree().counters(),
        stepped.tree().counters(),
        "tracing must not change what the tree does"
    );
    assert!(final_frame.highlight.is_empty());
}

#[test]
fn test_mixed_add_and_remove_sequences() {
    let mut sequencer = FrameSequencer::new(BTree::new(2));

    sequencer.add_keys(number_keys(&[1, 2, 3, 4, 5, 6, 7, 8]));
    let _ = drain_sequence(&mut sequencer);

    sequencer.remove_keys(number_keys(&[2, 4, 6, 8]));
    let _ = drain_sequence(&mut sequencer);

    assert_eq!(sequencer.tree().keys(), number_keys(&[1, 3, 5, 7]));
}

#[test]
fn test_replacing_a_sequence_keeps_applied_mutations() {
    let mut sequencer = FrameSequencer::new(BTree::new(2));
    sequencer.add_keys(number_keys(&[10, 20, 30, 40, 50, 60]));

    // Execute only the first operation.
    let _ = sequencer.next_frame();
    assert!(sequencer.tree().contains(&Key::Number(10)));

    // Replacing the queue abandons the rest; no partial-completion promise.
    sequencer.add_keys(number_keys(&[100]));
    let _ = drain_sequence(&mut sequencer);

    let keys = sequencer.tree().keys();
    assert!(keys.contains(&Key::Number(10)), "applied mutation stays");
    assert!(keys.contains(&Key::Number(100)));
    assert!(!keys.contains(&Key::Number(60)), "abandoned op never ran");
}

#[test]
fn test_state_flags_track_the_lifecycle() {
    let mut sequencer = FrameSequencer::new(BTree::new(2));
    assert!(!sequencer.in_sequence());
    assert!(!sequencer.has_previous());

    sequencer.add_keys(number_keys(&[10, 20]));
    assert!(sequencer.in_sequence());
    assert!(!sequencer.has_previous());

    let _ = sequencer.next_frame();
    let _ = sequencer.next_frame();
    assert!(sequencer.has_previous());

    let _ = drain_sequence(&mut sequencer);
    assert!(!sequencer.in_sequence());
}

#[test]
fn test_into_tree_returns_the_live_tree() {
    let mut sequencer = FrameSequencer::new(BTree::new(3));
    sequencer.add_keys(number_keys(&[10, 20, 30]));
    let _ = sequencer.final_frame();

    let tree = sequencer.into_tree();
    assert_eq!(tree.keys(), number_keys(&[10, 20, 30]));
}
