//! Shared helpers for the end-to-end scenarios.

use crate::sequencer::FrameSequencer;
use crate::trace::Frame;
use crate::tree::BTree;
use crate::types::Key;

/// Build a batch of number keys.
pub fn number_keys(values: &[i64]) -> Vec<Key> {
    values.iter().copied().map(Key::Number).collect()
}

/// Build a tree of the given capacity holding `values` in insertion order.
pub fn tree_with(max_keys: usize, values: &[i64]) -> BTree {
    let mut tree = BTree::new(max_keys);
    for &value in values {
        tree.add(Key::Number(value));
    }
    tree
}

/// Pump a sequencer until its sequence completes, collecting every frame
/// returned on the way (the final settled frame included).
pub fn drain_sequence(sequencer: &mut FrameSequencer) -> Vec<Frame> {
    let mut frames = Vec::new();
    loop {
        let frame = sequencer.next_frame();
        let done = !sequencer.in_sequence();
        frames.push(frame);
        if done {
            return frames;
        }
        assert!(frames.len() < 10_000, "sequence never completed");
    }
}
