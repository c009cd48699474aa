//! Bounded backward replay: stepping back past the retained frame buffer
//! reports `BufferUnderflow`, never a crash or a stale frame.

use crate::e2e_tests::helpers::{drain_sequence, number_keys};
use crate::sequencer::{BufferUnderflow, FRAME_BUFFER_SIZE, FrameSequencer};
use crate::tree::BTree;

#[test]
fn test_backward_steps_stop_at_the_retained_buffer() {
    let mut sequencer = FrameSequencer::new(BTree::new(2));

    // Far more micro-step-generating operations than the buffer retains.
    let values: Vec<i64> = (1..=80).collect();
    sequencer.add_keys(number_keys(&values));
    let frames = drain_sequence(&mut sequencer);
    assert!(
        frames.len() > FRAME_BUFFER_SIZE,
        "the workload must overflow the buffer"
    );

    let mut backward_steps = 0;
    while sequencer.previous_frame().is_ok() {
        backward_steps += 1;
        assert!(
            backward_steps <= 2 * FRAME_BUFFER_SIZE,
            "backward history must be bounded"
        );
    }

    assert!(backward_steps > 0, "recent frames must be reachable");
    // Once exhausted, the signal is stable and non-fatal.
    assert_eq!(sequencer.previous_frame(), Err(BufferUnderflow));
    assert_eq!(sequencer.previous_frame(), Err(BufferUnderflow));
    assert!(!sequencer.has_previous());
}

#[test]
fn test_sequencer_survives_underflow_and_continues() {
    let mut sequencer = FrameSequencer::new(BTree::new(2));
    sequencer.add_keys(number_keys(&[1, 2, 3]));

    let first = sequencer.next_frame();
    assert_eq!(sequencer.previous_frame(), Err(BufferUnderflow));

    // The cursor is untouched by a failed backward step.
    let second = sequencer.next_frame();
    assert_ne!(first.snapshot, second.snapshot);

    let back = sequencer.previous_frame().expect("one retained frame back");
    assert_eq!(back.snapshot, first.snapshot);
}
