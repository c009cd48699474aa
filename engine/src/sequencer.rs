//! The frame sequencer.
//!
//! Turns a queue of pending key operations into a steppable, auto-playable,
//! instantly-resolvable run of frames with bounded backward history. The
//! sequencer is a synchronous state transition function: each external tick
//! (timer callback in auto-play, user action in step mode) calls exactly one
//! method, and nothing here blocks.
//!
//! Starting a new sequence discards any undrained queue and buffered frames
//! wholesale. Mutations already applied to the live tree stay applied; only
//! frames are abandoned.

use std::collections::VecDeque;

use crate::trace::{Frame, TraceSink};
use crate::tree::BTree;
use crate::types::Key;

/// How many past frames are kept for backward steps.
pub const FRAME_BUFFER_SIZE: usize = 50;

/// The kind of a pending key operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Insert the key.
    Add,
    /// Remove the key.
    Remove,
}

/// One queued key operation awaiting execution.
#[derive(Debug, Clone)]
pub struct PendingOp {
    /// What to do.
    pub kind: OpKind,
    /// The key to do it with.
    pub key: Key,
}

/// Signal that a backward step reaches past the retained frame history.
///
/// Non-fatal: the caller disables its back control and continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferUnderflow;

impl std::fmt::Display for BufferUnderflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "no earlier frame is retained")
    }
}

impl std::error::Error for BufferUnderflow {}

/// Converts pending operations into navigable frames over one tree.
///
/// Exactly one sequencer is active per tree lifetime; it owns the tree and
/// is not safe to share across concurrent callers.
#[derive(Debug)]
pub struct FrameSequencer {
    tree: BTree,
    queue: VecDeque<PendingOp>,
    buffer: Vec<Frame>,
    cursor: usize,
    capacity: usize,
    in_sequence: bool,
}

impl FrameSequencer {
    /// Wrap a tree with the default frame retention.
    #[must_use]
    pub fn new(tree: BTree) -> Self {
        Self::with_capacity(tree, FRAME_BUFFER_SIZE)
    }

    /// Wrap a tree, retaining up to `capacity` frames for backward steps.
    #[must_use]
    pub fn with_capacity(tree: BTree, capacity: usize) -> Self {
        Self {
            tree,
            queue: VecDeque::new(),
            buffer: Vec::new(),
            cursor: 0,
            capacity: capacity.max(1),
            in_sequence: false,
        }
    }

    /// Read access to the wrapped tree.
    #[must_use]
    pub const fn tree(&self) -> &BTree {
        &self.tree
    }

    /// Mutable access to the wrapped tree, for un-sequenced edits.
    pub const fn tree_mut(&mut self) -> &mut BTree {
        &mut self.tree
    }

    /// Give the tree back, dropping queue and frames.
    #[must_use]
    pub fn into_tree(self) -> BTree {
        self.tree
    }

    /// Whether a backward step can currently succeed.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    /// Whether a sequence is in progress.
    #[must_use]
    pub const fn in_sequence(&self) -> bool {
        self.in_sequence
    }

    /// Number of operations still queued.
    #[must_use]
    pub fn pending_operations(&self) -> usize {
        self.queue.len()
    }

    /// Start a new sequence inserting `keys` in order.
    pub fn add_keys(&mut self, keys: Vec<Key>) {
        self.begin(OpKind::Add, keys);
    }

    /// Start a new sequence removing `keys` in order.
    pub fn remove_keys(&mut self, keys: Vec<Key>) {
        self.begin(OpKind::Remove, keys);
    }

    fn begin(&mut self, kind: OpKind, keys: Vec<Key>) {
        tracing::debug!(count = keys.len(), ?kind, "starting a new sequence");
        self.queue = keys
            .into_iter()
            .map(|key| PendingOp { kind, key })
            .collect();
        self.buffer.clear();
        self.cursor = 0;
        self.in_sequence = true;
    }

    /// Advance to the next frame.
    ///
    /// Steps within buffered frames first; when they are exhausted, runs the
    /// next queued operation in sequence mode and returns its first frame.
    /// With nothing buffered and nothing queued, the sequence is complete:
    /// the in-sequence state ends and the returned frame is an unhighlighted
    /// snapshot of the live tree.
    pub fn next_frame(&mut self) -> Frame {
        if self.cursor + 1 < self.buffer.len() {
            self.cursor += 1;
            return self.buffer[self.cursor].clone();
        }

        while let Some(op) = self.queue.pop_front() {
            self.trim_buffer();
            let appended_from = self.buffer.len();

            let mut sink = TraceSink::new();
            match op.kind {
                OpKind::Add => self.tree.add_traced(op.key, Some(&mut sink)),
                OpKind::Remove => {
                    let _ = self.tree.remove_traced(&op.key, Some(&mut sink));
                }
            }
            self.buffer.extend(sink.take_frames());

            if appended_from < self.buffer.len() {
                self.cursor = appended_from;
                return self.buffer[self.cursor].clone();
            }
        }

        tracing::debug!("sequence complete");
        self.in_sequence = false;
        Frame::settled(self.tree.snapshot(), self.tree.counters())
    }

    /// Step back to the previous frame.
    ///
    /// # Errors
    ///
    /// Returns [`BufferUnderflow`] once the needed frame is no longer
    /// retained; backward history is bounded by the buffer capacity.
    pub fn previous_frame(&mut self) -> Result<Frame, BufferUnderflow> {
        if self.cursor == 0 {
            return Err(BufferUnderflow);
        }
        self.cursor -= 1;
        Ok(self.buffer[self.cursor].clone())
    }

    /// Resolve the whole queue instantly, without per-step tracing, and
    /// return only the resulting tree state.
    pub fn final_frame(&mut self) -> Frame {
        tracing::debug!(pending = self.queue.len(), "resolving sequence instantly");
        while let Some(op) = self.queue.pop_front() {
            match op.kind {
                OpKind::Add => self.tree.add(op.key),
                OpKind::Remove => {
                    let _ = self.tree.remove(&op.key);
                }
            }
        }
        self.buffer.clear();
        self.cursor = 0;
        self.in_sequence = false;
        Frame::settled(self.tree.snapshot(), self.tree.counters())
    }

    /// Drop the oldest frames down to the retention capacity.
    fn trim_buffer(&mut self) {
        if self.buffer.len() > self.capacity {
            let excess = self.buffer.len() - self.capacity;
            self.buffer.drain(..excess);
        }
    }
}
