//! Frames: materialized tree snapshots captured at mutation micro-steps.
//!
//! A frame is a fully-copied tree shape plus the highlight built for that
//! micro-step and the telemetry counters at that instant. It never shares
//! live mutable state (live nodes continue mutating after capture) and is
//! never mutated after creation.

use crate::trace::highlight::Highlight;
use crate::tree::Telemetry;
use crate::types::{Key, NodeId};

/// One node of a materialized tree shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotNode {
    /// The live node's stable id.
    pub id: NodeId,
    /// The node's keys at capture time.
    pub keys: Vec<Key>,
    /// Child snapshots; empty for a leaf.
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Whether this snapshot node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Find a node by id within this subtree.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&Self> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Total number of nodes in this subtree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(Self::node_count)
            .sum::<usize>()
    }
}

/// A materialized copy of the whole tree shape at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// The root node of the copied shape.
    pub root: SnapshotNode,
}

impl TreeSnapshot {
    /// Find a node by id.
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.root.find(id)
    }

    /// Total number of nodes in the snapshot.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// All keys in tree order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        fn walk(node: &SnapshotNode, out: &mut Vec<Key>) {
            if node.is_leaf() {
                out.extend(node.keys.iter().cloned());
                return;
            }
            for (slot, child) in node.children.iter().enumerate() {
                walk(child, out);
                if let Some(key) = node.keys.get(slot) {
                    out.push(key.clone());
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
}

/// One renderable animation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The tree shape at this micro-step.
    pub snapshot: TreeSnapshot,
    /// What this step emphasizes.
    pub highlight: Highlight,
    /// Telemetry counters at this instant.
    pub counters: Telemetry,
}

impl Frame {
    /// A frame with no emphasis, used for the final state of a sequence.
    #[must_use]
    pub fn settled(snapshot: TreeSnapshot, counters: Telemetry) -> Self {
        Self {
            snapshot,
            highlight: Highlight::new(),
            counters,
        }
    }
}

/// Collects the frames emitted by one instrumented operation.
///
/// Passed explicitly into `add_traced`/`remove_traced`; when absent, tree
/// operations emit nothing.
#[derive(Debug, Default)]
pub struct TraceSink {
    frames: Vec<Frame>,
}

impl TraceSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one captured frame.
    pub fn record(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// The frames captured so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of captured frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Take ownership of the captured frames, leaving the sink empty.
    #[must_use]
    pub fn take_frames(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}
