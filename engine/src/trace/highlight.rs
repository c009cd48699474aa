//! Highlight annotations for rendered frames.
//!
//! A [`Highlight`] is a pure value describing which nodes, edges, key slots
//! and separators one frame emphasizes, with optional tooltip text. It holds
//! no tree logic; the tree builds one per micro-step during instrumented
//! runs and the rendering collaborator consumes it read-only.

use std::collections::HashMap;

use crate::trace::frame::{SnapshotNode, TreeSnapshot};
use crate::types::NodeId;

/// Emphasis on one key slot, with an attached comparison or result message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMark {
    /// The key slot being emphasized.
    pub slot: usize,
    /// Tooltip text for the slot; may be empty.
    pub message: String,
}

/// Emphasis on the boundary *before* a key slot, used to show routing
/// decisions ("fits between these two keys").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorMark {
    /// The slot whose leading boundary is emphasized. Slot `i` sits before
    /// key slot `i`; slot `key_count` is the trailing boundary.
    pub slot: usize,
    /// Tooltip text for the boundary; may be empty.
    pub message: String,
}

/// Accumulated emphasis for one node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeHighlight {
    /// Whole-node emphasis.
    pub full: bool,
    /// Tooltip text for the node; may be empty.
    pub message: String,
    /// Per-slot marks, in the order they were added.
    pub index_marks: Vec<IndexMark>,
    /// Per-boundary marks, in the order they were added.
    pub separator_marks: Vec<SeparatorMark>,
}

/// Emphasis on a parent->child edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHighlight {
    /// Whether the edge is fully emphasized (traversed) rather than merely
    /// candidate (about to be traversed).
    pub full: bool,
}

/// The complete emphasis set for one frame.
///
/// Every add method lazily initializes an empty per-node record on first
/// touch and then appends, so repeated calls for the same node id are safe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Highlight {
    nodes: HashMap<NodeId, NodeHighlight>,
    edges: HashMap<(NodeId, NodeId), EdgeHighlight>,
}

impl Highlight {
    /// Create an empty highlight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark whole-node emphasis with tooltip text.
    pub fn node(&mut self, node_id: NodeId, full: bool, message: &str) {
        let record = self.nodes.entry(node_id).or_default();
        record.full = full;
        record.message = message.to_string();
    }

    /// Mark one key slot for emphasis. Repeatable per node.
    pub fn index(&mut self, node_id: NodeId, slot: usize, message: &str) {
        self.nodes
            .entry(node_id)
            .or_default()
            .index_marks
            .push(IndexMark {
                slot,
                message: message.to_string(),
            });
    }

    /// Mark the boundary before key slot `slot`.
    pub fn separator(&mut self, node_id: NodeId, slot: usize, message: &str) {
        self.nodes
            .entry(node_id)
            .or_default()
            .separator_marks
            .push(SeparatorMark {
                slot,
                message: message.to_string(),
            });
    }

    /// Mark a parent->child edge.
    pub fn edge(&mut self, source: NodeId, target: NodeId, full: bool) {
        self.edges.insert((source, target), EdgeHighlight { full });
    }

    /// Mark the listed key slots on `node_id`, then every key of the entire
    /// subtrees straddling each listed slot.
    ///
    /// Traversal uses the supplied snapshot, never live tree state: by the
    /// time a post-rebalance highlight is built, the live node may already
    /// have a different shape. Terminates at leaves.
    pub fn subtree(&mut self, node_id: NodeId, from_indices: &[usize], snapshot: &TreeSnapshot) {
        let Some(node) = snapshot.find(node_id) else {
            return;
        };
        // Clone keeps the borrow on `snapshot` out of the `&mut self` calls.
        let node = node.clone();
        for &slot in from_indices {
            self.index(node_id, slot, "");
            for child_position in [slot, slot + 1] {
                if let Some(child) = node.children.get(child_position) {
                    self.mark_subtree_keys(child);
                }
            }
        }
    }

    fn mark_subtree_keys(&mut self, node: &SnapshotNode) {
        for slot in 0..node.keys.len() {
            self.index(node.id, slot, "");
        }
        for child in &node.children {
            self.mark_subtree_keys(child);
        }
    }

    /// All per-node records.
    #[must_use]
    pub const fn nodes(&self) -> &HashMap<NodeId, NodeHighlight> {
        &self.nodes
    }

    /// All per-edge records, keyed by `(source, target)`.
    #[must_use]
    pub const fn edges(&self) -> &HashMap<(NodeId, NodeId), EdgeHighlight> {
        &self.edges
    }

    /// The record for one node, if any emphasis was added.
    #[must_use]
    pub fn node_record(&self, node_id: NodeId) -> Option<&NodeHighlight> {
        self.nodes.get(&node_id)
    }

    /// Whether no emphasis has been added at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
