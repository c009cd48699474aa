//! The balanced multiway search tree.
//!
//! The tree owns an arena of nodes addressed by [`NodeId`]; nodes refer to
//! children by id only, so splits and merges never hold aliased references
//! and snapshotting is a structural copy over the index. Every mutation can
//! run instrumented: passing a [`TraceSink`] makes each micro-step (routing
//! comparison, insertion, split, merge, rotation) capture a frame.
//!
//! # Structural invariants
//!
//! Restored before every public call returns:
//! - all leaves sit at equal depth;
//! - every non-root node holds between `min_keys` and `max_keys` keys;
//! - keys are strictly ascending within a node and across child separators;
//! - node ids are unique and never reused, even across splits and merges.

use std::collections::HashMap;

use crate::trace::{Frame, Highlight, SnapshotNode, TraceSink, TreeSnapshot};
use crate::tree::node::{AddResult, Node, SplitDescriptor};
use crate::types::{Key, NodeId};

/// Smallest usable node capacity; a 1-key node cannot split evenly.
pub const MIN_MAX_KEYS: usize = 2;

/// Counters for the structural operations a workload triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Telemetry {
    /// Overflow splits performed.
    pub splits: u64,
    /// Underflow merges performed.
    pub merges: u64,
    /// Borrows between leaf-level siblings.
    pub small_rotations: u64,
    /// Borrows that also relocated a child pointer.
    pub big_rotations: u64,
}

/// A read-only view of one live node, for rendering collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    /// The node's stable id.
    pub id: NodeId,
    /// The node's keys, strictly ascending.
    pub keys: Vec<Key>,
    /// Child ids; empty for a leaf.
    pub children: Vec<NodeId>,
    /// Whether the node is a leaf.
    pub is_leaf: bool,
}

/// A B-tree over an id-addressed node arena.
#[derive(Debug, Clone)]
pub struct BTree {
    max_keys: usize,
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    id_counter: u64,
    counters: Telemetry,
}

impl BTree {
    /// Create an empty tree whose nodes hold up to `max_keys` keys.
    ///
    /// # Panics
    ///
    /// Panics if `max_keys` is below [`MIN_MAX_KEYS`].
    #[must_use]
    pub fn new(max_keys: usize) -> Self {
        assert!(
            max_keys >= MIN_MAX_KEYS,
            "max_keys must be at least {MIN_MAX_KEYS}"
        );
        let mut tree = Self {
            max_keys,
            nodes: HashMap::new(),
            root: NodeId(0),
            id_counter: 0,
            counters: Telemetry::default(),
        };
        tree.root = tree.alloc_leaf();
        tree
    }

    /// Rebuild a tree from imported parts, preserving node ids.
    pub(crate) fn from_imported(
        max_keys: usize,
        nodes: HashMap<NodeId, Node>,
        root: NodeId,
        id_counter: u64,
    ) -> Self {
        Self {
            max_keys,
            nodes,
            root,
            id_counter,
            counters: Telemetry::default(),
        }
    }

    /// The fixed per-node key capacity.
    #[must_use]
    pub const fn max_keys(&self) -> usize {
        self.max_keys
    }

    /// Minimum keys a non-root node must retain.
    #[must_use]
    pub const fn min_keys(&self) -> usize {
        self.max_keys / 2
    }

    /// Telemetry counters accumulated so far.
    #[must_use]
    pub const fn counters(&self) -> Telemetry {
        self.counters
    }

    /// The root node's id.
    #[must_use]
    pub const fn root_id(&self) -> NodeId {
        self.root
    }

    /// Whether the tree holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node(self.root).key_count() == 0
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.contains_in(self.root, key)
    }

    /// All keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<Key> {
        let mut out = Vec::new();
        self.collect_keys(self.root, &mut out);
        out
    }

    /// Edge count from the root down to the leaf level.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth_of(self.root)
    }

    /// Views of every live node, in preorder.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeView> {
        let mut out = Vec::new();
        self.collect_views(self.root, &mut out);
        out
    }

    /// A fully materialized copy of the current tree shape.
    #[must_use]
    pub fn snapshot(&self) -> TreeSnapshot {
        TreeSnapshot {
            root: self.snapshot_node(self.root),
        }
    }

    /// Insert `key`. The caller guarantees it is not already present.
    pub fn add(&mut self, key: Key) {
        self.add_traced(key, None);
    }

    /// Insert `key`, capturing one frame per micro-step into `trace`.
    pub fn add_traced(&mut self, key: Key, mut trace: Option<&mut TraceSink>) {
        tracing::debug!(%key, "add");
        let root = self.root;
        match self.add_into(root, key, trace.as_deref_mut()) {
            AddResult::Absorbed => {}
            AddResult::Overflowed(split) => self.raise_root(split, trace),
        }
    }

    /// Remove `key`. Returns `false` when the key is absent; absence is a
    /// normal result, never an error.
    pub fn remove(&mut self, key: &Key) -> bool {
        self.remove_traced(key, None)
    }

    /// Remove `key`, capturing one frame per micro-step into `trace`.
    pub fn remove_traced(&mut self, key: &Key, mut trace: Option<&mut TraceSink>) -> bool {
        tracing::debug!(%key, "remove");
        let root = self.root;
        let removed = self.remove_from(root, key, trace.as_deref_mut());

        let root_node = self.node(self.root);
        if root_node.key_count() == 0 && !root_node.is_leaf() {
            let collapsed = self.root;
            let new_root = root_node.child_at(0);
            self.nodes.remove(&collapsed);
            self.root = new_root;
            tracing::debug!(old = %collapsed, new = %new_root, "root collapsed");

            let mut highlight = Highlight::new();
            highlight.node(new_root, true, "root collapsed into its only child");
            self.emit(trace, highlight);
        }
        removed
    }

    // ------------------------------------------------------------------
    // arena plumbing
    // ------------------------------------------------------------------

    fn next_id(&mut self) -> NodeId {
        self.id_counter += 1;
        NodeId(self.id_counter)
    }

    fn alloc_leaf(&mut self) -> NodeId {
        let id = self.next_id();
        self.nodes.insert(id, Node::new(id, self.max_keys));
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[&id]
    }

    // A NodeId handed out by this tree always resolves in its arena.
    #[allow(clippy::unwrap_used)]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(&id).unwrap()
    }

    fn emit(&self, trace: Option<&mut TraceSink>, highlight: Highlight) {
        if let Some(sink) = trace {
            sink.record(Frame {
                snapshot: self.snapshot(),
                highlight,
                counters: self.counters,
            });
        }
    }

    fn snapshot_node(&self, id: NodeId) -> SnapshotNode {
        let node = self.node(id);
        SnapshotNode {
            id,
            keys: node.keys().to_vec(),
            children: node
                .children()
                .iter()
                .map(|&child| self.snapshot_node(child))
                .collect(),
        }
    }

    fn contains_in(&self, id: NodeId, key: &Key) -> bool {
        let node = self.node(id);
        if node.is_leaf() {
            return node.index_of(key).is_some();
        }
        for (slot, node_key) in node.keys().iter().enumerate() {
            if node_key == key {
                return true;
            }
            if key < node_key {
                return self.contains_in(node.child_at(slot), key);
            }
        }
        self.contains_in(node.child_at(node.key_count()), key)
    }

    fn collect_keys(&self, id: NodeId, out: &mut Vec<Key>) {
        let node = self.node(id);
        if node.is_leaf() {
            out.extend_from_slice(node.keys());
            return;
        }
        for slot in 0..node.key_count() {
            self.collect_keys(node.child_at(slot), out);
            out.push(node.key_at(slot).clone());
        }
        self.collect_keys(node.child_at(node.key_count()), out);
    }

    fn depth_of(&self, id: NodeId) -> usize {
        let node = self.node(id);
        if node.is_leaf() {
            return 0;
        }
        1 + node
            .children()
            .iter()
            .map(|&child| self.depth_of(child))
            .max()
            .unwrap_or(0)
    }

    fn collect_views(&self, id: NodeId, out: &mut Vec<NodeView>) {
        let node = self.node(id);
        out.push(NodeView {
            id,
            keys: node.keys().to_vec(),
            children: node.children().to_vec(),
            is_leaf: node.is_leaf(),
        });
        for &child in node.children() {
            self.collect_views(child, out);
        }
    }

    // ------------------------------------------------------------------
    // insert path
    // ------------------------------------------------------------------

    fn add_into(&mut self, id: NodeId, key: Key, mut trace: Option<&mut TraceSink>) -> AddResult {
        let node = self.node(id);
        if node.is_leaf() {
            if node.is_full() {
                let mut highlight = Highlight::new();
                highlight.node(id, true, "node is full, splitting");
                self.emit(trace.as_deref_mut(), highlight);

                let split = self.split_node(id, key, None, trace);
                return AddResult::Overflowed(split);
            }

            let slot = self.node_mut(id).insert_key(key);
            let mut highlight = Highlight::new();
            highlight.index(id, slot, "key inserted");
            self.emit(trace, highlight);
            return AddResult::Absorbed;
        }

        let child_position = node.child_containing(&key);
        let child = node.child_at(child_position);

        let mut highlight = Highlight::new();
        highlight.separator(id, child_position, "key fits below this boundary");
        highlight.edge(id, child, true);
        self.emit(trace.as_deref_mut(), highlight);

        match self.add_into(child, key, trace.as_deref_mut()) {
            AddResult::Absorbed => AddResult::Absorbed,
            AddResult::Overflowed(split) => {
                if self.node(id).is_full() {
                    let mut highlight = Highlight::new();
                    highlight.node(id, true, "node is full, splitting");
                    self.emit(trace.as_deref_mut(), highlight);

                    let split = self.split_node(id, split.promoted, Some(split.right), trace);
                    AddResult::Overflowed(split)
                } else {
                    let right = split.right;
                    self.node_mut(id)
                        .graft_split(child_position, split.promoted, right);

                    let mut highlight = Highlight::new();
                    highlight.index(id, child_position, "promoted key grafted");
                    highlight.edge(id, right, true);
                    self.emit(trace, highlight);
                    AddResult::Absorbed
                }
            }
        }
    }

    fn split_node(
        &mut self,
        id: NodeId,
        key: Key,
        right_of_key: Option<NodeId>,
        trace: Option<&mut TraceSink>,
    ) -> SplitDescriptor {
        let right_id = self.next_id();
        let (promoted, right) = self.node_mut(id).split(key, right_of_key, right_id);
        self.nodes.insert(right_id, right);
        self.counters.splits += 1;
        tracing::debug!(node = %id, right = %right_id, promoted = %promoted, "split");

        let snapshot = self.snapshot();
        let mut highlight = Highlight::new();
        highlight.node(id, true, "split: left half");
        highlight.node(right_id, true, "split: right half");
        let right_key_count = self.node(right_id).key_count();
        highlight.subtree(right_id, &(0..right_key_count).collect::<Vec<_>>(), &snapshot);
        self.emit(trace, highlight);

        SplitDescriptor {
            promoted,
            right: right_id,
        }
    }

    fn raise_root(&mut self, split: SplitDescriptor, trace: Option<&mut TraceSink>) {
        let old_root = self.root;
        let right = split.right;
        let id = self.next_id();
        let node = Node::from_parts(
            id,
            self.max_keys,
            vec![split.promoted],
            vec![old_root, right],
        );
        self.nodes.insert(id, node);
        self.root = id;
        tracing::debug!(root = %id, "root raised");

        let mut highlight = Highlight::new();
        highlight.node(id, true, "new root from split");
        highlight.edge(id, old_root, true);
        highlight.edge(id, right, true);
        self.emit(trace, highlight);
    }

    // ------------------------------------------------------------------
    // delete path
    // ------------------------------------------------------------------

    fn remove_from(&mut self, id: NodeId, key: &Key, mut trace: Option<&mut TraceSink>) -> bool {
        let node = self.node(id);
        if node.is_leaf() {
            return match node.index_of(key) {
                Some(slot) => {
                    let mut highlight = Highlight::new();
                    highlight.index(id, slot, "key found, removing");
                    self.emit(trace.as_deref_mut(), highlight);

                    let _ = self.node_mut(id).remove_key_at(slot);
                    let mut highlight = Highlight::new();
                    highlight.node(id, true, "key removed");
                    self.emit(trace, highlight);
                    true
                }
                None => {
                    let mut highlight = Highlight::new();
                    highlight.node(id, true, "key not present");
                    self.emit(trace, highlight);
                    false
                }
            };
        }

        if let Some(slot) = node.index_of(key) {
            // Exact hit in an internal node: replace with the predecessor,
            // the maximum of the left subtree.
            let child = node.child_at(slot);
            let mut highlight = Highlight::new();
            highlight.index(id, slot, "replacing with predecessor");
            highlight.edge(id, child, true);
            self.emit(trace.as_deref_mut(), highlight);

            let predecessor = self.extract_max(child, trace.as_deref_mut());
            let _ = self.node_mut(id).replace_key(slot, predecessor);

            let mut highlight = Highlight::new();
            highlight.index(id, slot, "predecessor moved up");
            self.emit(trace.as_deref_mut(), highlight);

            self.rebalance(id, slot, trace);
            true
        } else {
            let child_position = node.child_containing(key);
            let child = node.child_at(child_position);

            let mut highlight = Highlight::new();
            highlight.separator(id, child_position, "key fits below this boundary");
            highlight.edge(id, child, true);
            self.emit(trace.as_deref_mut(), highlight);

            let removed = self.remove_from(child, key, trace.as_deref_mut());
            self.rebalance(id, child_position, trace);
            removed
        }
    }

    fn extract_max(&mut self, id: NodeId, mut trace: Option<&mut TraceSink>) -> Key {
        let node = self.node(id);
        if node.is_leaf() {
            let slot = node.key_count() - 1;
            let mut highlight = Highlight::new();
            highlight.index(id, slot, "extracting the maximum");
            self.emit(trace.as_deref_mut(), highlight);

            // Leaves on this path hold at least min_keys >= 1 keys.
            #[allow(clippy::unwrap_used)]
            let key = self.node_mut(id).pop_last_key().unwrap();
            return key;
        }

        let last_position = node.key_count();
        let child = node.child_at(last_position);
        let mut highlight = Highlight::new();
        highlight.edge(id, child, true);
        self.emit(trace.as_deref_mut(), highlight);

        let key = self.extract_max(child, trace.as_deref_mut());
        self.rebalance(id, last_position, trace);
        key
    }

    // ------------------------------------------------------------------
    // rebalancing
    // ------------------------------------------------------------------

    fn rebalance(&mut self, parent: NodeId, child_index: usize, mut trace: Option<&mut TraceSink>) {
        let min_keys = self.min_keys();
        let parent_node = self.node(parent);
        let child = parent_node.child_at(child_index);
        let left_sibling = if child_index > 0 {
            Some(parent_node.child_at(child_index - 1))
        } else {
            None
        };
        let right_sibling = if child_index < parent_node.key_count() {
            Some(parent_node.child_at(child_index + 1))
        } else {
            None
        };

        if self.node(child).key_count() >= min_keys {
            return;
        }

        let mut highlight = Highlight::new();
        highlight.node(child, true, "node is under-filled");
        self.emit(trace.as_deref_mut(), highlight);

        let left_count = left_sibling.map(|sibling| self.node(sibling).key_count());
        let right_count = right_sibling.map(|sibling| self.node(sibling).key_count());

        // A sibling at exactly min_keys merges for free: the combined node
        // cannot overflow and no further underflow risk is created.
        if left_count == Some(min_keys) {
            self.merge_children(parent, child_index - 1, trace);
        } else if right_count == Some(min_keys) {
            self.merge_children(parent, child_index, trace);
        } else if left_count.is_some_and(|count| count > min_keys) {
            self.borrow_from_left(parent, child_index, trace);
        } else if right_count.is_some_and(|count| count > min_keys) {
            self.borrow_from_right(parent, child_index, trace);
        }
        // A non-root node always has a sibling, and no sibling can sit
        // below min_keys, so one of the arms above ran.
    }

    fn merge_children(
        &mut self,
        parent: NodeId,
        left_index: usize,
        trace: Option<&mut TraceSink>,
    ) {
        let parent_node = self.node(parent);
        let left = parent_node.child_at(left_index);
        let right = parent_node.child_at(left_index + 1);
        let separator = parent_node.key_at(left_index).clone();

        // The right node's id is abandoned here and never reused.
        #[allow(clippy::unwrap_used)]
        let right_node = self.nodes.remove(&right).unwrap();
        self.node_mut(left).absorb_merge(separator, right_node);
        self.node_mut(parent).remove_merged_slot(left_index);
        self.counters.merges += 1;
        tracing::debug!(parent = %parent, into = %left, abandoned = %right, "merge");

        let snapshot = self.snapshot();
        let mut highlight = Highlight::new();
        highlight.node(left, true, "merged with sibling");
        let merged_key_count = self.node(left).key_count();
        highlight.subtree(left, &(0..merged_key_count).collect::<Vec<_>>(), &snapshot);
        self.emit(trace, highlight);
    }

    fn borrow_from_left(
        &mut self,
        parent: NodeId,
        child_index: usize,
        trace: Option<&mut TraceSink>,
    ) {
        let parent_node = self.node(parent);
        let child = parent_node.child_at(child_index);
        let left = parent_node.child_at(child_index - 1);
        let separator_slot = child_index - 1;

        // The left sibling holds more than min_keys >= 1 keys.
        #[allow(clippy::unwrap_used)]
        let moved_key = self.node_mut(left).pop_last_key().unwrap();
        let lost_child = self.node_mut(left).pop_last_child();
        let separator = self.node_mut(parent).replace_key(separator_slot, moved_key);

        let is_big = lost_child.is_some();
        let landed = self.node_mut(child);
        landed.push_front_key(separator);
        if let Some(lost) = lost_child {
            landed.push_front_child(lost);
        }
        if is_big {
            self.counters.big_rotations += 1;
        } else {
            self.counters.small_rotations += 1;
        }
        tracing::debug!(parent = %parent, from = %left, into = %child, big = is_big, "borrow from left sibling");

        let snapshot = self.snapshot();
        let mut highlight = Highlight::new();
        highlight.index(parent, separator_slot, "separator rotated");
        highlight.index(child, 0, "borrowed key");
        if is_big {
            highlight.subtree(child, &[0], &snapshot);
        }
        self.emit(trace, highlight);
    }

    fn borrow_from_right(
        &mut self,
        parent: NodeId,
        child_index: usize,
        trace: Option<&mut TraceSink>,
    ) {
        let parent_node = self.node(parent);
        let child = parent_node.child_at(child_index);
        let right = parent_node.child_at(child_index + 1);
        let separator_slot = child_index;

        // The right sibling holds more than min_keys >= 1 keys.
        #[allow(clippy::unwrap_used)]
        let moved_key = self.node_mut(right).take_first_key().unwrap();
        let lost_child = self.node_mut(right).take_first_child();
        let separator = self.node_mut(parent).replace_key(separator_slot, moved_key);

        let is_big = lost_child.is_some();
        let landed = self.node_mut(child);
        landed.push_back_key(separator);
        if let Some(lost) = lost_child {
            landed.push_back_child(lost);
        }
        if is_big {
            self.counters.big_rotations += 1;
        } else {
            self.counters.small_rotations += 1;
        }
        tracing::debug!(parent = %parent, from = %right, into = %child, big = is_big, "borrow from right sibling");

        let landed_slot = self.node(child).key_count() - 1;
        let snapshot = self.snapshot();
        let mut highlight = Highlight::new();
        highlight.index(parent, separator_slot, "separator rotated");
        highlight.index(child, landed_slot, "borrowed key");
        if is_big {
            highlight.subtree(child, &[landed_slot], &snapshot);
        }
        self.emit(trace, highlight);
    }
}
