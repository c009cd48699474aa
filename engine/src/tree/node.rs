//! B-tree node storage and slot-level operations.
//!
//! A node owns a contiguous run of keys and, unless it is a leaf, one more
//! child id than it has keys. Nodes refer to their children by [`NodeId`]
//! only; the arena that resolves ids lives in the owning tree, so a split or
//! merge never holds two aliased references to overlapping state.

use crate::types::{Key, NodeId};

/// Result of inserting a key into a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddResult {
    /// The subtree absorbed the key without overflowing.
    Absorbed,
    /// The subtree's root split; the parent must graft the descriptor.
    Overflowed(SplitDescriptor),
}

/// The outcome of a node split.
///
/// The left half stays in place under the split node's id; the right half is
/// a freshly allocated node. The promoted key belongs to neither half and
/// moves up to the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitDescriptor {
    /// The median key, promoted to the parent.
    pub promoted: Key,
    /// The newly allocated right half.
    pub right: NodeId,
}

/// One tree node: a sorted key run plus child ids.
///
/// # Invariants
///
/// - `keys` is strictly ascending with no gaps.
/// - A leaf has no children; an internal node has `keys.len() + 1` children.
/// - `keys.len() <= max_keys` except transiently inside a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    max_keys: usize,
    keys: Vec<Key>,
    children: Vec<NodeId>,
}

impl Node {
    /// Create a new empty leaf node.
    #[must_use]
    pub const fn new(id: NodeId, max_keys: usize) -> Self {
        Self {
            id,
            max_keys,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a node from parts, used by import and by root splits.
    #[must_use]
    pub const fn from_parts(
        id: NodeId,
        max_keys: usize,
        keys: Vec<Key>,
        children: Vec<NodeId>,
    ) -> Self {
        Self {
            id,
            max_keys,
            keys,
            children,
        }
    }

    /// The node's stable id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The node's fixed key capacity.
    #[must_use]
    pub const fn max_keys(&self) -> usize {
        self.max_keys
    }

    /// Number of live keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// The live keys, strictly ascending.
    #[must_use]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// The child ids; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A node is a leaf iff it has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the node is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.max_keys
    }

    /// The key at `slot`.
    #[must_use]
    pub fn key_at(&self, slot: usize) -> &Key {
        &self.keys[slot]
    }

    /// Replace the key at `slot`, returning the old key.
    pub fn replace_key(&mut self, slot: usize, key: Key) -> Key {
        std::mem::replace(&mut self.keys[slot], key)
    }

    /// The child id at `position`.
    #[must_use]
    pub fn child_at(&self, position: usize) -> NodeId {
        self.children[position]
    }

    /// Exact slot of `key`, if present. Linear scan.
    #[must_use]
    pub fn index_of(&self, key: &Key) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    /// The child position that must contain `key`.
    ///
    /// Scans from the high end down and picks the first child whose
    /// preceding key is at or below the search key, so an equal key routes
    /// into the right-hand child.
    #[must_use]
    pub fn child_containing(&self, key: &Key) -> usize {
        self.keys
            .iter()
            .rposition(|k| k <= key)
            .map_or(0, |slot| slot + 1)
    }

    /// Insertion-sort `key` into a leaf with room, returning the slot it
    /// landed in.
    pub fn insert_key(&mut self, key: Key) -> usize {
        debug_assert!(self.is_leaf());
        debug_assert!(!self.is_full());

        let mut slot = self.keys.len();
        while slot > 0 && self.keys[slot - 1] > key {
            slot -= 1;
        }
        self.keys.insert(slot, key);
        slot
    }

    /// Shift-delete the key at `slot`, returning it.
    pub fn remove_key_at(&mut self, slot: usize) -> Key {
        self.keys.remove(slot)
    }

    /// Graft a child split into this node: the promoted key lands at the
    /// split child's slot and the new right half becomes its next sibling.
    pub fn graft_split(&mut self, child_position: usize, promoted: Key, right: NodeId) {
        debug_assert!(!self.is_full());
        self.keys.insert(child_position, promoted);
        self.children.insert(child_position + 1, right);
    }

    /// Split a full node around the woven-in `key`.
    ///
    /// Builds the temporary merged run of `max_keys + 1` keys (and, for an
    /// internal node, `max_keys + 2` children with `right_of_key` placed
    /// after the new key), keeps everything below the median in this node,
    /// and moves everything above it into a new node under `right_id`. The
    /// median key is stored in neither half.
    ///
    /// Returns the promoted median key and the new right node.
    pub fn split(
        &mut self,
        key: Key,
        right_of_key: Option<NodeId>,
        right_id: NodeId,
    ) -> (Key, Self) {
        debug_assert!(self.is_full());

        let mut slot = self.keys.len();
        while slot > 0 && self.keys[slot - 1] > key {
            slot -= 1;
        }

        let mut keys = std::mem::take(&mut self.keys);
        keys.insert(slot, key);
        let mut children = std::mem::take(&mut self.children);
        if let Some(child) = right_of_key {
            children.insert(slot + 1, child);
        }

        let median = keys.len() / 2;
        let right_keys = keys.split_off(median + 1);
        let right_children = if children.is_empty() {
            Vec::new()
        } else {
            children.split_off(median + 1)
        };
        let promoted = keys.remove(median);

        self.keys = keys;
        self.children = children;

        let right = Self {
            id: right_id,
            max_keys: self.max_keys,
            keys: right_keys,
            children: right_children,
        };
        (promoted, right)
    }

    /// Pop the last key, used when borrowing from a left sibling.
    pub fn pop_last_key(&mut self) -> Option<Key> {
        self.keys.pop()
    }

    /// Pop the last child id, the "lost child" of a big rotation.
    pub fn pop_last_child(&mut self) -> Option<NodeId> {
        self.children.pop()
    }

    /// Shift out the first key, used when borrowing from a right sibling.
    pub fn take_first_key(&mut self) -> Option<Key> {
        if self.keys.is_empty() {
            return None;
        }
        Some(self.keys.remove(0))
    }

    /// Shift out the first child id.
    pub fn take_first_child(&mut self) -> Option<NodeId> {
        if self.children.is_empty() {
            return None;
        }
        Some(self.children.remove(0))
    }

    /// Prepend a key, the landing step of a borrow-from-left rotation.
    pub fn push_front_key(&mut self, key: Key) {
        self.keys.insert(0, key);
    }

    /// Prepend a child id.
    pub fn push_front_child(&mut self, child: NodeId) {
        self.children.insert(0, child);
    }

    /// Append a key, the landing step of a borrow-from-right rotation.
    pub fn push_back_key(&mut self, key: Key) {
        self.keys.push(key);
    }

    /// Append a child id.
    pub fn push_back_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// Absorb the parent separator and the entire right sibling.
    ///
    /// The caller removes `right` from the arena and drops the separating
    /// parent slot; its id is abandoned, never reused.
    pub fn absorb_merge(&mut self, separator: Key, right: Self) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }

    /// Drop the parent-side bookkeeping of a merge: the separator at
    /// `slot` and the now-redundant child after it.
    pub fn remove_merged_slot(&mut self, slot: usize) {
        let _ = self.keys.remove(slot);
        let _ = self.children.remove(slot + 1);
    }
}
