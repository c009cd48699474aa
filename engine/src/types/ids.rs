//! Identifier types for tree nodes.
//!
//! Node identifiers are allocated from a tree-owned counter and are never
//! reused, even when a node is merged away. Renderers rely on this to
//! correlate a node across successive frame snapshots.

use std::fmt;

/// A unique identifier for a tree node.
///
/// Wraps a `u64` allocated by the owning tree. The inner value is public to
/// allow direct access when serializing tree shapes.
///
/// # Invariants
///
/// - Within one tree, every live node has a distinct id.
/// - An id abandoned by a merge is never reissued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
