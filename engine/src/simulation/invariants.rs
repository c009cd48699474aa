//! Structural invariant checking for the tree.
//!
//! Walks a live tree through its public node views and reports every
//! violated invariant. Used after each step of a randomized workload to
//! catch rebalancing bugs at the operation that introduced them.

use std::collections::HashMap;

use crate::tree::{BTree, NodeView};
use crate::types::{Key, NodeId};

/// A violated structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A leaf sits at a different depth than the first leaf found.
    UnevenLeafDepth {
        id: NodeId,
        depth: usize,
        expected: usize,
    },
    /// A non-root node is outside the `min_keys..=max_keys` bounds.
    KeyCountOutOfBounds {
        id: NodeId,
        keys: usize,
        min: usize,
        max: usize,
    },
    /// Keys within a node are not strictly ascending.
    UnsortedNode { id: NodeId },
    /// A key violates the separator range inherited from its ancestors.
    SeparatorViolated { id: NodeId },
    /// An internal node's child count is not `keys + 1`.
    WrongChildCount {
        id: NodeId,
        keys: usize,
        children: usize,
    },
    /// A child id does not resolve to a live node.
    MissingChild { id: NodeId, child: NodeId },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnevenLeafDepth {
                id,
                depth,
                expected,
            } => {
                write!(f, "leaf {id} at depth {depth}, expected {expected}")
            }
            Self::KeyCountOutOfBounds { id, keys, min, max } => {
                write!(f, "node {id} holds {keys} keys outside {min}..={max}")
            }
            Self::UnsortedNode { id } => write!(f, "node {id} keys are not strictly ascending"),
            Self::SeparatorViolated { id } => {
                write!(f, "node {id} holds keys outside its separator range")
            }
            Self::WrongChildCount { id, keys, children } => {
                write!(f, "node {id} has {keys} keys but {children} children")
            }
            Self::MissingChild { id, child } => {
                write!(f, "node {id} references missing child {child}")
            }
        }
    }
}

/// Check every structural invariant of `tree`.
///
/// Returns an empty list when the tree is well-formed.
#[must_use]
pub fn check_tree(tree: &BTree) -> Vec<InvariantViolation> {
    let views: HashMap<NodeId, NodeView> = tree
        .nodes()
        .into_iter()
        .map(|view| (view.id, view))
        .collect();

    let mut violations = Vec::new();
    let mut leaf_depths: Vec<(NodeId, usize)> = Vec::new();
    walk(
        tree,
        &views,
        tree.root_id(),
        true,
        0,
        None,
        None,
        &mut leaf_depths,
        &mut violations,
    );

    if let Some(&(_, expected)) = leaf_depths.first() {
        for &(id, depth) in &leaf_depths[1..] {
            if depth != expected {
                violations.push(InvariantViolation::UnevenLeafDepth {
                    id,
                    depth,
                    expected,
                });
            }
        }
    }

    violations
}

#[allow(clippy::too_many_arguments)]
fn walk(
    tree: &BTree,
    views: &HashMap<NodeId, NodeView>,
    id: NodeId,
    is_root: bool,
    depth: usize,
    lower: Option<&Key>,
    upper: Option<&Key>,
    leaf_depths: &mut Vec<(NodeId, usize)>,
    violations: &mut Vec<InvariantViolation>,
) {
    let Some(view) = views.get(&id) else {
        return;
    };

    let keys = view.keys.len();
    if !is_root && (keys < tree.min_keys() || keys > tree.max_keys()) {
        violations.push(InvariantViolation::KeyCountOutOfBounds {
            id,
            keys,
            min: tree.min_keys(),
            max: tree.max_keys(),
        });
    }
    if is_root && keys > tree.max_keys() {
        violations.push(InvariantViolation::KeyCountOutOfBounds {
            id,
            keys,
            min: 0,
            max: tree.max_keys(),
        });
    }

    if view.keys.windows(2).any(|pair| pair[0] >= pair[1]) {
        violations.push(InvariantViolation::UnsortedNode { id });
    }

    let in_range = view.keys.iter().all(|key| {
        lower.is_none_or(|bound| bound < key) && upper.is_none_or(|bound| key < bound)
    });
    if !in_range {
        violations.push(InvariantViolation::SeparatorViolated { id });
    }

    if view.is_leaf {
        leaf_depths.push((id, depth));
        return;
    }

    if view.children.len() != keys + 1 {
        violations.push(InvariantViolation::WrongChildCount {
            id,
            keys,
            children: view.children.len(),
        });
        return;
    }

    for (position, &child) in view.children.iter().enumerate() {
        if !views.contains_key(&child) {
            violations.push(InvariantViolation::MissingChild { id, child });
            continue;
        }
        let child_lower = if position == 0 {
            lower
        } else {
            view.keys.get(position - 1)
        };
        let child_upper = view.keys.get(position).map_or(upper, Some);
        walk(
            tree,
            views,
            child,
            false,
            depth + 1,
            child_lower,
            child_upper,
            leaf_depths,
            violations,
        );
    }
}
