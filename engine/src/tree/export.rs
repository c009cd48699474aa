//! Tree serialization.
//!
//! The persisted layout records the node capacity, the key type tag, and a
//! depth-first copy of the shape with ids and stringified keys:
//!
//! ```json
//! { "maxKeys": 3, "keyType": "number",
//!   "treeData": { "name": { "id": 1, "keys": ["13", "42"] },
//!                 "children": [ ... ] } }
//! ```
//!
//! Import validates structure strictly and fails with [`MalformedTree`];
//! a failed import leaves the caller's previous tree untouched.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::trace::SnapshotNode;
use crate::tree::node::Node;
use crate::tree::tree::{BTree, MIN_MAX_KEYS};
use crate::types::{Key, KeyType, NodeId};

/// Error raised when an imported tree payload is unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTree {
    /// The payload is not valid JSON for the persisted layout.
    Parse(String),
    /// The recorded node capacity cannot form a valid tree.
    InvalidOrder(usize),
    /// An internal node's child count does not match its key count.
    ChildCountMismatch {
        id: u64,
        keys: usize,
        children: usize,
    },
    /// A node holds more keys than the recorded capacity allows.
    TooManyKeys {
        id: u64,
        keys: usize,
        max_keys: usize,
    },
    /// A key string does not belong to the recorded key type.
    InvalidKey { id: u64, value: String },
    /// Two nodes claim the same id.
    DuplicateId(u64),
}

impl std::fmt::Display for MalformedTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "unparsable tree payload: {message}"),
            Self::InvalidOrder(max_keys) => {
                write!(
                    f,
                    "invalid node capacity {max_keys} (minimum {MIN_MAX_KEYS})"
                )
            }
            Self::ChildCountMismatch { id, keys, children } => {
                write!(
                    f,
                    "node {id} has {keys} keys but {children} children (expected {})",
                    keys + 1
                )
            }
            Self::TooManyKeys { id, keys, max_keys } => {
                write!(f, "node {id} has {keys} keys, above the capacity {max_keys}")
            }
            Self::InvalidKey { id, value } => {
                write!(f, "node {id} holds key '{value}' outside the recorded key type")
            }
            Self::DuplicateId(id) => write!(f, "node id {id} appears more than once"),
        }
    }
}

impl std::error::Error for MalformedTree {}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeExport {
    max_keys: usize,
    key_type: KeyType,
    tree_data: TreeData,
}

#[derive(Debug, Serialize, Deserialize)]
struct TreeData {
    name: NodeData,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    children: Option<Vec<TreeData>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeData {
    id: u64,
    keys: Vec<String>,
}

impl BTree {
    /// Serialize the tree to its persisted text form.
    #[must_use]
    pub fn export(&self) -> String {
        let key_type = self
            .keys()
            .first()
            .map_or(KeyType::Number, Key::key_type);
        let payload = TreeExport {
            max_keys: self.max_keys(),
            key_type,
            tree_data: tree_data_from(&self.snapshot().root),
        };
        // A tree of integers and strings always serializes.
        #[allow(clippy::unwrap_used)]
        let text = serde_json::to_string(&payload).unwrap();
        text
    }

    /// Rebuild a tree from its persisted text form, preserving node ids.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedTree`] on parse failure or structurally invalid
    /// input; the caller keeps its previous tree in that case.
    pub fn import(text: &str) -> Result<Self, MalformedTree> {
        let parsed: TreeExport =
            serde_json::from_str(text).map_err(|error| MalformedTree::Parse(error.to_string()))?;
        if parsed.max_keys < MIN_MAX_KEYS {
            return Err(MalformedTree::InvalidOrder(parsed.max_keys));
        }

        let mut nodes = HashMap::new();
        let mut highest_id = 0;
        let root = build_node(
            &parsed.tree_data,
            parsed.max_keys,
            parsed.key_type,
            &mut nodes,
            &mut highest_id,
        )?;
        Ok(Self::from_imported(
            parsed.max_keys,
            nodes,
            root,
            highest_id,
        ))
    }
}

fn tree_data_from(node: &SnapshotNode) -> TreeData {
    TreeData {
        name: NodeData {
            id: node.id.as_u64(),
            keys: node.keys.iter().map(ToString::to_string).collect(),
        },
        children: if node.is_leaf() {
            None
        } else {
            Some(node.children.iter().map(tree_data_from).collect())
        },
    }
}

fn build_node(
    data: &TreeData,
    max_keys: usize,
    key_type: KeyType,
    nodes: &mut HashMap<NodeId, Node>,
    highest_id: &mut u64,
) -> Result<NodeId, MalformedTree> {
    let id = data.name.id;
    let key_count = data.name.keys.len();
    if key_count > max_keys {
        return Err(MalformedTree::TooManyKeys {
            id,
            keys: key_count,
            max_keys,
        });
    }

    let mut keys = Vec::with_capacity(key_count);
    for raw in &data.name.keys {
        let key = key_type
            .parse_key(raw)
            .ok_or_else(|| MalformedTree::InvalidKey {
                id,
                value: raw.clone(),
            })?;
        keys.push(key);
    }

    let children = match &data.children {
        Some(children) => {
            if children.len() != key_count + 1 {
                return Err(MalformedTree::ChildCountMismatch {
                    id,
                    keys: key_count,
                    children: children.len(),
                });
            }
            let mut ids = Vec::with_capacity(children.len());
            for child in children {
                ids.push(build_node(child, max_keys, key_type, nodes, highest_id)?);
            }
            ids
        }
        None => Vec::new(),
    };

    let node_id = NodeId(id);
    if nodes
        .insert(node_id, Node::from_parts(node_id, max_keys, keys, children))
        .is_some()
    {
        return Err(MalformedTree::DuplicateId(id));
    }
    *highest_id = (*highest_id).max(id);
    Ok(node_id)
}
