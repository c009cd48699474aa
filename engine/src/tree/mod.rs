//! The B-tree core.
//!
//! This module provides the balanced multiway search tree behind the
//! engine:
//! - [`Node`]: key/child storage with slot-level operations
//! - [`BTree`]: the arena-owning tree with the public mutate, inspect and
//!   serialize API
//!
//! # Capacity
//!
//! A node holds up to `max_keys` keys; a non-root node never drops below
//! `max_keys / 2`. The capacity is fixed at construction and recorded in
//! the export format.

mod export;
mod node;
mod tree;

pub use export::MalformedTree;
pub use node::{AddResult, Node, SplitDescriptor};
pub use tree::{BTree, MIN_MAX_KEYS, NodeView, Telemetry};
