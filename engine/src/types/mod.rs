//! Core value types shared across the engine.

pub mod ids;
pub mod key;

pub use ids::NodeId;
pub use key::{Key, KeyType};
