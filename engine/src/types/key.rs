//! Key values stored in the tree.
//!
//! A tree holds either numeric or text keys; the variant is recorded once in
//! the export format as the `keyType` tag so a round trip restores the same
//! value domain. Callers guarantee uniqueness before mutating the tree.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A comparable key value.
///
/// Numbers order before text, so a homogeneous tree is unaffected and a
/// mixed one still has a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    /// An integer key.
    Number(i64),
    /// A text key, ordered lexicographically by byte value.
    Text(String),
}

impl Key {
    /// The type tag for this key, as recorded in the export format.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Number(_) => KeyType::Number,
            Self::Text(_) => KeyType::Text,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The key domain of a tree, recorded once per export for round-trip
/// fidelity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    /// Integer keys, exported as decimal strings.
    #[serde(rename = "number")]
    Number,
    /// Text keys, exported verbatim.
    #[serde(rename = "string")]
    Text,
}

impl KeyType {
    /// Parse an exported key string back into a key of this type.
    ///
    /// Returns `None` when the string does not belong to the domain, e.g. a
    /// non-numeric string under the `number` tag.
    #[must_use]
    pub fn parse_key(self, raw: &str) -> Option<Key> {
        match self {
            Self::Number => raw.parse::<i64>().ok().map(Key::Number),
            Self::Text => Some(Key::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number => write!(f, "number"),
            Self::Text => write!(f, "string"),
        }
    }
}
