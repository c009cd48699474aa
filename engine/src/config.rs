//! Engine configuration module.
//!
//! This module provides configuration loading for the tree engine from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `ENGINE_MAX_KEYS`: Node key capacity before a split (default: `3`)
//! - `ENGINE_FRAME_BUFFER_SIZE`: Retained frame count for backward steps (default: `50`)
//! - `ENGINE_DEMO_KEYS`: Number of keys the demo driver inserts (default: `16`)
//!
//! # Invariants
//!
//! - `max_keys` is always at least 2 (a 1-key node cannot split evenly)
//! - `frame_buffer_size` is always at least 1

use crate::sequencer::FRAME_BUFFER_SIZE;

/// Engine configuration.
///
/// Contains all parameters needed to run the demo driver and to size the
/// tree and its frame sequencer.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of keys a node may hold before it must split.
    pub max_keys: usize,
    /// How many past frames the sequencer retains for backward steps.
    pub frame_buffer_size: usize,
    /// How many keys the demo driver synthesizes and inserts.
    pub demo_keys: usize,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl EngineConfig {
    /// Default node key capacity.
    pub const DEFAULT_MAX_KEYS: usize = 3;
    /// Default demo key count.
    pub const DEFAULT_DEMO_KEYS: usize = 16;

    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but is not a number, or is out
    /// of its valid range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_keys = Self::load_usize("ENGINE_MAX_KEYS", Self::DEFAULT_MAX_KEYS, 2)?;
        let frame_buffer_size =
            Self::load_usize("ENGINE_FRAME_BUFFER_SIZE", FRAME_BUFFER_SIZE, 1)?;
        let demo_keys = Self::load_usize("ENGINE_DEMO_KEYS", Self::DEFAULT_DEMO_KEYS, 1)?;

        Ok(Self {
            max_keys,
            frame_buffer_size,
            demo_keys,
        })
    }

    /// Load one numeric variable, applying a default and a lower bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is set but not a number at or above
    /// `minimum`.
    fn load_usize(name: &str, default: usize, minimum: usize) -> Result<usize, ConfigError> {
        match std::env::var(name) {
            Ok(value) => {
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: name.to_string(),
                        message: format!("'{value}' is not a number"),
                    })?;
                if parsed < minimum {
                    return Err(ConfigError::InvalidValue {
                        name: name.to_string(),
                        message: format!("{parsed} is below the minimum of {minimum}"),
                    });
                }
                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_keys: Self::DEFAULT_MAX_KEYS,
            frame_buffer_size: FRAME_BUFFER_SIZE,
            demo_keys: Self::DEFAULT_DEMO_KEYS,
        }
    }
}
